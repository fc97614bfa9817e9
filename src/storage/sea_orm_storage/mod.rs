//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。
//! 各业务域的查询拆分在同名子模块中，以 `*_impl` 方法提供。

mod activity;
mod attendance;
mod class_fees;
mod classrooms;
mod complaints;
mod date_sheets;
mod fees;
mod leaves;
mod messages;
mod notifications;
mod parents;
mod payments;
mod students;
mod subjects;
mod teachers;
mod timetable;
mod users;

#[cfg(test)]
mod tests;

use crate::config::AppConfig;
use crate::errors::{SchoolDeskError, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 创建新的 SeaORM 存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        let db_url = Self::build_database_url(&config.database.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite://") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        // 运行迁移
        Migrator::up(&db, None)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| SchoolDeskError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory")
            .pragma("mmap_size", "536870912")
            .pragma("wal_autocheckpoint", "1000");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.database.pool_size)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| SchoolDeskError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.database.pool_size)
            .min_connections(5)
            .connect_timeout(Duration::from_secs(config.database.timeout))
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| SchoolDeskError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite://") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") || url == ":memory:" {
            Ok(format!("sqlite://{}?mode=rwc", url))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(SchoolDeskError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

#[cfg(test)]
impl SeaOrmStorage {
    /// 单连接内存库，已执行迁移
    pub(crate) async fn in_memory() -> Result<Self> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| SchoolDeskError::database_config(e.to_string()))?
            .foreign_keys(true);
        // 内存库随连接销毁，只保留一个常驻连接
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(opt)
            .await
            .map_err(|e| SchoolDeskError::database_connection(e.to_string()))?;
        let db = SqlxSqliteConnector::from_sqlx_sqlite_pool(pool);
        Migrator::up(&db, None)
            .await
            .map_err(|e| SchoolDeskError::database_operation(e.to_string()))?;
        Ok(Self { db })
    }
}

// Storage trait 实现
use crate::models::{
    PaginatedResponse, PaginationQuery,
    activity::{
        entities::{ActivityLog, NewActivityLog},
        requests::ActivityLogListParams,
    },
    attendance::{
        entities::AttendanceRecord,
        requests::{AttendanceListParams, AttendanceMark},
    },
    classrooms::{
        entities::{Classroom, ClassroomSummary},
        requests::{ClassroomListParams, CreateClassroomRequest, UpdateClassroomRequest},
    },
    complaints::{
        entities::{Complaint, ComplaintStatus},
        requests::{ComplaintListQuery, CreateComplaintRequest},
    },
    date_sheets::{
        entities::{DateSheet, DateSheetEntry},
        requests::{CreateDateSheetEntryRequest, CreateDateSheetRequest, DateSheetListParams},
    },
    fees::{
        entities::{
            ClassFee, Discount, Fee, FeeType, NewClassFee, NewFee, NewPayment, Payment, Receipt,
        },
        requests::{
            CreateDiscountRequest, CreateFeeTypeRequest, FeeListQuery, UpdateFeeRequest,
            UpdateFeeTypeRequest,
        },
    },
    leaves::{
        entities::{AutoApprovalSettings, LeaveApprovalLog, LeaveDecision, TeacherLeave},
        requests::{ApplyLeaveRequest, LeaveListParams, UpdateAutoApprovalRequest},
    },
    notifications::entities::{Message, NewNotification, Notification},
    parents::{
        entities::Parent,
        requests::{CreateParentRequest, ParentListParams, UpdateParentRequest},
    },
    students::{
        entities::Student,
        requests::{CreateStudentRequest, StudentListQuery, UpdateStudentRequest},
    },
    subjects::{
        entities::Subject,
        requests::{CreateSubjectRequest, SubjectListParams, UpdateSubjectRequest},
    },
    teachers::{
        entities::Teacher,
        requests::{CreateTeacherRequest, TeacherListParams, UpdateTeacherRequest},
    },
    timetable::{
        entities::{Timetable, TimetableEntry},
        requests::{
            CreateEntryRequest, CreateTimetableRequest, TimetableListParams,
            UpdateTimetableRequest,
        },
    },
    users::{
        entities::{User, UserRole},
        requests::{CreateUserRequest, UpdateUserRequest, UserListQuery},
    },
};

use crate::storage::Storage;
use async_trait::async_trait;
use chrono::NaiveDate;
use sea_orm::ConnectionTrait;

#[async_trait]
impl Storage for SeaOrmStorage {
    async fn ping(&self) -> Result<()> {
        self.db
            .execute_unprepared("SELECT 1")
            .await
            .map_err(|e| SchoolDeskError::database_connection(format!("数据库探测失败: {e}")))?;
        Ok(())
    }

    // 用户管理方法
    async fn create_user(&self, user: CreateUserRequest) -> Result<User> {
        self.create_user_impl(user).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.get_user_by_username_impl(username).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.get_user_by_email_impl(email).await
    }

    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>> {
        self.get_user_by_username_or_email_impl(identifier).await
    }

    async fn list_users_with_pagination(
        &self,
        query: UserListQuery,
    ) -> Result<PaginatedResponse<User>> {
        self.list_users_with_pagination_impl(query).await
    }

    async fn list_user_ids_by_role(&self, role: UserRole) -> Result<Vec<i64>> {
        self.list_user_ids_by_role_impl(role).await
    }

    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>> {
        self.update_user_impl(id, update).await
    }

    async fn delete_user(&self, id: i64) -> Result<bool> {
        self.delete_user_impl(id).await
    }

    async fn update_last_login(&self, id: i64) -> Result<bool> {
        self.update_last_login_impl(id).await
    }

    async fn count_users(&self) -> Result<u64> {
        self.count_users_impl().await
    }

    // 操作日志
    async fn create_activity_log(&self, log: NewActivityLog) -> Result<ActivityLog> {
        self.create_activity_log_impl(log).await
    }

    async fn list_activity_logs(
        &self,
        query: ActivityLogListParams,
    ) -> Result<PaginatedResponse<ActivityLog>> {
        self.list_activity_logs_impl(query).await
    }

    // 班级管理方法
    async fn create_classroom(&self, req: CreateClassroomRequest) -> Result<Classroom> {
        self.create_classroom_impl(req).await
    }

    async fn get_classroom_by_id(&self, id: i64) -> Result<Option<Classroom>> {
        self.get_classroom_by_id_impl(id).await
    }

    async fn get_classroom_by_name(&self, name: &str) -> Result<Option<Classroom>> {
        self.get_classroom_by_name_impl(name).await
    }

    async fn list_classrooms(
        &self,
        query: ClassroomListParams,
    ) -> Result<PaginatedResponse<ClassroomSummary>> {
        self.list_classrooms_impl(query).await
    }

    async fn update_classroom(
        &self,
        id: i64,
        update: UpdateClassroomRequest,
    ) -> Result<Option<Classroom>> {
        self.update_classroom_impl(id, update).await
    }

    async fn delete_classroom(&self, id: i64) -> Result<bool> {
        self.delete_classroom_impl(id).await
    }

    async fn count_students_in_classroom(&self, id: i64) -> Result<u64> {
        self.count_students_in_classroom_impl(id).await
    }

    async fn list_students_in_classroom(&self, id: i64) -> Result<Vec<Student>> {
        self.list_students_in_classroom_impl(id).await
    }

    // 科目管理方法
    async fn create_subject(&self, req: CreateSubjectRequest) -> Result<Subject> {
        self.create_subject_impl(req).await
    }

    async fn get_subject_by_id(&self, id: i64) -> Result<Option<Subject>> {
        self.get_subject_by_id_impl(id).await
    }

    async fn list_subjects(&self, query: SubjectListParams) -> Result<Vec<Subject>> {
        self.list_subjects_impl(query).await
    }

    async fn update_subject(
        &self,
        id: i64,
        update: UpdateSubjectRequest,
    ) -> Result<Option<Subject>> {
        self.update_subject_impl(id, update).await
    }

    async fn delete_subject(&self, id: i64) -> Result<bool> {
        self.delete_subject_impl(id).await
    }

    // 学生管理方法
    async fn create_student(&self, req: CreateStudentRequest) -> Result<Student> {
        self.create_student_impl(req).await
    }

    async fn get_student_by_id(&self, id: i64) -> Result<Option<Student>> {
        self.get_student_by_id_impl(id).await
    }

    async fn get_student_by_email(&self, email: &str) -> Result<Option<Student>> {
        self.get_student_by_email_impl(email).await
    }

    async fn list_students_with_pagination(
        &self,
        query: StudentListQuery,
    ) -> Result<PaginatedResponse<Student>> {
        self.list_students_with_pagination_impl(query).await
    }

    async fn list_all_students(&self) -> Result<Vec<Student>> {
        self.list_all_students_impl().await
    }

    async fn list_students_by_ids(&self, ids: &[i64]) -> Result<Vec<Student>> {
        self.list_students_by_ids_impl(ids).await
    }

    async fn update_student(
        &self,
        id: i64,
        update: UpdateStudentRequest,
    ) -> Result<Option<Student>> {
        self.update_student_impl(id, update).await
    }

    async fn set_student_active(&self, id: i64, is_active: bool) -> Result<Option<Student>> {
        self.set_student_active_impl(id, is_active).await
    }

    async fn delete_student(&self, id: i64) -> Result<bool> {
        self.delete_student_impl(id).await
    }

    async fn delete_students(&self, ids: &[i64]) -> Result<u64> {
        self.delete_students_impl(ids).await
    }

    // 教师管理方法
    async fn create_teacher(&self, req: CreateTeacherRequest, secret_key: &str) -> Result<Teacher> {
        self.create_teacher_impl(req, secret_key).await
    }

    async fn get_teacher_by_id(&self, id: i64) -> Result<Option<Teacher>> {
        self.get_teacher_by_id_impl(id).await
    }

    async fn get_teacher_by_user_id(&self, user_id: i64) -> Result<Option<Teacher>> {
        self.get_teacher_by_user_id_impl(user_id).await
    }

    async fn get_teacher_by_secret_key(&self, secret_key: &str) -> Result<Option<Teacher>> {
        self.get_teacher_by_secret_key_impl(secret_key).await
    }

    async fn get_teacher_by_employee_id(&self, employee_id: &str) -> Result<Option<Teacher>> {
        self.get_teacher_by_employee_id_impl(employee_id).await
    }

    async fn list_teachers_with_pagination(
        &self,
        query: TeacherListParams,
    ) -> Result<PaginatedResponse<Teacher>> {
        self.list_teachers_with_pagination_impl(query).await
    }

    async fn update_teacher(
        &self,
        id: i64,
        update: UpdateTeacherRequest,
    ) -> Result<Option<Teacher>> {
        self.update_teacher_impl(id, update).await
    }

    async fn set_teacher_secret_key(&self, id: i64, secret_key: &str) -> Result<Option<Teacher>> {
        self.set_teacher_secret_key_impl(id, secret_key).await
    }

    async fn delete_teacher(&self, id: i64) -> Result<bool> {
        self.delete_teacher_impl(id).await
    }

    async fn register_teacher_account(
        &self,
        teacher_id: i64,
        user: CreateUserRequest,
    ) -> Result<User> {
        self.register_teacher_account_impl(teacher_id, user).await
    }

    // 家长管理方法
    async fn create_parent(&self, req: CreateParentRequest, secret_key: &str) -> Result<Parent> {
        self.create_parent_impl(req, secret_key).await
    }

    async fn get_parent_by_id(&self, id: i64) -> Result<Option<Parent>> {
        self.get_parent_by_id_impl(id).await
    }

    async fn get_parent_by_secret_key(&self, secret_key: &str) -> Result<Option<Parent>> {
        self.get_parent_by_secret_key_impl(secret_key).await
    }

    async fn list_parents_with_pagination(
        &self,
        query: ParentListParams,
    ) -> Result<PaginatedResponse<Parent>> {
        self.list_parents_with_pagination_impl(query).await
    }

    async fn list_parents_by_user_id(&self, user_id: i64) -> Result<Vec<Parent>> {
        self.list_parents_by_user_id_impl(user_id).await
    }

    async fn update_parent(&self, id: i64, update: UpdateParentRequest) -> Result<Option<Parent>> {
        self.update_parent_impl(id, update).await
    }

    async fn set_parent_secret_key(&self, id: i64, secret_key: &str) -> Result<Option<Parent>> {
        self.set_parent_secret_key_impl(id, secret_key).await
    }

    async fn delete_parent(&self, id: i64) -> Result<bool> {
        self.delete_parent_impl(id).await
    }

    async fn register_parent_account(
        &self,
        parent_id: i64,
        user: CreateUserRequest,
    ) -> Result<User> {
        self.register_parent_account_impl(parent_id, user).await
    }

    // 考勤
    async fn upsert_attendance(
        &self,
        date: NaiveDate,
        marks: &[AttendanceMark],
        marked_by: Option<i64>,
    ) -> Result<Vec<AttendanceRecord>> {
        self.upsert_attendance_impl(date, marks, marked_by).await
    }

    async fn list_attendance(&self, query: AttendanceListParams) -> Result<Vec<AttendanceRecord>> {
        self.list_attendance_impl(query).await
    }

    async fn list_student_attendance(
        &self,
        student_id: i64,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<AttendanceRecord>> {
        self.list_student_attendance_impl(student_id, from, to).await
    }

    // 费用类型
    async fn create_fee_type(&self, req: CreateFeeTypeRequest) -> Result<FeeType> {
        self.create_fee_type_impl(req).await
    }

    async fn get_fee_type_by_id(&self, id: i64) -> Result<Option<FeeType>> {
        self.get_fee_type_by_id_impl(id).await
    }

    async fn get_fee_type_by_name(&self, name: &str) -> Result<Option<FeeType>> {
        self.get_fee_type_by_name_impl(name).await
    }

    async fn list_fee_types(&self) -> Result<Vec<FeeType>> {
        self.list_fee_types_impl().await
    }

    async fn update_fee_type(
        &self,
        id: i64,
        update: UpdateFeeTypeRequest,
    ) -> Result<Option<FeeType>> {
        self.update_fee_type_impl(id, update).await
    }

    async fn toggle_fee_type(&self, id: i64) -> Result<Option<FeeType>> {
        self.toggle_fee_type_impl(id).await
    }

    async fn delete_fee_type(&self, id: i64) -> Result<bool> {
        self.delete_fee_type_impl(id).await
    }

    // 费用
    async fn create_fee(&self, fee: NewFee) -> Result<Fee> {
        self.create_fee_impl(fee).await
    }

    async fn get_fee_by_id(&self, id: i64) -> Result<Option<Fee>> {
        self.get_fee_by_id_impl(id).await
    }

    async fn list_fees_with_pagination(
        &self,
        query: FeeListQuery,
    ) -> Result<PaginatedResponse<Fee>> {
        self.list_fees_with_pagination_impl(query).await
    }

    async fn list_fees_by_students(&self, student_ids: &[i64]) -> Result<Vec<Fee>> {
        self.list_fees_by_students_impl(student_ids).await
    }

    async fn list_all_fees(&self) -> Result<Vec<Fee>> {
        self.list_all_fees_impl().await
    }

    async fn update_fee(&self, id: i64, update: UpdateFeeRequest) -> Result<Option<Fee>> {
        self.update_fee_impl(id, update).await
    }

    async fn delete_fee(&self, id: i64) -> Result<bool> {
        self.delete_fee_impl(id).await
    }

    async fn create_fees(&self, fees: Vec<NewFee>) -> Result<Vec<Fee>> {
        self.create_fees_impl(fees).await
    }

    // 班级收费标准
    async fn upsert_class_fee(&self, fee: NewClassFee) -> Result<ClassFee> {
        self.upsert_class_fee_impl(fee).await
    }

    async fn get_class_fee_by_id(&self, id: i64) -> Result<Option<ClassFee>> {
        self.get_class_fee_by_id_impl(id).await
    }

    async fn list_class_fees(
        &self,
        classroom_id: i64,
        academic_year: &str,
    ) -> Result<Vec<ClassFee>> {
        self.list_class_fees_impl(classroom_id, academic_year).await
    }

    async fn adjust_class_fee(
        &self,
        id: i64,
        adjustment_amount: f64,
        reason: Option<String>,
        adjusted_by: Option<i64>,
    ) -> Result<Option<ClassFee>> {
        self.adjust_class_fee_impl(id, adjustment_amount, reason, adjusted_by)
            .await
    }

    // 折扣
    async fn create_discount(
        &self,
        req: CreateDiscountRequest,
        approved_by: Option<i64>,
    ) -> Result<Discount> {
        self.create_discount_impl(req, approved_by).await
    }

    async fn list_discounts_by_student(&self, student_id: i64) -> Result<Vec<Discount>> {
        self.list_discounts_by_student_impl(student_id).await
    }

    async fn list_active_discounts_for_fees(&self, fee_ids: &[i64]) -> Result<Vec<Discount>> {
        self.list_active_discounts_for_fees_impl(fee_ids).await
    }

    async fn deactivate_discount(&self, id: i64) -> Result<bool> {
        self.deactivate_discount_impl(id).await
    }

    // 缴费与收据
    async fn record_payment(&self, payment: NewPayment) -> Result<(Payment, Receipt)> {
        self.record_payment_impl(payment).await
    }

    async fn list_payments_for_fees(&self, fee_ids: &[i64]) -> Result<Vec<Payment>> {
        self.list_payments_for_fees_impl(fee_ids).await
    }

    async fn get_payment_by_id(&self, id: i64) -> Result<Option<Payment>> {
        self.get_payment_by_id_impl(id).await
    }

    async fn get_receipt_by_id(&self, id: i64) -> Result<Option<Receipt>> {
        self.get_receipt_by_id_impl(id).await
    }

    async fn list_receipts_with_pagination(
        &self,
        query: PaginationQuery,
    ) -> Result<PaginatedResponse<Receipt>> {
        self.list_receipts_with_pagination_impl(query).await
    }

    // 课表
    async fn create_timetable(
        &self,
        req: CreateTimetableRequest,
        created_by: Option<i64>,
    ) -> Result<Timetable> {
        self.create_timetable_impl(req, created_by).await
    }

    async fn get_timetable_by_id(&self, id: i64) -> Result<Option<Timetable>> {
        self.get_timetable_by_id_impl(id).await
    }

    async fn list_timetables(&self, query: TimetableListParams) -> Result<Vec<Timetable>> {
        self.list_timetables_impl(query).await
    }

    async fn update_timetable(
        &self,
        id: i64,
        update: UpdateTimetableRequest,
    ) -> Result<Option<Timetable>> {
        self.update_timetable_impl(id, update).await
    }

    async fn publish_timetable(&self, id: i64) -> Result<Option<Timetable>> {
        self.publish_timetable_impl(id).await
    }

    async fn delete_timetable(&self, id: i64) -> Result<bool> {
        self.delete_timetable_impl(id).await
    }

    async fn create_timetable_entry(
        &self,
        timetable_id: i64,
        entry: CreateEntryRequest,
    ) -> Result<TimetableEntry> {
        self.create_timetable_entry_impl(timetable_id, entry).await
    }

    async fn list_timetable_entries(&self, timetable_id: i64) -> Result<Vec<TimetableEntry>> {
        self.list_timetable_entries_impl(timetable_id).await
    }

    async fn list_active_entries_on_day(&self, day_of_week: i32) -> Result<Vec<TimetableEntry>> {
        self.list_active_entries_on_day_impl(day_of_week).await
    }

    async fn list_teacher_schedule(&self, teacher_id: i64) -> Result<Vec<TimetableEntry>> {
        self.list_teacher_schedule_impl(teacher_id).await
    }

    async fn delete_timetable_entry(&self, timetable_id: i64, entry_id: i64) -> Result<bool> {
        self.delete_timetable_entry_impl(timetable_id, entry_id).await
    }

    // 考试日程
    async fn create_date_sheet(
        &self,
        req: CreateDateSheetRequest,
        created_by: Option<i64>,
    ) -> Result<DateSheet> {
        self.create_date_sheet_impl(req, created_by).await
    }

    async fn get_date_sheet_by_id(&self, id: i64) -> Result<Option<DateSheet>> {
        self.get_date_sheet_by_id_impl(id).await
    }

    async fn list_date_sheets(&self, query: DateSheetListParams) -> Result<Vec<DateSheet>> {
        self.list_date_sheets_impl(query).await
    }

    async fn publish_date_sheet(&self, id: i64) -> Result<Option<DateSheet>> {
        self.publish_date_sheet_impl(id).await
    }

    async fn delete_date_sheet(&self, id: i64) -> Result<bool> {
        self.delete_date_sheet_impl(id).await
    }

    async fn create_date_sheet_entry(
        &self,
        date_sheet_id: i64,
        entry: CreateDateSheetEntryRequest,
    ) -> Result<DateSheetEntry> {
        self.create_date_sheet_entry_impl(date_sheet_id, entry).await
    }

    async fn list_date_sheet_entries(&self, date_sheet_ids: &[i64]) -> Result<Vec<DateSheetEntry>> {
        self.list_date_sheet_entries_impl(date_sheet_ids).await
    }

    async fn delete_date_sheet_entry(&self, date_sheet_id: i64, entry_id: i64) -> Result<bool> {
        self.delete_date_sheet_entry_impl(date_sheet_id, entry_id).await
    }

    // 教师请假
    async fn create_leave(&self, teacher_id: i64, req: ApplyLeaveRequest) -> Result<TeacherLeave> {
        self.create_leave_impl(teacher_id, req).await
    }

    async fn get_leave_by_id(&self, id: i64) -> Result<Option<TeacherLeave>> {
        self.get_leave_by_id_impl(id).await
    }

    async fn list_leaves_with_pagination(
        &self,
        query: LeaveListParams,
    ) -> Result<PaginatedResponse<TeacherLeave>> {
        self.list_leaves_with_pagination_impl(query).await
    }

    async fn list_pending_leaves(&self) -> Result<Vec<TeacherLeave>> {
        self.list_pending_leaves_impl().await
    }

    async fn decide_leave(&self, decision: LeaveDecision) -> Result<Option<TeacherLeave>> {
        self.decide_leave_impl(decision).await
    }

    async fn list_leave_approval_logs(&self, leave_id: i64) -> Result<Vec<LeaveApprovalLog>> {
        self.list_leave_approval_logs_impl(leave_id).await
    }

    async fn get_auto_approval_settings(&self) -> Result<AutoApprovalSettings> {
        self.get_auto_approval_settings_impl().await
    }

    async fn update_auto_approval_settings(
        &self,
        update: UpdateAutoApprovalRequest,
        updated_by: i64,
    ) -> Result<AutoApprovalSettings> {
        self.update_auto_approval_settings_impl(update, updated_by).await
    }

    // 投诉
    async fn create_complaint(
        &self,
        sender_id: i64,
        sender_type: &str,
        req: CreateComplaintRequest,
    ) -> Result<Complaint> {
        self.create_complaint_impl(sender_id, sender_type, req).await
    }

    async fn get_complaint_by_id(&self, id: i64) -> Result<Option<Complaint>> {
        self.get_complaint_by_id_impl(id).await
    }

    async fn list_complaints_with_pagination(
        &self,
        query: ComplaintListQuery,
    ) -> Result<PaginatedResponse<Complaint>> {
        self.list_complaints_with_pagination_impl(query).await
    }

    async fn respond_complaint(
        &self,
        id: i64,
        response: String,
        status: ComplaintStatus,
        responded_by: i64,
    ) -> Result<Option<Complaint>> {
        self.respond_complaint_impl(id, response, status, responded_by).await
    }

    async fn update_complaint_status(
        &self,
        id: i64,
        status: ComplaintStatus,
    ) -> Result<Option<Complaint>> {
        self.update_complaint_status_impl(id, status).await
    }

    // 通知
    async fn create_notifications(&self, notifications: Vec<NewNotification>) -> Result<u64> {
        self.create_notifications_impl(notifications).await
    }

    async fn list_notifications_with_pagination(
        &self,
        user_id: i64,
        unread_only: bool,
        query: PaginationQuery,
    ) -> Result<PaginatedResponse<Notification>> {
        self.list_notifications_with_pagination_impl(user_id, unread_only, query).await
    }

    async fn count_unread_notifications(&self, user_id: i64) -> Result<u64> {
        self.count_unread_notifications_impl(user_id).await
    }

    async fn mark_notification_read(&self, user_id: i64, id: i64) -> Result<bool> {
        self.mark_notification_read_impl(user_id, id).await
    }

    async fn mark_all_notifications_read(&self, user_id: i64) -> Result<u64> {
        self.mark_all_notifications_read_impl(user_id).await
    }

    // 私信
    async fn create_message(
        &self,
        sender_id: i64,
        recipient_id: i64,
        body: String,
    ) -> Result<Message> {
        self.create_message_impl(sender_id, recipient_id, body).await
    }

    async fn list_inbox_with_pagination(
        &self,
        user_id: i64,
        query: PaginationQuery,
    ) -> Result<PaginatedResponse<Message>> {
        self.list_inbox_with_pagination_impl(user_id, query).await
    }

    async fn list_conversation(&self, user_id: i64, other_id: i64) -> Result<Vec<Message>> {
        self.list_conversation_impl(user_id, other_id).await
    }

    async fn mark_conversation_read(&self, user_id: i64, other_id: i64) -> Result<u64> {
        self.mark_conversation_read_impl(user_id, other_id).await
    }

    async fn count_unread_messages(&self, user_id: i64) -> Result<u64> {
        self.count_unread_messages_impl(user_id).await
    }
}
