use std::sync::Arc;

use chrono::NaiveDate;

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

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    // 数据库连通性探测
    async fn ping(&self) -> Result<()>;

    /// 用户管理方法
    // 创建用户（密码已哈希）
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 通过用户名获取用户信息
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;
    // 通过邮箱获取用户信息
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    // 通过用户名或邮箱获取用户信息
    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>>;
    // 列出用户
    async fn list_users_with_pagination(
        &self,
        query: UserListQuery,
    ) -> Result<PaginatedResponse<User>>;
    // 某角色下全部活跃用户的 ID
    async fn list_user_ids_by_role(&self, role: UserRole) -> Result<Vec<i64>>;
    // 更新用户信息
    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>>;
    // 删除用户
    async fn delete_user(&self, id: i64) -> Result<bool>;
    // 更新用户最后登录时间
    async fn update_last_login(&self, id: i64) -> Result<bool>;
    // 统计用户数量
    async fn count_users(&self) -> Result<u64>;

    /// 操作日志
    async fn create_activity_log(&self, log: NewActivityLog) -> Result<ActivityLog>;
    async fn list_activity_logs(
        &self,
        query: ActivityLogListParams,
    ) -> Result<PaginatedResponse<ActivityLog>>;

    /// 班级管理方法
    async fn create_classroom(&self, req: CreateClassroomRequest) -> Result<Classroom>;
    async fn get_classroom_by_id(&self, id: i64) -> Result<Option<Classroom>>;
    async fn get_classroom_by_name(&self, name: &str) -> Result<Option<Classroom>>;
    async fn list_classrooms(
        &self,
        query: ClassroomListParams,
    ) -> Result<PaginatedResponse<ClassroomSummary>>;
    async fn update_classroom(
        &self,
        id: i64,
        update: UpdateClassroomRequest,
    ) -> Result<Option<Classroom>>;
    async fn delete_classroom(&self, id: i64) -> Result<bool>;
    async fn count_students_in_classroom(&self, id: i64) -> Result<u64>;
    async fn list_students_in_classroom(&self, id: i64) -> Result<Vec<Student>>;

    /// 科目管理方法
    async fn create_subject(&self, req: CreateSubjectRequest) -> Result<Subject>;
    async fn get_subject_by_id(&self, id: i64) -> Result<Option<Subject>>;
    async fn list_subjects(&self, query: SubjectListParams) -> Result<Vec<Subject>>;
    async fn update_subject(&self, id: i64, update: UpdateSubjectRequest)
    -> Result<Option<Subject>>;
    async fn delete_subject(&self, id: i64) -> Result<bool>;

    /// 学生管理方法
    async fn create_student(&self, req: CreateStudentRequest) -> Result<Student>;
    async fn get_student_by_id(&self, id: i64) -> Result<Option<Student>>;
    async fn get_student_by_email(&self, email: &str) -> Result<Option<Student>>;
    async fn list_students_with_pagination(
        &self,
        query: StudentListQuery,
    ) -> Result<PaginatedResponse<Student>>;
    // 导出用：不分页
    async fn list_all_students(&self) -> Result<Vec<Student>>;
    async fn list_students_by_ids(&self, ids: &[i64]) -> Result<Vec<Student>>;
    async fn update_student(&self, id: i64, update: UpdateStudentRequest)
    -> Result<Option<Student>>;
    async fn set_student_active(&self, id: i64, is_active: bool) -> Result<Option<Student>>;
    async fn delete_student(&self, id: i64) -> Result<bool>;
    async fn delete_students(&self, ids: &[i64]) -> Result<u64>;

    /// 教师管理方法
    async fn create_teacher(&self, req: CreateTeacherRequest, secret_key: &str)
    -> Result<Teacher>;
    async fn get_teacher_by_id(&self, id: i64) -> Result<Option<Teacher>>;
    async fn get_teacher_by_user_id(&self, user_id: i64) -> Result<Option<Teacher>>;
    async fn get_teacher_by_secret_key(&self, secret_key: &str) -> Result<Option<Teacher>>;
    async fn get_teacher_by_employee_id(&self, employee_id: &str) -> Result<Option<Teacher>>;
    async fn list_teachers_with_pagination(
        &self,
        query: TeacherListParams,
    ) -> Result<PaginatedResponse<Teacher>>;
    async fn update_teacher(&self, id: i64, update: UpdateTeacherRequest)
    -> Result<Option<Teacher>>;
    async fn set_teacher_secret_key(&self, id: i64, secret_key: &str)
    -> Result<Option<Teacher>>;
    async fn delete_teacher(&self, id: i64) -> Result<bool>;
    // 同一事务中创建教师账号并关联档案
    async fn register_teacher_account(
        &self,
        teacher_id: i64,
        user: CreateUserRequest,
    ) -> Result<User>;

    /// 家长管理方法
    async fn create_parent(&self, req: CreateParentRequest, secret_key: &str) -> Result<Parent>;
    async fn get_parent_by_id(&self, id: i64) -> Result<Option<Parent>>;
    async fn get_parent_by_secret_key(&self, secret_key: &str) -> Result<Option<Parent>>;
    async fn list_parents_with_pagination(
        &self,
        query: ParentListParams,
    ) -> Result<PaginatedResponse<Parent>>;
    async fn list_parents_by_user_id(&self, user_id: i64) -> Result<Vec<Parent>>;
    async fn update_parent(&self, id: i64, update: UpdateParentRequest)
    -> Result<Option<Parent>>;
    async fn set_parent_secret_key(&self, id: i64, secret_key: &str) -> Result<Option<Parent>>;
    async fn delete_parent(&self, id: i64) -> Result<bool>;
    // 同一事务中创建家长账号并关联档案
    async fn register_parent_account(&self, parent_id: i64, user: CreateUserRequest)
    -> Result<User>;

    /// 考勤
    // 按 (学生, 日期) 插入或覆盖
    async fn upsert_attendance(
        &self,
        date: NaiveDate,
        marks: &[AttendanceMark],
        marked_by: Option<i64>,
    ) -> Result<Vec<AttendanceRecord>>;
    async fn list_attendance(&self, query: AttendanceListParams) -> Result<Vec<AttendanceRecord>>;
    async fn list_student_attendance(
        &self,
        student_id: i64,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<AttendanceRecord>>;

    /// 费用类型
    async fn create_fee_type(&self, req: CreateFeeTypeRequest) -> Result<FeeType>;
    async fn get_fee_type_by_id(&self, id: i64) -> Result<Option<FeeType>>;
    async fn get_fee_type_by_name(&self, name: &str) -> Result<Option<FeeType>>;
    async fn list_fee_types(&self) -> Result<Vec<FeeType>>;
    async fn update_fee_type(&self, id: i64, update: UpdateFeeTypeRequest)
    -> Result<Option<FeeType>>;
    async fn toggle_fee_type(&self, id: i64) -> Result<Option<FeeType>>;
    async fn delete_fee_type(&self, id: i64) -> Result<bool>;

    /// 费用
    async fn create_fee(&self, fee: NewFee) -> Result<Fee>;
    async fn get_fee_by_id(&self, id: i64) -> Result<Option<Fee>>;
    async fn list_fees_with_pagination(&self, query: FeeListQuery)
    -> Result<PaginatedResponse<Fee>>;
    async fn list_fees_by_students(&self, student_ids: &[i64]) -> Result<Vec<Fee>>;
    async fn list_all_fees(&self) -> Result<Vec<Fee>>;
    async fn update_fee(&self, id: i64, update: UpdateFeeRequest) -> Result<Option<Fee>>;
    async fn delete_fee(&self, id: i64) -> Result<bool>;
    // 同一事务中批量创建
    async fn create_fees(&self, fees: Vec<NewFee>) -> Result<Vec<Fee>>;

    /// 班级收费标准
    // 按 (班级, 费用类型, 学年) 插入或覆盖，保留已有的调整额
    async fn upsert_class_fee(&self, fee: NewClassFee) -> Result<ClassFee>;
    async fn get_class_fee_by_id(&self, id: i64) -> Result<Option<ClassFee>>;
    async fn list_class_fees(&self, classroom_id: i64, academic_year: &str)
    -> Result<Vec<ClassFee>>;
    async fn adjust_class_fee(
        &self,
        id: i64,
        adjustment_amount: f64,
        reason: Option<String>,
        adjusted_by: Option<i64>,
    ) -> Result<Option<ClassFee>>;

    /// 折扣
    async fn create_discount(
        &self,
        req: CreateDiscountRequest,
        approved_by: Option<i64>,
    ) -> Result<Discount>;
    async fn list_discounts_by_student(&self, student_id: i64) -> Result<Vec<Discount>>;
    // 指定费用上的有效折扣
    async fn list_active_discounts_for_fees(&self, fee_ids: &[i64]) -> Result<Vec<Discount>>;
    async fn deactivate_discount(&self, id: i64) -> Result<bool>;

    /// 缴费与收据
    // 同一事务中写入缴费、收据并更新费用状态
    async fn record_payment(&self, payment: NewPayment) -> Result<(Payment, Receipt)>;
    async fn list_payments_for_fees(&self, fee_ids: &[i64]) -> Result<Vec<Payment>>;
    async fn get_payment_by_id(&self, id: i64) -> Result<Option<Payment>>;
    async fn get_receipt_by_id(&self, id: i64) -> Result<Option<Receipt>>;
    async fn list_receipts_with_pagination(
        &self,
        query: PaginationQuery,
    ) -> Result<PaginatedResponse<Receipt>>;

    /// 课表
    async fn create_timetable(
        &self,
        req: CreateTimetableRequest,
        created_by: Option<i64>,
    ) -> Result<Timetable>;
    async fn get_timetable_by_id(&self, id: i64) -> Result<Option<Timetable>>;
    async fn list_timetables(&self, query: TimetableListParams) -> Result<Vec<Timetable>>;
    async fn update_timetable(
        &self,
        id: i64,
        update: UpdateTimetableRequest,
    ) -> Result<Option<Timetable>>;
    async fn publish_timetable(&self, id: i64) -> Result<Option<Timetable>>;
    async fn delete_timetable(&self, id: i64) -> Result<bool>;
    async fn create_timetable_entry(
        &self,
        timetable_id: i64,
        entry: CreateEntryRequest,
    ) -> Result<TimetableEntry>;
    async fn list_timetable_entries(&self, timetable_id: i64) -> Result<Vec<TimetableEntry>>;
    // 启用课表中某一天的全部条目（冲突检测用）
    async fn list_active_entries_on_day(&self, day_of_week: i32) -> Result<Vec<TimetableEntry>>;
    // 已发布课表中某位教师的条目
    async fn list_teacher_schedule(&self, teacher_id: i64) -> Result<Vec<TimetableEntry>>;
    async fn delete_timetable_entry(&self, timetable_id: i64, entry_id: i64) -> Result<bool>;

    /// 考试日程
    async fn create_date_sheet(
        &self,
        req: CreateDateSheetRequest,
        created_by: Option<i64>,
    ) -> Result<DateSheet>;
    async fn get_date_sheet_by_id(&self, id: i64) -> Result<Option<DateSheet>>;
    async fn list_date_sheets(&self, query: DateSheetListParams) -> Result<Vec<DateSheet>>;
    async fn publish_date_sheet(&self, id: i64) -> Result<Option<DateSheet>>;
    async fn delete_date_sheet(&self, id: i64) -> Result<bool>;
    async fn create_date_sheet_entry(
        &self,
        date_sheet_id: i64,
        entry: CreateDateSheetEntryRequest,
    ) -> Result<DateSheetEntry>;
    // 按考试日期、开始时间排序
    async fn list_date_sheet_entries(&self, date_sheet_ids: &[i64]) -> Result<Vec<DateSheetEntry>>;
    async fn delete_date_sheet_entry(&self, date_sheet_id: i64, entry_id: i64) -> Result<bool>;

    /// 教师请假
    async fn create_leave(&self, teacher_id: i64, req: ApplyLeaveRequest) -> Result<TeacherLeave>;
    async fn get_leave_by_id(&self, id: i64) -> Result<Option<TeacherLeave>>;
    async fn list_leaves_with_pagination(
        &self,
        query: LeaveListParams,
    ) -> Result<PaginatedResponse<TeacherLeave>>;
    async fn list_pending_leaves(&self) -> Result<Vec<TeacherLeave>>;
    // 同一事务中更新待审批请假并写审批日志；请假不再待审批时返回 None
    async fn decide_leave(&self, decision: LeaveDecision) -> Result<Option<TeacherLeave>>;
    async fn list_leave_approval_logs(&self, leave_id: i64) -> Result<Vec<LeaveApprovalLog>>;
    async fn get_auto_approval_settings(&self) -> Result<AutoApprovalSettings>;
    async fn update_auto_approval_settings(
        &self,
        update: UpdateAutoApprovalRequest,
        updated_by: i64,
    ) -> Result<AutoApprovalSettings>;

    /// 投诉
    async fn create_complaint(
        &self,
        sender_id: i64,
        sender_type: &str,
        req: CreateComplaintRequest,
    ) -> Result<Complaint>;
    async fn get_complaint_by_id(&self, id: i64) -> Result<Option<Complaint>>;
    async fn list_complaints_with_pagination(
        &self,
        query: ComplaintListQuery,
    ) -> Result<PaginatedResponse<Complaint>>;
    async fn respond_complaint(
        &self,
        id: i64,
        response: String,
        status: ComplaintStatus,
        responded_by: i64,
    ) -> Result<Option<Complaint>>;
    async fn update_complaint_status(
        &self,
        id: i64,
        status: ComplaintStatus,
    ) -> Result<Option<Complaint>>;

    /// 通知
    async fn create_notifications(&self, notifications: Vec<NewNotification>) -> Result<u64>;
    async fn list_notifications_with_pagination(
        &self,
        user_id: i64,
        unread_only: bool,
        query: PaginationQuery,
    ) -> Result<PaginatedResponse<Notification>>;
    async fn count_unread_notifications(&self, user_id: i64) -> Result<u64>;
    async fn mark_notification_read(&self, user_id: i64, id: i64) -> Result<bool>;
    async fn mark_all_notifications_read(&self, user_id: i64) -> Result<u64>;

    /// 私信
    async fn create_message(&self, sender_id: i64, recipient_id: i64, body: String)
    -> Result<Message>;
    async fn list_inbox_with_pagination(
        &self,
        user_id: i64,
        query: PaginationQuery,
    ) -> Result<PaginatedResponse<Message>>;
    async fn list_conversation(&self, user_id: i64, other_id: i64) -> Result<Vec<Message>>;
    // 将对方发来的消息标记为已读
    async fn mark_conversation_read(&self, user_id: i64, other_id: i64) -> Result<u64>;
    async fn count_unread_messages(&self, user_id: i64) -> Result<u64>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
