//! 教师存储操作

use super::SeaOrmStorage;
use super::users::insert_user;
use crate::entity::teachers::{ActiveModel, Column, Entity as Teachers};
use crate::errors::{Result, SchoolDeskError};
use crate::models::{
    PaginatedResponse, PaginationInfo,
    teachers::{
        entities::{Teacher, TeacherStatus},
        requests::{CreateTeacherRequest, TeacherListParams, UpdateTeacherRequest},
    },
    users::{entities::User, requests::CreateUserRequest},
};
use crate::utils::escape_like_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set, TransactionTrait, sea_query::IntoCondition,
};

impl SeaOrmStorage {
    /// 创建教师档案
    pub async fn create_teacher_impl(
        &self,
        req: CreateTeacherRequest,
        secret_key: &str,
    ) -> Result<Teacher> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            user_id: Set(None),
            name: Set(req.name),
            email: Set(req.email),
            phone: Set(req.phone),
            qualification: Set(req.qualification),
            subject: Set(req.subject),
            employee_id: Set(req.employee_id),
            date_of_joining: Set(req.date_of_joining),
            secret_key: Set(Some(secret_key.to_string())),
            status: Set(TeacherStatus::Active.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("创建教师失败: {e}")))?;

        Ok(result.into_teacher())
    }

    pub async fn get_teacher_by_id_impl(&self, id: i64) -> Result<Option<Teacher>> {
        let result = Teachers::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询教师失败: {e}")))?;

        Ok(result.map(|m| m.into_teacher()))
    }

    pub async fn get_teacher_by_user_id_impl(&self, user_id: i64) -> Result<Option<Teacher>> {
        self.find_teacher_by(Column::UserId.eq(user_id)).await
    }

    pub async fn get_teacher_by_secret_key_impl(
        &self,
        secret_key: &str,
    ) -> Result<Option<Teacher>> {
        self.find_teacher_by(Column::SecretKey.eq(secret_key)).await
    }

    pub async fn get_teacher_by_employee_id_impl(
        &self,
        employee_id: &str,
    ) -> Result<Option<Teacher>> {
        self.find_teacher_by(Column::EmployeeId.eq(employee_id)).await
    }

    async fn find_teacher_by(&self, condition: impl IntoCondition) -> Result<Option<Teacher>> {
        let result = Teachers::find()
            .filter(condition)
            .one(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询教师失败: {e}")))?;

        Ok(result.map(|m| m.into_teacher()))
    }

    /// 分页列出教师
    pub async fn list_teachers_with_pagination_impl(
        &self,
        query: TeacherListParams,
    ) -> Result<PaginatedResponse<Teacher>> {
        let (page, size) = query.pagination.normalized();

        let mut select = Teachers::find();

        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }

        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(
                Condition::any()
                    .add(Column::Name.contains(&escaped))
                    .add(Column::Email.contains(&escaped))
                    .add(Column::EmployeeId.contains(&escaped))
                    .add(Column::Subject.contains(&escaped)),
            );
        }

        let paginator = select.order_by_asc(Column::Name).paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询教师总数失败: {e}")))?;
        let teachers = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询教师列表失败: {e}")))?;

        Ok(PaginatedResponse {
            items: teachers.into_iter().map(|m| m.into_teacher()).collect(),
            pagination: PaginationInfo::new(page, size, total),
        })
    }

    /// 更新教师档案
    pub async fn update_teacher_impl(
        &self,
        id: i64,
        update: UpdateTeacherRequest,
    ) -> Result<Option<Teacher>> {
        if self.get_teacher_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(name) = update.name {
            model.name = Set(name);
        }
        if let Some(email) = update.email {
            model.email = Set(Some(email));
        }
        if let Some(phone) = update.phone {
            model.phone = Set(Some(phone));
        }
        if let Some(qualification) = update.qualification {
            model.qualification = Set(Some(qualification));
        }
        if let Some(subject) = update.subject {
            model.subject = Set(Some(subject));
        }
        if let Some(employee_id) = update.employee_id {
            model.employee_id = Set(Some(employee_id));
        }
        if let Some(date_of_joining) = update.date_of_joining {
            model.date_of_joining = Set(Some(date_of_joining));
        }
        if let Some(status) = update.status {
            model.status = Set(status.to_string());
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("更新教师失败: {e}")))?;

        self.get_teacher_by_id_impl(id).await
    }

    /// 重置注册密钥
    pub async fn set_teacher_secret_key_impl(
        &self,
        id: i64,
        secret_key: &str,
    ) -> Result<Option<Teacher>> {
        if self.get_teacher_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        ActiveModel {
            id: Set(id),
            secret_key: Set(Some(secret_key.to_string())),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(|e| SchoolDeskError::database_operation(format!("更新注册密钥失败: {e}")))?;

        self.get_teacher_by_id_impl(id).await
    }

    pub async fn delete_teacher_impl(&self, id: i64) -> Result<bool> {
        let result = Teachers::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("删除教师失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 创建教师账号并关联档案
    pub async fn register_teacher_account_impl(
        &self,
        teacher_id: i64,
        user: CreateUserRequest,
    ) -> Result<User> {
        let now = chrono::Utc::now().timestamp();
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("开启事务失败: {e}")))?;

        // 事务内再次确认档案尚未关联账号
        let teacher = Teachers::find_by_id(teacher_id)
            .one(&txn)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询教师失败: {e}")))?
            .ok_or_else(|| SchoolDeskError::not_found(format!("教师 {teacher_id} 不存在")))?;
        if teacher.user_id.is_some() {
            return Err(SchoolDeskError::conflict("该教师档案已关联账号"));
        }

        let created = insert_user(&txn, user, now).await?;

        ActiveModel {
            id: Set(teacher_id),
            user_id: Set(Some(created.id)),
            updated_at: Set(now),
            ..Default::default()
        }
        .update(&txn)
        .await
        .map_err(|e| SchoolDeskError::database_operation(format!("关联教师账号失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(created)
    }
}
