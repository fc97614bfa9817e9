//! 学生存储操作

use super::SeaOrmStorage;
use crate::entity::students::{ActiveModel, Column, Entity as Students};
use crate::errors::{Result, SchoolDeskError};
use crate::models::{
    PaginatedResponse, PaginationInfo,
    students::{
        entities::Student,
        requests::{CreateStudentRequest, StudentListQuery, UpdateStudentRequest},
    },
};
use crate::utils::escape_like_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set,
};

impl SeaOrmStorage {
    /// 创建学生
    pub async fn create_student_impl(&self, req: CreateStudentRequest) -> Result<Student> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            name: Set(req.name),
            roll_number: Set(req.roll_number),
            email: Set(req.email),
            gender: Set(req.gender),
            date_of_birth: Set(req.date_of_birth),
            class_id: Set(req.class_id),
            father_name: Set(req.father_name),
            mother_name: Set(req.mother_name),
            guardian_name: Set(req.guardian_name),
            phone: Set(req.phone),
            address: Set(req.address),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("创建学生失败: {e}")))?;

        Ok(result.into_student())
    }

    /// 通过 ID 获取学生
    pub async fn get_student_by_id_impl(&self, id: i64) -> Result<Option<Student>> {
        let result = Students::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询学生失败: {e}")))?;

        Ok(result.map(|m| m.into_student()))
    }

    /// 通过邮箱获取学生
    pub async fn get_student_by_email_impl(&self, email: &str) -> Result<Option<Student>> {
        let result = Students::find()
            .filter(Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询学生失败: {e}")))?;

        Ok(result.map(|m| m.into_student()))
    }

    /// 分页列出学生
    pub async fn list_students_with_pagination_impl(
        &self,
        query: StudentListQuery,
    ) -> Result<PaginatedResponse<Student>> {
        let page = query.page.unwrap_or(1).max(1) as u64;
        let size = query.size.unwrap_or(10).clamp(1, 100) as u64;

        let mut select = Students::find();

        // 搜索姓名、学号、邮箱
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(
                Condition::any()
                    .add(Column::Name.contains(&escaped))
                    .add(Column::RollNumber.contains(&escaped))
                    .add(Column::Email.contains(&escaped)),
            );
        }

        if let Some(class_id) = query.class_id {
            select = select.filter(Column::ClassId.eq(class_id));
        }

        if let Some(is_active) = query.is_active {
            select = select.filter(Column::IsActive.eq(is_active));
        }

        let paginator = select.order_by_asc(Column::Name).paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询学生总数失败: {e}")))?;
        let students = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询学生列表失败: {e}")))?;

        Ok(PaginatedResponse {
            items: students.into_iter().map(|m| m.into_student()).collect(),
            pagination: PaginationInfo::new(page, size, total),
        })
    }

    /// 列出全部学生（导出）
    pub async fn list_all_students_impl(&self) -> Result<Vec<Student>> {
        let students = Students::find()
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询学生列表失败: {e}")))?;

        Ok(students.into_iter().map(|m| m.into_student()).collect())
    }

    /// 按 ID 批量获取学生
    pub async fn list_students_by_ids_impl(&self, ids: &[i64]) -> Result<Vec<Student>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let students = Students::find()
            .filter(Column::Id.is_in(ids.to_vec()))
            .order_by_asc(Column::Name)
            .all(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询学生列表失败: {e}")))?;

        Ok(students.into_iter().map(|m| m.into_student()).collect())
    }

    pub async fn list_students_in_classroom_impl(&self, class_id: i64) -> Result<Vec<Student>> {
        let students = Students::find()
            .filter(Column::ClassId.eq(class_id))
            .order_by_asc(Column::Name)
            .all(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询班级学生失败: {e}")))?;

        Ok(students.into_iter().map(|m| m.into_student()).collect())
    }

    /// 更新学生
    pub async fn update_student_impl(
        &self,
        id: i64,
        update: UpdateStudentRequest,
    ) -> Result<Option<Student>> {
        if self.get_student_by_id_impl(id).await?.is_none() {
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
        if let Some(roll_number) = update.roll_number {
            model.roll_number = Set(Some(roll_number));
        }
        if let Some(email) = update.email {
            model.email = Set(Some(email));
        }
        if let Some(gender) = update.gender {
            model.gender = Set(Some(gender));
        }
        if let Some(date_of_birth) = update.date_of_birth {
            model.date_of_birth = Set(Some(date_of_birth));
        }
        if let Some(class_id) = update.class_id {
            model.class_id = Set(Some(class_id));
        }
        if let Some(father_name) = update.father_name {
            model.father_name = Set(Some(father_name));
        }
        if let Some(mother_name) = update.mother_name {
            model.mother_name = Set(Some(mother_name));
        }
        if let Some(guardian_name) = update.guardian_name {
            model.guardian_name = Set(Some(guardian_name));
        }
        if let Some(phone) = update.phone {
            model.phone = Set(Some(phone));
        }
        if let Some(address) = update.address {
            model.address = Set(Some(address));
        }
        if let Some(is_active) = update.is_active {
            model.is_active = Set(is_active);
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("更新学生失败: {e}")))?;

        self.get_student_by_id_impl(id).await
    }

    /// 设置在读状态
    pub async fn set_student_active_impl(
        &self,
        id: i64,
        is_active: bool,
    ) -> Result<Option<Student>> {
        self.update_student_impl(
            id,
            UpdateStudentRequest {
                is_active: Some(is_active),
                ..Default::default()
            },
        )
        .await
    }

    /// 删除学生（考勤、费用等由外键级联删除）
    pub async fn delete_student_impl(&self, id: i64) -> Result<bool> {
        let result = Students::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("删除学生失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 批量删除学生
    pub async fn delete_students_impl(&self, ids: &[i64]) -> Result<u64> {
        if ids.is_empty() {
            return Ok(0);
        }

        let result = Students::delete_many()
            .filter(Column::Id.is_in(ids.to_vec()))
            .exec(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("批量删除学生失败: {e}")))?;

        Ok(result.rows_affected)
    }
}
