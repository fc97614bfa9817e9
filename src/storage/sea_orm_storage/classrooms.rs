//! 班级存储操作

use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::classrooms::{ActiveModel, Column, Entity as Classrooms};
use crate::entity::students::{Column as StudentColumn, Entity as Students};
use crate::errors::{Result, SchoolDeskError};
use crate::models::{
    PaginatedResponse, PaginationInfo,
    classrooms::{
        entities::{Classroom, ClassroomStatus, ClassroomSummary},
        requests::{ClassroomListParams, CreateClassroomRequest, UpdateClassroomRequest},
    },
};
use crate::utils::escape_like_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

impl SeaOrmStorage {
    /// 创建班级
    pub async fn create_classroom_impl(&self, req: CreateClassroomRequest) -> Result<Classroom> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            name: Set(req.name),
            grade: Set(req.grade),
            section: Set(req.section),
            stream: Set(req.stream),
            academic_year: Set(req.academic_year),
            capacity: Set(req.capacity),
            class_teacher_id: Set(req.class_teacher_id),
            room: Set(req.room),
            status: Set(req.status.unwrap_or(ClassroomStatus::Active).to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("创建班级失败: {e}")))?;

        Ok(result.into_classroom())
    }

    /// 通过 ID 获取班级
    pub async fn get_classroom_by_id_impl(&self, id: i64) -> Result<Option<Classroom>> {
        let result = Classrooms::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询班级失败: {e}")))?;

        Ok(result.map(|m| m.into_classroom()))
    }

    /// 通过名称获取班级
    pub async fn get_classroom_by_name_impl(&self, name: &str) -> Result<Option<Classroom>> {
        let result = Classrooms::find()
            .filter(Column::Name.eq(name))
            .one(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询班级失败: {e}")))?;

        Ok(result.map(|m| m.into_classroom()))
    }

    /// 分页列出班级，附带每个班级的学生人数
    pub async fn list_classrooms_impl(
        &self,
        query: ClassroomListParams,
    ) -> Result<PaginatedResponse<ClassroomSummary>> {
        let (page, size) = query.pagination.normalized();

        let mut select = Classrooms::find();

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
                    .add(Column::Grade.contains(&escaped))
                    .add(Column::Section.contains(&escaped)),
            );
        }

        let paginator = select.order_by_asc(Column::Name).paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询班级总数失败: {e}")))?;
        let classrooms = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询班级列表失败: {e}")))?;

        // 一次性统计本页班级的学生人数
        let ids: Vec<i64> = classrooms.iter().map(|c| c.id).collect();
        let counts: Vec<(Option<i64>, i64)> = if ids.is_empty() {
            Vec::new()
        } else {
            Students::find()
                .select_only()
                .column(StudentColumn::ClassId)
                .column_as(StudentColumn::Id.count(), "student_count")
                .filter(StudentColumn::ClassId.is_in(ids))
                .group_by(StudentColumn::ClassId)
                .into_tuple()
                .all(&self.db)
                .await
                .map_err(|e| {
                    SchoolDeskError::database_operation(format!("统计班级人数失败: {e}"))
                })?
        };
        let counts: HashMap<i64, i64> = counts
            .into_iter()
            .filter_map(|(class_id, count)| class_id.map(|id| (id, count)))
            .collect();

        let items = classrooms
            .into_iter()
            .map(|m| {
                let student_count = counts.get(&m.id).copied().unwrap_or(0);
                ClassroomSummary {
                    classroom: m.into_classroom(),
                    student_count,
                }
            })
            .collect();

        Ok(PaginatedResponse {
            items,
            pagination: PaginationInfo::new(page, size, total),
        })
    }

    /// 更新班级
    pub async fn update_classroom_impl(
        &self,
        id: i64,
        update: UpdateClassroomRequest,
    ) -> Result<Option<Classroom>> {
        if self.get_classroom_by_id_impl(id).await?.is_none() {
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
        if let Some(grade) = update.grade {
            model.grade = Set(Some(grade));
        }
        if let Some(section) = update.section {
            model.section = Set(Some(section));
        }
        if let Some(stream) = update.stream {
            model.stream = Set(Some(stream));
        }
        if let Some(academic_year) = update.academic_year {
            model.academic_year = Set(Some(academic_year));
        }
        if let Some(capacity) = update.capacity {
            model.capacity = Set(Some(capacity));
        }
        if let Some(class_teacher_id) = update.class_teacher_id {
            model.class_teacher_id = Set(Some(class_teacher_id));
        }
        if let Some(room) = update.room {
            model.room = Set(Some(room));
        }
        if let Some(status) = update.status {
            model.status = Set(status.to_string());
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("更新班级失败: {e}")))?;

        self.get_classroom_by_id_impl(id).await
    }

    /// 删除班级
    pub async fn delete_classroom_impl(&self, id: i64) -> Result<bool> {
        let result = Classrooms::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("删除班级失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 班级学生人数
    pub async fn count_students_in_classroom_impl(&self, id: i64) -> Result<u64> {
        let count = Students::find()
            .filter(StudentColumn::ClassId.eq(id))
            .count(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("统计班级人数失败: {e}")))?;

        Ok(count)
    }
}
