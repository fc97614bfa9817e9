//! 课表存储操作

use super::SeaOrmStorage;
use crate::entity::timetable_entries::{
    ActiveModel as EntryActiveModel, Column as EntryColumn, Entity as TimetableEntries,
};
use crate::entity::timetables::{ActiveModel, Column, Entity as Timetables};
use crate::errors::{Result, SchoolDeskError};
use crate::models::timetable::{
    entities::{Timetable, TimetableEntry},
    requests::{
        CreateEntryRequest, CreateTimetableRequest, TimetableListParams, UpdateTimetableRequest,
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

impl SeaOrmStorage {
    pub async fn create_timetable_impl(
        &self,
        req: CreateTimetableRequest,
        created_by: Option<i64>,
    ) -> Result<Timetable> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            name: Set(req.name),
            description: Set(req.description),
            classroom_id: Set(req.classroom_id),
            academic_year: Set(req.academic_year),
            semester: Set(req.semester),
            is_active: Set(true),
            is_published: Set(false),
            created_by: Set(created_by),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("创建课表失败: {e}")))?;

        Ok(result.into_timetable())
    }

    pub async fn get_timetable_by_id_impl(&self, id: i64) -> Result<Option<Timetable>> {
        let result = Timetables::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询课表失败: {e}")))?;

        Ok(result.map(|m| m.into_timetable()))
    }

    pub async fn list_timetables_impl(&self, query: TimetableListParams) -> Result<Vec<Timetable>> {
        let mut select = Timetables::find();

        if let Some(classroom_id) = query.classroom_id {
            select = select.filter(Column::ClassroomId.eq(classroom_id));
        }
        if let Some(is_published) = query.is_published {
            select = select.filter(Column::IsPublished.eq(is_published));
        }

        let timetables = select
            .order_by_desc(Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询课表列表失败: {e}")))?;

        Ok(timetables.into_iter().map(|m| m.into_timetable()).collect())
    }

    pub async fn update_timetable_impl(
        &self,
        id: i64,
        update: UpdateTimetableRequest,
    ) -> Result<Option<Timetable>> {
        if self.get_timetable_by_id_impl(id).await?.is_none() {
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
        if let Some(description) = update.description {
            model.description = Set(Some(description));
        }
        if let Some(classroom_id) = update.classroom_id {
            model.classroom_id = Set(Some(classroom_id));
        }
        if let Some(year) = update.academic_year {
            model.academic_year = Set(Some(year));
        }
        if let Some(semester) = update.semester {
            model.semester = Set(Some(semester));
        }
        if let Some(is_active) = update.is_active {
            model.is_active = Set(is_active);
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("更新课表失败: {e}")))?;

        self.get_timetable_by_id_impl(id).await
    }

    pub async fn publish_timetable_impl(&self, id: i64) -> Result<Option<Timetable>> {
        if self.get_timetable_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        ActiveModel {
            id: Set(id),
            is_published: Set(true),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(|e| SchoolDeskError::database_operation(format!("发布课表失败: {e}")))?;

        self.get_timetable_by_id_impl(id).await
    }

    pub async fn delete_timetable_impl(&self, id: i64) -> Result<bool> {
        let result = Timetables::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("删除课表失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 新增条目；未指定班级时沿用课表的班级
    pub async fn create_timetable_entry_impl(
        &self,
        timetable_id: i64,
        entry: CreateEntryRequest,
    ) -> Result<TimetableEntry> {
        let timetable = self
            .get_timetable_by_id_impl(timetable_id)
            .await?
            .ok_or_else(|| SchoolDeskError::not_found(format!("课表 {timetable_id} 不存在")))?;

        let model = EntryActiveModel {
            timetable_id: Set(timetable_id),
            day_of_week: Set(entry.day_of_week),
            period_number: Set(entry.period_number),
            start_time: Set(entry.start_time),
            end_time: Set(entry.end_time),
            subject_id: Set(entry.subject_id),
            teacher_id: Set(entry.teacher_id),
            classroom_id: Set(entry.classroom_id.or(timetable.classroom_id)),
            room_number: Set(entry.room_number),
            is_lab_period: Set(entry.is_lab_period),
            is_break_period: Set(entry.is_break_period),
            notes: Set(entry.notes),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("创建课表条目失败: {e}")))?;

        Ok(result.into_entry())
    }

    pub async fn list_timetable_entries_impl(
        &self,
        timetable_id: i64,
    ) -> Result<Vec<TimetableEntry>> {
        let entries = TimetableEntries::find()
            .filter(EntryColumn::TimetableId.eq(timetable_id))
            .order_by_asc(EntryColumn::DayOfWeek)
            .order_by_asc(EntryColumn::PeriodNumber)
            .all(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询课表条目失败: {e}")))?;

        Ok(entries.into_iter().map(|m| m.into_entry()).collect())
    }

    /// 所有启用课表在某天的条目（冲突检测用）
    pub async fn list_active_entries_on_day_impl(
        &self,
        day_of_week: i32,
    ) -> Result<Vec<TimetableEntry>> {
        let timetable_ids = self.timetable_ids_where(Column::IsActive.eq(true)).await?;
        if timetable_ids.is_empty() {
            return Ok(Vec::new());
        }

        let entries = TimetableEntries::find()
            .filter(EntryColumn::TimetableId.is_in(timetable_ids))
            .filter(EntryColumn::DayOfWeek.eq(day_of_week))
            .order_by_asc(EntryColumn::PeriodNumber)
            .all(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询课表条目失败: {e}")))?;

        Ok(entries.into_iter().map(|m| m.into_entry()).collect())
    }

    /// 教师在已发布课表中的课程
    pub async fn list_teacher_schedule_impl(&self, teacher_id: i64) -> Result<Vec<TimetableEntry>> {
        let timetable_ids = self.timetable_ids_where(Column::IsPublished.eq(true)).await?;
        if timetable_ids.is_empty() {
            return Ok(Vec::new());
        }

        let entries = TimetableEntries::find()
            .filter(EntryColumn::TimetableId.is_in(timetable_ids))
            .filter(EntryColumn::TeacherId.eq(teacher_id))
            .order_by_asc(EntryColumn::DayOfWeek)
            .order_by_asc(EntryColumn::PeriodNumber)
            .all(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询教师课表失败: {e}")))?;

        Ok(entries.into_iter().map(|m| m.into_entry()).collect())
    }

    pub async fn delete_timetable_entry_impl(&self, timetable_id: i64, entry_id: i64) -> Result<bool> {
        let result = TimetableEntries::delete_many()
            .filter(EntryColumn::Id.eq(entry_id))
            .filter(EntryColumn::TimetableId.eq(timetable_id))
            .exec(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("删除课表条目失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    async fn timetable_ids_where(
        &self,
        condition: impl sea_orm::sea_query::IntoCondition,
    ) -> Result<Vec<i64>> {
        Timetables::find()
            .select_only()
            .column(Column::Id)
            .filter(condition)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询课表失败: {e}")))
    }
}
