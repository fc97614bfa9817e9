//! 考试日程存储操作

use super::SeaOrmStorage;
use crate::entity::date_sheet_entries::{
    ActiveModel as EntryActiveModel, Column as EntryColumn, Entity as DateSheetEntries,
};
use crate::entity::date_sheets::{ActiveModel, Column, Entity as DateSheets};
use crate::errors::{Result, SchoolDeskError};
use crate::models::date_sheets::{
    entities::{DateSheet, DateSheetEntry},
    requests::{CreateDateSheetEntryRequest, CreateDateSheetRequest, DateSheetListParams},
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    pub async fn create_date_sheet_impl(
        &self,
        req: CreateDateSheetRequest,
        created_by: Option<i64>,
    ) -> Result<DateSheet> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            title: Set(req.title),
            description: Set(req.description),
            classroom_id: Set(req.classroom_id),
            academic_year: Set(req.academic_year),
            exam_type: Set(req.exam_type),
            start_date: Set(req.start_date),
            end_date: Set(req.end_date),
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
            .map_err(|e| SchoolDeskError::database_operation(format!("创建考试日程失败: {e}")))?;

        Ok(result.into_date_sheet())
    }

    pub async fn get_date_sheet_by_id_impl(&self, id: i64) -> Result<Option<DateSheet>> {
        let result = DateSheets::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询考试日程失败: {e}")))?;

        Ok(result.map(|m| m.into_date_sheet()))
    }

    pub async fn list_date_sheets_impl(&self, query: DateSheetListParams) -> Result<Vec<DateSheet>> {
        let mut select = DateSheets::find();

        if let Some(classroom_id) = query.classroom_id {
            select = select.filter(Column::ClassroomId.eq(classroom_id));
        }
        if let Some(is_published) = query.is_published {
            select = select.filter(Column::IsPublished.eq(is_published));
        }

        let sheets = select
            .order_by_asc(Column::StartDate)
            .all(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询考试日程列表失败: {e}")))?;

        Ok(sheets.into_iter().map(|m| m.into_date_sheet()).collect())
    }

    pub async fn publish_date_sheet_impl(&self, id: i64) -> Result<Option<DateSheet>> {
        if self.get_date_sheet_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let updated = ActiveModel {
            id: Set(id),
            is_published: Set(true),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(|e| SchoolDeskError::database_operation(format!("发布考试日程失败: {e}")))?;

        Ok(Some(updated.into_date_sheet()))
    }

    pub async fn delete_date_sheet_impl(&self, id: i64) -> Result<bool> {
        let result = DateSheets::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("删除考试日程失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 新增场次；未指定班级时沿用日程的班级
    pub async fn create_date_sheet_entry_impl(
        &self,
        date_sheet_id: i64,
        entry: CreateDateSheetEntryRequest,
    ) -> Result<DateSheetEntry> {
        let sheet = self
            .get_date_sheet_by_id_impl(date_sheet_id)
            .await?
            .ok_or_else(|| SchoolDeskError::not_found(format!("考试日程 {date_sheet_id} 不存在")))?;

        let model = EntryActiveModel {
            date_sheet_id: Set(date_sheet_id),
            exam_date: Set(entry.exam_date),
            start_time: Set(entry.start_time),
            end_time: Set(entry.end_time),
            subject_id: Set(entry.subject_id),
            classroom_id: Set(entry.classroom_id.or(sheet.classroom_id)),
            max_marks: Set(entry.max_marks),
            venue: Set(entry.venue),
            room_number: Set(entry.room_number),
            special_instructions: Set(entry.special_instructions),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("创建考试场次失败: {e}")))?;

        Ok(result.into_entry())
    }

    pub async fn list_date_sheet_entries_impl(
        &self,
        date_sheet_ids: &[i64],
    ) -> Result<Vec<DateSheetEntry>> {
        if date_sheet_ids.is_empty() {
            return Ok(Vec::new());
        }

        let entries = DateSheetEntries::find()
            .filter(EntryColumn::DateSheetId.is_in(date_sheet_ids.to_vec()))
            .order_by_asc(EntryColumn::ExamDate)
            .order_by_asc(EntryColumn::StartTime)
            .all(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询考试场次失败: {e}")))?;

        Ok(entries.into_iter().map(|m| m.into_entry()).collect())
    }

    pub async fn delete_date_sheet_entry_impl(
        &self,
        date_sheet_id: i64,
        entry_id: i64,
    ) -> Result<bool> {
        let result = DateSheetEntries::delete_many()
            .filter(EntryColumn::Id.eq(entry_id))
            .filter(EntryColumn::DateSheetId.eq(date_sheet_id))
            .exec(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("删除考试场次失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}
