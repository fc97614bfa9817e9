//! 考勤存储操作

use chrono::NaiveDate;

use super::SeaOrmStorage;
use crate::entity::attendance::{ActiveModel, Column, Entity as Attendance};
use crate::entity::students::{Column as StudentColumn, Entity as Students};
use crate::errors::{Result, SchoolDeskError};
use crate::models::attendance::{
    entities::AttendanceRecord,
    requests::{AttendanceListParams, AttendanceMark},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    TransactionTrait,
};

impl SeaOrmStorage {
    /// 按 (学生, 日期) 插入或覆盖考勤，整批在同一事务中完成
    pub async fn upsert_attendance_impl(
        &self,
        date: NaiveDate,
        marks: &[AttendanceMark],
        marked_by: Option<i64>,
    ) -> Result<Vec<AttendanceRecord>> {
        let now = chrono::Utc::now().timestamp();
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("开启事务失败: {e}")))?;

        let mut saved = Vec::with_capacity(marks.len());
        for mark in marks {
            let existing = Attendance::find()
                .filter(Column::StudentId.eq(mark.student_id))
                .filter(Column::Date.eq(date))
                .one(&txn)
                .await
                .map_err(|e| SchoolDeskError::database_operation(format!("查询考勤失败: {e}")))?;

            let model = match existing {
                Some(record) => ActiveModel {
                    id: Set(record.id),
                    present: Set(mark.present),
                    marked_by: Set(marked_by),
                    updated_at: Set(now),
                    ..Default::default()
                }
                .update(&txn)
                .await,
                None => ActiveModel {
                    student_id: Set(mark.student_id),
                    date: Set(date),
                    present: Set(mark.present),
                    marked_by: Set(marked_by),
                    created_at: Set(now),
                    updated_at: Set(now),
                    ..Default::default()
                }
                .insert(&txn)
                .await,
            }
            .map_err(|e| SchoolDeskError::database_operation(format!("保存考勤失败: {e}")))?;

            saved.push(model.into_record());
        }

        txn.commit()
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(saved)
    }

    /// 按日期 / 班级 / 学生筛选考勤
    pub async fn list_attendance_impl(
        &self,
        query: AttendanceListParams,
    ) -> Result<Vec<AttendanceRecord>> {
        let mut select = Attendance::find();

        if let Some(date) = query.date {
            select = select.filter(Column::Date.eq(date));
        }
        if let Some(student_id) = query.student_id {
            select = select.filter(Column::StudentId.eq(student_id));
        }
        if let Some(classroom_id) = query.classroom_id {
            let student_ids: Vec<i64> = Students::find()
                .select_only()
                .column(StudentColumn::Id)
                .filter(StudentColumn::ClassId.eq(classroom_id))
                .into_tuple()
                .all(&self.db)
                .await
                .map_err(|e| SchoolDeskError::database_operation(format!("查询学生失败: {e}")))?;
            select = select.filter(Column::StudentId.is_in(student_ids));
        }

        let records = select
            .order_by_desc(Column::Date)
            .order_by_asc(Column::StudentId)
            .all(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询考勤失败: {e}")))?;

        Ok(records.into_iter().map(|m| m.into_record()).collect())
    }

    /// 单个学生在日期区间内的考勤（两端包含）
    pub async fn list_student_attendance_impl(
        &self,
        student_id: i64,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<AttendanceRecord>> {
        let mut select = Attendance::find().filter(Column::StudentId.eq(student_id));

        if let Some(from) = from {
            select = select.filter(Column::Date.gte(from));
        }
        if let Some(to) = to {
            select = select.filter(Column::Date.lte(to));
        }

        let records = select
            .order_by_asc(Column::Date)
            .all(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询考勤失败: {e}")))?;

        Ok(records.into_iter().map(|m| m.into_record()).collect())
    }
}
