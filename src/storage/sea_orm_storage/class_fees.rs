//! 班级收费标准存储操作

use super::SeaOrmStorage;
use crate::entity::class_fees::{ActiveModel, Column, Entity as ClassFees};
use crate::errors::{Result, SchoolDeskError};
use crate::models::fees::entities::{ClassFee, NewClassFee};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    /// 同一 (班级, 费用类型, 学年) 只保留一条；覆盖时不动调整额
    pub async fn upsert_class_fee_impl(&self, fee: NewClassFee) -> Result<ClassFee> {
        let now = chrono::Utc::now().timestamp();

        let existing = ClassFees::find()
            .filter(Column::ClassroomId.eq(fee.classroom_id))
            .filter(Column::FeeTypeId.eq(fee.fee_type_id))
            .filter(Column::AcademicYear.eq(fee.academic_year.clone()))
            .one(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询班级收费标准失败: {e}")))?;

        let mut model = match existing {
            Some(found) => ActiveModel {
                id: Set(found.id),
                ..Default::default()
            },
            None => ActiveModel {
                classroom_id: Set(fee.classroom_id),
                fee_type_id: Set(fee.fee_type_id),
                academic_year: Set(fee.academic_year),
                adjustment_amount: Set(0.0),
                is_active: Set(true),
                created_at: Set(now),
                ..Default::default()
            },
        };
        model.semester = Set(fee.semester);
        model.base_amount = Set(fee.base_amount);
        model.due_date = Set(fee.due_date);
        model.late_fee_applicable = Set(fee.late_fee_applicable);
        model.late_fee_rate = Set(fee.late_fee_rate);
        model.description = Set(fee.description);
        model.updated_at = Set(now);

        let result = if model.id.is_set() {
            model.update(&self.db).await
        } else {
            model.insert(&self.db).await
        };
        let saved = result
            .map_err(|e| SchoolDeskError::database_operation(format!("保存班级收费标准失败: {e}")))?;

        Ok(saved.into_class_fee())
    }

    pub async fn get_class_fee_by_id_impl(&self, id: i64) -> Result<Option<ClassFee>> {
        let result = ClassFees::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询班级收费标准失败: {e}")))?;

        Ok(result.map(|m| m.into_class_fee()))
    }

    pub async fn list_class_fees_impl(
        &self,
        classroom_id: i64,
        academic_year: &str,
    ) -> Result<Vec<ClassFee>> {
        let fees = ClassFees::find()
            .filter(Column::ClassroomId.eq(classroom_id))
            .filter(Column::AcademicYear.eq(academic_year))
            .order_by_asc(Column::FeeTypeId)
            .all(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询班级收费标准失败: {e}")))?;

        Ok(fees.into_iter().map(|m| m.into_class_fee()).collect())
    }

    pub async fn adjust_class_fee_impl(
        &self,
        id: i64,
        adjustment_amount: f64,
        reason: Option<String>,
        adjusted_by: Option<i64>,
    ) -> Result<Option<ClassFee>> {
        if self.get_class_fee_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let now = chrono::Utc::now().timestamp();
        let updated = ActiveModel {
            id: Set(id),
            adjustment_amount: Set(adjustment_amount),
            adjustment_reason: Set(reason),
            adjusted_by: Set(adjusted_by),
            adjusted_at: Set(Some(now)),
            updated_at: Set(now),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(|e| SchoolDeskError::database_operation(format!("调整班级收费标准失败: {e}")))?;

        Ok(Some(updated.into_class_fee()))
    }
}
