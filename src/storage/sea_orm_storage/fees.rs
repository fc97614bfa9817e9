//! 费用类型、费用与折扣存储操作

use super::SeaOrmStorage;
use crate::entity::discounts::{
    ActiveModel as DiscountActiveModel, Column as DiscountColumn, Entity as Discounts,
};
use crate::entity::fee_types::{
    ActiveModel as FeeTypeActiveModel, Column as FeeTypeColumn, Entity as FeeTypes,
};
use crate::entity::fees::{ActiveModel, Column, Entity as Fees};
use crate::errors::{Result, SchoolDeskError};
use crate::models::{
    PaginatedResponse, PaginationInfo,
    fees::{
        entities::{Discount, Fee, FeeType, NewFee},
        requests::{
            CreateDiscountRequest, CreateFeeTypeRequest, FeeListQuery, UpdateFeeRequest,
            UpdateFeeTypeRequest,
        },
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

impl SeaOrmStorage {
    // ============ 费用类型 ============

    pub async fn create_fee_type_impl(&self, req: CreateFeeTypeRequest) -> Result<FeeType> {
        let model = FeeTypeActiveModel {
            name: Set(req.name),
            description: Set(req.description),
            is_recurring: Set(req.is_recurring),
            frequency: Set(req.frequency),
            default_amount: Set(req.default_amount),
            is_active: Set(true),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("创建费用类型失败: {e}")))?;

        Ok(result.into_fee_type())
    }

    pub async fn get_fee_type_by_id_impl(&self, id: i64) -> Result<Option<FeeType>> {
        let result = FeeTypes::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询费用类型失败: {e}")))?;

        Ok(result.map(|m| m.into_fee_type()))
    }

    pub async fn get_fee_type_by_name_impl(&self, name: &str) -> Result<Option<FeeType>> {
        let result = FeeTypes::find()
            .filter(FeeTypeColumn::Name.eq(name))
            .one(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询费用类型失败: {e}")))?;

        Ok(result.map(|m| m.into_fee_type()))
    }

    pub async fn list_fee_types_impl(&self) -> Result<Vec<FeeType>> {
        let types = FeeTypes::find()
            .order_by_asc(FeeTypeColumn::Name)
            .all(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询费用类型失败: {e}")))?;

        Ok(types.into_iter().map(|m| m.into_fee_type()).collect())
    }

    pub async fn update_fee_type_impl(
        &self,
        id: i64,
        update: UpdateFeeTypeRequest,
    ) -> Result<Option<FeeType>> {
        if self.get_fee_type_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = FeeTypeActiveModel {
            id: Set(id),
            ..Default::default()
        };

        if let Some(name) = update.name {
            model.name = Set(name);
        }
        if let Some(description) = update.description {
            model.description = Set(Some(description));
        }
        if let Some(is_recurring) = update.is_recurring {
            model.is_recurring = Set(is_recurring);
        }
        if let Some(frequency) = update.frequency {
            model.frequency = Set(Some(frequency));
        }
        if let Some(default_amount) = update.default_amount {
            model.default_amount = Set(Some(default_amount));
        }

        if model.is_changed() {
            model.update(&self.db).await.map_err(|e| {
                SchoolDeskError::database_operation(format!("更新费用类型失败: {e}"))
            })?;
        }

        self.get_fee_type_by_id_impl(id).await
    }

    /// 切换启用状态
    pub async fn toggle_fee_type_impl(&self, id: i64) -> Result<Option<FeeType>> {
        let Some(current) = self.get_fee_type_by_id_impl(id).await? else {
            return Ok(None);
        };

        FeeTypeActiveModel {
            id: Set(id),
            is_active: Set(!current.is_active),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(|e| SchoolDeskError::database_operation(format!("更新费用类型失败: {e}")))?;

        self.get_fee_type_by_id_impl(id).await
    }

    pub async fn delete_fee_type_impl(&self, id: i64) -> Result<bool> {
        let result = FeeTypes::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("删除费用类型失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    // ============ 费用 ============

    pub async fn create_fee_impl(&self, fee: NewFee) -> Result<Fee> {
        let result = new_fee_model(fee, chrono::Utc::now().timestamp())
            .insert(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("创建费用失败: {e}")))?;

        Ok(result.into_fee())
    }

    /// 批量创建费用，任一失败则整体回滚
    pub async fn create_fees_impl(&self, fees: Vec<NewFee>) -> Result<Vec<Fee>> {
        if fees.is_empty() {
            return Ok(Vec::new());
        }

        let now = chrono::Utc::now().timestamp();
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("开启事务失败: {e}")))?;

        let mut created = Vec::with_capacity(fees.len());
        for fee in fees {
            let model = new_fee_model(fee, now)
                .insert(&txn)
                .await
                .map_err(|e| SchoolDeskError::database_operation(format!("创建费用失败: {e}")))?;
            created.push(model.into_fee());
        }

        txn.commit()
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(created)
    }

    pub async fn get_fee_by_id_impl(&self, id: i64) -> Result<Option<Fee>> {
        let result = Fees::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询费用失败: {e}")))?;

        Ok(result.map(|m| m.into_fee()))
    }

    /// 分页列出费用，`paid` 按存储的结清标记过滤
    pub async fn list_fees_with_pagination_impl(
        &self,
        query: FeeListQuery,
    ) -> Result<PaginatedResponse<Fee>> {
        let page = query.page.unwrap_or(1).max(1) as u64;
        let size = query.size.unwrap_or(10).clamp(1, 100) as u64;

        let mut select = Fees::find();

        if let Some(student_id) = query.student_id {
            select = select.filter(Column::StudentId.eq(student_id));
        }
        if let Some(fee_type_id) = query.fee_type_id {
            select = select.filter(Column::FeeTypeId.eq(fee_type_id));
        }
        if let Some(paid) = query.paid {
            select = select.filter(Column::Paid.eq(paid));
        }
        if let Some(ref year) = query.academic_year
            && !year.trim().is_empty()
        {
            select = select.filter(Column::AcademicYear.eq(year.trim()));
        }

        let paginator = select
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询费用总数失败: {e}")))?;
        let fees = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询费用列表失败: {e}")))?;

        Ok(PaginatedResponse {
            items: fees.into_iter().map(|m| m.into_fee()).collect(),
            pagination: PaginationInfo::new(page, size, total),
        })
    }

    pub async fn list_fees_by_students_impl(&self, student_ids: &[i64]) -> Result<Vec<Fee>> {
        if student_ids.is_empty() {
            return Ok(Vec::new());
        }

        let fees = Fees::find()
            .filter(Column::StudentId.is_in(student_ids.to_vec()))
            .order_by_asc(Column::DueDate)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询费用失败: {e}")))?;

        Ok(fees.into_iter().map(|m| m.into_fee()).collect())
    }

    pub async fn list_all_fees_impl(&self) -> Result<Vec<Fee>> {
        let fees = Fees::find()
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询费用失败: {e}")))?;

        Ok(fees.into_iter().map(|m| m.into_fee()).collect())
    }

    pub async fn update_fee_impl(&self, id: i64, update: UpdateFeeRequest) -> Result<Option<Fee>> {
        if self.get_fee_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(amount) = update.amount {
            model.amount = Set(amount);
        }
        if let Some(due_date) = update.due_date {
            model.due_date = Set(Some(due_date));
        }
        if let Some(year) = update.academic_year {
            model.academic_year = Set(Some(year));
        }
        if let Some(semester) = update.semester {
            model.semester = Set(Some(semester));
        }
        if let Some(description) = update.description {
            model.description = Set(Some(description));
        }
        if let Some(applicable) = update.late_fee_applicable {
            model.late_fee_applicable = Set(applicable);
        }
        if let Some(rate) = update.late_fee_rate {
            model.late_fee_rate = Set(rate);
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("更新费用失败: {e}")))?;

        self.get_fee_by_id_impl(id).await
    }

    pub async fn delete_fee_impl(&self, id: i64) -> Result<bool> {
        let result = Fees::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("删除费用失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    // ============ 折扣 ============

    pub async fn create_discount_impl(
        &self,
        req: CreateDiscountRequest,
        approved_by: Option<i64>,
    ) -> Result<Discount> {
        let model = DiscountActiveModel {
            student_id: Set(req.student_id),
            fee_id: Set(req.fee_id),
            discount_type: Set(req.discount_type.to_string()),
            discount_value: Set(req.discount_value),
            reason: Set(req.reason),
            approved_by: Set(approved_by),
            valid_from: Set(req.valid_from),
            valid_until: Set(req.valid_until),
            is_active: Set(true),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("创建折扣失败: {e}")))?;

        Ok(result.into_discount())
    }

    pub async fn list_discounts_by_student_impl(&self, student_id: i64) -> Result<Vec<Discount>> {
        let discounts = Discounts::find()
            .filter(DiscountColumn::StudentId.eq(student_id))
            .order_by_desc(DiscountColumn::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询折扣失败: {e}")))?;

        Ok(discounts.into_iter().map(|m| m.into_discount()).collect())
    }

    /// 指定费用上仍生效的折扣
    pub async fn list_active_discounts_for_fees_impl(
        &self,
        fee_ids: &[i64],
    ) -> Result<Vec<Discount>> {
        if fee_ids.is_empty() {
            return Ok(Vec::new());
        }

        let discounts = Discounts::find()
            .filter(DiscountColumn::FeeId.is_in(fee_ids.to_vec()))
            .filter(DiscountColumn::IsActive.eq(true))
            .all(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询折扣失败: {e}")))?;

        Ok(discounts.into_iter().map(|m| m.into_discount()).collect())
    }

    pub async fn deactivate_discount_impl(&self, id: i64) -> Result<bool> {
        let Some(existing) = Discounts::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询折扣失败: {e}")))?
        else {
            return Ok(false);
        };

        DiscountActiveModel {
            id: Set(existing.id),
            is_active: Set(false),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(|e| SchoolDeskError::database_operation(format!("停用折扣失败: {e}")))?;

        Ok(true)
    }
}

fn new_fee_model(fee: NewFee, now: i64) -> ActiveModel {
    ActiveModel {
        student_id: Set(fee.student_id),
        fee_type_id: Set(fee.fee_type_id),
        amount: Set(fee.amount),
        due_date: Set(fee.due_date),
        paid: Set(false),
        payment_date: Set(None),
        academic_year: Set(fee.academic_year),
        semester: Set(fee.semester),
        description: Set(fee.description),
        late_fee_applicable: Set(fee.late_fee_applicable),
        late_fee_rate: Set(fee.late_fee_rate),
        father_name: Set(fee.father_name),
        mother_name: Set(fee.mother_name),
        guardian_name: Set(fee.guardian_name),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
}
