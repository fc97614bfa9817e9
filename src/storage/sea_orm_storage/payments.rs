//! 缴费与收据存储操作

use super::SeaOrmStorage;
use crate::entity::fees::{ActiveModel as FeeActiveModel, Entity as Fees};
use crate::entity::payments::{ActiveModel, Column, Entity as Payments};
use crate::entity::receipts::{
    ActiveModel as ReceiptActiveModel, Column as ReceiptColumn, Entity as Receipts,
};
use crate::errors::{Result, SchoolDeskError};
use crate::models::{
    PaginatedResponse, PaginationInfo, PaginationQuery,
    fees::entities::{NewPayment, Payment, Receipt},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

impl SeaOrmStorage {
    /// 写入缴费与收据，结清时同时标记费用；三者同属一个事务
    pub async fn record_payment_impl(&self, payment: NewPayment) -> Result<(Payment, Receipt)> {
        let now = chrono::Utc::now().timestamp();
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("开启事务失败: {e}")))?;

        let fee = Fees::find_by_id(payment.fee_id)
            .one(&txn)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询费用失败: {e}")))?
            .ok_or_else(|| SchoolDeskError::not_found(format!("费用 {} 不存在", payment.fee_id)))?;

        let saved = ActiveModel {
            fee_id: Set(fee.id),
            amount: Set(payment.amount),
            paid_on: Set(payment.paid_on),
            transaction_id: Set(payment.transaction_id),
            payment_method: Set(payment.payment_method.to_string()),
            received_by: Set(payment.received_by),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| SchoolDeskError::database_operation(format!("写入缴费记录失败: {e}")))?;

        let receipt = ReceiptActiveModel {
            payment_id: Set(saved.id),
            receipt_number: Set(payment.receipt_number),
            issued_at: Set(now),
            issued_to: Set(payment.issued_to),
            parent_name: Set(payment.parent_name),
            total_amount: Set(payment.amount),
            payment_method: Set(Some(payment.payment_method.to_string())),
            notes: Set(Some(payment.notes)),
            generated_by: Set(payment.generated_by),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| SchoolDeskError::database_operation(format!("生成收据失败: {e}")))?;

        if payment.settles_fee {
            FeeActiveModel {
                id: Set(fee.id),
                paid: Set(true),
                payment_date: Set(Some(payment.paid_on)),
                updated_at: Set(now),
                ..Default::default()
            }
            .update(&txn)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("更新费用状态失败: {e}")))?;
        }

        txn.commit()
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("提交事务失败: {e}")))?;

        Ok((saved.into_payment(), receipt.into_receipt()))
    }

    pub async fn list_payments_for_fees_impl(&self, fee_ids: &[i64]) -> Result<Vec<Payment>> {
        if fee_ids.is_empty() {
            return Ok(Vec::new());
        }

        let payments = Payments::find()
            .filter(Column::FeeId.is_in(fee_ids.to_vec()))
            .order_by_asc(Column::PaidOn)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询缴费记录失败: {e}")))?;

        Ok(payments.into_iter().map(|m| m.into_payment()).collect())
    }

    pub async fn get_payment_by_id_impl(&self, id: i64) -> Result<Option<Payment>> {
        let result = Payments::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询缴费记录失败: {e}")))?;

        Ok(result.map(|m| m.into_payment()))
    }

    pub async fn get_receipt_by_id_impl(&self, id: i64) -> Result<Option<Receipt>> {
        let result = Receipts::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询收据失败: {e}")))?;

        Ok(result.map(|m| m.into_receipt()))
    }

    /// 收据按开具时间倒序
    pub async fn list_receipts_with_pagination_impl(
        &self,
        query: PaginationQuery,
    ) -> Result<PaginatedResponse<Receipt>> {
        let (page, size) = query.normalized();

        let paginator = Receipts::find()
            .order_by_desc(ReceiptColumn::IssuedAt)
            .order_by_desc(ReceiptColumn::Id)
            .paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询收据总数失败: {e}")))?;
        let receipts = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询收据列表失败: {e}")))?;

        Ok(PaginatedResponse {
            items: receipts.into_iter().map(|m| m.into_receipt()).collect(),
            pagination: PaginationInfo::new(page, size, total),
        })
    }
}
