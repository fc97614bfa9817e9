//! 投诉存储操作

use super::SeaOrmStorage;
use crate::entity::complaints::{ActiveModel, Column, Entity as Complaints};
use crate::errors::{Result, SchoolDeskError};
use crate::models::{
    PaginatedResponse, PaginationInfo,
    complaints::{
        entities::{Complaint, ComplaintPriority, ComplaintStatus, RecipientType},
        requests::{ComplaintListQuery, ComplaintScope, CreateComplaintRequest},
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

impl SeaOrmStorage {
    pub async fn create_complaint_impl(
        &self,
        sender_id: i64,
        sender_type: &str,
        req: CreateComplaintRequest,
    ) -> Result<Complaint> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            title: Set(req.title),
            description: Set(req.description),
            category: Set(req.category.to_string()),
            priority: Set(req.priority.unwrap_or(ComplaintPriority::Normal).to_string()),
            sender_id: Set(sender_id),
            sender_type: Set(sender_type.to_string()),
            recipient_type: Set(req.recipient_type.to_string()),
            // 仅投诉给教师时保留收件人
            recipient_id: Set(match req.recipient_type {
                RecipientType::Teacher => req.recipient_id,
                RecipientType::Admin => None,
            }),
            student_id: Set(req.student_id),
            status: Set(ComplaintStatus::Pending.to_string()),
            response: Set(None),
            responded_at: Set(None),
            responded_by: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("提交投诉失败: {e}")))?;

        Ok(result.into_complaint())
    }

    pub async fn get_complaint_by_id_impl(&self, id: i64) -> Result<Option<Complaint>> {
        let result = Complaints::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询投诉失败: {e}")))?;

        Ok(result.map(|m| m.into_complaint()))
    }

    pub async fn list_complaints_with_pagination_impl(
        &self,
        query: ComplaintListQuery,
    ) -> Result<PaginatedResponse<Complaint>> {
        let page = query.page.max(1) as u64;
        let size = query.size.clamp(1, 100) as u64;

        let mut select = Complaints::find();

        select = match query.scope {
            ComplaintScope::All => select,
            ComplaintScope::SentBy(user_id) => select.filter(Column::SenderId.eq(user_id)),
            ComplaintScope::AddressedToTeacher(user_id) => select
                .filter(Column::RecipientType.eq(RecipientType::Teacher.as_str()))
                .filter(Column::RecipientId.eq(user_id)),
        };

        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }
        if let Some(category) = query.category {
            select = select.filter(Column::Category.eq(category.to_string()));
        }

        let paginator = select
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询投诉总数失败: {e}")))?;
        let complaints = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询投诉列表失败: {e}")))?;

        Ok(PaginatedResponse {
            items: complaints.into_iter().map(|m| m.into_complaint()).collect(),
            pagination: PaginationInfo::new(page, size, total),
        })
    }

    pub async fn respond_complaint_impl(
        &self,
        id: i64,
        response: String,
        status: ComplaintStatus,
        responded_by: i64,
    ) -> Result<Option<Complaint>> {
        if self.get_complaint_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }
        let now = chrono::Utc::now().timestamp();

        let updated = ActiveModel {
            id: Set(id),
            response: Set(Some(response)),
            status: Set(status.to_string()),
            responded_at: Set(Some(now)),
            responded_by: Set(Some(responded_by)),
            updated_at: Set(now),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(|e| SchoolDeskError::database_operation(format!("回复投诉失败: {e}")))?;

        Ok(Some(updated.into_complaint()))
    }

    pub async fn update_complaint_status_impl(
        &self,
        id: i64,
        status: ComplaintStatus,
    ) -> Result<Option<Complaint>> {
        if self.get_complaint_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let updated = ActiveModel {
            id: Set(id),
            status: Set(status.to_string()),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(|e| SchoolDeskError::database_operation(format!("更新投诉状态失败: {e}")))?;

        Ok(Some(updated.into_complaint()))
    }
}
