//! 操作日志存储操作

use super::SeaOrmStorage;
use crate::entity::activity_logs::{ActiveModel, Column, Entity as ActivityLogs};
use crate::errors::{Result, SchoolDeskError};
use crate::models::{
    PaginatedResponse, PaginationInfo,
    activity::{
        entities::{ActivityLog, NewActivityLog},
        requests::ActivityLogListParams,
    },
};
use crate::utils::escape_like_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set,
};

impl SeaOrmStorage {
    /// 写入一条操作日志
    pub async fn create_activity_log_impl(&self, log: NewActivityLog) -> Result<ActivityLog> {
        let model = ActiveModel {
            timestamp: Set(chrono::Utc::now().timestamp()),
            user_id: Set(log.user_id),
            category: Set(log.category),
            message: Set(log.message),
            ip_address: Set(log.ip_address),
            remote_addr: Set(log.remote_addr),
            x_forwarded_for: Set(log.x_forwarded_for),
            x_real_ip: Set(log.x_real_ip),
            x_client_ip: Set(log.x_client_ip),
            ip_type: Set(log.ip_type),
            user_agent: Set(log.user_agent),
            additional_data: Set(log.additional_data),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("写入操作日志失败: {e}")))?;

        Ok(result.into_activity_log())
    }

    /// 分页列出操作日志（新到旧）
    pub async fn list_activity_logs_impl(
        &self,
        query: ActivityLogListParams,
    ) -> Result<PaginatedResponse<ActivityLog>> {
        let (page, size) = query.pagination.normalized();

        let mut select = ActivityLogs::find();

        if let Some(ref category) = query.category
            && !category.trim().is_empty()
        {
            select = select.filter(Column::Category.eq(category.trim()));
        }

        if let Some(user_id) = query.user_id {
            select = select.filter(Column::UserId.eq(user_id));
        }

        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(
                Condition::any()
                    .add(Column::Message.contains(&escaped))
                    .add(Column::IpAddress.contains(&escaped)),
            );
        }

        let paginator = select
            .order_by_desc(Column::Timestamp)
            .order_by_desc(Column::Id)
            .paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询日志总数失败: {e}")))?;
        let logs = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询日志列表失败: {e}")))?;

        Ok(PaginatedResponse {
            items: logs.into_iter().map(|m| m.into_activity_log()).collect(),
            pagination: PaginationInfo::new(page, size, total),
        })
    }
}
