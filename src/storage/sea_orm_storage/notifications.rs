//! 通知存储操作

use super::SeaOrmStorage;
use crate::entity::notifications::{ActiveModel, Column, Entity as Notifications};
use crate::errors::{Result, SchoolDeskError};
use crate::models::{
    PaginatedResponse, PaginationInfo, PaginationQuery,
    notifications::entities::{NewNotification, Notification},
};
use sea_orm::{
    ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    sea_query::Expr,
};

fn new_notification_model(notification: NewNotification, now: i64) -> ActiveModel {
    ActiveModel {
        user_id: Set(notification.user_id),
        sender_id: Set(notification.sender_id),
        message: Set(notification.message),
        kind: Set(notification.kind.to_string()),
        is_read: Set(false),
        created_at: Set(now),
        ..Default::default()
    }
}

impl SeaOrmStorage {
    /// 批量写入通知，返回写入条数
    pub async fn create_notifications_impl(
        &self,
        notifications: Vec<NewNotification>,
    ) -> Result<u64> {
        if notifications.is_empty() {
            return Ok(0);
        }
        let now = chrono::Utc::now().timestamp();
        let count = notifications.len() as u64;

        let models = notifications
            .into_iter()
            .map(|n| new_notification_model(n, now));
        Notifications::insert_many(models)
            .exec(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("批量创建通知失败: {e}")))?;

        Ok(count)
    }

    pub async fn list_notifications_with_pagination_impl(
        &self,
        user_id: i64,
        unread_only: bool,
        query: PaginationQuery,
    ) -> Result<PaginatedResponse<Notification>> {
        let (page, size) = query.normalized();

        let mut select = Notifications::find().filter(Column::UserId.eq(user_id));
        if unread_only {
            select = select.filter(Column::IsRead.eq(false));
        }

        let paginator = select
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询通知总数失败: {e}")))?;
        let notifications = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询通知列表失败: {e}")))?;

        Ok(PaginatedResponse {
            items: notifications
                .into_iter()
                .map(|m| m.into_notification())
                .collect(),
            pagination: PaginationInfo::new(page, size, total),
        })
    }

    pub async fn count_unread_notifications_impl(&self, user_id: i64) -> Result<u64> {
        Notifications::find()
            .filter(Column::UserId.eq(user_id))
            .filter(Column::IsRead.eq(false))
            .count(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("统计未读通知失败: {e}")))
    }

    /// 只能标记属于自己的通知
    pub async fn mark_notification_read_impl(&self, user_id: i64, id: i64) -> Result<bool> {
        let result = Notifications::update_many()
            .col_expr(Column::IsRead, Expr::value(true))
            .filter(Column::Id.eq(id))
            .filter(Column::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("标记通知失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn mark_all_notifications_read_impl(&self, user_id: i64) -> Result<u64> {
        let result = Notifications::update_many()
            .col_expr(Column::IsRead, Expr::value(true))
            .filter(Column::UserId.eq(user_id))
            .filter(Column::IsRead.eq(false))
            .exec(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("标记通知失败: {e}")))?;

        Ok(result.rows_affected)
    }
}
