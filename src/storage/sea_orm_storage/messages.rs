//! 私信存储操作

use super::SeaOrmStorage;
use crate::entity::messages::{ActiveModel, Column, Entity as Messages};
use crate::errors::{Result, SchoolDeskError};
use crate::models::{
    PaginatedResponse, PaginationInfo, PaginationQuery, notifications::entities::Message,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, sea_query::Expr,
};

impl SeaOrmStorage {
    pub async fn create_message_impl(
        &self,
        sender_id: i64,
        recipient_id: i64,
        body: String,
    ) -> Result<Message> {
        let result = ActiveModel {
            sender_id: Set(sender_id),
            recipient_id: Set(recipient_id),
            body: Set(body),
            is_read: Set(false),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| SchoolDeskError::database_operation(format!("发送私信失败: {e}")))?;

        Ok(result.into_message())
    }

    /// 收件箱：最新在前
    pub async fn list_inbox_with_pagination_impl(
        &self,
        user_id: i64,
        query: PaginationQuery,
    ) -> Result<PaginatedResponse<Message>> {
        let (page, size) = query.normalized();

        let paginator = Messages::find()
            .filter(Column::RecipientId.eq(user_id))
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询私信总数失败: {e}")))?;
        let messages = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询收件箱失败: {e}")))?;

        Ok(PaginatedResponse {
            items: messages.into_iter().map(|m| m.into_message()).collect(),
            pagination: PaginationInfo::new(page, size, total),
        })
    }

    /// 双方往来的全部私信，按时间升序
    pub async fn list_conversation_impl(&self, user_id: i64, other_id: i64) -> Result<Vec<Message>> {
        let messages = Messages::find()
            .filter(
                Condition::any()
                    .add(
                        Condition::all()
                            .add(Column::SenderId.eq(user_id))
                            .add(Column::RecipientId.eq(other_id)),
                    )
                    .add(
                        Condition::all()
                            .add(Column::SenderId.eq(other_id))
                            .add(Column::RecipientId.eq(user_id)),
                    ),
            )
            .order_by_asc(Column::CreatedAt)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询会话失败: {e}")))?;

        Ok(messages.into_iter().map(|m| m.into_message()).collect())
    }

    /// 将对方发来的未读私信标记为已读
    pub async fn mark_conversation_read_impl(&self, user_id: i64, other_id: i64) -> Result<u64> {
        let result = Messages::update_many()
            .col_expr(Column::IsRead, Expr::value(true))
            .filter(Column::SenderId.eq(other_id))
            .filter(Column::RecipientId.eq(user_id))
            .filter(Column::IsRead.eq(false))
            .exec(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("标记私信失败: {e}")))?;

        Ok(result.rows_affected)
    }

    pub async fn count_unread_messages_impl(&self, user_id: i64) -> Result<u64> {
        Messages::find()
            .filter(Column::RecipientId.eq(user_id))
            .filter(Column::IsRead.eq(false))
            .count(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("统计未读私信失败: {e}")))
    }
}
