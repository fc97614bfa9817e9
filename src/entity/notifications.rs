//! 站内通知实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "notifications")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    pub sender_id: Option<i64>,
    #[sea_orm(column_type = "Text")]
    pub message: String,
    pub kind: String,
    pub is_read: bool,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_notification(self) -> crate::models::notifications::entities::Notification {
        use crate::models::notifications::entities::{Notification, NotificationKind};

        Notification {
            id: self.id,
            user_id: self.user_id,
            sender_id: self.sender_id,
            message: self.message,
            kind: self.kind.parse().unwrap_or(NotificationKind::Info),
            is_read: self.is_read,
            created_at: super::to_datetime(self.created_at),
        }
    }
}
