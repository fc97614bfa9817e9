//! 用户私信实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "messages")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub sender_id: i64,
    pub recipient_id: i64,
    #[sea_orm(column_type = "Text")]
    pub body: String,
    pub is_read: bool,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_message(self) -> crate::models::notifications::entities::Message {
        crate::models::notifications::entities::Message {
            id: self.id,
            sender_id: self.sender_id,
            recipient_id: self.recipient_id,
            body: self.body,
            is_read: self.is_read,
            created_at: super::to_datetime(self.created_at),
        }
    }
}
