//! 投诉实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "complaints")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub category: String,
    pub priority: String,
    pub sender_id: i64,
    pub sender_type: String,
    pub recipient_type: String,
    pub recipient_id: Option<i64>,
    pub student_id: Option<i64>,
    pub status: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub response: Option<String>,
    pub responded_at: Option<i64>,
    pub responded_by: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::SenderId",
        to = "super::users::Column::Id",
        on_delete = "Cascade"
    )]
    Sender,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sender.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_complaint(self) -> crate::models::complaints::entities::Complaint {
        use crate::models::complaints::entities::{
            Complaint, ComplaintCategory, ComplaintPriority, ComplaintStatus, RecipientType,
        };
        use super::to_datetime;

        Complaint {
            id: self.id,
            title: self.title,
            description: self.description,
            category: self.category.parse().unwrap_or(ComplaintCategory::Other),
            priority: self.priority.parse().unwrap_or(ComplaintPriority::Normal),
            sender_id: self.sender_id,
            sender_type: self.sender_type,
            recipient_type: self.recipient_type.parse().unwrap_or(RecipientType::Admin),
            recipient_id: self.recipient_id,
            student_id: self.student_id,
            status: self.status.parse().unwrap_or(ComplaintStatus::Pending),
            response: self.response,
            responded_at: self.responded_at.map(to_datetime),
            responded_by: self.responded_by,
            created_at: to_datetime(self.created_at),
            updated_at: to_datetime(self.updated_at),
        }
    }
}
