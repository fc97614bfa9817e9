//! 收据实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "receipts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub payment_id: i64,
    #[sea_orm(unique)]
    pub receipt_number: String,
    pub issued_at: i64,
    pub issued_to: String,
    pub parent_name: Option<String>,
    pub total_amount: f64,
    pub payment_method: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
    pub generated_by: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::payments::Entity",
        from = "Column::PaymentId",
        to = "super::payments::Column::Id",
        on_delete = "Cascade"
    )]
    Payment,
}

impl Related<super::payments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_receipt(self) -> crate::models::fees::entities::Receipt {
        crate::models::fees::entities::Receipt {
            id: self.id,
            payment_id: self.payment_id,
            receipt_number: self.receipt_number,
            issued_at: super::to_datetime(self.issued_at),
            issued_to: self.issued_to,
            parent_name: self.parent_name,
            total_amount: self.total_amount,
            payment_method: self.payment_method,
            notes: self.notes,
            generated_by: self.generated_by,
        }
    }
}
