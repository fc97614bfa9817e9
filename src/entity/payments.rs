//! 缴费记录实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "payments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub fee_id: i64,
    pub amount: f64,
    pub paid_on: Date,
    #[sea_orm(unique)]
    pub transaction_id: Option<String>,
    pub payment_method: String,
    pub received_by: Option<i64>,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::fees::Entity",
        from = "Column::FeeId",
        to = "super::fees::Column::Id",
        on_delete = "Cascade"
    )]
    Fee,
    #[sea_orm(has_one = "super::receipts::Entity")]
    Receipt,
}

impl Related<super::fees::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Fee.def()
    }
}

impl Related<super::receipts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Receipt.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_payment(self) -> crate::models::fees::entities::Payment {
        use crate::models::fees::entities::{Payment, PaymentMethod};

        Payment {
            id: self.id,
            fee_id: self.fee_id,
            amount: self.amount,
            paid_on: self.paid_on,
            transaction_id: self.transaction_id,
            payment_method: self.payment_method.parse().unwrap_or(PaymentMethod::Cash),
            received_by: self.received_by,
            created_at: super::to_datetime(self.created_at),
        }
    }
}
