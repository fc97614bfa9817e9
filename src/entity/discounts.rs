//! 折扣实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "discounts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub student_id: i64,
    pub fee_id: Option<i64>,
    pub discount_type: String,
    pub discount_value: f64,
    #[sea_orm(column_type = "Text", nullable)]
    pub reason: Option<String>,
    pub approved_by: Option<i64>,
    pub valid_from: Option<Date>,
    pub valid_until: Option<Date>,
    pub is_active: bool,
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
}

impl Related<super::fees::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Fee.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_discount(self) -> crate::models::fees::entities::Discount {
        use crate::models::fees::entities::{Discount, DiscountType};

        Discount {
            id: self.id,
            student_id: self.student_id,
            fee_id: self.fee_id,
            discount_type: self
                .discount_type
                .parse()
                .unwrap_or(DiscountType::FixedAmount),
            discount_value: self.discount_value,
            reason: self.reason,
            approved_by: self.approved_by,
            valid_from: self.valid_from,
            valid_until: self.valid_until,
            is_active: self.is_active,
            created_at: super::to_datetime(self.created_at),
        }
    }
}
