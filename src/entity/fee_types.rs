//! 费用类型实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "fee_types")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub is_recurring: bool,
    pub frequency: Option<String>,
    pub default_amount: Option<f64>,
    pub is_active: bool,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::fees::Entity")]
    Fees,
}

impl Related<super::fees::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Fees.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_fee_type(self) -> crate::models::fees::entities::FeeType {
        crate::models::fees::entities::FeeType {
            id: self.id,
            name: self.name,
            description: self.description,
            is_recurring: self.is_recurring,
            frequency: self.frequency,
            default_amount: self.default_amount,
            is_active: self.is_active,
            created_at: super::to_datetime(self.created_at),
        }
    }
}
