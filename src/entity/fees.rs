//! 学生费用实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "fees")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub student_id: i64,
    pub fee_type_id: Option<i64>,
    pub amount: f64,
    pub due_date: Option<Date>,
    pub paid: bool,
    pub payment_date: Option<Date>,
    pub academic_year: Option<String>,
    pub semester: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub late_fee_applicable: bool,
    pub late_fee_rate: f64,
    pub father_name: Option<String>,
    pub mother_name: Option<String>,
    pub guardian_name: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::students::Entity",
        from = "Column::StudentId",
        to = "super::students::Column::Id",
        on_delete = "Cascade"
    )]
    Student,
    #[sea_orm(
        belongs_to = "super::fee_types::Entity",
        from = "Column::FeeTypeId",
        to = "super::fee_types::Column::Id",
        on_delete = "SetNull"
    )]
    FeeType,
    #[sea_orm(has_many = "super::payments::Entity")]
    Payments,
    #[sea_orm(has_many = "super::discounts::Entity")]
    Discounts,
}

impl Related<super::students::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl Related<super::fee_types::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FeeType.def()
    }
}

impl Related<super::payments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payments.def()
    }
}

impl Related<super::discounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Discounts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_fee(self) -> crate::models::fees::entities::Fee {
        use super::to_datetime;

        crate::models::fees::entities::Fee {
            id: self.id,
            student_id: self.student_id,
            fee_type_id: self.fee_type_id,
            amount: self.amount,
            due_date: self.due_date,
            paid: self.paid,
            payment_date: self.payment_date,
            academic_year: self.academic_year,
            semester: self.semester,
            description: self.description,
            late_fee_applicable: self.late_fee_applicable,
            late_fee_rate: self.late_fee_rate,
            father_name: self.father_name,
            mother_name: self.mother_name,
            guardian_name: self.guardian_name,
            created_at: to_datetime(self.created_at),
            updated_at: to_datetime(self.updated_at),
        }
    }
}
