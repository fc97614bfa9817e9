//! 班级收费标准实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "class_fees")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub classroom_id: i64,
    pub fee_type_id: i64,
    pub academic_year: String,
    pub semester: Option<String>,
    pub base_amount: f64,
    pub adjustment_amount: f64,
    #[sea_orm(column_type = "Text", nullable)]
    pub adjustment_reason: Option<String>,
    pub adjusted_by: Option<i64>,
    pub adjusted_at: Option<i64>,
    pub due_date: Option<Date>,
    pub late_fee_applicable: bool,
    pub late_fee_rate: f64,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::classrooms::Entity",
        from = "Column::ClassroomId",
        to = "super::classrooms::Column::Id",
        on_delete = "Cascade"
    )]
    Classroom,
    #[sea_orm(
        belongs_to = "super::fee_types::Entity",
        from = "Column::FeeTypeId",
        to = "super::fee_types::Column::Id",
        on_delete = "Cascade"
    )]
    FeeType,
}

impl Related<super::classrooms::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Classroom.def()
    }
}

impl Related<super::fee_types::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FeeType.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_class_fee(self) -> crate::models::fees::entities::ClassFee {
        use super::to_datetime;

        crate::models::fees::entities::ClassFee {
            id: self.id,
            classroom_id: self.classroom_id,
            fee_type_id: self.fee_type_id,
            academic_year: self.academic_year,
            semester: self.semester,
            base_amount: self.base_amount,
            adjustment_amount: self.adjustment_amount,
            adjustment_reason: self.adjustment_reason,
            adjusted_by: self.adjusted_by,
            adjusted_at: self.adjusted_at.map(to_datetime),
            due_date: self.due_date,
            late_fee_applicable: self.late_fee_applicable,
            late_fee_rate: self.late_fee_rate,
            description: self.description,
            is_active: self.is_active,
            created_at: to_datetime(self.created_at),
            updated_at: to_datetime(self.updated_at),
        }
    }
}
