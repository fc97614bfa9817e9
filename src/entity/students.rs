//! 学生档案实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "students")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub roll_number: Option<String>,
    #[sea_orm(unique)]
    pub email: Option<String>,
    pub gender: Option<String>,
    pub date_of_birth: Option<Date>,
    pub class_id: Option<i64>,
    pub father_name: Option<String>,
    pub mother_name: Option<String>,
    pub guardian_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::classrooms::Entity",
        from = "Column::ClassId",
        to = "super::classrooms::Column::Id",
        on_delete = "SetNull"
    )]
    Classroom,
    #[sea_orm(has_many = "super::fees::Entity")]
    Fees,
    #[sea_orm(has_many = "super::attendance::Entity")]
    Attendance,
}

impl Related<super::classrooms::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Classroom.def()
    }
}

impl Related<super::fees::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Fees.def()
    }
}

impl Related<super::attendance::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Attendance.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_student(self) -> crate::models::students::entities::Student {
        use crate::models::students::entities::Student;
        use super::to_datetime;

        Student {
            id: self.id,
            name: self.name,
            roll_number: self.roll_number,
            email: self.email,
            gender: self.gender,
            date_of_birth: self.date_of_birth,
            class_id: self.class_id,
            father_name: self.father_name,
            mother_name: self.mother_name,
            guardian_name: self.guardian_name,
            phone: self.phone,
            address: self.address,
            is_active: self.is_active,
            created_at: to_datetime(self.created_at),
            updated_at: to_datetime(self.updated_at),
        }
    }
}
