//! 班级实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "classrooms")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub name: String,
    pub grade: Option<String>,
    pub section: Option<String>,
    pub stream: Option<String>,
    pub academic_year: Option<String>,
    pub capacity: Option<i32>,
    pub class_teacher_id: Option<i64>,
    pub room: Option<String>,
    pub status: String,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::teachers::Entity",
        from = "Column::ClassTeacherId",
        to = "super::teachers::Column::Id",
        on_delete = "SetNull"
    )]
    ClassTeacher,
    #[sea_orm(has_many = "super::students::Entity")]
    Students,
}

impl Related<super::teachers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ClassTeacher.def()
    }
}

impl Related<super::students::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Students.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_classroom(self) -> crate::models::classrooms::entities::Classroom {
        use crate::models::classrooms::entities::{Classroom, ClassroomStatus};
        use super::to_datetime;

        Classroom {
            id: self.id,
            name: self.name,
            grade: self.grade,
            section: self.section,
            stream: self.stream,
            academic_year: self.academic_year,
            capacity: self.capacity,
            class_teacher_id: self.class_teacher_id,
            room: self.room,
            status: self.status.parse().unwrap_or(ClassroomStatus::Active),
            created_at: to_datetime(self.created_at),
            updated_at: to_datetime(self.updated_at),
        }
    }
}
