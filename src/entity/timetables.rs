//! 课表实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "timetables")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub classroom_id: Option<i64>,
    pub academic_year: Option<String>,
    pub semester: Option<String>,
    pub is_active: bool,
    pub is_published: bool,
    pub created_by: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::timetable_entries::Entity")]
    Entries,
    #[sea_orm(
        belongs_to = "super::classrooms::Entity",
        from = "Column::ClassroomId",
        to = "super::classrooms::Column::Id",
        on_delete = "SetNull"
    )]
    Classroom,
}

impl Related<super::timetable_entries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Entries.def()
    }
}

impl Related<super::classrooms::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Classroom.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_timetable(self) -> crate::models::timetable::entities::Timetable {
        use super::to_datetime;

        crate::models::timetable::entities::Timetable {
            id: self.id,
            name: self.name,
            description: self.description,
            classroom_id: self.classroom_id,
            academic_year: self.academic_year,
            semester: self.semester,
            is_active: self.is_active,
            is_published: self.is_published,
            created_by: self.created_by,
            created_at: to_datetime(self.created_at),
            updated_at: to_datetime(self.updated_at),
        }
    }
}
