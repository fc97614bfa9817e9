//! 课表条目实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "timetable_entries")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub timetable_id: i64,
    pub day_of_week: i32,
    pub period_number: i32,
    pub start_time: String,
    pub end_time: String,
    pub subject_id: Option<i64>,
    pub teacher_id: Option<i64>,
    pub classroom_id: Option<i64>,
    pub room_number: Option<String>,
    pub is_lab_period: bool,
    pub is_break_period: bool,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::timetables::Entity",
        from = "Column::TimetableId",
        to = "super::timetables::Column::Id",
        on_delete = "Cascade"
    )]
    Timetable,
}

impl Related<super::timetables::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Timetable.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_entry(self) -> crate::models::timetable::entities::TimetableEntry {
        crate::models::timetable::entities::TimetableEntry {
            id: self.id,
            timetable_id: self.timetable_id,
            day_of_week: self.day_of_week,
            period_number: self.period_number,
            start_time: self.start_time,
            end_time: self.end_time,
            subject_id: self.subject_id,
            teacher_id: self.teacher_id,
            classroom_id: self.classroom_id,
            room_number: self.room_number,
            is_lab_period: self.is_lab_period,
            is_break_period: self.is_break_period,
            notes: self.notes,
            created_at: super::to_datetime(self.created_at),
        }
    }
}
