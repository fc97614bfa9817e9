//! 考试场次实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "date_sheet_entries")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub date_sheet_id: i64,
    pub exam_date: Date,
    pub start_time: String,
    pub end_time: String,
    pub subject_id: Option<i64>,
    pub classroom_id: Option<i64>,
    pub max_marks: Option<i32>,
    pub venue: Option<String>,
    pub room_number: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub special_instructions: Option<String>,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::date_sheets::Entity",
        from = "Column::DateSheetId",
        to = "super::date_sheets::Column::Id",
        on_delete = "Cascade"
    )]
    DateSheet,
}

impl Related<super::date_sheets::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DateSheet.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_entry(self) -> crate::models::date_sheets::entities::DateSheetEntry {
        crate::models::date_sheets::entities::DateSheetEntry {
            id: self.id,
            date_sheet_id: self.date_sheet_id,
            exam_date: self.exam_date,
            start_time: self.start_time,
            end_time: self.end_time,
            subject_id: self.subject_id,
            classroom_id: self.classroom_id,
            max_marks: self.max_marks,
            venue: self.venue,
            room_number: self.room_number,
            special_instructions: self.special_instructions,
            created_at: super::to_datetime(self.created_at),
        }
    }
}
