use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/timetable.ts")]
pub struct TimetableListParams {
    pub classroom_id: Option<i64>,
    pub is_published: Option<bool>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/timetable.ts")]
pub struct CreateTimetableRequest {
    pub name: String,
    pub description: Option<String>,
    pub classroom_id: Option<i64>,
    pub academic_year: Option<String>,
    pub semester: Option<String>,
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/timetable.ts")]
pub struct UpdateTimetableRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub classroom_id: Option<i64>,
    pub academic_year: Option<String>,
    pub semester: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/timetable.ts")]
pub struct CreateEntryRequest {
    pub day_of_week: i32,
    pub period_number: i32,
    pub start_time: String,
    pub end_time: String,
    pub subject_id: Option<i64>,
    pub teacher_id: Option<i64>,
    /// 缺省时沿用课表所属班级
    pub classroom_id: Option<i64>,
    pub room_number: Option<String>,
    #[serde(default)]
    pub is_lab_period: bool,
    #[serde(default)]
    pub is_break_period: bool,
    pub notes: Option<String>,
}
