use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 课表
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/timetable.ts")]
pub struct Timetable {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub classroom_id: Option<i64>,
    pub academic_year: Option<String>,
    pub semester: Option<String>,
    pub is_active: bool,
    pub is_published: bool,
    pub created_by: Option<i64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 课表条目
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/timetable.ts")]
pub struct TimetableEntry {
    pub id: i64,
    pub timetable_id: i64,
    /// 0 = 周一 … 6 = 周日
    pub day_of_week: i32,
    pub period_number: i32,
    /// HH:MM
    pub start_time: String,
    pub end_time: String,
    pub subject_id: Option<i64>,
    pub teacher_id: Option<i64>,
    pub classroom_id: Option<i64>,
    pub room_number: Option<String>,
    pub is_lab_period: bool,
    pub is_break_period: bool,
    pub notes: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/timetable.ts")]
pub struct TimetableDetail {
    pub timetable: Timetable,
    pub entries: Vec<TimetableEntry>,
}
