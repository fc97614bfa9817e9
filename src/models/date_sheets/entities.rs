use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 考试日程
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/date_sheet.ts")]
pub struct DateSheet {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    /// 为空表示适用于全校
    pub classroom_id: Option<i64>,
    pub academic_year: Option<String>,
    pub exam_type: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub is_active: bool,
    pub is_published: bool,
    pub created_by: Option<i64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 考试场次
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/date_sheet.ts")]
pub struct DateSheetEntry {
    pub id: i64,
    pub date_sheet_id: i64,
    pub exam_date: NaiveDate,
    /// HH:MM
    pub start_time: String,
    pub end_time: String,
    pub subject_id: Option<i64>,
    pub classroom_id: Option<i64>,
    pub max_marks: Option<i32>,
    pub venue: Option<String>,
    pub room_number: Option<String>,
    pub special_instructions: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/date_sheet.ts")]
pub struct DateSheetDetail {
    pub date_sheet: DateSheet,
    pub entries: Vec<DateSheetEntry>,
}

/// 家长视角的一场考试（按孩子展开）
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/date_sheet.ts")]
pub struct ExamScheduleItem {
    pub date_sheet_id: i64,
    pub date_sheet_title: String,
    pub exam_type: String,
    pub exam_date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub subject_id: Option<i64>,
    pub subject_name: Option<String>,
    pub student_id: i64,
    pub child_name: String,
    pub classroom_id: Option<i64>,
    pub venue: Option<String>,
    pub room_number: Option<String>,
    pub max_marks: Option<i32>,
}
