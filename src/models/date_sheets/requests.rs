use chrono::NaiveDate;
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/date_sheet.ts")]
pub struct DateSheetListParams {
    pub classroom_id: Option<i64>,
    pub is_published: Option<bool>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/date_sheet.ts")]
pub struct CreateDateSheetRequest {
    pub title: String,
    pub description: Option<String>,
    pub classroom_id: Option<i64>,
    pub academic_year: Option<String>,
    pub exam_type: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/date_sheet.ts")]
pub struct CreateDateSheetEntryRequest {
    pub exam_date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub subject_id: Option<i64>,
    /// 缺省时沿用日程所属班级
    pub classroom_id: Option<i64>,
    pub max_marks: Option<i32>,
    pub venue: Option<String>,
    pub room_number: Option<String>,
    pub special_instructions: Option<String>,
}
