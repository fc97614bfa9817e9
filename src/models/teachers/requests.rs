use chrono::NaiveDate;
use serde::Deserialize;
use ts_rs::TS;

use super::entities::TeacherStatus;
use crate::models::common::PaginationQuery;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/teacher.ts")]
pub struct TeacherListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub status: Option<TeacherStatus>,
    pub search: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/teacher.ts")]
pub struct CreateTeacherRequest {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub qualification: Option<String>,
    pub subject: Option<String>,
    pub employee_id: Option<String>,
    pub date_of_joining: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/teacher.ts")]
pub struct UpdateTeacherRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub qualification: Option<String>,
    pub subject: Option<String>,
    pub employee_id: Option<String>,
    pub date_of_joining: Option<NaiveDate>,
    pub status: Option<TeacherStatus>,
}
