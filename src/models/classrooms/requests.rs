use super::entities::ClassroomStatus;
use crate::models::common::PaginationQuery;
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/classroom.ts")]
pub struct ClassroomListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub status: Option<ClassroomStatus>,
    pub search: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/classroom.ts")]
pub struct CreateClassroomRequest {
    pub name: String,
    pub grade: Option<String>,
    pub section: Option<String>,
    pub stream: Option<String>,
    pub academic_year: Option<String>,
    pub capacity: Option<i32>,
    pub class_teacher_id: Option<i64>,
    pub room: Option<String>,
    pub status: Option<ClassroomStatus>,
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/classroom.ts")]
pub struct UpdateClassroomRequest {
    pub name: Option<String>,
    pub grade: Option<String>,
    pub section: Option<String>,
    pub stream: Option<String>,
    pub academic_year: Option<String>,
    pub capacity: Option<i32>,
    pub class_teacher_id: Option<i64>,
    pub room: Option<String>,
    pub status: Option<ClassroomStatus>,
}
