use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::common::enums::define_string_enum;

define_string_enum! {
    // 班级状态
    pub enum ClassroomStatus("../frontend/src/types/generated/classroom.ts") {
        Active => "active",
        Inactive => "inactive",
        Archived => "archived",
    }
}

// 班级
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/classroom.ts")]
pub struct Classroom {
    pub id: i64,
    pub name: String,
    pub grade: Option<String>,
    pub section: Option<String>,
    pub stream: Option<String>,
    pub academic_year: Option<String>,
    pub capacity: Option<i32>,
    pub class_teacher_id: Option<i64>,
    pub room: Option<String>,
    pub status: ClassroomStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 班级列表项（附带学生人数）
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/classroom.ts")]
pub struct ClassroomSummary {
    #[serde(flatten)]
    #[ts(flatten)]
    pub classroom: Classroom,
    pub student_count: i64,
}
