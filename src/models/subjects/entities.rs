use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 科目
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/subject.ts")]
pub struct Subject {
    pub id: i64,
    pub name: String,
    pub code: Option<String>,
    pub stream: Option<String>,
    pub classroom_id: Option<i64>,
    pub teacher_id: Option<i64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
