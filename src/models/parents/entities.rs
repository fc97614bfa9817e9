use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 家长档案
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/parent.ts")]
pub struct Parent {
    pub id: i64,
    pub user_id: Option<i64>,
    pub student_id: Option<i64>,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub relation: Option<String>,
    pub secret_key: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
