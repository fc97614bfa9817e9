use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 操作日志
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/activity.ts")]
pub struct ActivityLog {
    pub id: i64,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub user_id: Option<i64>,
    pub category: String,
    pub message: String,
    pub ip_address: Option<String>,
    pub remote_addr: Option<String>,
    pub x_forwarded_for: Option<String>,
    pub x_real_ip: Option<String>,
    pub x_client_ip: Option<String>,
    pub ip_type: Option<String>,
    pub user_agent: Option<String>,
    pub additional_data: Option<serde_json::Value>,
}

/// 待写入的操作日志（存储层输入）
#[derive(Debug, Clone, Default)]
pub struct NewActivityLog {
    pub user_id: Option<i64>,
    pub category: String,
    pub message: String,
    pub ip_address: Option<String>,
    pub remote_addr: Option<String>,
    pub x_forwarded_for: Option<String>,
    pub x_real_ip: Option<String>,
    pub x_client_ip: Option<String>,
    pub ip_type: Option<String>,
    pub user_agent: Option<String>,
    pub additional_data: Option<String>,
}
