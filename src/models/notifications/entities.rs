use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::common::enums::define_string_enum;

define_string_enum! {
    pub enum NotificationKind("../frontend/src/types/generated/notification.ts") {
        Info => "info",
        Success => "success",
        Warning => "warning",
        Error => "error",
        Message => "message",
        Payment => "payment",
        Leave => "leave",
    }
}

// 站内通知
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/notification.ts")]
pub struct Notification {
    pub id: i64,
    pub user_id: i64,
    pub sender_id: Option<i64>,
    pub message: String,
    pub kind: NotificationKind,
    pub is_read: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

// 用户私信
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/notification.ts")]
pub struct Message {
    pub id: i64,
    pub sender_id: i64,
    pub recipient_id: i64,
    pub body: String,
    pub is_read: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// 待写入的通知
#[derive(Debug, Clone)]
pub struct NewNotification {
    pub user_id: i64,
    pub sender_id: Option<i64>,
    pub message: String,
    pub kind: NotificationKind,
}
