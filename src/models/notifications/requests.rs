use serde::Deserialize;
use ts_rs::TS;

use super::entities::NotificationKind;
use crate::models::common::{PaginationQuery, deserialize_opt_bool};
use crate::models::users::entities::UserRole;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/notification.ts")]
pub struct NotificationListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "deserialize_opt_bool")]
    pub unread_only: Option<bool>,
}

/// 管理员发送自定义通知：指定用户或角色二选一
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/notification.ts")]
pub struct SendNotificationRequest {
    pub user_id: Option<i64>,
    pub role: Option<UserRole>,
    pub message: String,
    pub kind: Option<NotificationKind>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/notification.ts")]
pub struct SendMessageRequest {
    pub recipient_id: i64,
    pub body: String,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/notification.ts")]
pub struct InboxParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
}
