//! 站内通知

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;
use tracing::warn;

use crate::errors::SchoolDeskError;
use crate::middlewares::RequireJWT;
use crate::models::notifications::entities::{NewNotification, NotificationKind};
use crate::models::notifications::requests::{NotificationListParams, SendNotificationRequest};
use crate::models::notifications::responses::{AffectedCountResponse, UnreadCountResponse};
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

/// 通知正文的最大长度
const MAX_MESSAGE_LEN: usize = 1000;

/// 向一组用户发送通知；失败只记录日志
pub async fn notify(
    storage: &Arc<dyn Storage>,
    user_ids: &[i64],
    sender_id: Option<i64>,
    message: &str,
    kind: NotificationKind,
) -> u64 {
    let batch = build_batch(user_ids, sender_id, message, kind);
    match storage.create_notifications(batch).await {
        Ok(count) => count,
        Err(e) => {
            warn!("发送通知失败: {}", e);
            0
        }
    }
}

/// 去重后为每个用户生成一条通知
pub fn build_batch(
    user_ids: &[i64],
    sender_id: Option<i64>,
    message: &str,
    kind: NotificationKind,
) -> Vec<NewNotification> {
    let mut ids = user_ids.to_vec();
    ids.sort_unstable();
    ids.dedup();
    ids.into_iter()
        .map(|user_id| NewNotification {
            user_id,
            sender_id,
            message: message.to_string(),
            kind,
        })
        .collect()
}

pub struct NotificationService {
    storage: Option<Arc<dyn Storage>>,
}

impl NotificationService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    pub async fn list_notifications(
        &self,
        query: NotificationListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        let Some(user_id) = RequireJWT::extract_user_id(request) else {
            return Ok(super::unauthorized());
        };

        match storage
            .list_notifications_with_pagination(
                user_id,
                query.unread_only.unwrap_or(false),
                query.pagination,
            )
            .await
        {
            Ok(page) => Ok(HttpResponse::Ok().json(ApiResponse::success(page, "通知列表获取成功"))),
            Err(e) => Ok(super::error_response(&e, ErrorCode::InternalServerError)),
        }
    }

    pub async fn unread_count(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        let Some(user_id) = RequireJWT::extract_user_id(request) else {
            return Ok(super::unauthorized());
        };

        match storage.count_unread_notifications(user_id).await {
            Ok(count) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                UnreadCountResponse { count },
                "未读数量获取成功",
            ))),
            Err(e) => Ok(super::error_response(&e, ErrorCode::InternalServerError)),
        }
    }

    // 只能标记自己的通知
    pub async fn mark_read(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        let Some(user_id) = RequireJWT::extract_user_id(request) else {
            return Ok(super::unauthorized());
        };

        match storage.mark_notification_read(user_id, id).await {
            Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty("通知已读"))),
            Ok(false) => Ok(super::not_found(
                ErrorCode::NotificationNotFound,
                "Notification not found",
            )),
            Err(e) => Ok(super::error_response(&e, ErrorCode::InternalServerError)),
        }
    }

    pub async fn mark_all_read(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        let Some(user_id) = RequireJWT::extract_user_id(request) else {
            return Ok(super::unauthorized());
        };

        match storage.mark_all_notifications_read(user_id).await {
            Ok(affected) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                AffectedCountResponse { affected },
                "全部通知已读",
            ))),
            Err(e) => Ok(super::error_response(&e, ErrorCode::InternalServerError)),
        }
    }

    // 管理员向单个用户或某一角色发送通知
    pub async fn send(
        &self,
        req: SendNotificationRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let message = req.message.trim();
        if message.is_empty() || message.chars().count() > MAX_MESSAGE_LEN {
            return Ok(super::bad_request(
                ErrorCode::ValidationFailed,
                format!("Message must be 1-{MAX_MESSAGE_LEN} characters"),
            ));
        }

        let storage = self.get_storage(request)?;
        let recipients = match resolve_recipients(&storage, req.user_id, req.role.as_ref()).await {
            Ok(ids) => ids,
            Err(e) => return Ok(super::error_response(&e, ErrorCode::InternalServerError)),
        };

        let batch = build_batch(
            &recipients,
            RequireJWT::extract_user_id(request),
            message,
            req.kind.unwrap_or(NotificationKind::Info),
        );
        match storage.create_notifications(batch).await {
            Ok(affected) => Ok(HttpResponse::Created().json(ApiResponse::success(
                AffectedCountResponse { affected },
                "通知已发送",
            ))),
            Err(e) => Ok(super::error_response(&e, ErrorCode::InternalServerError)),
        }
    }
}

async fn resolve_recipients(
    storage: &Arc<dyn Storage>,
    user_id: Option<i64>,
    role: Option<&crate::models::users::entities::UserRole>,
) -> Result<Vec<i64>, SchoolDeskError> {
    match (user_id, role) {
        (Some(user_id), None) => match storage.get_user_by_id(user_id).await? {
            Some(user) => Ok(vec![user.id]),
            None => Err(SchoolDeskError::not_found(format!("用户 {user_id} 不存在"))),
        },
        (None, Some(role)) => storage.list_user_ids_by_role(role.clone()).await,
        _ => Err(SchoolDeskError::validation(
            "Specify exactly one of user_id or role",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_dedups_recipients() {
        let batch = build_batch(&[3, 1, 3], Some(9), "Exam tomorrow", NotificationKind::Warning);
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0].user_id, 1);
        assert_eq!(batch[1].sender_id, Some(9));
        assert_eq!(batch[1].kind, NotificationKind::Warning);
    }

    #[test]
    fn test_empty_batch() {
        assert!(build_batch(&[], None, "x", NotificationKind::Info).is_empty());
    }
}
