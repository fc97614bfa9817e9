//! 用户私信

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::middlewares::RequireJWT;
use crate::models::notifications::requests::{InboxParams, SendMessageRequest};
use crate::models::notifications::responses::UnreadCountResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

const MAX_BODY_LEN: usize = 5000;

pub struct MessageService {
    storage: Option<Arc<dyn Storage>>,
}

impl MessageService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    pub async fn send_message(
        &self,
        req: SendMessageRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        let Some(sender_id) = RequireJWT::extract_user_id(request) else {
            return Ok(super::unauthorized());
        };

        let body = req.body.trim().to_string();
        if body.is_empty() || body.chars().count() > MAX_BODY_LEN {
            return Ok(super::bad_request(
                ErrorCode::ValidationFailed,
                format!("Message body must be 1-{MAX_BODY_LEN} characters"),
            ));
        }
        if req.recipient_id == sender_id {
            return Ok(super::bad_request(
                ErrorCode::ValidationFailed,
                "Cannot send a message to yourself",
            ));
        }

        match storage.get_user_by_id(req.recipient_id).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                return Ok(super::not_found(
                    ErrorCode::MessageRecipientNotFound,
                    "Recipient not found",
                ));
            }
            Err(e) => return Ok(super::error_response(&e, ErrorCode::InternalServerError)),
        }

        match storage.create_message(sender_id, req.recipient_id, body).await {
            Ok(message) => Ok(HttpResponse::Created().json(ApiResponse::success(message, "消息已发送"))),
            Err(e) => Ok(super::error_response(&e, ErrorCode::InternalServerError)),
        }
    }

    pub async fn inbox(
        &self,
        query: InboxParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        let Some(user_id) = RequireJWT::extract_user_id(request) else {
            return Ok(super::unauthorized());
        };

        match storage
            .list_inbox_with_pagination(user_id, query.pagination)
            .await
        {
            Ok(page) => Ok(HttpResponse::Ok().json(ApiResponse::success(page, "收件箱获取成功"))),
            Err(e) => Ok(super::error_response(&e, ErrorCode::InternalServerError)),
        }
    }

    // 查看会话时对方发来的消息标记为已读
    pub async fn conversation(
        &self,
        other_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        let Some(user_id) = RequireJWT::extract_user_id(request) else {
            return Ok(super::unauthorized());
        };

        let messages = match storage.list_conversation(user_id, other_id).await {
            Ok(messages) => messages,
            Err(e) => return Ok(super::error_response(&e, ErrorCode::InternalServerError)),
        };

        if let Err(e) = storage.mark_conversation_read(user_id, other_id).await {
            return Ok(super::error_response(&e, ErrorCode::InternalServerError));
        }

        Ok(HttpResponse::Ok().json(ApiResponse::success(messages, "会话获取成功")))
    }

    pub async fn unread_count(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        let Some(user_id) = RequireJWT::extract_user_id(request) else {
            return Ok(super::unauthorized());
        };

        match storage.count_unread_messages(user_id).await {
            Ok(count) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                UnreadCountResponse { count },
                "未读消息数量获取成功",
            ))),
            Err(e) => Ok(super::error_response(&e, ErrorCode::InternalServerError)),
        }
    }
}
