//! 用户账号管理（仅管理员）
//!
//! 初始管理员（ID 1）和当前登录者受保护：不能删除，也不能被降级或停用。

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::middlewares::{RequireJWT, forget_cached_user};
use crate::models::auth::responses::UserInfoResponse;
use crate::models::users::entities::{UserRole, UserStatus};
use crate::models::users::requests::{
    CreateUserRequest, UpdateUserRequest, UserListParams, UserListQuery,
};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::activity::log_activity;
use crate::storage::Storage;
use crate::utils::password::hash_password;
use crate::utils::validate::{
    validate_email, validate_password_simple, validate_phone, validate_username,
};

const ROOT_ADMIN_ID: i64 = 1;

pub fn is_protected_user(target_id: i64, current_user_id: Option<i64>) -> bool {
    target_id == ROOT_ADMIN_ID || current_user_id == Some(target_id)
}

/// 受保护账号只允许修改资料，不允许改角色或停用
pub fn check_protected_update(
    target_id: i64,
    current_user_id: Option<i64>,
    update: &UpdateUserRequest,
) -> Result<(), &'static str> {
    if !is_protected_user(target_id, current_user_id) {
        return Ok(());
    }
    if update.role.as_ref().is_some_and(|r| *r != UserRole::Admin) {
        return Err("Cannot change the role of this account");
    }
    if update.status.as_ref().is_some_and(|s| *s != UserStatus::Active) {
        return Err("Cannot deactivate this account");
    }
    Ok(())
}

fn trim_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn user_not_found() -> HttpResponse {
    super::not_found(ErrorCode::UserNotFound, "User not found")
}

fn hashing_failed(e: impl std::fmt::Display) -> HttpResponse {
    HttpResponse::InternalServerError().json(ApiResponse::error_empty(
        ErrorCode::InternalServerError,
        format!("Password hashing failed: {e}"),
    ))
}

pub struct UserService {
    storage: Option<Arc<dyn Storage>>,
}

impl UserService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    // 分页列表，可按角色、状态、关键字过滤
    pub async fn list_users(
        &self,
        query: UserListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        match storage
            .list_users_with_pagination(UserListQuery::from(query))
            .await
        {
            Ok(page) => Ok(HttpResponse::Ok().json(ApiResponse::success(page, "用户列表获取成功"))),
            Err(e) => Ok(super::error_response(&e, ErrorCode::InternalServerError)),
        }
    }

    pub async fn create_user(
        &self,
        mut req: CreateUserRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        req.username = req.username.trim().to_string();
        req.email = req.email.trim().to_lowercase();
        req.display_name = trim_optional(req.display_name);
        req.phone = trim_optional(req.phone);

        if let Err(msg) = validate_username(&req.username) {
            return Ok(super::bad_request(ErrorCode::UserNameInvalid, msg));
        }
        if let Err(msg) = validate_email(&req.email) {
            return Ok(super::bad_request(ErrorCode::UserEmailInvalid, msg));
        }
        if let Some(phone) = &req.phone
            && let Err(msg) = validate_phone(phone)
        {
            return Ok(super::bad_request(ErrorCode::ValidationFailed, msg));
        }
        if let Err(msg) = validate_password_simple(&req.password) {
            return Ok(super::bad_request(ErrorCode::UserPasswordInvalid, msg));
        }
        req.password = match hash_password(&req.password) {
            Ok(hash) => hash,
            Err(e) => return Ok(hashing_failed(e)),
        };

        let storage = self.get_storage(request)?;
        match storage.create_user(req).await {
            Ok(user) => {
                log_activity(
                    &storage,
                    "user",
                    format!("User {} ({}) created", user.username, user.role),
                    RequireJWT::extract_user_id(request),
                    Some(request),
                )
                .await;
                Ok(HttpResponse::Created()
                    .json(ApiResponse::success(UserInfoResponse { user }, "用户创建成功")))
            }
            Err(e) if super::is_unique_violation(&e) => Ok(HttpResponse::Conflict().json(
                ApiResponse::error_empty(
                    ErrorCode::UserAlreadyExists,
                    "Username or email already exists",
                ),
            )),
            Err(e) => Ok(super::error_response(&e, ErrorCode::InternalServerError)),
        }
    }

    pub async fn get_user(&self, user_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        match storage.get_user_by_id(user_id).await {
            Ok(Some(user)) => Ok(HttpResponse::Ok()
                .json(ApiResponse::success(UserInfoResponse { user }, "用户获取成功"))),
            Ok(None) => Ok(user_not_found()),
            Err(e) => Ok(super::error_response(&e, ErrorCode::InternalServerError)),
        }
    }

    pub async fn update_user(
        &self,
        user_id: i64,
        mut update: UpdateUserRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let current_user_id = RequireJWT::extract_user_id(request);
        if let Err(msg) = check_protected_update(user_id, current_user_id, &update) {
            return Ok(super::bad_request(ErrorCode::ProtectedUser, msg));
        }

        if let Some(email) = update.email.take() {
            let email = email.trim().to_lowercase();
            if let Err(msg) = validate_email(&email) {
                return Ok(super::bad_request(ErrorCode::UserEmailInvalid, msg));
            }
            update.email = Some(email);
        }
        update.phone = trim_optional(update.phone);
        if let Some(phone) = &update.phone
            && let Err(msg) = validate_phone(phone)
        {
            return Ok(super::bad_request(ErrorCode::ValidationFailed, msg));
        }
        if let Some(password) = update.password.take() {
            if let Err(msg) = validate_password_simple(&password) {
                return Ok(super::bad_request(ErrorCode::UserPasswordInvalid, msg));
            }
            update.password = match hash_password(&password) {
                Ok(hash) => Some(hash),
                Err(e) => return Ok(hashing_failed(e)),
            };
        }
        let status_change = update.status.clone();

        let storage = self.get_storage(request)?;
        match storage.update_user(user_id, update).await {
            Ok(Some(user)) => {
                forget_cached_user(request, user.id).await;
                if let Some(status) = status_change {
                    log_activity(
                        &storage,
                        "user",
                        format!("User {} status set to {}", user.username, status),
                        current_user_id,
                        Some(request),
                    )
                    .await;
                }
                Ok(HttpResponse::Ok()
                    .json(ApiResponse::success(UserInfoResponse { user }, "用户更新成功")))
            }
            Ok(None) => Ok(user_not_found()),
            Err(e) if super::is_unique_violation(&e) => Ok(HttpResponse::Conflict().json(
                ApiResponse::error_empty(ErrorCode::UserAlreadyExists, "Email already exists"),
            )),
            Err(e) => Ok(super::error_response(&e, ErrorCode::InternalServerError)),
        }
    }

    pub async fn delete_user(
        &self,
        user_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let current_user_id = RequireJWT::extract_user_id(request);
        if is_protected_user(user_id, current_user_id) {
            return Ok(super::bad_request(
                ErrorCode::ProtectedUser,
                "Cannot delete this account",
            ));
        }

        let storage = self.get_storage(request)?;
        match storage.delete_user(user_id).await {
            Ok(true) => {
                forget_cached_user(request, user_id).await;
                log_activity(
                    &storage,
                    "user",
                    format!("User #{user_id} deleted"),
                    current_user_id,
                    Some(request),
                )
                .await;
                Ok(HttpResponse::Ok().json(ApiResponse::success_empty("用户删除成功")))
            }
            Ok(false) => Ok(user_not_found()),
            Err(e) => Ok(super::error_response(&e, ErrorCode::InternalServerError)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protected_users() {
        assert!(is_protected_user(1, Some(5)));
        assert!(is_protected_user(5, Some(5)));
        assert!(!is_protected_user(6, Some(5)));
        assert!(!is_protected_user(6, None));
    }

    #[test]
    fn test_protected_account_keeps_admin_role_and_active_status() {
        let demote = UpdateUserRequest {
            role: Some(UserRole::Teacher),
            ..Default::default()
        };
        assert!(check_protected_update(1, Some(9), &demote).is_err());
        assert!(check_protected_update(9, Some(9), &demote).is_err());
        assert!(check_protected_update(10, Some(9), &demote).is_ok());

        let suspend = UpdateUserRequest {
            status: Some(UserStatus::Suspended),
            ..Default::default()
        };
        assert!(check_protected_update(1, None, &suspend).is_err());

        let rename = UpdateUserRequest {
            display_name: Some("Head".into()),
            ..Default::default()
        };
        assert!(check_protected_update(1, Some(1), &rename).is_ok());
    }
}
