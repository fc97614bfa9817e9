use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::middlewares::{RequireJWT, forget_cached_user};
use crate::models::auth::requests::ChangePasswordRequest;
use crate::models::users::requests::UpdateUserRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::activity::log_activity;
use crate::utils::password::{hash_password, verify_password};
use crate::utils::validate::validate_password_simple;

use super::AuthService;

pub async fn handle_change_password(
    service: &AuthService,
    change_request: ChangePasswordRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let Some(current_user) = RequireJWT::extract_user_claims(request) else {
        return Ok(crate::services::unauthorized());
    };

    // 缓存中的用户可能已过期，以数据库中的哈希为准
    let stored = match storage.get_user_by_id(current_user.id).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            return Ok(crate::services::not_found(
                ErrorCode::UserNotFound,
                "用户不存在",
            ));
        }
        Err(e) => return Ok(crate::services::error_response(&e, ErrorCode::InternalServerError)),
    };

    if !verify_password(&change_request.current_password, &stored.password_hash) {
        return Ok(crate::services::bad_request(
            ErrorCode::UserPasswordInvalid,
            "Current password is incorrect",
        ));
    }

    if let Err(msg) = validate_password_simple(&change_request.new_password) {
        return Ok(crate::services::bad_request(ErrorCode::UserPasswordInvalid, msg));
    }

    let password_hash = match hash_password(&change_request.new_password) {
        Ok(hash) => hash,
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("密码哈希失败: {e}"),
                )),
            );
        }
    };

    let update = UpdateUserRequest {
        password: Some(password_hash),
        ..Default::default()
    };

    match storage.update_user(stored.id, update).await {
        Ok(Some(_)) => {
            forget_cached_user(request, stored.id).await;
            log_activity(
                &storage,
                "security",
                format!("User {} changed password", stored.username),
                Some(stored.id),
                Some(request),
            )
            .await;
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("密码修改成功")))
        }
        Ok(None) => Ok(crate::services::not_found(
            ErrorCode::UserNotFound,
            "用户不存在",
        )),
        Err(e) => Ok(crate::services::error_response(&e, ErrorCode::InternalServerError)),
    }
}
