use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::middlewares::require_jwt::RequireJWT;
use crate::models::auth::responses::{CurrentUserResponse, RefreshTokenResponse};
use crate::models::users::entities::{UserRole, UserStatus};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::children_of;
use crate::utils::jwt::JwtUtils;

use super::AuthService;

fn expired_session() -> HttpResponse {
    HttpResponse::Unauthorized()
        .cookie(JwtUtils::create_empty_refresh_token_cookie())
        .json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Login expired or invalid, please login again",
        ))
}

/// 用刷新令牌换取新的访问令牌；角色以数据库当前值为准
pub async fn handle_refresh_token(
    service: &AuthService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(refresh_token) = JwtUtils::extract_refresh_token_from_cookie(request) else {
        return Ok(crate::services::unauthorized());
    };

    let claims = match JwtUtils::verify_refresh_token(&refresh_token) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::info!("Refresh token rejected: {}", e);
            return Ok(expired_session());
        }
    };
    let Some(user_id) = claims.user_id() else {
        return Ok(expired_session());
    };

    let storage = service.get_storage(request)?;
    let user = match storage.get_user_by_id(user_id).await {
        Ok(Some(user)) if user.status == UserStatus::Active => user,
        Ok(_) => return Ok(expired_session()),
        Err(e) => return Ok(crate::services::error_response(&e, ErrorCode::InternalServerError)),
    };

    match JwtUtils::generate_access_token(user.id, &user.role) {
        Ok(access_token) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            RefreshTokenResponse {
                access_token,
                expires_in: service.get_config().jwt.access_token_expiry * 60,
            },
            "Token refreshed successfully",
        ))),
        Err(e) => {
            tracing::error!("Failed to sign access token for user {}: {}", user.id, e);
            Ok(HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                "Unable to refresh token",
            )))
        }
    }
}

pub async fn handle_get_user(
    service: &AuthService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(user) = RequireJWT::extract_user_claims(request) else {
        return Ok(crate::services::unauthorized());
    };
    let storage = service.get_storage(request)?;

    let (teacher_id, children) = match user.role {
        UserRole::Teacher => match storage.get_teacher_by_user_id(user.id).await {
            Ok(teacher) => (teacher.map(|t| t.id), Vec::new()),
            Err(e) => return Ok(crate::services::error_response(&e, ErrorCode::InternalServerError)),
        },
        UserRole::Parent => match children_of(&storage, user.id).await {
            Ok(children) => (None, children),
            Err(e) => return Ok(crate::services::error_response(&e, ErrorCode::InternalServerError)),
        },
        _ => (None, Vec::new()),
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        CurrentUserResponse {
            user,
            teacher_id,
            children,
        },
        "User information retrieved successfully",
    )))
}
