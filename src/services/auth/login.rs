use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::{
    ApiResponse, ErrorCode,
    auth::responses::{LoginResponse, dashboard_for},
    auth::requests::LoginRequest,
    users::entities::UserStatus,
    users::requests::UpdateUserRequest,
};
use crate::services::activity::log_activity;
use crate::utils::jwt;
use crate::utils::password::{hash_password, needs_rehash, verify_password};

use super::AuthService;

pub async fn handle_login(
    service: &AuthService,
    login_request: LoginRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let config = service.get_config();

    // 1. 根据用户名或邮箱获取用户信息
    let user = match storage
        .get_user_by_username_or_email(login_request.username.trim())
        .await
    {
        Ok(Some(user)) => user,
        Ok(None) => {
            log_activity(
                &storage,
                "security",
                format!("Failed login attempt for '{}'", login_request.username),
                None,
                Some(request),
            )
            .await;
            return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
                ErrorCode::AuthFailed,
                "Username or password is incorrect",
            )));
        }
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Login failed: {e}"),
                )),
            );
        }
    };

    // 2. 验证密码
    if !verify_password(&login_request.password, &user.password_hash) {
        log_activity(
            &storage,
            "security",
            format!("Failed login attempt for '{}'", user.username),
            Some(user.id),
            Some(request),
        )
        .await;
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::AuthFailed,
            "Username or password is incorrect",
        )));
    }

    // 3. 停用或暂停的账号不能登录
    if user.status != UserStatus::Active {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::UserInactive,
            format!("Account is {}", user.status),
        )));
    }

    // 4. 更新最后登录时间；哈希参数过期时顺带重算
    let _ = storage.update_last_login(user.id).await;
    if needs_rehash(&user.password_hash, &config.argon2)
        && let Ok(hash) = hash_password(&login_request.password)
    {
        let update = UpdateUserRequest {
            password: Some(hash),
            ..Default::default()
        };
        if let Err(e) = storage.update_user(user.id, update).await {
            tracing::warn!("Failed to upgrade password hash for user {}: {}", user.id, e);
        }
    }

    // 5. 生成令牌对
    let token_pair = match user.generate_token_pair(login_request.remember_me) {
        Ok(pair) => pair,
        Err(e) => {
            tracing::error!("Failed to generate JWT token: {}", e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Login failed, unable to generate token",
                )),
            );
        }
    };

    tracing::info!("User {} logged in successfully", user.username);
    log_activity(
        &storage,
        "login",
        format!("User {} logged in", user.username),
        Some(user.id),
        Some(request),
    )
    .await;

    let refresh_cookie = jwt::JwtUtils::create_refresh_token_cookie(&token_pair);
    let response = LoginResponse {
        access_token: token_pair.access_token,
        expires_in: config.jwt.access_token_expiry * 60,
        dashboard: dashboard_for(&user.role).to_string(),
        user,
    };

    Ok(HttpResponse::Ok()
        .cookie(refresh_cookie)
        .json(ApiResponse::success(response, "Login successful")))
}
