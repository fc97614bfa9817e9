use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::ApiResponse;
use crate::services::activity::log_activity;
use crate::utils::jwt::JwtUtils;

use super::AuthService;

/// 清除刷新 cookie；能识别出用户时记一条活动日志
pub async fn handle_logout(
    service: &AuthService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user_id = JwtUtils::extract_refresh_token_from_cookie(request)
        .and_then(|token| JwtUtils::verify_refresh_token(&token).ok())
        .and_then(|claims| claims.user_id());

    if let Some(user_id) = user_id
        && let Ok(storage) = service.get_storage(request)
    {
        log_activity(
            &storage,
            "logout",
            format!("User #{user_id} logged out"),
            Some(user_id),
            Some(request),
        )
        .await;
    }

    Ok(HttpResponse::Ok()
        .cookie(JwtUtils::create_empty_refresh_token_cookie())
        .json(ApiResponse::<()>::success_empty("Logged out")))
}
