//! Bearer 访问令牌认证
//!
//! 校验通过后把当前 [`User`](entities::User) 放入请求扩展，处理程序用
//! [`RequireJWT::extract_user_claims`] 等取出。失败返回 401 并记一条 `warning` 活动日志。
//!
//! 已认证用户按 ID 缓存；账号被修改、停用或删除时需调用 [`forget_cached_user`]。

use crate::cache::ObjectCache;
use crate::config::AppConfig;
use crate::models::ErrorCode;
use crate::models::users::entities;
use crate::services::activity::log_activity;
use crate::storage::Storage;
use crate::utils::jwt::JwtUtils;
use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    http::header::USER_AGENT,
    web,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::{rc::Rc, sync::Arc};
use tracing::{debug, info};

use super::create_error_response;

const BEARER_PREFIX: &str = "Bearer ";
const AUTHORIZATION_HEADER: &str = "Authorization";

#[derive(Clone)]
pub struct RequireJWT;

pub fn user_cache_key(user_id: i64) -> String {
    format!("auth:user:{user_id}")
}

/// 删除某个账号的认证缓存
pub async fn forget_cached_user(req: &actix_web::HttpRequest, user_id: i64) {
    if let Some(cache) = req.app_data::<web::Data<Arc<dyn ObjectCache>>>() {
        cache.remove(&user_cache_key(user_id)).await;
    }
}

fn bearer_token(req: &ServiceRequest) -> Option<&str> {
    req.headers()
        .get(AUTHORIZATION_HEADER)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix(BEARER_PREFIX))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// 令牌有效且账号处于 active 状态时返回当前用户
async fn authenticate(
    req: &ServiceRequest,
    storage: &Arc<dyn Storage>,
) -> Result<entities::User, String> {
    let token = bearer_token(req).ok_or("Missing or invalid Authorization header")?;
    let claims = JwtUtils::verify_access_token(token).map_err(|err| {
        info!("Access token rejected: {}", err);
        "Invalid JWT token".to_string()
    })?;
    let user_id = claims.user_id().ok_or("Invalid user ID in JWT")?;

    let cache = req
        .app_data::<web::Data<Arc<dyn ObjectCache>>>()
        .map(|data| data.get_ref().clone());
    let key = user_cache_key(user_id);

    if let Some(cache) = &cache
        && let Some(user) = cache.get_json::<entities::User>(&key).await
    {
        return Ok(user);
    }

    let user = storage
        .get_user_by_id(user_id)
        .await
        .map_err(|_| "Failed to retrieve user from storage".to_string())?
        .ok_or("User not found")?;
    if user.status != entities::UserStatus::Active {
        return Err(format!("User is {}", user.status));
    }

    if let Some(cache) = &cache {
        cache
            .insert_json(key, &user, AppConfig::get().cache.default_ttl)
            .await;
    }
    Ok(user)
}

impl<S, B> Transform<S, ServiceRequest> for RequireJWT
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireJWTMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireJWTMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RequireJWTMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireJWTMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        Box::pin(async move {
            // 处理 OPTIONS 请求
            if req.method() == actix_web::http::Method::OPTIONS {
                return Ok(req.into_response(HttpResponse::NoContent().finish().map_into_right_body()));
            }

            let Some(storage) = req
                .app_data::<web::Data<Arc<dyn Storage>>>()
                .map(|data| data.get_ref().clone())
            else {
                return Ok(req.into_response(
                    create_error_response(
                        StatusCode::INTERNAL_SERVER_ERROR,
                        ErrorCode::InternalServerError,
                        "Storage not configured",
                    )
                    .map_into_right_body(),
                ));
            };

            // 验证 JWT token
            match authenticate(&req, &storage).await {
                Ok(user) => {
                    debug!("JWT authentication successful for ID: {}", user.id);
                    req.extensions_mut().insert(user);
                    let res = srv.call(req).await?.map_into_left_body();
                    Ok(res)
                }
                Err(err) => {
                    info!(
                        "JWT authentication failed for request to {}: {}",
                        req.path(),
                        err
                    );
                    let ua = req
                        .headers()
                        .get(USER_AGENT)
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or("unknown")
                        .to_string();
                    let peer = req.peer_addr().map(|addr| addr.ip().to_string());
                    let ip = crate::utils::resolve_client_ip(req.headers(), peer.as_deref());
                    log_activity(
                        &storage,
                        "warning",
                        format!("Unauthorized access to {} by IP {} UA {}", req.path(), ip, ua),
                        None,
                        Some(req.request()),
                    )
                    .await;
                    Ok(req.into_response(
                        create_error_response(
                            StatusCode::UNAUTHORIZED,
                            ErrorCode::Unauthorized,
                            &format!("Unauthorized: {err}"),
                        )
                        .map_into_right_body(),
                    ))
                }
            }
        })
    }
}

impl RequireJWT {
    /// 仅在 RequireJWT 保护的路由内有值
    pub fn extract_user_claims(req: &actix_web::HttpRequest) -> Option<entities::User> {
        req.extensions().get::<entities::User>().cloned()
    }

    pub fn extract_user_id(req: &actix_web::HttpRequest) -> Option<i64> {
        req.extensions().get::<entities::User>().map(|user| user.id)
    }
}
