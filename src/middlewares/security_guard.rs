/*!
 * 全局安全守卫中间件
 *
 * 处理顺序：全局限流 → 可疑 User-Agent → URL 长度 → 请求体大小。
 * `/static/` 前缀与 `/health` 路径不做任何检查。
 * 放行的请求在响应中附带 `X-RateLimit-Limit` / `X-RateLimit-Remaining`。
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpResponse,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::{
        Method, StatusCode,
        header::{CONTENT_LENGTH, HeaderName, HeaderValue, USER_AGENT},
    },
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use serde_json::json;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Instant;
use tracing::warn;

use super::rate_limit::{RateDecision, SlidingWindowLimiter};
use super::request_audit::{log_security_event, truncate_ua};
use crate::config::SecurityConfig;
use crate::utils::resolve_client_ip;

/// 守卫拒绝原因
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardRejection {
    RateLimited { retry_after: u64 },
    SuspiciousUserAgent,
    UrlTooLong,
    BodyTooLarge,
}

#[derive(Clone)]
pub struct SecurityGuard {
    limiter: Arc<SlidingWindowLimiter>,
    config: Arc<SecurityConfig>,
}

impl SecurityGuard {
    pub fn new(limiter: Arc<SlidingWindowLimiter>, config: SecurityConfig) -> Self {
        Self {
            limiter,
            config: Arc::new(config),
        }
    }
}

/// 路径是否豁免
pub fn is_exempt(config: &SecurityConfig, path: &str) -> bool {
    config.exempt_paths.iter().any(|p| p == path)
        || config
            .exempt_prefixes
            .iter()
            .any(|prefix| path.starts_with(prefix.as_str()))
}

/// 匹配到的可疑 User-Agent 片段
pub fn suspicious_pattern<'a>(config: &'a SecurityConfig, user_agent: &str) -> Option<&'a str> {
    let ua = user_agent.to_ascii_lowercase();
    config
        .blocked_user_agents
        .iter()
        .map(String::as_str)
        .find(|pattern| !pattern.is_empty() && ua.contains(&pattern.to_ascii_lowercase()))
}

fn rejection_response(rejection: &GuardRejection) -> HttpResponse {
    match rejection {
        GuardRejection::RateLimited { retry_after } => {
            let reset = chrono::Utc::now().timestamp() + *retry_after as i64;
            HttpResponse::build(StatusCode::TOO_MANY_REQUESTS)
                .insert_header(("Retry-After", retry_after.to_string()))
                .insert_header(("X-RateLimit-Reset", reset.to_string()))
                .json(json!({
                    "error": "Rate limit exceeded",
                    "retry_after": retry_after,
                    "message": format!("Too many requests. Try again in {retry_after} seconds."),
                }))
        }
        GuardRejection::SuspiciousUserAgent => {
            HttpResponse::Forbidden().json(json!({ "error": "Access denied" }))
        }
        GuardRejection::UrlTooLong => {
            HttpResponse::build(StatusCode::URI_TOO_LONG).json(json!({ "error": "Request too long" }))
        }
        GuardRejection::BodyTooLarge => {
            HttpResponse::PayloadTooLarge().json(json!({ "error": "Request too large" }))
        }
    }
}

fn full_url(req: &ServiceRequest) -> String {
    let info = req.connection_info();
    let path_and_query = req
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| req.path());
    format!("{}://{}{}", info.scheme(), info.host(), path_and_query)
}

/// 依次执行各项检查，返回限流结果或拒绝原因
fn inspect(
    req: &ServiceRequest,
    limiter: &SlidingWindowLimiter,
    config: &SecurityConfig,
) -> Result<Option<RateDecision>, GuardRejection> {
    let decision = if limiter.is_enabled() {
        let peer = req.peer_addr().map(|addr| addr.ip().to_string());
        let client = resolve_client_ip(req.headers(), peer.as_deref());
        let decision = limiter.check(&client, Instant::now());
        if !decision.allowed {
            warn!(
                "Global rate limit exceeded for {} on {} (retry after {}s)",
                client,
                req.path(),
                decision.retry_after
            );
            log_security_event(
                "RATE_LIMIT_EXCEEDED",
                req,
                json!({ "client": client, "retry_after": decision.retry_after }),
            );
            return Err(GuardRejection::RateLimited {
                retry_after: decision.retry_after,
            });
        }
        Some(decision)
    } else {
        None
    };

    let user_agent = req
        .headers()
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if let Some(pattern) = suspicious_pattern(config, user_agent) {
        log_security_event(
            "SUSPICIOUS_UA_BLOCKED",
            req,
            json!({ "pattern": pattern, "user_agent": truncate_ua(user_agent) }),
        );
        return Err(GuardRejection::SuspiciousUserAgent);
    }

    let url = full_url(req);
    if url.len() > config.max_url_length {
        log_security_event(
            "SUSPICIOUS_URL_BLOCKED",
            req,
            json!({ "url_length": url.len(), "max": config.max_url_length }),
        );
        return Err(GuardRejection::UrlTooLong);
    }

    if req.method() == Method::POST {
        let content_length = req
            .headers()
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok());
        if let Some(length) = content_length
            && length > config.max_body_size
        {
            log_security_event(
                "LARGE_REQUEST_BLOCKED",
                req,
                json!({ "content_length": length, "max": config.max_body_size }),
            );
            return Err(GuardRejection::BodyTooLarge);
        }
    }

    Ok(decision)
}

impl<S, B> Transform<S, ServiceRequest> for SecurityGuard
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = SecurityGuardMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SecurityGuardMiddleware {
            service: Rc::new(service),
            limiter: self.limiter.clone(),
            config: self.config.clone(),
        }))
    }
}

pub struct SecurityGuardMiddleware<S> {
    service: Rc<S>,
    limiter: Arc<SlidingWindowLimiter>,
    config: Arc<SecurityConfig>,
}

impl<S, B> Service<ServiceRequest> for SecurityGuardMiddleware<S>
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
        let limiter = self.limiter.clone();
        let config = self.config.clone();

        Box::pin(async move {
            if is_exempt(&config, req.path()) {
                return Ok(srv.call(req).await?.map_into_left_body());
            }

            let decision = match inspect(&req, &limiter, &config) {
                Ok(decision) => decision,
                Err(rejection) => {
                    return Ok(req.into_response(
                        rejection_response(&rejection).map_into_right_body(),
                    ));
                }
            };

            let mut res = srv.call(req).await?;
            if let Some(decision) = decision {
                let headers = res.headers_mut();
                headers.insert(
                    HeaderName::from_static("x-ratelimit-limit"),
                    HeaderValue::from(decision.limit),
                );
                headers.insert(
                    HeaderName::from_static("x-ratelimit-remaining"),
                    HeaderValue::from(decision.remaining),
                );
            }
            Ok(res.map_into_left_body())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RateLimitThresholds;
    use actix_web::{App, test as actix_test, web};

    fn guard(per_minute: u32) -> SecurityGuard {
        SecurityGuard::new(
            Arc::new(SlidingWindowLimiter::per_minute_and_hour(RateLimitThresholds {
                requests_per_minute: per_minute,
                requests_per_hour: 1000,
            })),
            SecurityConfig::default(),
        )
    }

    macro_rules! guarded_app {
        ($guard:expr) => {
            actix_test::init_service(
                App::new()
                    .wrap($guard)
                    .route("/api/items", web::get().to(HttpResponse::Ok))
                    .route("/api/items", web::post().to(HttpResponse::Ok))
                    .route("/health", web::get().to(HttpResponse::Ok))
                    .route("/static/app.js", web::get().to(HttpResponse::Ok)),
            )
            .await
        };
    }

    #[test]
    fn test_exempt_paths() {
        let config = SecurityConfig::default();
        assert!(is_exempt(&config, "/health"));
        assert!(is_exempt(&config, "/static/css/site.css"));
        assert!(!is_exempt(&config, "/health/deep"));
        assert!(!is_exempt(&config, "/api/health"));
    }

    #[test]
    fn test_suspicious_pattern_is_case_insensitive() {
        let config = SecurityConfig::default();
        assert_eq!(
            suspicious_pattern(&config, "Mozilla/5.0 (compatible; SQLMap/1.7)"),
            Some("sqlmap")
        );
        assert_eq!(suspicious_pattern(&config, "Mozilla/5.0 Firefox/128.0"), None);
    }

    #[actix_web::test]
    async fn test_rate_limit_headers_and_rejection() {
        let app = guarded_app!(guard(2));

        let req = actix_test::TestRequest::get()
            .uri("/api/items")
            .insert_header(("X-Real-IP", "198.51.100.1"))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers().get("x-ratelimit-limit").unwrap(), "2");
        assert_eq!(resp.headers().get("x-ratelimit-remaining").unwrap(), "1");

        let req = actix_test::TestRequest::get()
            .uri("/api/items")
            .insert_header(("X-Real-IP", "198.51.100.1"))
            .to_request();
        assert_eq!(actix_test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = actix_test::TestRequest::get()
            .uri("/api/items")
            .insert_header(("X-Real-IP", "198.51.100.1"))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
        assert!(resp.headers().contains_key("Retry-After"));
        assert!(resp.headers().contains_key("X-RateLimit-Reset"));
        let body: serde_json::Value = actix_test::read_body_json(resp).await;
        assert_eq!(body["error"], "Rate limit exceeded");
        assert!(body["retry_after"].as_u64().unwrap() >= 1);

        // 豁免路径不受限流影响
        for _ in 0..5 {
            let req = actix_test::TestRequest::get()
                .uri("/health")
                .insert_header(("X-Real-IP", "198.51.100.1"))
                .to_request();
            assert_eq!(actix_test::call_service(&app, req).await.status(), StatusCode::OK);
        }
    }

    #[actix_web::test]
    async fn test_rejections_carry_cors_headers_when_cors_is_outside() {
        let cors = crate::runtime::lifetime::cors::build_cors(&crate::config::CorsConfig {
            allowed_origins: vec!["*".into()],
            allowed_methods: vec!["*".into()],
            allowed_headers: vec!["*".into()],
            max_age: 600,
        });
        let app = actix_test::init_service(
            App::new()
                .wrap(guard(1))
                .wrap(cors)
                .route("/api/items", web::get().to(HttpResponse::Ok)),
        )
        .await;

        // 预检不计入限流
        for _ in 0..3 {
            let req = actix_test::TestRequest::default()
                .method(actix_web::http::Method::OPTIONS)
                .uri("/api/items")
                .insert_header(("Origin", "http://localhost:5173"))
                .insert_header(("Access-Control-Request-Method", "GET"))
                .insert_header(("X-Real-IP", "198.51.100.7"))
                .to_request();
            let resp = actix_test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::OK);
        }

        let get = || {
            actix_test::TestRequest::get()
                .uri("/api/items")
                .insert_header(("Origin", "http://localhost:5173"))
                .insert_header(("X-Real-IP", "198.51.100.7"))
                .to_request()
        };
        assert_eq!(actix_test::call_service(&app, get()).await.status(), StatusCode::OK);

        let resp = actix_test::call_service(&app, get()).await;
        assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
        assert!(resp.headers().contains_key("access-control-allow-origin"));
    }

    #[actix_web::test]
    async fn test_blocks_scanner_user_agent() {
        let app = guarded_app!(guard(100));
        let req = actix_test::TestRequest::get()
            .uri("/api/items")
            .insert_header(("User-Agent", "Nikto/2.5.0"))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        let body: serde_json::Value = actix_test::read_body_json(resp).await;
        assert_eq!(body["error"], "Access denied");

        // 静态资源豁免
        let req = actix_test::TestRequest::get()
            .uri("/static/app.js")
            .insert_header(("User-Agent", "Nikto/2.5.0"))
            .to_request();
        assert_eq!(actix_test::call_service(&app, req).await.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_blocks_long_url() {
        let app = guarded_app!(guard(100));
        let uri = format!("/api/items?q={}", "a".repeat(2100));
        let req = actix_test::TestRequest::get().uri(&uri).to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::URI_TOO_LONG);
    }

    #[actix_web::test]
    async fn test_blocks_large_post_body() {
        let app = guarded_app!(guard(100));
        let req = actix_test::TestRequest::post()
            .uri("/api/items")
            .insert_header(("Content-Length", "10485761"))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);

        let req = actix_test::TestRequest::post()
            .uri("/api/items")
            .insert_header(("Content-Length", "10485760"))
            .to_request();
        assert_eq!(actix_test::call_service(&app, req).await.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_disabled_limiter_adds_no_headers() {
        let guard = SecurityGuard::new(
            Arc::new(SlidingWindowLimiter::disabled()),
            SecurityConfig::default(),
        );
        let app = guarded_app!(guard);
        for _ in 0..10 {
            let resp =
                actix_test::call_service(&app, actix_test::TestRequest::get().uri("/api/items").to_request())
                    .await;
            assert_eq!(resp.status(), StatusCode::OK);
            assert!(resp.headers().get("x-ratelimit-limit").is_none());
        }
    }
}
