/*!
 * 速率限制
 *
 * - [`SlidingWindowLimiter`]：按客户端键记录请求时刻的滑动窗口限流器，
 *   全局安全中间件与单路由限流共用。
 * - [`RateLimit`]：单路由限流中间件（登录、注册等敏感端点）。
 *
 * ## 使用方法
 *
 * ```rust,ignore
 * use actix_web::{web, App};
 * use crate::middlewares::rate_limit::RateLimit;
 *
 * App::new()
 *     .service(
 *         web::resource("/api/v1/auth/login")
 *             .wrap(RateLimit::login())  // 5次/分钟/IP
 *             .route(web::post().to(login_handler))
 *     )
 * ```
 *
 * ## 限制规则
 *
 * - 使用客户端 IP 作为限制键（见 `utils::client_ip::resolve_client_ip`）
 * - 被拒绝的请求不计入窗口
 * - 超过限制返回 429 Too Many Requests，并附带 Retry-After
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    http::header::CONTENT_TYPE,
};
use dashmap::DashMap;
use futures_util::future::{LocalBoxFuture, Ready, ready};
use once_cell::sync::Lazy;
use std::collections::VecDeque;
use std::rc::Rc;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::warn;

use crate::config::RateLimitThresholds;
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::resolve_client_ip;

pub const MINUTE: Duration = Duration::from_secs(60);
pub const HOUR: Duration = Duration::from_secs(3600);

/// 单个窗口的限额
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowRule {
    pub window: Duration,
    pub max_requests: u32,
}

/// 限流判定结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateDecision {
    pub allowed: bool,
    /// 被拒绝时距离可重试的秒数，允许时为 0
    pub retry_after: u64,
    /// 最短窗口的上限
    pub limit: u32,
    /// 最短窗口内剩余额度
    pub remaining: u32,
}

/// 滑动窗口限流器
///
/// 每个键保存一段按时间递增的请求时刻；DashMap 的分片锁保证同一键的检查与记录是原子的。
pub struct SlidingWindowLimiter {
    /// 按窗口从短到长排列；为空表示关闭限流
    rules: Vec<WindowRule>,
    entries: DashMap<String, VecDeque<Instant>>,
}

fn ceil_secs(d: Duration) -> u64 {
    let secs = d.as_secs() + u64::from(d.subsec_nanos() > 0);
    secs.max(1)
}

impl SlidingWindowLimiter {
    pub fn new(mut rules: Vec<WindowRule>) -> Self {
        rules.sort_by_key(|r| r.window);
        Self {
            rules,
            entries: DashMap::new(),
        }
    }

    /// 每分钟 + 每小时两级限额
    pub fn per_minute_and_hour(thresholds: RateLimitThresholds) -> Self {
        Self::new(vec![
            WindowRule {
                window: MINUTE,
                max_requests: thresholds.requests_per_minute,
            },
            WindowRule {
                window: HOUR,
                max_requests: thresholds.requests_per_hour,
            },
        ])
    }

    /// 关闭状态的限流器：所有请求放行
    pub fn disabled() -> Self {
        Self::new(Vec::new())
    }

    /// 根据配置构建（DISABLE_RATE_LIMITING 时返回关闭状态）
    pub fn from_thresholds(thresholds: Option<RateLimitThresholds>) -> Self {
        match thresholds {
            Some(t) => Self::per_minute_and_hour(t),
            None => Self::disabled(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        !self.rules.is_empty()
    }

    fn retention(&self) -> Duration {
        self.rules.last().map(|r| r.window).unwrap_or(Duration::ZERO)
    }

    /// 检查并记录一次请求
    pub fn check(&self, key: &str, now: Instant) -> RateDecision {
        let Some(first) = self.rules.first().copied() else {
            return RateDecision {
                allowed: true,
                retry_after: 0,
                limit: 0,
                remaining: 0,
            };
        };
        let retention = self.retention();

        let mut entry = self.entries.entry(key.to_string()).or_default();
        let instants = entry.value_mut();

        while let Some(oldest) = instants.front() {
            if now.saturating_duration_since(*oldest) >= retention {
                instants.pop_front();
            } else {
                break;
            }
        }

        let mut first_window_count = 0u32;
        for (idx, rule) in self.rules.iter().enumerate() {
            let in_window: Vec<&Instant> = instants
                .iter()
                .filter(|t| now.saturating_duration_since(**t) < rule.window)
                .collect();
            let count = in_window.len() as u32;
            if idx == 0 {
                first_window_count = count;
            }
            if count >= rule.max_requests {
                let retry_after = match in_window.first() {
                    Some(oldest) => {
                        ceil_secs(rule.window.saturating_sub(now.saturating_duration_since(**oldest)))
                    }
                    None => ceil_secs(rule.window),
                };
                return RateDecision {
                    allowed: false,
                    retry_after,
                    limit: first.max_requests,
                    remaining: 0,
                };
            }
        }

        instants.push_back(now);
        RateDecision {
            allowed: true,
            retry_after: 0,
            limit: first.max_requests,
            remaining: first.max_requests.saturating_sub(first_window_count + 1),
        }
    }

    /// 清理最新请求也已超出最长窗口的键，返回清理数量
    pub fn purge_idle(&self, now: Instant) -> usize {
        let retention = self.retention();
        let before = self.entries.len();
        self.entries.retain(|_, instants| match instants.back() {
            Some(newest) => now.saturating_duration_since(*newest) < retention,
            None => false,
        });
        before - self.entries.len()
    }

    pub fn tracked_keys(&self) -> usize {
        self.entries.len()
    }
}

/// 登录端点限流器：5次/分钟/IP
static LOGIN_LIMITER: Lazy<Arc<SlidingWindowLimiter>> = Lazy::new(|| {
    Arc::new(SlidingWindowLimiter::new(vec![WindowRule {
        window: MINUTE,
        max_requests: 5,
    }]))
});

/// 注册端点限流器：3次/分钟/IP
static REGISTER_LIMITER: Lazy<Arc<SlidingWindowLimiter>> = Lazy::new(|| {
    Arc::new(SlidingWindowLimiter::new(vec![WindowRule {
        window: MINUTE,
        max_requests: 3,
    }]))
});

/// 单路由限流中间件
#[derive(Clone)]
pub struct RateLimit {
    limiter: Arc<SlidingWindowLimiter>,
    /// 限制键前缀（用于区分不同端点）
    key_prefix: String,
}

impl RateLimit {
    /// 创建新的速率限制器
    ///
    /// # 参数
    /// - `max_requests`: 时间窗口内允许的最大请求数
    /// - `window_secs`: 时间窗口（秒）
    pub fn new(max_requests: u32, window_secs: u64) -> Self {
        Self {
            limiter: Arc::new(SlidingWindowLimiter::new(vec![WindowRule {
                window: Duration::from_secs(window_secs),
                max_requests,
            }])),
            key_prefix: String::new(),
        }
    }

    /// 设置限制键前缀
    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.key_prefix = prefix.to_string();
        self
    }

    /// 登录端点限制：5次/分钟/IP
    pub fn login() -> Self {
        Self {
            limiter: LOGIN_LIMITER.clone(),
            key_prefix: "login".to_string(),
        }
    }

    /// 注册端点限制（家长、教师注册共用）：3次/分钟/IP
    pub fn register() -> Self {
        Self {
            limiter: REGISTER_LIMITER.clone(),
            key_prefix: "register".to_string(),
        }
    }

    /// 刷新令牌限制：10次/分钟/IP
    pub fn refresh_token() -> Self {
        Self::new(10, 60).with_prefix("refresh")
    }

    /// 注册密钥查询限制：10次/分钟/IP（防止暴力枚举）
    pub fn secret_key_lookup() -> Self {
        Self::new(10, 60).with_prefix("secret_key")
    }
}

/// 创建速率限制错误响应
fn create_rate_limit_response(retry_after: u64) -> HttpResponse {
    HttpResponse::build(StatusCode::TOO_MANY_REQUESTS)
        .insert_header((CONTENT_TYPE, "application/json; charset=utf-8"))
        .insert_header(("Retry-After", retry_after.to_string()))
        .insert_header(("X-RateLimit-Remaining", "0"))
        .json(ApiResponse::<()>::error_empty(
            ErrorCode::RateLimitExceeded,
            format!("Too many requests. Try again in {retry_after} seconds."),
        ))
}

impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddleware {
            service: Rc::new(service),
            limiter: self.limiter.clone(),
            key_prefix: self.key_prefix.clone(),
        }))
    }
}

pub struct RateLimitMiddleware<S> {
    service: Rc<S>,
    limiter: Arc<SlidingWindowLimiter>,
    key_prefix: String,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddleware<S>
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
        let key_prefix = self.key_prefix.clone();

        Box::pin(async move {
            let peer = req.peer_addr().map(|addr| addr.ip().to_string());
            let client = resolve_client_ip(req.headers(), peer.as_deref());
            let cache_key = if key_prefix.is_empty() {
                format!("ip:{client}")
            } else {
                format!("{key_prefix}:ip:{client}")
            };

            let decision = limiter.check(&cache_key, Instant::now());
            if !decision.allowed {
                warn!(
                    "Rate limit exceeded for key: {} (retry after {}s)",
                    cache_key, decision.retry_after
                );
                return Ok(req.into_response(
                    create_rate_limit_response(decision.retry_after).map_into_right_body(),
                ));
            }

            req.extensions_mut().insert(RateLimitInfo {
                remaining: decision.remaining,
                limit: decision.limit,
            });

            let res = srv.call(req).await?.map_into_left_body();
            Ok(res)
        })
    }
}

/// 当前请求的限流额度（供后续处理读取）
#[derive(Debug, Clone, Copy)]
pub struct RateLimitInfo {
    pub remaining: u32,
    pub limit: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, test as actix_test, web};

    fn limiter(per_minute: u32, per_hour: u32) -> SlidingWindowLimiter {
        SlidingWindowLimiter::per_minute_and_hour(RateLimitThresholds {
            requests_per_minute: per_minute,
            requests_per_hour: per_hour,
        })
    }

    #[test]
    fn test_minute_limit_and_retry_after() {
        let limiter = limiter(3, 100);
        let start = Instant::now();
        for i in 0..3 {
            let d = limiter.check("a", start + Duration::from_secs(i));
            assert!(d.allowed);
            assert_eq!(d.remaining, 2 - i as u32);
        }
        let denied = limiter.check("a", start + Duration::from_secs(10));
        assert!(!denied.allowed);
        // 最早的请求在 start，60 秒后离开窗口
        assert_eq!(denied.retry_after, 50);

        // 其他键不受影响
        assert!(limiter.check("b", start + Duration::from_secs(10)).allowed);

        // 窗口滑过最早一次后恢复
        assert!(limiter.check("a", start + Duration::from_secs(60)).allowed);
    }

    #[test]
    fn test_denied_requests_are_not_recorded() {
        let limiter = limiter(1, 100);
        let start = Instant::now();
        assert!(limiter.check("k", start).allowed);
        for i in 1..20 {
            assert!(!limiter.check("k", start + Duration::from_secs(i)).allowed);
        }
        assert!(limiter.check("k", start + Duration::from_secs(60)).allowed);
    }

    #[test]
    fn test_hour_limit() {
        let limiter = limiter(100, 2);
        let start = Instant::now();
        assert!(limiter.check("h", start).allowed);
        assert!(limiter.check("h", start + Duration::from_secs(120)).allowed);
        let denied = limiter.check("h", start + Duration::from_secs(600));
        assert!(!denied.allowed);
        assert_eq!(denied.retry_after, 3000);
        assert!(limiter.check("h", start + HOUR).allowed);
    }

    #[test]
    fn test_retry_after_is_at_least_one_second() {
        let limiter = limiter(1, 100);
        let start = Instant::now();
        assert!(limiter.check("r", start).allowed);
        let denied = limiter.check("r", start + Duration::from_millis(59_900));
        assert!(!denied.allowed);
        assert_eq!(denied.retry_after, 1);
    }

    #[test]
    fn test_disabled_limiter_allows_everything() {
        let limiter = SlidingWindowLimiter::from_thresholds(None);
        assert!(!limiter.is_enabled());
        let now = Instant::now();
        for _ in 0..1000 {
            let d = limiter.check("x", now);
            assert!(d.allowed);
            assert_eq!(d.retry_after, 0);
        }
        assert_eq!(limiter.tracked_keys(), 0);
    }

    #[test]
    fn test_purge_idle_keys() {
        let limiter = limiter(10, 100);
        let start = Instant::now();
        limiter.check("old", start);
        limiter.check("fresh", start + Duration::from_secs(3000));
        assert_eq!(limiter.tracked_keys(), 2);
        let purged = limiter.purge_idle(start + HOUR + Duration::from_secs(1));
        assert_eq!(purged, 1);
        assert_eq!(limiter.tracked_keys(), 1);
    }

    #[test]
    fn test_rate_limit_presets() {
        assert_eq!(
            LOGIN_LIMITER.rules,
            vec![WindowRule {
                window: MINUTE,
                max_requests: 5
            }]
        );
        assert_eq!(RateLimit::login().key_prefix, "login");
        assert_eq!(REGISTER_LIMITER.rules[0].max_requests, 3);
        assert_eq!(RateLimit::register().key_prefix, "register");
        assert_eq!(RateLimit::refresh_token().limiter.rules[0].max_requests, 10);
    }

    #[actix_web::test]
    async fn test_route_limiter_returns_429() {
        let app = actix_test::init_service(
            App::new().service(
                web::resource("/login")
                    .wrap(RateLimit::new(2, 60).with_prefix("test"))
                    .route(web::post().to(HttpResponse::Ok)),
            ),
        )
        .await;

        for _ in 0..2 {
            let req = actix_test::TestRequest::post()
                .uri("/login")
                .insert_header(("X-Real-IP", "203.0.113.9"))
                .to_request();
            assert_eq!(actix_test::call_service(&app, req).await.status(), StatusCode::OK);
        }
        let req = actix_test::TestRequest::post()
            .uri("/login")
            .insert_header(("X-Real-IP", "203.0.113.9"))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
        assert!(resp.headers().contains_key("Retry-After"));

        // 不同客户端独立计数
        let req = actix_test::TestRequest::post()
            .uri("/login")
            .insert_header(("X-Real-IP", "203.0.113.10"))
            .to_request();
        assert_eq!(actix_test::call_service(&app, req).await.status(), StatusCode::OK);
    }
}
