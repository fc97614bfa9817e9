//! 健康检查与后台维护任务

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::middlewares::SlidingWindowLimiter;

pub const SERVICE_NAME: &str = "school-management-api";

const FEATURES: &[&str] = &[
    "authentication",
    "onboarding",
    "students",
    "teachers",
    "parents",
    "classrooms",
    "subjects",
    "attendance",
    "fees",
    "timetable",
    "leaves",
    "complaints",
    "notifications",
    "messages",
    "activity_log",
];

#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub timestamp: String,
    pub version: &'static str,
    pub database: &'static str,
    pub rate_limiter: &'static str,
    pub security: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ApiHealth {
    pub status: &'static str,
    pub service: &'static str,
    pub timestamp: String,
    pub features: &'static [&'static str],
}

impl HealthReport {
    pub fn new(database_ok: bool, limiter_enabled: bool) -> Self {
        Self {
            status: "healthy",
            timestamp: chrono::Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION"),
            database: if database_ok { "connected" } else { "disconnected" },
            rate_limiter: if limiter_enabled { "active" } else { "disabled" },
            security: "enhanced",
        }
    }
}

impl ApiHealth {
    pub fn new() -> Self {
        Self {
            status: "ok",
            service: SERVICE_NAME,
            timestamp: chrono::Utc::now().to_rfc3339(),
            features: FEATURES,
        }
    }
}

impl Default for ApiHealth {
    fn default() -> Self {
        Self::new()
    }
}

pub struct SystemService;

impl SystemService {
    pub fn new_lazy() -> Self {
        Self
    }

    /// 探测数据库；数据库不可用时仍返回 200
    pub async fn health(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let storage = super::storage_from_request(request)?;
        let database_ok = match storage.ping().await {
            Ok(()) => true,
            Err(e) => {
                debug!("Health check failed: {}", e);
                false
            }
        };
        let limiter_enabled = request
            .app_data::<web::Data<Arc<SlidingWindowLimiter>>>()
            .is_some_and(|limiter| limiter.is_enabled());
        Ok(HttpResponse::Ok().json(HealthReport::new(database_ok, limiter_enabled)))
    }

    pub async fn api_health(&self) -> ActixResult<HttpResponse> {
        Ok(HttpResponse::Ok().json(ApiHealth::new()))
    }
}

/// 定期清理全局限流器中的空闲键
pub fn spawn_limiter_purge(
    limiter: Arc<SlidingWindowLimiter>,
    interval_secs: u64,
) -> Option<tokio::task::JoinHandle<()>> {
    if !limiter.is_enabled() {
        return None;
    }
    let period = Duration::from_secs(interval_secs.max(1));
    Some(tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        // 第一次 tick 立即完成
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let purged = limiter.purge_idle(Instant::now());
            if purged > 0 {
                info!(
                    "Purged {} idle rate-limit key(s), {} still tracked",
                    purged,
                    limiter.tracked_keys()
                );
            }
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_report_fields() {
        let json = serde_json::to_value(HealthReport::new(true, false)).unwrap();
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["database"], "connected");
        assert_eq!(json["rate_limiter"], "disabled");
        assert_eq!(json["security"], "enhanced");
        assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));

        let down = serde_json::to_value(HealthReport::new(false, true)).unwrap();
        assert_eq!(down["database"], "disconnected");
        assert_eq!(down["rate_limiter"], "active");
    }

    #[test]
    fn test_api_health_lists_features() {
        let json = serde_json::to_value(ApiHealth::new()).unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["service"], SERVICE_NAME);
        assert!(json["features"].as_array().unwrap().iter().any(|f| f == "fees"));
    }
}
