//! 操作日志
//!
//! `log_activity` 供其他服务与中间件调用，写入失败只记录日志，不影响调用方。

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::header::USER_AGENT};
use serde_json::json;
use std::sync::Arc;
use tracing::warn;

use crate::middlewares::request_audit::truncate_ua;
use crate::models::activity::{entities::NewActivityLog, requests::ActivityLogListParams};
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;
use crate::utils::ClientIpInfo;

pub struct ActivityService {
    storage: Option<Arc<dyn Storage>>,
}

impl ActivityService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    // 分页查询操作日志
    pub async fn list_logs(
        &self,
        query: ActivityLogListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;

        match storage.list_activity_logs(query).await {
            Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                response,
                "Activity logs retrieved successfully",
            ))),
            Err(e) => Ok(super::error_response(&e, ErrorCode::InternalServerError)),
        }
    }
}

/// 根据请求构造日志条目
pub fn build_entry(
    category: &str,
    message: String,
    user_id: Option<i64>,
    request: Option<&HttpRequest>,
) -> NewActivityLog {
    let mut entry = NewActivityLog {
        user_id,
        category: category.to_string(),
        message,
        ..Default::default()
    };

    let Some(req) = request else {
        entry.additional_data = Some(
            json!({ "timestamp": chrono::Utc::now().to_rfc3339() }).to_string(),
        );
        return entry;
    };

    let peer = req.peer_addr().map(|addr| addr.ip().to_string());
    let info = ClientIpInfo::resolve(req.headers(), peer.as_deref());

    entry.user_agent = req
        .headers()
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(truncate_ua);
    entry.additional_data = Some(
        json!({
            "headers": info.headers_json(),
            "path": req.path(),
            "method": req.method().as_str(),
            "timestamp": chrono::Utc::now().to_rfc3339(),
        })
        .to_string(),
    );
    entry.ip_address = info.primary_ip;
    entry.ip_type = info.ip_type.map(|t| t.as_str().to_string());
    entry.remote_addr = info.remote_addr;
    entry.x_forwarded_for = info.x_forwarded_for;
    entry.x_real_ip = info.x_real_ip;
    entry.x_client_ip = info.x_client_ip;
    entry
}

/// 写入一条操作日志
///
/// 条目在调用时同步构造，返回的 future 不持有请求，可在后台任务中使用。
pub fn log_activity<'a>(
    storage: &'a Arc<dyn Storage>,
    category: &str,
    message: impl Into<String>,
    user_id: Option<i64>,
    request: Option<&HttpRequest>,
) -> impl Future<Output = ()> + Send + 'a {
    let entry = build_entry(category, message.into(), user_id, request);
    async move {
        if let Err(e) = storage.create_activity_log(entry).await {
            warn!("Failed to write activity log: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_entry_without_request_has_timestamp_only() {
        let entry = build_entry("system", "boot".into(), None, None);
        assert_eq!(entry.category, "system");
        assert!(entry.ip_address.is_none());
        let data: serde_json::Value =
            serde_json::from_str(entry.additional_data.as_deref().unwrap()).unwrap();
        assert!(data.get("timestamp").is_some());
        assert!(data.get("path").is_none());
    }

    #[test]
    fn test_entry_captures_forwarding_headers() {
        let req = TestRequest::post()
            .uri("/api/v1/auth/login")
            .insert_header(("X-Forwarded-For", "203.0.113.9, 10.0.0.1"))
            .insert_header(("X-Real-IP", "127.0.0.1"))
            .insert_header((USER_AGENT, "Mozilla/5.0"))
            .peer_addr("10.1.1.1:4000".parse().unwrap())
            .to_http_request();

        let entry = build_entry("login", "User logged in".into(), Some(7), Some(&req));
        assert_eq!(entry.user_id, Some(7));
        assert_eq!(entry.ip_address.as_deref(), Some("203.0.113.9"));
        assert_eq!(entry.ip_type.as_deref(), Some("public"));
        assert_eq!(entry.remote_addr.as_deref(), Some("10.1.1.1"));
        assert_eq!(entry.x_real_ip.as_deref(), Some("127.0.0.1"));
        assert_eq!(entry.user_agent.as_deref(), Some("Mozilla/5.0"));

        let data: serde_json::Value =
            serde_json::from_str(entry.additional_data.as_deref().unwrap()).unwrap();
        assert_eq!(data["path"], "/api/v1/auth/login");
        assert_eq!(data["method"], "POST");
        assert_eq!(data["headers"]["X-Forwarded-For"], "203.0.113.9, 10.0.0.1");
    }
}
