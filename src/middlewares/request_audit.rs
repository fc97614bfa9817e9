/*!
 * 请求审计中间件
 *
 * 为每个请求分配 UUID v4 请求 ID（写入请求扩展并通过 `X-Request-Id` 回显），
 * 请求结束后在 `security_audit` 目标上输出一行 JSON：
 * `ts, rid, method, path, ip, ua, user_id, status, error, duration_ms`。
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    dev::{ServiceRequest, ServiceResponse},
    http::header::{HeaderName, HeaderValue, USER_AGENT},
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use serde_json::json;
use std::rc::Rc;
use std::time::Instant;

use crate::models::users::entities::User;
use crate::utils::resolve_client_ip;

pub const AUDIT_TARGET: &str = "security_audit";
const REQUEST_ID_HEADER: &str = "x-request-id";
const MAX_UA_LEN: usize = 200;

/// 当前请求的 ID
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// 截断 User-Agent
pub fn truncate_ua(ua: &str) -> String {
    ua.chars().take(MAX_UA_LEN).collect()
}

fn user_agent(req: &ServiceRequest) -> String {
    req.headers()
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(truncate_ua)
        .unwrap_or_default()
}

fn client_ip(req: &ServiceRequest) -> String {
    let peer = req.peer_addr().map(|addr| addr.ip().to_string());
    resolve_client_ip(req.headers(), peer.as_deref())
}

/// 记录一条安全事件（限流、拦截等）
pub fn log_security_event(event: &str, req: &ServiceRequest, details: serde_json::Value) {
    let rid = req
        .extensions()
        .get::<RequestId>()
        .map(|id| id.0.clone());
    let line = json!({
        "ts": chrono::Utc::now().to_rfc3339(),
        "event": event,
        "rid": rid,
        "method": req.method().as_str(),
        "path": req.path(),
        "ip": client_ip(req),
        "ua": user_agent(req),
        "details": details,
    });
    tracing::warn!(target: AUDIT_TARGET, "{}", line);
}

#[derive(Clone, Default)]
pub struct RequestAudit;

impl<S, B> Transform<S, ServiceRequest> for RequestAudit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestAuditMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestAuditMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RequestAuditMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequestAuditMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
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
            let started = Instant::now();
            let rid = uuid::Uuid::new_v4().to_string();
            req.extensions_mut().insert(RequestId(rid.clone()));

            let method = req.method().to_string();
            let path = req.path().to_string();
            let ip = client_ip(&req);
            let ua = user_agent(&req);

            let result = srv.call(req).await;

            let (status, error, user_id) = match &result {
                Ok(res) => (
                    res.status().as_u16(),
                    res.response().error().map(|e| e.to_string()),
                    res.request().extensions().get::<User>().map(|u| u.id),
                ),
                Err(e) => (
                    e.as_response_error().status_code().as_u16(),
                    Some(e.to_string()),
                    None,
                ),
            };

            let line = json!({
                "ts": chrono::Utc::now().to_rfc3339(),
                "rid": rid,
                "method": method,
                "path": path,
                "ip": ip,
                "ua": ua,
                "user_id": user_id,
                "status": status,
                "error": error,
                "duration_ms": started.elapsed().as_millis() as u64,
            });
            tracing::info!(target: AUDIT_TARGET, "{}", line);

            let mut res = result?;
            if let Ok(value) = HeaderValue::from_str(&rid) {
                res.headers_mut()
                    .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
            }
            Ok(res)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, HttpRequest, HttpResponse, test as actix_test, web};

    #[test]
    fn test_truncate_ua() {
        let long = "x".repeat(500);
        assert_eq!(truncate_ua(&long).len(), 200);
        assert_eq!(truncate_ua("curl/8"), "curl/8");
    }

    #[actix_web::test]
    async fn test_request_id_is_echoed_and_visible_to_handler() {
        let app = actix_test::init_service(App::new().wrap(RequestAudit).route(
            "/ping",
            web::get().to(|req: HttpRequest| async move {
                let rid = req
                    .extensions()
                    .get::<RequestId>()
                    .map(|r| r.0.clone())
                    .unwrap_or_default();
                HttpResponse::Ok().body(rid)
            }),
        ))
        .await;

        let resp = actix_test::call_service(&app, actix_test::TestRequest::get().uri("/ping").to_request()).await;
        let header = resp
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .unwrap();
        assert!(uuid::Uuid::parse_str(&header).is_ok());
        let body = actix_test::read_body(resp).await;
        assert_eq!(body.as_ref(), header.as_bytes());
    }
}
