/*!
 * 安全响应头中间件
 *
 * 对所有响应追加固定的安全头；HTTPS 请求或开启 `force_hsts` 时附加 HSTS；
 * HTML 响应额外禁用缓存。
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error,
    dev::{ServiceRequest, ServiceResponse},
    http::header::{CACHE_CONTROL, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue, PRAGMA},
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use std::sync::Arc;

const STATIC_HEADERS: &[(&str, &str)] = &[
    ("x-content-type-options", "nosniff"),
    ("x-frame-options", "DENY"),
    ("x-permitted-cross-domain-policies", "none"),
    ("referrer-policy", "strict-origin-when-cross-origin"),
    ("x-xss-protection", "1; mode=block"),
    (
        "permissions-policy",
        "geolocation=(), microphone=(), camera=(), payment=(), usb=()",
    ),
];
const HSTS_VALUE: &str = "max-age=31536000; includeSubDomains; preload";
const HTML_CACHE_CONTROL: &str = "no-store, no-cache, must-revalidate, max-age=0";

#[derive(Clone)]
pub struct SecurityHeaders {
    force_hsts: bool,
    csp: Option<Arc<str>>,
}

impl SecurityHeaders {
    pub fn new(force_hsts: bool, content_security_policy: &str) -> Self {
        let csp = content_security_policy.trim();
        Self {
            force_hsts,
            csp: (!csp.is_empty()).then(|| Arc::from(csp)),
        }
    }

    pub fn from_config(config: &crate::config::SecurityConfig) -> Self {
        Self::new(config.force_hsts, &config.content_security_policy)
    }
}

fn apply_headers(headers: &mut HeaderMap, hsts: bool, csp: Option<&str>) {
    for &(name, value) in STATIC_HEADERS {
        headers.insert(
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        );
    }
    if hsts {
        headers.insert(
            HeaderName::from_static("strict-transport-security"),
            HeaderValue::from_static(HSTS_VALUE),
        );
    }
    if let Some(csp) = csp
        && let Ok(value) = HeaderValue::from_str(csp)
    {
        headers.insert(HeaderName::from_static("content-security-policy"), value);
    }

    let is_html = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.contains("text/html"));
    if is_html {
        headers.insert(CACHE_CONTROL, HeaderValue::from_static(HTML_CACHE_CONTROL));
        headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));
    }
}

impl<S, B> Transform<S, ServiceRequest> for SecurityHeaders
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = SecurityHeadersMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SecurityHeadersMiddleware {
            service: Rc::new(service),
            force_hsts: self.force_hsts,
            csp: self.csp.clone(),
        }))
    }
}

pub struct SecurityHeadersMiddleware<S> {
    service: Rc<S>,
    force_hsts: bool,
    csp: Option<Arc<str>>,
}

impl<S, B> Service<ServiceRequest> for SecurityHeadersMiddleware<S>
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
        let hsts = self.force_hsts || req.connection_info().scheme() == "https";
        let csp = self.csp.clone();

        Box::pin(async move {
            let mut res = srv.call(req).await?;
            apply_headers(res.headers_mut(), hsts, csp.as_deref());
            Ok(res)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, HttpResponse, http::StatusCode, test as actix_test, web};

    #[actix_web::test]
    async fn test_headers_on_json_response() {
        let app = actix_test::init_service(
            App::new()
                .wrap(SecurityHeaders::new(true, "default-src 'self'"))
                .route(
                    "/json",
                    web::get().to(|| async { HttpResponse::Ok().json(serde_json::json!({})) }),
                ),
        )
        .await;

        let resp = actix_test::call_service(&app, actix_test::TestRequest::get().uri("/json").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let h = resp.headers();
        assert_eq!(h.get("x-frame-options").unwrap(), "DENY");
        assert_eq!(h.get("x-content-type-options").unwrap(), "nosniff");
        assert_eq!(h.get("strict-transport-security").unwrap(), HSTS_VALUE);
        assert_eq!(h.get("content-security-policy").unwrap(), "default-src 'self'");
        assert!(h.get(PRAGMA).is_none());
    }

    #[actix_web::test]
    async fn test_html_gets_no_cache_and_plain_http_skips_hsts() {
        let app = actix_test::init_service(App::new().wrap(SecurityHeaders::new(false, "")).route(
            "/page",
            web::get().to(|| async {
                HttpResponse::Ok()
                    .content_type("text/html; charset=utf-8")
                    .body("<p>hi</p>")
            }),
        ))
        .await;

        let resp = actix_test::call_service(&app, actix_test::TestRequest::get().uri("/page").to_request()).await;
        let h = resp.headers();
        assert_eq!(h.get(CACHE_CONTROL).unwrap(), HTML_CACHE_CONTROL);
        assert_eq!(h.get(PRAGMA).unwrap(), "no-cache");
        assert!(h.get("strict-transport-security").is_none());
        assert!(h.get("content-security-policy").is_none());
    }

    #[actix_web::test]
    async fn test_error_responses_are_covered() {
        let app = actix_test::init_service(App::new().wrap(SecurityHeaders::new(false, "")).route(
            "/missing",
            web::get().to(|| async { HttpResponse::NotFound().finish() }),
        ))
        .await;
        let resp =
            actix_test::call_service(&app, actix_test::TestRequest::get().uri("/missing").to_request()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            resp.headers().get("referrer-policy").unwrap(),
            "strict-origin-when-cross-origin"
        );
    }
}
