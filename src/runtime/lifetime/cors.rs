use actix_cors::Cors;

use crate::config::CorsConfig;

const ANY: &str = "*";

fn allows_any(values: &[String]) -> bool {
    values.is_empty() || values.iter().any(|v| v == ANY)
}

/// 列表为空或含 `*` 时放开该项
pub fn build_cors(config: &CorsConfig) -> Cors {
    let mut cors = Cors::default().max_age(config.max_age);

    if allows_any(&config.allowed_origins) {
        cors = cors.allow_any_origin();
    } else {
        // 刷新令牌 cookie 需要携带凭据，只对明确列出的来源开放
        cors = cors.supports_credentials();
        for origin in &config.allowed_origins {
            cors = cors.allowed_origin(origin);
        }
    }

    if allows_any(&config.allowed_methods) {
        cors = cors.allow_any_method();
    } else {
        cors = cors.allowed_methods(config.allowed_methods.iter().map(String::as_str));
    }

    if allows_any(&config.allowed_headers) {
        cors.allow_any_header()
    } else {
        cors.allowed_headers(config.allowed_headers.iter().map(String::as_str))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::{StatusCode, header};
    use actix_web::{App, HttpResponse, test as actix_test, web};

    fn config(origins: &[&str]) -> CorsConfig {
        CorsConfig {
            allowed_origins: origins.iter().map(|s| s.to_string()).collect(),
            allowed_methods: vec!["GET".into(), "POST".into()],
            allowed_headers: vec!["Authorization".into(), "Content-Type".into()],
            max_age: 600,
        }
    }

    #[actix_web::test]
    async fn test_configured_origin_is_echoed() {
        let app = actix_test::init_service(
            App::new()
                .wrap(build_cors(&config(&["http://localhost:3000"])))
                .route("/ping", web::get().to(HttpResponse::Ok)),
        )
        .await;

        let req = actix_test::TestRequest::get()
            .uri("/ping")
            .insert_header((header::ORIGIN, "http://localhost:3000"))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "http://localhost:3000"
        );
    }

    #[test]
    fn test_wildcard_detection() {
        assert!(allows_any(&[]));
        assert!(allows_any(&["*".to_string()]));
        assert!(!allows_any(&["http://a.test".to_string()]));
    }
}
