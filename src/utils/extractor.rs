//! 安全的路径参数提取器
//!
//! 对 `{id}` 路径段做格式与范围校验，失败时直接返回统一的 400 响应。

use actix_web::{
    FromRequest, HttpRequest, HttpResponse, ResponseError, dev::Payload, http::StatusCode,
};
use futures_util::future::{Ready, ready};
use std::fmt;

use crate::models::{ApiResponse, ErrorCode};

#[derive(Debug)]
pub struct PathParamError {
    name: &'static str,
    message: String,
}

impl fmt::Display for PathParamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid path parameter '{}': {}", self.name, self.message)
    }
}

impl ResponseError for PathParamError {
    fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::BadRequest().json(ApiResponse::<()>::error_empty(
            ErrorCode::BadRequest,
            self.to_string(),
        ))
    }
}

/// 解析正整数 ID
pub fn parse_positive_id(name: &'static str, raw: Option<&str>) -> Result<i64, PathParamError> {
    let raw = raw.ok_or_else(|| PathParamError {
        name,
        message: "missing".to_string(),
    })?;
    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(PathParamError {
            name,
            message: format!("'{raw}' is not a positive integer"),
        }),
    }
}

macro_rules! define_safe_id {
    ($name:ident, $param:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $name(pub i64);

        impl FromRequest for $name {
            type Error = PathParamError;
            type Future = Ready<Result<Self, Self::Error>>;

            fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
                ready(parse_positive_id($param, req.match_info().get($param)).map($name))
            }
        }
    };
}

define_safe_id!(SafeIDI64, "id");
define_safe_id!(SafeEntryIdI64, "entry_id");
define_safe_id!(SafeUserIdI64, "user_id");

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, HttpResponse, test as actix_test, web};

    #[test]
    fn test_parse_positive_id() {
        assert_eq!(parse_positive_id("id", Some("42")).unwrap(), 42);
        assert!(parse_positive_id("id", Some("0")).is_err());
        assert!(parse_positive_id("id", Some("-3")).is_err());
        assert!(parse_positive_id("id", Some("abc")).is_err());
        assert!(parse_positive_id("id", None).is_err());
    }

    #[actix_web::test]
    async fn test_safe_id_extractor() {
        let app = actix_test::init_service(App::new().route(
            "/items/{id}",
            web::get().to(|id: SafeIDI64| async move { HttpResponse::Ok().body(id.0.to_string()) }),
        ))
        .await;

        let resp = actix_test::call_service(&app, actix_test::TestRequest::get().uri("/items/7").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = actix_test::read_body(resp).await;
        assert_eq!(body.as_ref(), b"7");

        let resp =
            actix_test::call_service(&app, actix_test::TestRequest::get().uri("/items/x1").to_request()).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
