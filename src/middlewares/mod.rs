pub mod rate_limit;
pub mod request_audit;
pub mod require_jwt;
pub mod require_role;
pub mod security_guard;
pub mod security_headers;

use actix_web::{HttpResponse, http::StatusCode, http::header::CONTENT_TYPE};

use crate::models::{ApiResponse, ErrorCode};

pub use rate_limit::{RateLimit, SlidingWindowLimiter};
pub use request_audit::{RequestAudit, RequestId};
pub use require_jwt::{RequireJWT, forget_cached_user};
pub use require_role::RequireRole;
pub use security_guard::SecurityGuard;
pub use security_headers::SecurityHeaders;

// 辅助函数：创建统一格式的错误响应
pub(crate) fn create_error_response(
    status: StatusCode,
    code: ErrorCode,
    message: &str,
) -> HttpResponse {
    HttpResponse::build(status)
        .insert_header((CONTENT_TYPE, "application/json; charset=utf-8"))
        .json(ApiResponse::<()>::error_empty(code, message))
}
