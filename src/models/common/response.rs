use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::ErrorCode;

/// 所有接口共用的响应外壳
///
/// `success` 与 `code == 0` 等价，便于前端直接判断。
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/api.ts")]
pub struct ApiResponse<T: TS> {
    pub success: bool,
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl<T: TS> ApiResponse<T> {
    fn build(code: ErrorCode, data: Option<T>, message: String) -> Self {
        let code = code as i32;
        Self {
            success: code == ErrorCode::Success as i32,
            code,
            message,
            data,
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self::build(ErrorCode::Success, Some(data), message.into())
    }
}

impl ApiResponse<()> {
    pub fn success_empty(message: impl Into<String>) -> Self {
        Self::build(ErrorCode::Success, None, message.into())
    }

    pub fn error_empty(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::build(code, None, message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_flag_follows_code() {
        let ok = serde_json::to_value(ApiResponse::success(3_i64, "ok")).unwrap();
        assert_eq!(ok["success"], true);
        assert_eq!(ok["data"], 3);

        let err = serde_json::to_value(ApiResponse::error_empty(ErrorCode::Forbidden, "no")).unwrap();
        assert_eq!(err["success"], false);
        assert!(err.get("data").is_none());
    }
}
