pub mod activity;
pub mod attendance;
pub mod auth;
pub mod classrooms;
pub mod common;
pub mod complaints;
pub mod date_sheets;
pub mod fees;
pub mod leaves;
pub mod notifications;
pub mod parents;
pub mod students;
pub mod subjects;
pub mod teachers;
pub mod timetable;
pub mod users;

use serde::Serialize;
use ts_rs::TS;

pub use common::{ApiResponse, PaginatedResponse, PaginationInfo, PaginationQuery};

/// 服务启动时间，作为 app_data 共享
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

/// 业务错误码（ApiResponse.code）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/api.ts")]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 通用错误
    BadRequest = 1000,
    ValidationFailed = 1001,
    Unauthorized = 1002,
    Forbidden = 1003,
    NotFound = 1004,
    Conflict = 1005,
    RateLimitExceeded = 1006,
    PayloadTooLarge = 1009,
    InternalServerError = 1010,

    // 认证与用户
    AuthFailed = 2000,
    UserNotFound = 2001,
    UserAlreadyExists = 2002,
    UserNameInvalid = 2003,
    UserEmailInvalid = 2004,
    UserPasswordInvalid = 2005,
    UserInactive = 2006,
    ProtectedUser = 2007,

    // 在册档案与注册密钥
    SecretKeyInvalid = 3000,
    SecretKeyNotFound = 3001,
    SecretKeyAlreadyLinked = 3002,
    StudentNotFound = 3100,
    TeacherNotFound = 3101,
    ParentNotFound = 3102,
    ClassroomNotFound = 3103,
    ClassroomNotEmpty = 3104,
    SubjectNotFound = 3105,

    // 收费
    FeeTypeNotFound = 4000,
    FeeNotFound = 4001,
    PaymentInvalid = 4002,
    ReceiptNotFound = 4003,
    DiscountNotFound = 4004,
    ClassFeeNotFound = 4005,

    // 课表
    TimetableNotFound = 5000,
    TimetableConflict = 5001,
    TimetableEntryNotFound = 5002,
    DateSheetNotFound = 5100,
    DateSheetEntryNotFound = 5101,

    // 请假、投诉、消息
    LeaveNotFound = 6000,
    LeaveStateInvalid = 6001,
    ComplaintNotFound = 6100,
    NotificationNotFound = 6200,
    MessageRecipientNotFound = 6201,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success as i32, 0);
        assert_eq!(ErrorCode::RateLimitExceeded as i32, 1006);
        assert_eq!(ErrorCode::TimetableConflict as i32, 5001);
    }

    #[test]
    fn test_api_response_envelope() {
        let resp = ApiResponse::<()>::error_empty(ErrorCode::NotFound, "missing");
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["code"], 1004);
        assert_eq!(json["message"], "missing");
        assert!(json.get("data").is_none());
    }
}
