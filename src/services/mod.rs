pub mod activity;
pub mod attendance;
pub mod auth;
pub mod classrooms;
pub mod complaints;
pub mod date_sheets;
pub mod fees;
pub mod leaves;
pub mod messages;
pub mod notifications;
pub mod parents;
pub mod students;
pub mod subjects;
pub mod system;
pub mod teachers;
pub mod timetable;
pub mod users;

pub use activity::ActivityService;
pub use attendance::AttendanceService;
pub use auth::AuthService;
pub use classrooms::ClassroomService;
pub use complaints::ComplaintService;
pub use date_sheets::DateSheetService;
pub use fees::FeeService;
pub use leaves::LeaveService;
pub use messages::MessageService;
pub use notifications::NotificationService;
pub use parents::ParentService;
pub use students::StudentService;
pub use subjects::SubjectService;
pub use system::SystemService;
pub use teachers::TeacherService;
pub use timetable::TimetableService;
pub use users::UserService;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use std::sync::Arc;
use tracing::error;

use crate::errors::SchoolDeskError;
use crate::models::{ApiResponse, ErrorCode};
use crate::models::users::entities::{User, UserRole};
use crate::storage::Storage;

/// 从 app_data 取出存储实例
pub(crate) fn storage_from_request(request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
    request
        .app_data::<web::Data<Arc<dyn Storage>>>()
        .map(|data| data.get_ref().clone())
        .ok_or_else(|| actix_web::error::ErrorInternalServerError("Storage not found in app data"))
}

/// 唯一约束冲突（SQLite / PostgreSQL / MySQL）
pub(crate) fn is_unique_violation(err: &SchoolDeskError) -> bool {
    let msg = err.message();
    msg.contains("UNIQUE constraint failed")
        || msg.contains("duplicate key value")
        || msg.contains("Duplicate entry")
}

/// 将存储层错误映射为统一响应；服务端错误记录日志并使用 fallback 错误码
pub(crate) fn error_response(err: &SchoolDeskError, fallback: ErrorCode) -> HttpResponse {
    if is_unique_violation(err) {
        return HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::Conflict,
            "Resource already exists",
        ));
    }
    let code = match err {
        SchoolDeskError::NotFound(_) => ErrorCode::NotFound,
        SchoolDeskError::Conflict(_) | SchoolDeskError::InvalidState(_) => ErrorCode::Conflict,
        SchoolDeskError::Validation(_) => ErrorCode::ValidationFailed,
        SchoolDeskError::Authentication(_) => ErrorCode::Unauthorized,
        SchoolDeskError::Authorization(_) => ErrorCode::Forbidden,
        _ => {
            error!("{}", err);
            fallback
        }
    };
    HttpResponse::build(err.status()).json(ApiResponse::error_empty(code, err.message().to_string()))
}

/// 当前用户关联的孩子（家长档案中的 student_id）
pub(crate) async fn children_of(
    storage: &Arc<dyn Storage>,
    user_id: i64,
) -> Result<Vec<i64>, SchoolDeskError> {
    let mut ids: Vec<i64> = storage
        .list_parents_by_user_id(user_id)
        .await?
        .into_iter()
        .filter_map(|p| p.student_id)
        .collect();
    ids.sort_unstable();
    ids.dedup();
    Ok(ids)
}

/// 管理员与教师可查看任意学生；家长仅限自己的孩子
pub(crate) async fn can_access_student(
    storage: &Arc<dyn Storage>,
    user: &User,
    student_id: i64,
) -> Result<bool, SchoolDeskError> {
    match user.role {
        UserRole::Admin | UserRole::Teacher => Ok(true),
        UserRole::Parent => Ok(children_of(storage, user.id).await?.contains(&student_id)),
        UserRole::Student => Ok(false),
    }
}

/// 无权查看该学生时返回对应的错误响应
pub(crate) async fn deny_student_access(
    storage: &Arc<dyn Storage>,
    request: &HttpRequest,
    student_id: i64,
) -> Option<HttpResponse> {
    let Some(user) = crate::middlewares::RequireJWT::extract_user_claims(request) else {
        return Some(unauthorized());
    };
    match can_access_student(storage, &user, student_id).await {
        Ok(true) => None,
        Ok(false) => Some(forbidden("You may only access your own children's records")),
        Err(e) => Some(error_response(&e, ErrorCode::InternalServerError)),
    }
}

/// 班级不存在时返回 404 响应；未指定班级视为通过
pub(crate) async fn check_classroom(
    storage: &Arc<dyn Storage>,
    classroom_id: Option<i64>,
) -> Option<HttpResponse> {
    let classroom_id = classroom_id?;
    match storage.get_classroom_by_id(classroom_id).await {
        Ok(Some(_)) => None,
        Ok(None) => Some(not_found(ErrorCode::ClassroomNotFound, "Classroom not found")),
        Err(e) => Some(error_response(&e, ErrorCode::InternalServerError)),
    }
}

/// 生成注册密钥的最大尝试次数
const SECRET_KEY_ATTEMPTS: usize = 20;

/// 生成未被占用的数字注册密钥
pub(crate) async fn unique_secret_key<F, Fut>(
    digits: usize,
    mut is_taken: F,
) -> Result<String, SchoolDeskError>
where
    F: FnMut(String) -> Fut,
    Fut: std::future::Future<Output = Result<bool, SchoolDeskError>>,
{
    for _ in 0..SECRET_KEY_ATTEMPTS {
        let key = crate::utils::random_code::generate_numeric_key(digits as u32);
        if !is_taken(key.clone()).await? {
            return Ok(key);
        }
    }
    Err(SchoolDeskError::conflict("无法生成唯一的注册密钥"))
}

pub(crate) fn unauthorized() -> HttpResponse {
    HttpResponse::Unauthorized().json(ApiResponse::error_empty(
        ErrorCode::Unauthorized,
        "Unauthorized access, please login",
    ))
}

pub(crate) fn forbidden(message: &str) -> HttpResponse {
    HttpResponse::Forbidden().json(ApiResponse::error_empty(ErrorCode::Forbidden, message))
}

pub(crate) fn bad_request(code: ErrorCode, message: impl Into<String>) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error_empty(code, message))
}

pub(crate) fn not_found(code: ErrorCode, message: impl Into<String>) -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(code, message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    #[test]
    fn test_error_response_status_mapping() {
        let cases = [
            (SchoolDeskError::not_found("x"), StatusCode::NOT_FOUND),
            (SchoolDeskError::conflict("x"), StatusCode::CONFLICT),
            (SchoolDeskError::invalid_state("x"), StatusCode::CONFLICT),
            (SchoolDeskError::validation("x"), StatusCode::BAD_REQUEST),
            (SchoolDeskError::authorization("x"), StatusCode::FORBIDDEN),
            (
                SchoolDeskError::database_operation("boom"),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(
                error_response(&err, ErrorCode::InternalServerError).status(),
                status
            );
        }
    }

    #[actix_web::test]
    async fn test_unique_secret_key_retries_until_free() {
        let mut calls = 0;
        let key = unique_secret_key(5, |_| {
            calls += 1;
            let taken = calls < 3;
            async move { Ok(taken) }
        })
        .await
        .unwrap();
        assert_eq!(key.len(), 5);
        assert_eq!(calls, 3);

        let exhausted = unique_secret_key(6, |_| async { Ok(true) }).await;
        assert!(matches!(exhausted, Err(SchoolDeskError::Conflict(_))));
    }

    #[test]
    fn test_unique_violation_detected_across_backends() {
        for msg in [
            "创建学生失败: UNIQUE constraint failed: students.email",
            "duplicate key value violates unique constraint \"students_email_key\"",
            "Duplicate entry 'a@b.c' for key 'email'",
        ] {
            let err = SchoolDeskError::database_operation(msg);
            assert!(is_unique_violation(&err));
            assert_eq!(
                error_response(&err, ErrorCode::InternalServerError).status(),
                StatusCode::CONFLICT
            );
        }
        assert!(!is_unique_violation(&SchoolDeskError::database_operation("timeout")));
    }
}
