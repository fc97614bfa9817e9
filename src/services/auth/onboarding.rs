//! 家长 / 教师凭注册密钥开户
//!
//! 家长密钥 6 位、教师密钥 5 位。查询时：格式错误 400，不存在 404，已关联账号 409。

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::errors::SchoolDeskError;
use crate::models::auth::requests::{OnboardingRegisterRequest, SecretKeyLookupQuery};
use crate::models::auth::responses::{SecretKeyLookupResponse, UserInfoResponse};
use crate::models::users::entities::{User, UserRole};
use crate::models::users::requests::CreateUserRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::activity::log_activity;
use crate::storage::Storage;
use crate::utils::password::hash_password;
use crate::utils::validate::{
    PARENT_SECRET_KEY_LEN, TEACHER_SECRET_KEY_LEN, validate_email, validate_password_simple,
    validate_secret_key, validate_username,
};

use super::AuthService;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnboardingKind {
    Parent,
    Teacher,
}

impl OnboardingKind {
    pub fn key_len(&self) -> usize {
        match self {
            OnboardingKind::Parent => PARENT_SECRET_KEY_LEN,
            OnboardingKind::Teacher => TEACHER_SECRET_KEY_LEN,
        }
    }

    pub fn role(&self) -> UserRole {
        match self {
            OnboardingKind::Parent => UserRole::Parent,
            OnboardingKind::Teacher => UserRole::Teacher,
        }
    }
}

/// 密钥对应的档案
struct LinkedRecord {
    id: i64,
    linked: bool,
    summary: SecretKeyLookupResponse,
}

enum LookupError {
    Invalid(String),
    NotFound,
    AlreadyLinked,
    Storage(SchoolDeskError),
}

impl LookupError {
    fn into_response(self) -> HttpResponse {
        match self {
            LookupError::Invalid(msg) => {
                crate::services::bad_request(ErrorCode::SecretKeyInvalid, msg)
            }
            LookupError::NotFound => crate::services::not_found(
                ErrorCode::SecretKeyNotFound,
                "No record found for this secret key",
            ),
            LookupError::AlreadyLinked => HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::SecretKeyAlreadyLinked,
                "An account is already linked to this secret key",
            )),
            LookupError::Storage(e) => {
                crate::services::error_response(&e, ErrorCode::InternalServerError)
            }
        }
    }
}

async fn find_record(
    storage: &Arc<dyn Storage>,
    kind: OnboardingKind,
    secret_key: &str,
) -> Result<LinkedRecord, LookupError> {
    validate_secret_key(secret_key, kind.key_len()).map_err(LookupError::Invalid)?;
    let secret_key = secret_key.trim();

    let record = match kind {
        OnboardingKind::Parent => {
            let parent = storage
                .get_parent_by_secret_key(secret_key)
                .await
                .map_err(LookupError::Storage)?
                .ok_or(LookupError::NotFound)?;
            let student_name = match parent.student_id {
                Some(student_id) => storage
                    .get_student_by_id(student_id)
                    .await
                    .map_err(LookupError::Storage)?
                    .map(|s| s.name),
                None => None,
            };
            LinkedRecord {
                id: parent.id,
                linked: parent.user_id.is_some(),
                summary: SecretKeyLookupResponse {
                    record_id: parent.id,
                    name: parent.name,
                    email: parent.email,
                    student_name,
                },
            }
        }
        OnboardingKind::Teacher => {
            let teacher = storage
                .get_teacher_by_secret_key(secret_key)
                .await
                .map_err(LookupError::Storage)?
                .ok_or(LookupError::NotFound)?;
            LinkedRecord {
                id: teacher.id,
                linked: teacher.user_id.is_some(),
                summary: SecretKeyLookupResponse {
                    record_id: teacher.id,
                    name: teacher.name,
                    email: teacher.email,
                    student_name: None,
                },
            }
        }
    };

    if record.linked {
        return Err(LookupError::AlreadyLinked);
    }
    Ok(record)
}

pub async fn handle_lookup(
    service: &AuthService,
    kind: OnboardingKind,
    query: SecretKeyLookupQuery,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match find_record(&storage, kind, &query.secret_key).await {
        Ok(record) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            record.summary,
            "Secret key is valid",
        ))),
        Err(e) => Ok(e.into_response()),
    }
}

/// 注册表单校验（不访问存储）
pub fn validate_registration(req: &OnboardingRegisterRequest) -> Result<(), (ErrorCode, String)> {
    validate_username(&req.username).map_err(|m| (ErrorCode::UserNameInvalid, m.to_string()))?;
    validate_email(&req.email).map_err(|m| (ErrorCode::UserEmailInvalid, m.to_string()))?;
    if req.password != req.confirm_password {
        return Err((
            ErrorCode::UserPasswordInvalid,
            "Passwords do not match".to_string(),
        ));
    }
    validate_password_simple(&req.password).map_err(|m| (ErrorCode::UserPasswordInvalid, m))?;
    Ok(())
}

pub async fn handle_register(
    service: &AuthService,
    kind: OnboardingKind,
    register_request: OnboardingRegisterRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    if let Err((code, msg)) = validate_registration(&register_request) {
        return Ok(crate::services::bad_request(code, msg));
    }

    let record = match find_record(&storage, kind, &register_request.secret_key).await {
        Ok(record) => record,
        Err(e) => return Ok(e.into_response()),
    };

    // 用户名、邮箱不能与已有账号重复
    match storage.get_user_by_username(&register_request.username).await {
        Ok(Some(_)) => return Ok(user_exists("Username already exists")),
        Ok(None) => {}
        Err(e) => return Ok(crate::services::error_response(&e, ErrorCode::InternalServerError)),
    }
    match storage.get_user_by_email(&register_request.email).await {
        Ok(Some(_)) => return Ok(user_exists("Email already exists")),
        Ok(None) => {}
        Err(e) => return Ok(crate::services::error_response(&e, ErrorCode::InternalServerError)),
    }

    let password_hash = match hash_password(&register_request.password) {
        Ok(hash) => hash,
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Password hashing failed: {e}"),
                )),
            );
        }
    };

    let user_request = CreateUserRequest {
        username: register_request.username,
        email: register_request.email,
        password: password_hash,
        role: kind.role(),
        display_name: Some(record.summary.name.clone()),
        phone: None,
    };

    let created: Result<User, SchoolDeskError> = match kind {
        OnboardingKind::Parent => storage.register_parent_account(record.id, user_request).await,
        OnboardingKind::Teacher => storage.register_teacher_account(record.id, user_request).await,
    };

    match created {
        Ok(user) => {
            log_activity(
                &storage,
                "registration",
                format!("{} account {} registered", kind.role(), user.username),
                Some(user.id),
                Some(request),
            )
            .await;
            Ok(HttpResponse::Created().json(ApiResponse::success(
                UserInfoResponse { user },
                "Registration successful",
            )))
        }
        Err(SchoolDeskError::Conflict(_)) => Ok(LookupError::AlreadyLinked.into_response()),
        Err(e) if crate::services::is_unique_violation(&e) => {
            Ok(user_exists("Username or email already exists"))
        }
        Err(e) => Ok(crate::services::error_response(&e, ErrorCode::InternalServerError)),
    }
}

fn user_exists(message: &str) -> HttpResponse {
    HttpResponse::Conflict().json(ApiResponse::error_empty(ErrorCode::UserAlreadyExists, message))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(password: &str, confirm: &str) -> OnboardingRegisterRequest {
        OnboardingRegisterRequest {
            secret_key: "123456".into(),
            username: "parent_01".into(),
            email: "parent@example.com".into(),
            password: password.into(),
            confirm_password: confirm.into(),
        }
    }

    #[test]
    fn test_key_length_per_kind() {
        assert_eq!(OnboardingKind::Parent.key_len(), 6);
        assert_eq!(OnboardingKind::Teacher.key_len(), 5);
        assert_eq!(OnboardingKind::Teacher.role(), UserRole::Teacher);
    }

    #[test]
    fn test_registration_requires_matching_passwords() {
        let err = validate_registration(&form("Str0ngPass", "Str0ngPasS")).unwrap_err();
        assert_eq!(err.0, ErrorCode::UserPasswordInvalid);
        assert!(validate_registration(&form("Str0ngPass", "Str0ngPass")).is_ok());
    }

    #[test]
    fn test_registration_enforces_password_policy() {
        let err = validate_registration(&form("short", "short")).unwrap_err();
        assert_eq!(err.0, ErrorCode::UserPasswordInvalid);
    }

    #[test]
    fn test_registration_rejects_bad_username() {
        let mut req = form("Str0ngPass", "Str0ngPass");
        req.username = "a b".into();
        assert_eq!(validate_registration(&req).unwrap_err().0, ErrorCode::UserNameInvalid);
    }
}
