//! 教师档案、注册密钥与课表查询

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::errors::SchoolDeskError;
use crate::middlewares::RequireJWT;
use crate::models::teachers::entities::SecretKeyResponse;
use crate::models::teachers::requests::{
    CreateTeacherRequest, TeacherListParams, UpdateTeacherRequest,
};
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::activity::log_activity;
use crate::storage::Storage;
use crate::utils::validate::{TEACHER_SECRET_KEY_LEN, validate_email};

pub struct TeacherService {
    storage: Option<Arc<dyn Storage>>,
}

impl TeacherService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    pub async fn list_teachers(
        &self,
        query: TeacherListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        match storage.list_teachers_with_pagination(query).await {
            Ok(page) => Ok(HttpResponse::Ok().json(ApiResponse::success(page, "教师列表获取成功"))),
            Err(e) => Ok(super::error_response(&e, ErrorCode::InternalServerError)),
        }
    }

    // 创建档案时生成 5 位注册密钥
    pub async fn create_teacher(
        &self,
        mut req: CreateTeacherRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        req.name = req.name.trim().to_string();
        if req.name.is_empty() {
            return Ok(super::bad_request(
                ErrorCode::ValidationFailed,
                "Teacher name is required",
            ));
        }
        if let Some(email) = &req.email
            && let Err(msg) = validate_email(email)
        {
            return Ok(super::bad_request(ErrorCode::ValidationFailed, msg));
        }
        req.employee_id = req
            .employee_id
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty());

        let storage = self.get_storage(request)?;
        if let Some(employee_id) = &req.employee_id
            && let Some(resp) = check_employee_id(&storage, None, employee_id).await
        {
            return Ok(resp);
        }

        let secret_key = match generate_secret_key(&storage).await {
            Ok(key) => key,
            Err(e) => return Ok(super::error_response(&e, ErrorCode::InternalServerError)),
        };

        match storage.create_teacher(req, &secret_key).await {
            Ok(teacher) => {
                log_activity(
                    &storage,
                    "teacher",
                    format!("Teacher {} created", teacher.name),
                    RequireJWT::extract_user_id(request),
                    Some(request),
                )
                .await;
                Ok(HttpResponse::Created().json(ApiResponse::success(teacher, "教师创建成功")))
            }
            Err(e) if super::is_unique_violation(&e) => Ok(employee_id_taken()),
            Err(e) => Ok(super::error_response(&e, ErrorCode::InternalServerError)),
        }
    }

    pub async fn get_teacher(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        match storage.get_teacher_by_id(id).await {
            Ok(Some(teacher)) => {
                Ok(HttpResponse::Ok().json(ApiResponse::success(teacher, "教师获取成功")))
            }
            Ok(None) => Ok(teacher_not_found()),
            Err(e) => Ok(super::error_response(&e, ErrorCode::InternalServerError)),
        }
    }

    pub async fn update_teacher(
        &self,
        id: i64,
        mut update: UpdateTeacherRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        if let Some(name) = update.name.as_mut() {
            *name = name.trim().to_string();
            if name.is_empty() {
                return Ok(super::bad_request(
                    ErrorCode::ValidationFailed,
                    "Teacher name is required",
                ));
            }
        }
        if let Some(email) = &update.email
            && let Err(msg) = validate_email(email)
        {
            return Ok(super::bad_request(ErrorCode::ValidationFailed, msg));
        }

        let storage = self.get_storage(request)?;
        if let Some(employee_id) = &update.employee_id
            && let Some(resp) = check_employee_id(&storage, Some(id), employee_id.trim()).await
        {
            return Ok(resp);
        }

        match storage.update_teacher(id, update).await {
            Ok(Some(teacher)) => {
                Ok(HttpResponse::Ok().json(ApiResponse::success(teacher, "教师更新成功")))
            }
            Ok(None) => Ok(teacher_not_found()),
            Err(e) if super::is_unique_violation(&e) => Ok(employee_id_taken()),
            Err(e) => Ok(super::error_response(&e, ErrorCode::InternalServerError)),
        }
    }

    pub async fn delete_teacher(
        &self,
        id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        match storage.delete_teacher(id).await {
            Ok(true) => {
                log_activity(
                    &storage,
                    "teacher",
                    format!("Teacher {id} deleted"),
                    RequireJWT::extract_user_id(request),
                    Some(request),
                )
                .await;
                Ok(HttpResponse::Ok().json(ApiResponse::success_empty("教师删除成功")))
            }
            Ok(false) => Ok(teacher_not_found()),
            Err(e) => Ok(super::error_response(&e, ErrorCode::InternalServerError)),
        }
    }

    // 重新生成注册密钥，旧密钥立即失效
    pub async fn regenerate_secret_key(
        &self,
        id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;

        let secret_key = match generate_secret_key(&storage).await {
            Ok(key) => key,
            Err(e) => return Ok(super::error_response(&e, ErrorCode::InternalServerError)),
        };

        match storage.set_teacher_secret_key(id, &secret_key).await {
            Ok(Some(teacher)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                SecretKeyResponse {
                    secret_key: teacher.secret_key.unwrap_or(secret_key),
                },
                "注册密钥已重新生成",
            ))),
            Ok(None) => Ok(teacher_not_found()),
            Err(e) => Ok(super::error_response(&e, ErrorCode::InternalServerError)),
        }
    }

    // 已发布课表中的条目；教师只能查看自己的
    pub async fn get_schedule(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;

        let Some(current_user) = RequireJWT::extract_user_claims(request) else {
            return Ok(super::unauthorized());
        };

        let teacher = match storage.get_teacher_by_id(id).await {
            Ok(Some(teacher)) => teacher,
            Ok(None) => return Ok(teacher_not_found()),
            Err(e) => return Ok(super::error_response(&e, ErrorCode::InternalServerError)),
        };

        if current_user.role == UserRole::Teacher && teacher.user_id != Some(current_user.id) {
            return Ok(super::forbidden("Teachers may only view their own schedule"));
        }

        match storage.list_teacher_schedule(teacher.id).await {
            Ok(entries) => Ok(HttpResponse::Ok().json(ApiResponse::success(entries, "课表获取成功"))),
            Err(e) => Ok(super::error_response(&e, ErrorCode::InternalServerError)),
        }
    }
}

async fn generate_secret_key(storage: &Arc<dyn Storage>) -> Result<String, SchoolDeskError> {
    super::unique_secret_key(TEACHER_SECRET_KEY_LEN, |key| {
        let storage = storage.clone();
        async move { Ok(storage.get_teacher_by_secret_key(&key).await?.is_some()) }
    })
    .await
}

async fn check_employee_id(
    storage: &Arc<dyn Storage>,
    teacher_id: Option<i64>,
    employee_id: &str,
) -> Option<HttpResponse> {
    match storage.get_teacher_by_employee_id(employee_id).await {
        Ok(Some(other)) if Some(other.id) != teacher_id => Some(employee_id_taken()),
        Ok(_) => None,
        Err(e) => Some(super::error_response(&e, ErrorCode::InternalServerError)),
    }
}

fn teacher_not_found() -> HttpResponse {
    super::not_found(ErrorCode::TeacherNotFound, "Teacher not found")
}

fn employee_id_taken() -> HttpResponse {
    HttpResponse::Conflict().json(ApiResponse::error_empty(
        ErrorCode::Conflict,
        "Employee id already exists",
    ))
}
