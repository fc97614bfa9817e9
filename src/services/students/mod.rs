pub mod export;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::middlewares::RequireJWT;
use crate::models::students::requests::{
    BulkDeleteRequest, CreateStudentRequest, StudentListParams, StudentListQuery,
    UpdateStudentRequest,
};
use crate::models::students::responses::BulkDeleteResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::activity::log_activity;
use crate::storage::Storage;
use crate::utils::validate::validate_email;

/// 单次批量删除的上限
const MAX_BULK_DELETE: usize = 500;

pub struct StudentService {
    storage: Option<Arc<dyn Storage>>,
}

impl StudentService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    pub async fn list_students(
        &self,
        query: StudentListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        match storage
            .list_students_with_pagination(StudentListQuery::from(query))
            .await
        {
            Ok(page) => Ok(HttpResponse::Ok().json(ApiResponse::success(page, "学生列表获取成功"))),
            Err(e) => Ok(super::error_response(&e, ErrorCode::InternalServerError)),
        }
    }

    pub async fn create_student(
        &self,
        mut req: CreateStudentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        req.name = req.name.trim().to_string();
        if req.name.is_empty() {
            return Ok(super::bad_request(
                ErrorCode::ValidationFailed,
                "Student name is required",
            ));
        }
        req.email = normalize_email(req.email);

        let storage = self.get_storage(request)?;
        if let Some(resp) = check_student_fields(&storage, None, req.email.as_deref(), req.class_id)
            .await
        {
            return Ok(resp);
        }

        match storage.create_student(req).await {
            Ok(student) => {
                log_activity(
                    &storage,
                    "student",
                    format!("Student {} created", student.name),
                    RequireJWT::extract_user_id(request),
                    Some(request),
                )
                .await;
                Ok(HttpResponse::Created().json(ApiResponse::success(student, "学生创建成功")))
            }
            Err(e) if super::is_unique_violation(&e) => Ok(email_taken()),
            Err(e) => Ok(super::error_response(&e, ErrorCode::InternalServerError)),
        }
    }

    pub async fn get_student(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        match storage.get_student_by_id(id).await {
            Ok(Some(student)) => {
                Ok(HttpResponse::Ok().json(ApiResponse::success(student, "学生获取成功")))
            }
            Ok(None) => Ok(student_not_found()),
            Err(e) => Ok(super::error_response(&e, ErrorCode::InternalServerError)),
        }
    }

    pub async fn update_student(
        &self,
        id: i64,
        mut update: UpdateStudentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        if let Some(name) = update.name.as_mut() {
            *name = name.trim().to_string();
            if name.is_empty() {
                return Ok(super::bad_request(
                    ErrorCode::ValidationFailed,
                    "Student name is required",
                ));
            }
        }
        update.email = normalize_email(update.email);

        let storage = self.get_storage(request)?;
        if let Some(resp) =
            check_student_fields(&storage, Some(id), update.email.as_deref(), update.class_id).await
        {
            return Ok(resp);
        }

        match storage.update_student(id, update).await {
            Ok(Some(student)) => {
                Ok(HttpResponse::Ok().json(ApiResponse::success(student, "学生更新成功")))
            }
            Ok(None) => Ok(student_not_found()),
            Err(e) if super::is_unique_violation(&e) => Ok(email_taken()),
            Err(e) => Ok(super::error_response(&e, ErrorCode::InternalServerError)),
        }
    }

    // 在校 / 离校状态切换
    pub async fn toggle_active(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;

        let student = match storage.get_student_by_id(id).await {
            Ok(Some(student)) => student,
            Ok(None) => return Ok(student_not_found()),
            Err(e) => return Ok(super::error_response(&e, ErrorCode::InternalServerError)),
        };

        match storage.set_student_active(id, !student.is_active).await {
            Ok(Some(student)) => {
                let state = if student.is_active { "activated" } else { "deactivated" };
                log_activity(
                    &storage,
                    "student",
                    format!("Student {} {state}", student.name),
                    RequireJWT::extract_user_id(request),
                    Some(request),
                )
                .await;
                Ok(HttpResponse::Ok().json(ApiResponse::success(student, "学生状态已更新")))
            }
            Ok(None) => Ok(student_not_found()),
            Err(e) => Ok(super::error_response(&e, ErrorCode::InternalServerError)),
        }
    }

    pub async fn delete_student(
        &self,
        id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        match storage.delete_student(id).await {
            Ok(true) => {
                log_activity(
                    &storage,
                    "student",
                    format!("Student {id} deleted"),
                    RequireJWT::extract_user_id(request),
                    Some(request),
                )
                .await;
                Ok(HttpResponse::Ok().json(ApiResponse::success_empty("学生删除成功")))
            }
            Ok(false) => Ok(student_not_found()),
            Err(e) => Ok(super::error_response(&e, ErrorCode::InternalServerError)),
        }
    }

    pub async fn bulk_delete(
        &self,
        req: BulkDeleteRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let ids = match dedup_ids(req.ids) {
            Ok(ids) => ids,
            Err(msg) => return Ok(super::bad_request(ErrorCode::ValidationFailed, msg)),
        };

        let storage = self.get_storage(request)?;
        match storage.delete_students(&ids).await {
            Ok(deleted) => {
                log_activity(
                    &storage,
                    "student",
                    format!("Bulk deleted {deleted} student(s)"),
                    RequireJWT::extract_user_id(request),
                    Some(request),
                )
                .await;
                Ok(HttpResponse::Ok().json(ApiResponse::success(
                    BulkDeleteResponse { deleted },
                    "批量删除完成",
                )))
            }
            Err(e) => Ok(super::error_response(&e, ErrorCode::InternalServerError)),
        }
    }

    pub async fn export_students(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        export::export_students(self, request).await
    }
}

fn normalize_email(email: Option<String>) -> Option<String> {
    email
        .map(|e| e.trim().to_string())
        .filter(|e| !e.is_empty())
}

/// 去重并校验批量删除的 ID
pub fn dedup_ids(mut ids: Vec<i64>) -> Result<Vec<i64>, String> {
    ids.retain(|id| *id > 0);
    ids.sort_unstable();
    ids.dedup();
    if ids.is_empty() {
        return Err("No valid student ids given".to_string());
    }
    if ids.len() > MAX_BULK_DELETE {
        return Err(format!("At most {MAX_BULK_DELETE} students per request"));
    }
    Ok(ids)
}

// 邮箱格式与唯一性、班级存在性
async fn check_student_fields(
    storage: &Arc<dyn Storage>,
    student_id: Option<i64>,
    email: Option<&str>,
    class_id: Option<i64>,
) -> Option<HttpResponse> {
    if let Some(email) = email {
        if let Err(msg) = validate_email(email) {
            return Some(super::bad_request(ErrorCode::ValidationFailed, msg));
        }
        match storage.get_student_by_email(email).await {
            Ok(Some(other)) if Some(other.id) != student_id => return Some(email_taken()),
            Ok(_) => {}
            Err(e) => return Some(super::error_response(&e, ErrorCode::InternalServerError)),
        }
    }
    if let Some(class_id) = class_id {
        match storage.get_classroom_by_id(class_id).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                return Some(super::not_found(
                    ErrorCode::ClassroomNotFound,
                    "Classroom not found",
                ));
            }
            Err(e) => return Some(super::error_response(&e, ErrorCode::InternalServerError)),
        }
    }
    None
}

pub(crate) fn student_not_found() -> HttpResponse {
    super::not_found(ErrorCode::StudentNotFound, "Student not found")
}

fn email_taken() -> HttpResponse {
    HttpResponse::Conflict().json(ApiResponse::error_empty(
        ErrorCode::Conflict,
        "Student email already exists",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedup_ids() {
        assert_eq!(dedup_ids(vec![3, 1, 3, -2, 0, 2]).unwrap(), vec![1, 2, 3]);
        assert!(dedup_ids(vec![]).is_err());
        assert!(dedup_ids(vec![0, -1]).is_err());
        assert!(dedup_ids((1..=501).collect()).is_err());
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email(Some("  ".into())), None);
        assert_eq!(
            normalize_email(Some(" a@b.com ".into())),
            Some("a@b.com".to_string())
        );
    }
}
