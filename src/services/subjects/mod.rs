//! 科目管理

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::subjects::requests::{
    CreateSubjectRequest, SubjectListParams, UpdateSubjectRequest,
};
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

pub struct SubjectService {
    storage: Option<Arc<dyn Storage>>,
}

impl SubjectService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    pub async fn list_subjects(
        &self,
        query: SubjectListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        match storage.list_subjects(query).await {
            Ok(subjects) => {
                Ok(HttpResponse::Ok().json(ApiResponse::success(subjects, "科目列表获取成功")))
            }
            Err(e) => Ok(super::error_response(&e, ErrorCode::InternalServerError)),
        }
    }

    pub async fn create_subject(
        &self,
        mut req: CreateSubjectRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        req.name = req.name.trim().to_string();
        if req.name.is_empty() {
            return Ok(super::bad_request(
                ErrorCode::ValidationFailed,
                "Subject name is required",
            ));
        }

        let storage = self.get_storage(request)?;
        if let Some(resp) = check_references(&storage, req.classroom_id, req.teacher_id).await {
            return Ok(resp);
        }

        match storage.create_subject(req).await {
            Ok(subject) => {
                Ok(HttpResponse::Created().json(ApiResponse::success(subject, "科目创建成功")))
            }
            Err(e) => Ok(super::error_response(&e, ErrorCode::InternalServerError)),
        }
    }

    pub async fn get_subject(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        match storage.get_subject_by_id(id).await {
            Ok(Some(subject)) => {
                Ok(HttpResponse::Ok().json(ApiResponse::success(subject, "科目获取成功")))
            }
            Ok(None) => Ok(subject_not_found()),
            Err(e) => Ok(super::error_response(&e, ErrorCode::InternalServerError)),
        }
    }

    pub async fn update_subject(
        &self,
        id: i64,
        mut update: UpdateSubjectRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        if let Some(name) = update.name.as_mut() {
            *name = name.trim().to_string();
            if name.is_empty() {
                return Ok(super::bad_request(
                    ErrorCode::ValidationFailed,
                    "Subject name is required",
                ));
            }
        }

        let storage = self.get_storage(request)?;
        if let Some(resp) = check_references(&storage, update.classroom_id, update.teacher_id).await
        {
            return Ok(resp);
        }

        match storage.update_subject(id, update).await {
            Ok(Some(subject)) => {
                Ok(HttpResponse::Ok().json(ApiResponse::success(subject, "科目更新成功")))
            }
            Ok(None) => Ok(subject_not_found()),
            Err(e) => Ok(super::error_response(&e, ErrorCode::InternalServerError)),
        }
    }

    pub async fn delete_subject(
        &self,
        id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        match storage.delete_subject(id).await {
            Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty("科目删除成功"))),
            Ok(false) => Ok(subject_not_found()),
            Err(e) => Ok(super::error_response(&e, ErrorCode::InternalServerError)),
        }
    }
}

// 关联的班级与教师必须存在
async fn check_references(
    storage: &Arc<dyn Storage>,
    classroom_id: Option<i64>,
    teacher_id: Option<i64>,
) -> Option<HttpResponse> {
    if let Some(classroom_id) = classroom_id {
        match storage.get_classroom_by_id(classroom_id).await {
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
    if let Some(teacher_id) = teacher_id {
        match storage.get_teacher_by_id(teacher_id).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                return Some(super::not_found(ErrorCode::TeacherNotFound, "Teacher not found"));
            }
            Err(e) => return Some(super::error_response(&e, ErrorCode::InternalServerError)),
        }
    }
    None
}

fn subject_not_found() -> HttpResponse {
    super::not_found(ErrorCode::SubjectNotFound, "Subject not found")
}
