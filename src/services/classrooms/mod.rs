//! 班级管理

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::classrooms::requests::{
    ClassroomListParams, CreateClassroomRequest, UpdateClassroomRequest,
};
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

pub struct ClassroomService {
    storage: Option<Arc<dyn Storage>>,
}

impl ClassroomService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    // 班级列表（附学生人数）
    pub async fn list_classrooms(
        &self,
        query: ClassroomListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        match storage.list_classrooms(query).await {
            Ok(page) => Ok(HttpResponse::Ok().json(ApiResponse::success(page, "班级列表获取成功"))),
            Err(e) => Ok(super::error_response(&e, ErrorCode::InternalServerError)),
        }
    }

    pub async fn create_classroom(
        &self,
        mut req: CreateClassroomRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        req.name = req.name.trim().to_string();
        if req.name.is_empty() {
            return Ok(super::bad_request(
                ErrorCode::ValidationFailed,
                "Classroom name is required",
            ));
        }
        if let Some(capacity) = req.capacity
            && capacity < 0
        {
            return Ok(super::bad_request(
                ErrorCode::ValidationFailed,
                "Capacity cannot be negative",
            ));
        }

        let storage = self.get_storage(request)?;
        match storage.get_classroom_by_name(&req.name).await {
            Ok(Some(_)) => return Ok(name_taken()),
            Ok(None) => {}
            Err(e) => return Ok(super::error_response(&e, ErrorCode::InternalServerError)),
        }

        match storage.create_classroom(req).await {
            Ok(classroom) => Ok(HttpResponse::Created()
                .json(ApiResponse::success(classroom, "班级创建成功"))),
            Err(e) if super::is_unique_violation(&e) => Ok(name_taken()),
            Err(e) => Ok(super::error_response(&e, ErrorCode::InternalServerError)),
        }
    }

    pub async fn get_classroom(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        match storage.get_classroom_by_id(id).await {
            Ok(Some(classroom)) => {
                Ok(HttpResponse::Ok().json(ApiResponse::success(classroom, "班级获取成功")))
            }
            Ok(None) => Ok(classroom_not_found()),
            Err(e) => Ok(super::error_response(&e, ErrorCode::InternalServerError)),
        }
    }

    pub async fn update_classroom(
        &self,
        id: i64,
        mut update: UpdateClassroomRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;

        if let Some(name) = update.name.take() {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Ok(super::bad_request(
                    ErrorCode::ValidationFailed,
                    "Classroom name is required",
                ));
            }
            match storage.get_classroom_by_name(&name).await {
                Ok(Some(other)) if other.id != id => return Ok(name_taken()),
                Ok(_) => {}
                Err(e) => return Ok(super::error_response(&e, ErrorCode::InternalServerError)),
            }
            update.name = Some(name);
        }

        match storage.update_classroom(id, update).await {
            Ok(Some(classroom)) => {
                Ok(HttpResponse::Ok().json(ApiResponse::success(classroom, "班级更新成功")))
            }
            Ok(None) => Ok(classroom_not_found()),
            Err(e) if super::is_unique_violation(&e) => Ok(name_taken()),
            Err(e) => Ok(super::error_response(&e, ErrorCode::InternalServerError)),
        }
    }

    // 仍有学生的班级不可删除
    pub async fn delete_classroom(
        &self,
        id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;

        match storage.count_students_in_classroom(id).await {
            Ok(0) => {}
            Ok(count) => {
                return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                    ErrorCode::ClassroomNotEmpty,
                    format!("Classroom still has {count} student(s)"),
                )));
            }
            Err(e) => return Ok(super::error_response(&e, ErrorCode::InternalServerError)),
        }

        match storage.delete_classroom(id).await {
            Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty("班级删除成功"))),
            Ok(false) => Ok(classroom_not_found()),
            Err(e) => Ok(super::error_response(&e, ErrorCode::InternalServerError)),
        }
    }
}

fn classroom_not_found() -> HttpResponse {
    super::not_found(ErrorCode::ClassroomNotFound, "Classroom not found")
}

fn name_taken() -> HttpResponse {
    HttpResponse::Conflict().json(ApiResponse::error_empty(
        ErrorCode::Conflict,
        "Classroom name already exists",
    ))
}
