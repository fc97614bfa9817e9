pub mod entries;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::middlewares::RequireJWT;
use crate::models::timetable::entities::TimetableDetail;
use crate::models::timetable::requests::{
    CreateEntryRequest, CreateTimetableRequest, TimetableListParams, UpdateTimetableRequest,
};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::activity::log_activity;
use crate::services::check_classroom;
use crate::storage::Storage;

pub struct TimetableService {
    storage: Option<Arc<dyn Storage>>,
}

impl TimetableService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    pub async fn list_timetables(
        &self,
        query: TimetableListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        match storage.list_timetables(query).await {
            Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(items, "课表列表获取成功"))),
            Err(e) => Ok(super::error_response(&e, ErrorCode::InternalServerError)),
        }
    }

    pub async fn create_timetable(
        &self,
        mut req: CreateTimetableRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        req.name = req.name.trim().to_string();
        if req.name.is_empty() {
            return Ok(super::bad_request(
                ErrorCode::ValidationFailed,
                "Timetable name is required",
            ));
        }

        let storage = self.get_storage(request)?;
        if let Some(resp) = check_classroom(&storage, req.classroom_id).await {
            return Ok(resp);
        }

        let created_by = RequireJWT::extract_user_id(request);
        match storage.create_timetable(req, created_by).await {
            Ok(timetable) => {
                log_activity(
                    &storage,
                    "timetable",
                    format!("Timetable {} created", timetable.name),
                    created_by,
                    Some(request),
                )
                .await;
                Ok(HttpResponse::Created().json(ApiResponse::success(timetable, "课表创建成功")))
            }
            Err(e) => Ok(super::error_response(&e, ErrorCode::InternalServerError)),
        }
    }

    // 课表及其全部条目
    pub async fn get_timetable(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;

        let timetable = match storage.get_timetable_by_id(id).await {
            Ok(Some(timetable)) => timetable,
            Ok(None) => return Ok(timetable_not_found()),
            Err(e) => return Ok(super::error_response(&e, ErrorCode::InternalServerError)),
        };

        match storage.list_timetable_entries(id).await {
            Ok(entries) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                TimetableDetail { timetable, entries },
                "课表获取成功",
            ))),
            Err(e) => Ok(super::error_response(&e, ErrorCode::InternalServerError)),
        }
    }

    pub async fn update_timetable(
        &self,
        id: i64,
        mut update: UpdateTimetableRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        if let Some(name) = update.name.as_mut() {
            *name = name.trim().to_string();
            if name.is_empty() {
                return Ok(super::bad_request(
                    ErrorCode::ValidationFailed,
                    "Timetable name is required",
                ));
            }
        }

        let storage = self.get_storage(request)?;
        if let Some(resp) = check_classroom(&storage, update.classroom_id).await {
            return Ok(resp);
        }

        match storage.update_timetable(id, update).await {
            Ok(Some(timetable)) => {
                Ok(HttpResponse::Ok().json(ApiResponse::success(timetable, "课表更新成功")))
            }
            Ok(None) => Ok(timetable_not_found()),
            Err(e) => Ok(super::error_response(&e, ErrorCode::InternalServerError)),
        }
    }

    pub async fn publish_timetable(
        &self,
        id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        match storage.publish_timetable(id).await {
            Ok(Some(timetable)) => {
                log_activity(
                    &storage,
                    "timetable",
                    format!("Timetable {} published", timetable.name),
                    RequireJWT::extract_user_id(request),
                    Some(request),
                )
                .await;
                Ok(HttpResponse::Ok().json(ApiResponse::success(timetable, "课表已发布")))
            }
            Ok(None) => Ok(timetable_not_found()),
            Err(e) => Ok(super::error_response(&e, ErrorCode::InternalServerError)),
        }
    }

    pub async fn delete_timetable(
        &self,
        id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        match storage.delete_timetable(id).await {
            Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty("课表删除成功"))),
            Ok(false) => Ok(timetable_not_found()),
            Err(e) => Ok(super::error_response(&e, ErrorCode::InternalServerError)),
        }
    }

    pub async fn list_entries(
        &self,
        timetable_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        entries::list_entries(self, timetable_id, request).await
    }

    pub async fn add_entry(
        &self,
        timetable_id: i64,
        req: CreateEntryRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        entries::add_entry(self, timetable_id, req, request).await
    }

    pub async fn delete_entry(
        &self,
        timetable_id: i64,
        entry_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        entries::delete_entry(self, timetable_id, entry_id, request).await
    }
}

fn timetable_not_found() -> HttpResponse {
    super::not_found(ErrorCode::TimetableNotFound, "Timetable not found")
}
