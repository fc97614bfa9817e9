pub mod views;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::middlewares::RequireJWT;
use crate::models::date_sheets::entities::DateSheetDetail;
use crate::models::date_sheets::requests::{
    CreateDateSheetEntryRequest, CreateDateSheetRequest, DateSheetListParams,
};
use crate::models::date_sheets::schedule::{validate_date_sheet, validate_entry};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::activity::log_activity;
use crate::services::check_classroom;
use crate::storage::Storage;

pub struct DateSheetService {
    storage: Option<Arc<dyn Storage>>,
}

impl DateSheetService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    // 非管理员只能看到已发布的日程
    pub async fn list_date_sheets(
        &self,
        mut query: DateSheetListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        if !is_admin(request) {
            query.is_published = Some(true);
        }

        match storage.list_date_sheets(query).await {
            Ok(items) => {
                Ok(HttpResponse::Ok().json(ApiResponse::success(items, "考试日程列表获取成功")))
            }
            Err(e) => Ok(super::error_response(&e, ErrorCode::InternalServerError)),
        }
    }

    pub async fn create_date_sheet(
        &self,
        mut req: CreateDateSheetRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        req.title = req.title.trim().to_string();
        req.exam_type = req.exam_type.trim().to_string();
        if let Err(msg) = validate_date_sheet(&req) {
            return Ok(super::bad_request(ErrorCode::ValidationFailed, msg));
        }

        let storage = self.get_storage(request)?;
        if let Some(resp) = check_classroom(&storage, req.classroom_id).await {
            return Ok(resp);
        }

        let created_by = RequireJWT::extract_user_id(request);
        match storage.create_date_sheet(req, created_by).await {
            Ok(sheet) => {
                log_activity(
                    &storage,
                    "date_sheet",
                    format!("Date sheet {} created", sheet.title),
                    created_by,
                    Some(request),
                )
                .await;
                Ok(HttpResponse::Created().json(ApiResponse::success(sheet, "考试日程创建成功")))
            }
            Err(e) => Ok(super::error_response(&e, ErrorCode::InternalServerError)),
        }
    }

    // 日程及其全部场次
    pub async fn get_date_sheet(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;

        let date_sheet = match storage.get_date_sheet_by_id(id).await {
            Ok(Some(sheet)) if sheet.is_published || is_admin(request) => sheet,
            Ok(_) => return Ok(date_sheet_not_found()),
            Err(e) => return Ok(super::error_response(&e, ErrorCode::InternalServerError)),
        };

        match storage.list_date_sheet_entries(&[id]).await {
            Ok(entries) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                DateSheetDetail {
                    date_sheet,
                    entries,
                },
                "考试日程获取成功",
            ))),
            Err(e) => Ok(super::error_response(&e, ErrorCode::InternalServerError)),
        }
    }

    pub async fn publish_date_sheet(
        &self,
        id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        match storage.publish_date_sheet(id).await {
            Ok(Some(sheet)) => {
                log_activity(
                    &storage,
                    "date_sheet",
                    format!("Date sheet {} published", sheet.title),
                    RequireJWT::extract_user_id(request),
                    Some(request),
                )
                .await;
                Ok(HttpResponse::Ok().json(ApiResponse::success(sheet, "考试日程已发布")))
            }
            Ok(None) => Ok(date_sheet_not_found()),
            Err(e) => Ok(super::error_response(&e, ErrorCode::InternalServerError)),
        }
    }

    pub async fn delete_date_sheet(
        &self,
        id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        match storage.delete_date_sheet(id).await {
            Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty("考试日程删除成功"))),
            Ok(false) => Ok(date_sheet_not_found()),
            Err(e) => Ok(super::error_response(&e, ErrorCode::InternalServerError)),
        }
    }

    pub async fn add_entry(
        &self,
        date_sheet_id: i64,
        req: CreateDateSheetEntryRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;

        let sheet = match storage.get_date_sheet_by_id(date_sheet_id).await {
            Ok(Some(sheet)) => sheet,
            Ok(None) => return Ok(date_sheet_not_found()),
            Err(e) => return Ok(super::error_response(&e, ErrorCode::InternalServerError)),
        };

        if let Err(msg) = validate_entry(&sheet, &req) {
            return Ok(super::bad_request(ErrorCode::ValidationFailed, msg));
        }
        if let Some(resp) = check_classroom(&storage, req.classroom_id).await {
            return Ok(resp);
        }
        if let Some(subject_id) = req.subject_id {
            match storage.get_subject_by_id(subject_id).await {
                Ok(Some(_)) => {}
                Ok(None) => {
                    return Ok(super::not_found(
                        ErrorCode::SubjectNotFound,
                        "Subject not found",
                    ));
                }
                Err(e) => return Ok(super::error_response(&e, ErrorCode::InternalServerError)),
            }
        }

        match storage.create_date_sheet_entry(date_sheet_id, req).await {
            Ok(entry) => {
                Ok(HttpResponse::Created().json(ApiResponse::success(entry, "考试场次添加成功")))
            }
            Err(e) => Ok(super::error_response(&e, ErrorCode::InternalServerError)),
        }
    }

    pub async fn delete_entry(
        &self,
        date_sheet_id: i64,
        entry_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        match storage.delete_date_sheet_entry(date_sheet_id, entry_id).await {
            Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty("考试场次删除成功"))),
            Ok(false) => Ok(super::not_found(
                ErrorCode::DateSheetEntryNotFound,
                "Date sheet entry not found",
            )),
            Err(e) => Ok(super::error_response(&e, ErrorCode::InternalServerError)),
        }
    }

    pub async fn teacher_date_sheets(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        views::teacher_date_sheets(self, request).await
    }

    pub async fn exam_schedule(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        views::exam_schedule(self, request).await
    }
}

fn is_admin(request: &HttpRequest) -> bool {
    RequireJWT::extract_user_claims(request).is_some_and(|user| user.is_admin())
}

fn date_sheet_not_found() -> HttpResponse {
    super::not_found(ErrorCode::DateSheetNotFound, "Date sheet not found")
}
