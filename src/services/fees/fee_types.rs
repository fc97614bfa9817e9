use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::FeeService;
use crate::models::fees::requests::{CreateFeeTypeRequest, UpdateFeeTypeRequest};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, error_response, is_unique_violation, not_found};

pub async fn list_fee_types(
    service: &FeeService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    match storage.list_fee_types().await {
        Ok(types) => Ok(HttpResponse::Ok().json(ApiResponse::success(types, "费用类型获取成功"))),
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}

pub async fn create_fee_type(
    service: &FeeService,
    mut req: CreateFeeTypeRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    req.name = req.name.trim().to_string();
    if req.name.is_empty() {
        return Ok(bad_request(ErrorCode::ValidationFailed, "Fee type name is required"));
    }
    if let Some(amount) = req.default_amount
        && !(amount.is_finite() && amount >= 0.0)
    {
        return Ok(bad_request(
            ErrorCode::ValidationFailed,
            "Default amount cannot be negative",
        ));
    }

    let storage = service.get_storage(request)?;
    match storage.get_fee_type_by_name(&req.name).await {
        Ok(Some(_)) => return Ok(name_taken()),
        Ok(None) => {}
        Err(e) => return Ok(error_response(&e, ErrorCode::InternalServerError)),
    }

    match storage.create_fee_type(req).await {
        Ok(fee_type) => {
            Ok(HttpResponse::Created().json(ApiResponse::success(fee_type, "费用类型创建成功")))
        }
        Err(e) if is_unique_violation(&e) => Ok(name_taken()),
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}

pub async fn get_fee_type(
    service: &FeeService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    match storage.get_fee_type_by_id(id).await {
        Ok(Some(fee_type)) => {
            Ok(HttpResponse::Ok().json(ApiResponse::success(fee_type, "费用类型获取成功")))
        }
        Ok(None) => Ok(fee_type_not_found()),
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}

pub async fn update_fee_type(
    service: &FeeService,
    id: i64,
    mut update: UpdateFeeTypeRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    if let Some(name) = update.name.take() {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Ok(bad_request(ErrorCode::ValidationFailed, "Fee type name is required"));
        }
        match storage.get_fee_type_by_name(&name).await {
            Ok(Some(other)) if other.id != id => return Ok(name_taken()),
            Ok(_) => {}
            Err(e) => return Ok(error_response(&e, ErrorCode::InternalServerError)),
        }
        update.name = Some(name);
    }
    if let Some(amount) = update.default_amount
        && !(amount.is_finite() && amount >= 0.0)
    {
        return Ok(bad_request(
            ErrorCode::ValidationFailed,
            "Default amount cannot be negative",
        ));
    }

    match storage.update_fee_type(id, update).await {
        Ok(Some(fee_type)) => {
            Ok(HttpResponse::Ok().json(ApiResponse::success(fee_type, "费用类型更新成功")))
        }
        Ok(None) => Ok(fee_type_not_found()),
        Err(e) if is_unique_violation(&e) => Ok(name_taken()),
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}

// 启用 / 停用
pub async fn toggle_fee_type(
    service: &FeeService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    match storage.toggle_fee_type(id).await {
        Ok(Some(fee_type)) => {
            Ok(HttpResponse::Ok().json(ApiResponse::success(fee_type, "费用类型状态已更新")))
        }
        Ok(None) => Ok(fee_type_not_found()),
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}

pub async fn delete_fee_type(
    service: &FeeService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    match storage.delete_fee_type(id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty("费用类型删除成功"))),
        Ok(false) => Ok(fee_type_not_found()),
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}

pub(super) fn fee_type_not_found() -> HttpResponse {
    not_found(ErrorCode::FeeTypeNotFound, "Fee type not found")
}

fn name_taken() -> HttpResponse {
    HttpResponse::Conflict().json(ApiResponse::error_empty(
        ErrorCode::Conflict,
        "Fee type name already exists",
    ))
}
