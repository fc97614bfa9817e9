use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::FeeService;
use crate::middlewares::RequireJWT;
use crate::models::fees::entities::DiscountType;
use crate::models::fees::requests::{CreateDiscountRequest, DiscountListParams};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::activity::log_activity;
use crate::services::{bad_request, error_response, not_found};

/// 折扣数值校验：百分比在 (0, 100]，固定金额大于 0
pub fn validate_discount(req: &CreateDiscountRequest) -> Result<(), String> {
    let value = req.discount_value;
    if !(value.is_finite() && value > 0.0) {
        return Err("Discount value must be greater than zero".to_string());
    }
    if req.discount_type == DiscountType::Percentage && value > 100.0 {
        return Err("Percentage discount cannot exceed 100".to_string());
    }
    if let (Some(from), Some(until)) = (req.valid_from, req.valid_until)
        && until < from
    {
        return Err("valid_until must not be before valid_from".to_string());
    }
    Ok(())
}

pub async fn list_discounts(
    service: &FeeService,
    query: DiscountListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    match storage.list_discounts_by_student(query.student_id).await {
        Ok(discounts) => {
            Ok(HttpResponse::Ok().json(ApiResponse::success(discounts, "折扣列表获取成功")))
        }
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}

pub async fn create_discount(
    service: &FeeService,
    req: CreateDiscountRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Err(msg) = validate_discount(&req) {
        return Ok(bad_request(ErrorCode::ValidationFailed, msg));
    }

    let storage = service.get_storage(request)?;

    match storage.get_student_by_id(req.student_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return Ok(not_found(ErrorCode::StudentNotFound, "Student not found")),
        Err(e) => return Ok(error_response(&e, ErrorCode::InternalServerError)),
    }

    // 指定费用时必须属于同一学生
    if let Some(fee_id) = req.fee_id {
        match storage.get_fee_by_id(fee_id).await {
            Ok(Some(fee)) if fee.student_id == req.student_id => {}
            Ok(Some(_)) => {
                return Ok(bad_request(
                    ErrorCode::ValidationFailed,
                    "Fee does not belong to this student",
                ));
            }
            Ok(None) => return Ok(super::fees::fee_not_found()),
            Err(e) => return Ok(error_response(&e, ErrorCode::InternalServerError)),
        }
    }

    let approved_by = RequireJWT::extract_user_id(request);
    match storage.create_discount(req, approved_by).await {
        Ok(discount) => {
            log_activity(
                &storage,
                "fee",
                format!(
                    "Discount {} ({} {}) granted to student {}",
                    discount.id, discount.discount_type, discount.discount_value, discount.student_id
                ),
                approved_by,
                Some(request),
            )
            .await;
            Ok(HttpResponse::Created().json(ApiResponse::success(discount, "折扣创建成功")))
        }
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}

// 折扣只停用不删除
pub async fn deactivate_discount(
    service: &FeeService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    match storage.deactivate_discount(id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty("折扣已停用"))),
        Ok(false) => Ok(not_found(ErrorCode::DiscountNotFound, "Discount not found")),
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req(discount_type: DiscountType, value: f64) -> CreateDiscountRequest {
        CreateDiscountRequest {
            student_id: 1,
            fee_id: None,
            discount_type,
            discount_value: value,
            reason: None,
            valid_from: None,
            valid_until: None,
        }
    }

    #[test]
    fn test_discount_bounds() {
        assert!(validate_discount(&req(DiscountType::Percentage, 100.0)).is_ok());
        assert!(validate_discount(&req(DiscountType::Percentage, 100.5)).is_err());
        assert!(validate_discount(&req(DiscountType::FixedAmount, 500.0)).is_ok());
        assert!(validate_discount(&req(DiscountType::FixedAmount, 0.0)).is_err());
    }

    #[test]
    fn test_validity_window_order() {
        let mut r = req(DiscountType::FixedAmount, 10.0);
        r.valid_from = chrono::NaiveDate::from_ymd_opt(2025, 5, 1);
        r.valid_until = chrono::NaiveDate::from_ymd_opt(2025, 4, 1);
        assert!(validate_discount(&r).is_err());
    }
}
