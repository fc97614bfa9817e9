use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::FeeService;
use super::fee_types::fee_type_not_found;
use super::ledger::{fee_detail, fee_details};
use crate::middlewares::RequireJWT;
use crate::models::fees::entities::{Fee, FeeType, NewFee};
use crate::models::fees::requests::{
    CreateFeeRequest, FeeListParams, FeeListQuery, UpdateFeeRequest,
};
use crate::models::students::entities::Student;
use crate::models::{ApiResponse, ErrorCode, PaginatedResponse};
use crate::services::activity::log_activity;
use crate::services::{bad_request, deny_student_access, error_response, not_found};
use crate::utils::money::round2;

pub async fn list_fees(
    service: &FeeService,
    query: FeeListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let page = match storage
        .list_fees_with_pagination(FeeListQuery::from(query))
        .await
    {
        Ok(page) => page,
        Err(e) => return Ok(error_response(&e, ErrorCode::InternalServerError)),
    };

    match fee_details(&storage, page.items).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            PaginatedResponse {
                items,
                pagination: page.pagination,
            },
            "费用列表获取成功",
        ))),
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}

/// 校验金额与滞纳金比例
pub(super) fn validate_amounts(amount: Option<f64>, late_fee_rate: Option<f64>) -> Result<(), String> {
    if let Some(amount) = amount
        && !(amount.is_finite() && amount > 0.0)
    {
        return Err("Amount must be greater than zero".to_string());
    }
    if let Some(rate) = late_fee_rate
        && !(rate.is_finite() && rate >= 0.0)
    {
        return Err("Late fee rate cannot be negative".to_string());
    }
    Ok(())
}

/// 解析费用金额并快照学生的家长姓名
pub fn build_new_fee(
    req: CreateFeeRequest,
    student: &Student,
    fee_type: Option<&FeeType>,
) -> Result<NewFee, String> {
    let amount = req
        .amount
        .or_else(|| fee_type.and_then(|t| t.default_amount))
        .ok_or_else(|| "Amount is required when the fee type has no default".to_string())?;
    validate_amounts(Some(amount), req.late_fee_rate)?;

    Ok(NewFee {
        student_id: student.id,
        fee_type_id: fee_type.map(|t| t.id),
        amount: round2(amount),
        due_date: req.due_date,
        academic_year: req.academic_year,
        semester: req.semester,
        description: req.description,
        late_fee_applicable: req.late_fee_applicable.unwrap_or(false),
        late_fee_rate: req.late_fee_rate.unwrap_or(0.0),
        father_name: student.father_name.clone(),
        mother_name: student.mother_name.clone(),
        guardian_name: student.guardian_name.clone(),
    })
}

pub async fn create_fee(
    service: &FeeService,
    req: CreateFeeRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let student = match storage.get_student_by_id(req.student_id).await {
        Ok(Some(student)) => student,
        Ok(None) => return Ok(not_found(ErrorCode::StudentNotFound, "Student not found")),
        Err(e) => return Ok(error_response(&e, ErrorCode::InternalServerError)),
    };

    let fee_type = match req.fee_type_id {
        Some(id) => match storage.get_fee_type_by_id(id).await {
            Ok(Some(fee_type)) => Some(fee_type),
            Ok(None) => return Ok(fee_type_not_found()),
            Err(e) => return Ok(error_response(&e, ErrorCode::InternalServerError)),
        },
        None => None,
    };

    let new_fee = match build_new_fee(req, &student, fee_type.as_ref()) {
        Ok(fee) => fee,
        Err(msg) => return Ok(bad_request(ErrorCode::ValidationFailed, msg)),
    };

    let fee = match storage.create_fee(new_fee).await {
        Ok(fee) => fee,
        Err(e) => return Ok(error_response(&e, ErrorCode::InternalServerError)),
    };

    log_activity(
        &storage,
        "fee",
        format!("Fee {} of {:.2} created for student {}", fee.id, fee.amount, student.name),
        RequireJWT::extract_user_id(request),
        Some(request),
    )
    .await;

    match fee_detail(&storage, fee).await {
        Ok(detail) => Ok(HttpResponse::Created().json(ApiResponse::success(detail, "费用创建成功"))),
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}

pub async fn get_fee(
    service: &FeeService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let fee = match load_fee(&storage, id).await {
        Ok(fee) => fee,
        Err(resp) => return Ok(resp),
    };
    match fee_detail(&storage, fee).await {
        Ok(detail) => Ok(HttpResponse::Ok().json(ApiResponse::success(detail, "费用获取成功"))),
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}

pub async fn update_fee(
    service: &FeeService,
    id: i64,
    mut update: UpdateFeeRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Err(msg) = validate_amounts(update.amount, update.late_fee_rate) {
        return Ok(bad_request(ErrorCode::ValidationFailed, msg));
    }
    update.amount = update.amount.map(round2);

    let storage = service.get_storage(request)?;
    let fee = match storage.update_fee(id, update).await {
        Ok(Some(fee)) => fee,
        Ok(None) => return Ok(fee_not_found()),
        Err(e) => return Ok(error_response(&e, ErrorCode::InternalServerError)),
    };
    match fee_detail(&storage, fee).await {
        Ok(detail) => Ok(HttpResponse::Ok().json(ApiResponse::success(detail, "费用更新成功"))),
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}

pub async fn delete_fee(
    service: &FeeService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    match storage.delete_fee(id).await {
        Ok(true) => {
            log_activity(
                &storage,
                "fee",
                format!("Fee {id} deleted"),
                RequireJWT::extract_user_id(request),
                Some(request),
            )
            .await;
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("费用删除成功")))
        }
        Ok(false) => Ok(fee_not_found()),
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}

// 家长只能查看自己孩子的费用
pub async fn fee_summary(
    service: &FeeService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let fee = match load_fee(&storage, id).await {
        Ok(fee) => fee,
        Err(resp) => return Ok(resp),
    };
    if let Some(resp) = deny_student_access(&storage, request, fee.student_id).await {
        return Ok(resp);
    }
    match fee_detail(&storage, fee).await {
        Ok(detail) => Ok(HttpResponse::Ok().json(ApiResponse::success(detail, "费用汇总获取成功"))),
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}

pub async fn student_fees(
    service: &FeeService,
    student_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.get_student_by_id(student_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return Ok(not_found(ErrorCode::StudentNotFound, "Student not found")),
        Err(e) => return Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
    if let Some(resp) = deny_student_access(&storage, request, student_id).await {
        return Ok(resp);
    }

    let fees = match storage.list_fees_by_students(&[student_id]).await {
        Ok(fees) => fees,
        Err(e) => return Ok(error_response(&e, ErrorCode::InternalServerError)),
    };
    match fee_details(&storage, fees).await {
        Ok(details) => Ok(HttpResponse::Ok().json(ApiResponse::success(details, "学生费用获取成功"))),
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}

pub(super) async fn load_fee(
    storage: &std::sync::Arc<dyn crate::storage::Storage>,
    id: i64,
) -> Result<Fee, HttpResponse> {
    match storage.get_fee_by_id(id).await {
        Ok(Some(fee)) => Ok(fee),
        Ok(None) => Err(fee_not_found()),
        Err(e) => Err(error_response(&e, ErrorCode::InternalServerError)),
    }
}

pub(super) fn fee_not_found() -> HttpResponse {
    not_found(ErrorCode::FeeNotFound, "Fee not found")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student() -> Student {
        let now = chrono::Utc::now();
        Student {
            id: 4,
            name: "Ravi".into(),
            roll_number: None,
            email: None,
            gender: None,
            date_of_birth: None,
            class_id: None,
            father_name: Some("Suresh".into()),
            mother_name: Some("Lata".into()),
            guardian_name: None,
            phone: None,
            address: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn fee_type(default_amount: Option<f64>) -> FeeType {
        FeeType {
            id: 9,
            name: "Bus".into(),
            description: None,
            is_recurring: true,
            frequency: Some("monthly".into()),
            default_amount,
            is_active: true,
            created_at: chrono::Utc::now(),
        }
    }

    fn request(amount: Option<f64>) -> CreateFeeRequest {
        CreateFeeRequest {
            student_id: 4,
            fee_type_id: Some(9),
            amount,
            due_date: None,
            academic_year: Some("2025-26".into()),
            semester: None,
            description: None,
            late_fee_applicable: None,
            late_fee_rate: None,
        }
    }

    #[test]
    fn test_amount_defaults_to_fee_type() {
        let fee = build_new_fee(request(None), &student(), Some(&fee_type(Some(1200.0)))).unwrap();
        assert_eq!(fee.amount, 1200.0);
        assert_eq!(fee.fee_type_id, Some(9));
        assert_eq!(fee.father_name.as_deref(), Some("Suresh"));
        assert_eq!(fee.mother_name.as_deref(), Some("Lata"));
    }

    #[test]
    fn test_explicit_amount_wins_and_must_be_positive() {
        let fee = build_new_fee(request(Some(99.999)), &student(), Some(&fee_type(Some(5.0)))).unwrap();
        assert_eq!(fee.amount, 100.0);
        assert!(build_new_fee(request(Some(0.0)), &student(), None).is_err());
        assert!(build_new_fee(request(Some(-3.0)), &student(), None).is_err());
    }

    #[test]
    fn test_missing_amount_without_default() {
        assert!(build_new_fee(request(None), &student(), Some(&fee_type(None))).is_err());
        assert!(build_new_fee(request(None), &student(), None).is_err());
    }
}
