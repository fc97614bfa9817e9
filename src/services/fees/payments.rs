//! 缴费与收据

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::NaiveDate;

use super::FeeService;
use super::fees::load_fee;
use super::ledger::{fee_detail, today};
use crate::middlewares::RequireJWT;
use crate::models::fees::entities::{Fee, NewPayment};
use crate::models::fees::ledger::FeeLedger;
use crate::models::fees::requests::RecordPaymentRequest;
use crate::models::fees::responses::PaymentResult;
use crate::models::notifications::entities::NotificationKind;
use crate::models::students::entities::Student;
use crate::models::users::entities::{User, UserRole};
use crate::models::{ApiResponse, ErrorCode, PaginationQuery};
use crate::services::activity::log_activity;
use crate::services::notifications::notify;
use crate::services::{bad_request, deny_student_access, error_response, not_found};
use crate::utils::money::round2;
use crate::utils::random_code::{generate_receipt_number, generate_transaction_id};

/// 由请求与当前台账计算本次缴费
pub fn plan_payment(
    req: &RecordPaymentRequest,
    fee: &Fee,
    fee_type_name: Option<&str>,
    ledger: &FeeLedger,
    student: &Student,
    payer: &User,
    today: NaiveDate,
) -> Result<NewPayment, String> {
    let amount = round2(req.amount.unwrap_or(ledger.remaining_amount));
    if !(amount.is_finite() && amount > 0.0) {
        return Err("Payment amount must be greater than zero".to_string());
    }

    let paid_on = req.payment_date.unwrap_or(today);
    let transaction_id = req
        .payment_method
        .is_online()
        .then(|| generate_transaction_id(paid_on));
    let parent_name = fee
        .parent_name_snapshot()
        .or_else(|| student.parent_name())
        .map(str::to_string);

    Ok(NewPayment {
        fee_id: fee.id,
        amount,
        paid_on,
        payment_method: req.payment_method,
        transaction_id,
        received_by: Some(payer.id),
        receipt_number: generate_receipt_number(paid_on),
        issued_to: student.name.clone(),
        parent_name,
        notes: format!("Payment received for {}", fee_type_name.unwrap_or("fee")),
        generated_by: Some(payer.display_name.clone().unwrap_or_else(|| payer.username.clone())),
        settles_fee: ledger.remaining_amount <= amount,
    })
}

// 家长只能为自己的孩子缴费
pub async fn record_payment(
    service: &FeeService,
    fee_id: i64,
    req: RecordPaymentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let Some(payer) = RequireJWT::extract_user_claims(request) else {
        return Ok(crate::services::unauthorized());
    };

    let fee = match load_fee(&storage, fee_id).await {
        Ok(fee) => fee,
        Err(resp) => return Ok(resp),
    };
    if let Some(resp) = deny_student_access(&storage, request, fee.student_id).await {
        return Ok(resp);
    }

    let student = match storage.get_student_by_id(fee.student_id).await {
        Ok(Some(student)) => student,
        Ok(None) => return Ok(not_found(ErrorCode::StudentNotFound, "Student not found")),
        Err(e) => return Ok(error_response(&e, ErrorCode::InternalServerError)),
    };

    let detail = match fee_detail(&storage, fee).await {
        Ok(detail) => detail,
        Err(e) => return Ok(error_response(&e, ErrorCode::InternalServerError)),
    };

    let new_payment = match plan_payment(
        &req,
        &detail.fee,
        detail.fee_type_name.as_deref(),
        &detail.ledger,
        &student,
        &payer,
        today(),
    ) {
        Ok(payment) => payment,
        Err(msg) => return Ok(bad_request(ErrorCode::PaymentInvalid, msg)),
    };

    let (payment, receipt) = match storage.record_payment(new_payment).await {
        Ok(result) => result,
        Err(e) => return Ok(error_response(&e, ErrorCode::InternalServerError)),
    };

    log_activity(
        &storage,
        "payment",
        format!(
            "Payment of {:.2} via {} recorded for fee {} ({})",
            payment.amount, payment.payment_method, payment.fee_id, receipt.receipt_number
        ),
        Some(payer.id),
        Some(request),
    )
    .await;

    if payer.role == UserRole::Parent {
        match storage.list_user_ids_by_role(UserRole::Admin).await {
            Ok(admins) => {
                let message = format!(
                    "{} paid {:.2} for {} (receipt {})",
                    payer.username, payment.amount, student.name, receipt.receipt_number
                );
                notify(&storage, &admins, Some(payer.id), &message, NotificationKind::Payment)
                    .await;
            }
            Err(e) => tracing::warn!("查询管理员失败: {}", e),
        }
    }

    // 缴费后的最新台账
    let ledger = match load_fee(&storage, payment.fee_id).await {
        Ok(fee) => match fee_detail(&storage, fee).await {
            Ok(detail) => detail.ledger,
            Err(e) => return Ok(error_response(&e, ErrorCode::InternalServerError)),
        },
        Err(resp) => return Ok(resp),
    };

    Ok(HttpResponse::Created().json(ApiResponse::success(
        PaymentResult {
            payment,
            receipt,
            ledger,
        },
        "缴费成功",
    )))
}

pub async fn list_receipts(
    service: &FeeService,
    query: PaginationQuery,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    match storage.list_receipts_with_pagination(query).await {
        Ok(page) => Ok(HttpResponse::Ok().json(ApiResponse::success(page, "收据列表获取成功"))),
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}

pub async fn get_receipt(
    service: &FeeService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let receipt = match storage.get_receipt_by_id(id).await {
        Ok(Some(receipt)) => receipt,
        Ok(None) => return Ok(receipt_not_found()),
        Err(e) => return Ok(error_response(&e, ErrorCode::InternalServerError)),
    };

    // 收据 -> 缴费 -> 费用 -> 学生
    let payment = match storage.get_payment_by_id(receipt.payment_id).await {
        Ok(Some(payment)) => payment,
        Ok(None) => return Ok(receipt_not_found()),
        Err(e) => return Ok(error_response(&e, ErrorCode::InternalServerError)),
    };
    let fee = match load_fee(&storage, payment.fee_id).await {
        Ok(fee) => fee,
        Err(resp) => return Ok(resp),
    };
    if let Some(resp) = deny_student_access(&storage, request, fee.student_id).await {
        return Ok(resp);
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(receipt, "收据获取成功")))
}

fn receipt_not_found() -> HttpResponse {
    not_found(ErrorCode::ReceiptNotFound, "Receipt not found")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fees::entities::{PaymentMethod, PaymentStatus};
    use crate::models::users::entities::UserStatus;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, 14).unwrap()
    }

    fn fee() -> Fee {
        let now = chrono::Utc::now();
        Fee {
            id: 11,
            student_id: 2,
            fee_type_id: Some(1),
            amount: 1000.0,
            due_date: None,
            paid: false,
            payment_date: None,
            academic_year: None,
            semester: None,
            description: None,
            late_fee_applicable: false,
            late_fee_rate: 0.0,
            father_name: None,
            mother_name: Some("Kavya".into()),
            guardian_name: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn ledger(remaining: f64) -> FeeLedger {
        FeeLedger {
            fee_id: 11,
            total_amount: 1000.0,
            discount_amount: 0.0,
            final_amount: 1000.0,
            total_paid: 1000.0 - remaining,
            remaining_amount: remaining,
            advance_amount: 0.0,
            days_overdue: 0,
            late_fee: 0.0,
            status: PaymentStatus::Pending,
            due_date: None,
        }
    }

    fn student() -> Student {
        let now = chrono::Utc::now();
        Student {
            id: 2,
            name: "Nila".into(),
            roll_number: None,
            email: None,
            gender: None,
            date_of_birth: None,
            class_id: None,
            father_name: Some("Arun".into()),
            mother_name: None,
            guardian_name: None,
            phone: None,
            address: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn payer() -> User {
        let now = chrono::Utc::now();
        User {
            id: 5,
            username: "clerk".into(),
            email: "clerk@example.com".into(),
            password_hash: String::new(),
            role: UserRole::Admin,
            status: UserStatus::Active,
            display_name: None,
            phone: None,
            last_login: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn req(amount: Option<f64>, method: PaymentMethod) -> RecordPaymentRequest {
        RecordPaymentRequest {
            amount,
            payment_method: method,
            payment_date: None,
        }
    }

    #[test]
    fn test_amount_defaults_to_remaining_and_settles() {
        let p = plan_payment(
            &req(None, PaymentMethod::Cash),
            &fee(),
            Some("Exam"),
            &ledger(400.0),
            &student(),
            &payer(),
            date(),
        )
        .unwrap();
        assert_eq!(p.amount, 400.0);
        assert!(p.settles_fee);
        assert!(p.transaction_id.is_none());
        assert_eq!(p.notes, "Payment received for Exam");
        assert_eq!(p.issued_to, "Nila");
        // 优先使用费用上的家长快照
        assert_eq!(p.parent_name.as_deref(), Some("Kavya"));
        assert!(p.receipt_number.starts_with("RCP-20250714-"));
        assert_eq!(p.paid_on, date());
    }

    #[test]
    fn test_partial_online_payment() {
        let p = plan_payment(
            &req(Some(150.0), PaymentMethod::Upi),
            &fee(),
            None,
            &ledger(400.0),
            &student(),
            &payer(),
            date(),
        )
        .unwrap();
        assert!(!p.settles_fee);
        assert!(
            p.transaction_id
                .as_deref()
                .is_some_and(|t| t.starts_with("TXN-20250714-"))
        );
        assert_eq!(p.generated_by.as_deref(), Some("clerk"));
    }

    #[test]
    fn test_nothing_left_to_pay_is_rejected() {
        let err = plan_payment(
            &req(None, PaymentMethod::Cash),
            &fee(),
            None,
            &ledger(0.0),
            &student(),
            &payer(),
            date(),
        );
        assert!(err.is_err());
        assert!(
            plan_payment(
                &req(Some(-5.0), PaymentMethod::Cash),
                &fee(),
                None,
                &ledger(10.0),
                &student(),
                &payer(),
                date()
            )
            .is_err()
        );
    }
}
