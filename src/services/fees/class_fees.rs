//! 班级收费标准与按班级批量生成费用

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::Datelike;
use std::collections::HashMap;

use super::FeeService;
use super::fee_types::fee_type_not_found;
use super::fees::{build_new_fee, validate_amounts};
use crate::middlewares::RequireJWT;
use crate::models::classrooms::entities::Classroom;
use crate::models::fees::entities::{ClassFee, Fee, FeeType, NewClassFee, NewFee};
use crate::models::fees::requests::{
    AdjustClassFeeRequest, ClassFeeListParams, CreateFeeRequest, SetupClassFeeRequest,
};
use crate::models::fees::responses::ClassFeeGeneration;
use crate::models::students::entities::Student;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::activity::log_activity;
use crate::services::{bad_request, error_response, not_found};
use crate::utils::money::round2;

/// 请求未指定学年时依次取班级学年、当前年份
pub fn resolve_academic_year(requested: Option<String>, classroom: &Classroom) -> String {
    requested
        .map(|y| y.trim().to_string())
        .filter(|y| !y.is_empty())
        .or_else(|| classroom.academic_year.clone())
        .unwrap_or_else(|| chrono::Utc::now().year().to_string())
}

pub fn build_class_fee(
    classroom_id: i64,
    req: SetupClassFeeRequest,
    fee_type: &FeeType,
    academic_year: String,
) -> Result<NewClassFee, String> {
    let base_amount = req
        .base_amount
        .or(fee_type.default_amount)
        .ok_or_else(|| "base_amount is required when the fee type has no default".to_string())?;
    validate_amounts(Some(base_amount), req.late_fee_rate)?;

    Ok(NewClassFee {
        classroom_id,
        fee_type_id: fee_type.id,
        academic_year,
        semester: req.semester,
        base_amount: round2(base_amount),
        due_date: req.due_date,
        late_fee_applicable: req.late_fee_applicable.unwrap_or(true),
        late_fee_rate: req.late_fee_rate.unwrap_or(0.0),
        description: req.description,
    })
}

/// 为班级内每个在读学生生成尚未存在的费用
///
/// 已有同费用类型、同学年费用的学生跳过；返回待创建的费用与跳过数。
pub fn plan_generation(
    students: &[Student],
    class_fees: &[ClassFee],
    fee_types: &HashMap<i64, FeeType>,
    existing: &[Fee],
    academic_year: &str,
) -> Result<(Vec<NewFee>, usize), String> {
    let mut planned = Vec::new();
    let mut skipped = 0;

    for student in students.iter().filter(|s| s.is_active) {
        for class_fee in class_fees.iter().filter(|f| f.is_active) {
            let already_billed = existing.iter().any(|fee| {
                fee.student_id == student.id
                    && fee.fee_type_id == Some(class_fee.fee_type_id)
                    && fee.academic_year.as_deref() == Some(academic_year)
            });
            if already_billed {
                skipped += 1;
                continue;
            }

            let req = CreateFeeRequest {
                student_id: student.id,
                fee_type_id: Some(class_fee.fee_type_id),
                amount: Some(class_fee.current_amount()),
                due_date: class_fee.due_date,
                academic_year: Some(academic_year.to_string()),
                semester: class_fee.semester.clone(),
                description: class_fee.description.clone(),
                late_fee_applicable: Some(class_fee.late_fee_applicable),
                late_fee_rate: Some(class_fee.late_fee_rate),
            };
            planned.push(build_new_fee(
                req,
                student,
                fee_types.get(&class_fee.fee_type_id),
            )?);
        }
    }

    Ok((planned, skipped))
}

pub async fn list_class_fees(
    service: &FeeService,
    classroom_id: i64,
    query: ClassFeeListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let classroom = match storage.get_classroom_by_id(classroom_id).await {
        Ok(Some(classroom)) => classroom,
        Ok(None) => return Ok(classroom_not_found()),
        Err(e) => return Ok(error_response(&e, ErrorCode::InternalServerError)),
    };

    let academic_year = resolve_academic_year(query.academic_year, &classroom);
    match storage.list_class_fees(classroom_id, &academic_year).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(items, "班级收费标准获取成功"))),
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}

// 同一费用类型与学年重复提交时覆盖原标准
pub async fn setup_class_fee(
    service: &FeeService,
    classroom_id: i64,
    req: SetupClassFeeRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let classroom = match storage.get_classroom_by_id(classroom_id).await {
        Ok(Some(classroom)) => classroom,
        Ok(None) => return Ok(classroom_not_found()),
        Err(e) => return Ok(error_response(&e, ErrorCode::InternalServerError)),
    };

    let fee_type = match storage.get_fee_type_by_id(req.fee_type_id).await {
        Ok(Some(fee_type)) => fee_type,
        Ok(None) => return Ok(fee_type_not_found()),
        Err(e) => return Ok(error_response(&e, ErrorCode::InternalServerError)),
    };

    let academic_year = resolve_academic_year(req.academic_year.clone(), &classroom);
    let new_fee = match build_class_fee(classroom_id, req, &fee_type, academic_year) {
        Ok(fee) => fee,
        Err(msg) => return Ok(bad_request(ErrorCode::ValidationFailed, msg)),
    };

    match storage.upsert_class_fee(new_fee).await {
        Ok(class_fee) => {
            log_activity(
                &storage,
                "fee",
                format!(
                    "Class fee {} set to {:.2} for {}",
                    fee_type.name,
                    class_fee.current_amount(),
                    classroom.name
                ),
                RequireJWT::extract_user_id(request),
                Some(request),
            )
            .await;
            Ok(HttpResponse::Ok().json(ApiResponse::success(class_fee, "班级收费标准已保存")))
        }
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}

pub async fn adjust_class_fee(
    service: &FeeService,
    classroom_id: i64,
    class_fee_id: i64,
    req: AdjustClassFeeRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let class_fee = match storage.get_class_fee_by_id(class_fee_id).await {
        Ok(Some(fee)) if fee.classroom_id == classroom_id => fee,
        Ok(_) => return Ok(class_fee_not_found()),
        Err(e) => return Ok(error_response(&e, ErrorCode::InternalServerError)),
    };

    let adjustment = round2(req.adjustment_amount);
    if !adjustment.is_finite() || class_fee.base_amount + adjustment <= 0.0 {
        return Ok(bad_request(
            ErrorCode::ValidationFailed,
            "Adjusted amount must stay greater than zero",
        ));
    }

    let adjusted_by = RequireJWT::extract_user_id(request);
    let reason = req
        .adjustment_reason
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty());
    match storage
        .adjust_class_fee(class_fee_id, adjustment, reason, adjusted_by)
        .await
    {
        Ok(Some(updated)) => {
            log_activity(
                &storage,
                "fee",
                format!(
                    "Class fee {} adjusted by {:.2} to {:.2}",
                    updated.id,
                    adjustment,
                    updated.current_amount()
                ),
                adjusted_by,
                Some(request),
            )
            .await;
            Ok(HttpResponse::Ok().json(ApiResponse::success(updated, "班级收费标准已调整")))
        }
        Ok(None) => Ok(class_fee_not_found()),
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}

/// 按班级收费标准为班级学生批量生成费用，整批在一个事务中写入
pub async fn generate_class_fees(
    service: &FeeService,
    classroom_id: i64,
    query: ClassFeeListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let classroom = match storage.get_classroom_by_id(classroom_id).await {
        Ok(Some(classroom)) => classroom,
        Ok(None) => return Ok(classroom_not_found()),
        Err(e) => return Ok(error_response(&e, ErrorCode::InternalServerError)),
    };
    let academic_year = resolve_academic_year(query.academic_year, &classroom);

    let loaded = async {
        let students = storage.list_students_in_classroom(classroom_id).await?;
        let class_fees = storage.list_class_fees(classroom_id, &academic_year).await?;
        let fee_types: HashMap<i64, FeeType> = storage
            .list_fee_types()
            .await?
            .into_iter()
            .map(|t| (t.id, t))
            .collect();
        let student_ids: Vec<i64> = students.iter().map(|s| s.id).collect();
        let existing = storage.list_fees_by_students(&student_ids).await?;
        Ok::<_, crate::errors::SchoolDeskError>((students, class_fees, fee_types, existing))
    }
    .await;
    let (students, class_fees, fee_types, existing) = match loaded {
        Ok(loaded) => loaded,
        Err(e) => return Ok(error_response(&e, ErrorCode::InternalServerError)),
    };

    let (planned, skipped) =
        match plan_generation(&students, &class_fees, &fee_types, &existing, &academic_year) {
            Ok(plan) => plan,
            Err(msg) => return Ok(bad_request(ErrorCode::ValidationFailed, msg)),
        };

    let fees = match storage.create_fees(planned).await {
        Ok(fees) => fees,
        Err(e) => return Ok(error_response(&e, ErrorCode::InternalServerError)),
    };

    log_activity(
        &storage,
        "fee",
        format!(
            "Generated {} fees for {} ({} students)",
            fees.len(),
            classroom.name,
            students.len()
        ),
        RequireJWT::extract_user_id(request),
        Some(request),
    )
    .await;

    Ok(HttpResponse::Created().json(ApiResponse::success(
        ClassFeeGeneration {
            classroom_id,
            academic_year,
            students: students.len(),
            skipped,
            fees,
        },
        "班级费用生成成功",
    )))
}

fn classroom_not_found() -> HttpResponse {
    not_found(ErrorCode::ClassroomNotFound, "Classroom not found")
}

fn class_fee_not_found() -> HttpResponse {
    not_found(ErrorCode::ClassFeeNotFound, "Class fee not found")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::classrooms::entities::ClassroomStatus;

    fn student(id: i64, active: bool) -> Student {
        let now = chrono::Utc::now();
        Student {
            id,
            name: format!("Student {id}"),
            roll_number: None,
            email: None,
            gender: None,
            date_of_birth: None,
            class_id: Some(3),
            father_name: Some("Suresh".into()),
            mother_name: None,
            guardian_name: Some("Anil".into()),
            phone: None,
            address: None,
            is_active: active,
            created_at: now,
            updated_at: now,
        }
    }

    fn fee_type(id: i64) -> FeeType {
        FeeType {
            id,
            name: "Bus".into(),
            description: None,
            is_recurring: true,
            frequency: Some("monthly".into()),
            default_amount: Some(1500.0),
            is_active: true,
            created_at: chrono::Utc::now(),
        }
    }

    fn class_fee(fee_type_id: i64, base: f64, adjustment: f64) -> ClassFee {
        let now = chrono::Utc::now();
        ClassFee {
            id: fee_type_id * 10,
            classroom_id: 3,
            fee_type_id,
            academic_year: "2025-2026".into(),
            semester: Some("1".into()),
            base_amount: base,
            adjustment_amount: adjustment,
            adjustment_reason: None,
            adjusted_by: None,
            adjusted_at: None,
            due_date: None,
            late_fee_applicable: true,
            late_fee_rate: 0.5,
            description: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn billed(student_id: i64, fee_type_id: i64, year: &str) -> Fee {
        let now = chrono::Utc::now();
        Fee {
            id: 100 + student_id,
            student_id,
            fee_type_id: Some(fee_type_id),
            amount: 10.0,
            due_date: None,
            paid: false,
            payment_date: None,
            academic_year: Some(year.into()),
            semester: None,
            description: None,
            late_fee_applicable: false,
            late_fee_rate: 0.0,
            father_name: None,
            mother_name: None,
            guardian_name: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn classroom(academic_year: Option<&str>) -> Classroom {
        let now = chrono::Utc::now();
        Classroom {
            id: 3,
            name: "6-B".into(),
            grade: None,
            section: None,
            stream: None,
            academic_year: academic_year.map(String::from),
            capacity: None,
            class_teacher_id: None,
            room: None,
            status: ClassroomStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_generation_skips_billed_and_inactive_students() {
        let students = [student(1, true), student(2, true), student(3, false)];
        let class_fees = [class_fee(7, 1500.0, -250.0)];
        let types = HashMap::from([(7, fee_type(7))]);
        let existing = [billed(2, 7, "2025-2026"), billed(1, 7, "2024-2025")];

        let (planned, skipped) =
            plan_generation(&students, &class_fees, &types, &existing, "2025-2026").unwrap();
        assert_eq!(skipped, 1);
        assert_eq!(planned.len(), 1);

        let fee = &planned[0];
        assert_eq!(fee.student_id, 1);
        assert_eq!(fee.amount, 1250.0);
        assert_eq!(fee.academic_year.as_deref(), Some("2025-2026"));
        assert_eq!(fee.late_fee_rate, 0.5);
        // 与单笔创建一致的家长姓名快照
        assert_eq!(fee.father_name.as_deref(), Some("Suresh"));
        assert_eq!(fee.guardian_name.as_deref(), Some("Anil"));
    }

    #[test]
    fn test_inactive_class_fee_is_not_billed() {
        let mut paused = class_fee(7, 800.0, 0.0);
        paused.is_active = false;
        let types = HashMap::from([(7, fee_type(7))]);
        let (planned, skipped) =
            plan_generation(&[student(1, true)], &[paused], &types, &[], "2025-2026").unwrap();
        assert!(planned.is_empty());
        assert_eq!(skipped, 0);
    }

    #[test]
    fn test_base_amount_falls_back_to_fee_type_default() {
        let req = SetupClassFeeRequest {
            fee_type_id: 7,
            base_amount: None,
            academic_year: None,
            semester: None,
            due_date: None,
            description: None,
            late_fee_applicable: None,
            late_fee_rate: None,
        };
        let fee = build_class_fee(3, req, &fee_type(7), "2025-2026".into()).unwrap();
        assert_eq!(fee.base_amount, 1500.0);
        assert!(fee.late_fee_applicable);
    }

    #[test]
    fn test_academic_year_resolution() {
        assert_eq!(
            resolve_academic_year(Some(" 2026-2027 ".into()), &classroom(Some("2025-2026"))),
            "2026-2027"
        );
        assert_eq!(
            resolve_academic_year(Some(String::new()), &classroom(Some("2025-2026"))),
            "2025-2026"
        );
        assert_eq!(
            resolve_academic_year(None, &classroom(None)),
            chrono::Utc::now().year().to_string()
        );
    }
}
