//! 家长查看孩子的费用与出勤

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::collections::HashMap;
use std::sync::Arc;

use super::ParentService;
use crate::errors::SchoolDeskError;
use crate::middlewares::RequireJWT;
use crate::models::attendance::entities::AttendanceSummary;
use crate::models::fees::responses::FeeDetail;
use crate::models::parents::responses::ChildOverview;
use crate::models::students::entities::Student;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{children_of, fees::fee_details};
use crate::storage::Storage;
use crate::utils::money::round2;

pub async fn my_children(
    service: &ParentService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let Some(user_id) = RequireJWT::extract_user_id(request) else {
        return Ok(crate::services::unauthorized());
    };

    match load_overviews(&storage, user_id).await {
        Ok(children) => {
            Ok(HttpResponse::Ok().json(ApiResponse::success(children, "孩子信息获取成功")))
        }
        Err(e) => Ok(crate::services::error_response(
            &e,
            ErrorCode::InternalServerError,
        )),
    }
}

async fn load_overviews(
    storage: &Arc<dyn Storage>,
    user_id: i64,
) -> Result<Vec<ChildOverview>, SchoolDeskError> {
    let student_ids = children_of(storage, user_id).await?;
    if student_ids.is_empty() {
        return Ok(Vec::new());
    }

    let students = storage.list_students_by_ids(&student_ids).await?;
    let fees = storage.list_fees_by_students(&student_ids).await?;
    let details = fee_details(storage, fees).await?;

    let mut overviews = Vec::with_capacity(students.len());
    let mut fees_by_student = group_by_student(details);
    for student in students {
        let records = storage
            .list_student_attendance(student.id, None, None)
            .await?;
        let attendance = AttendanceSummary::from_records(student.id, &records);
        let fees = fees_by_student.remove(&student.id).unwrap_or_default();
        overviews.push(overview(student, fees, attendance));
    }
    Ok(overviews)
}

fn group_by_student(details: Vec<FeeDetail>) -> HashMap<i64, Vec<FeeDetail>> {
    let mut grouped: HashMap<i64, Vec<FeeDetail>> = HashMap::new();
    for detail in details {
        grouped.entry(detail.fee.student_id).or_default().push(detail);
    }
    grouped
}

pub fn overview(student: Student, fees: Vec<FeeDetail>, attendance: AttendanceSummary) -> ChildOverview {
    let total_outstanding = round2(fees.iter().map(|f| f.ledger.remaining_amount).sum());
    ChildOverview {
        student,
        fees,
        total_outstanding,
        attendance,
    }
}
