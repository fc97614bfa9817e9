//! 考勤登记与统计

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::collections::HashMap;
use std::sync::Arc;

use crate::middlewares::RequireJWT;
use crate::models::attendance::entities::AttendanceSummary;
use crate::models::attendance::requests::{
    AttendanceListParams, AttendanceMark, AttendanceSummaryParams, MarkAttendanceRequest,
};
use crate::models::students::entities::Student;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::activity::log_activity;
use crate::storage::Storage;

pub struct AttendanceService {
    storage: Option<Arc<dyn Storage>>,
}

/// 同一学生出现多次时以最后一条为准，保持首次出现的顺序
pub fn dedup_marks(marks: Vec<AttendanceMark>) -> Vec<AttendanceMark> {
    let mut order: Vec<i64> = Vec::new();
    let mut latest: HashMap<i64, AttendanceMark> = HashMap::new();
    for mark in marks {
        if !latest.contains_key(&mark.student_id) {
            order.push(mark.student_id);
        }
        latest.insert(mark.student_id, mark);
    }
    order
        .into_iter()
        .filter_map(|id| latest.remove(&id))
        .collect()
}

/// 找出不存在或不在指定班级的学生
pub fn invalid_students(
    requested: &[i64],
    found: &[Student],
    classroom_id: Option<i64>,
) -> Vec<i64> {
    requested
        .iter()
        .copied()
        .filter(|id| match found.iter().find(|s| s.id == *id) {
            None => true,
            Some(student) => classroom_id.is_some_and(|c| student.class_id != Some(c)),
        })
        .collect()
}

impl AttendanceService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    pub async fn mark_attendance(
        &self,
        req: MarkAttendanceRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let marks = dedup_marks(req.records);
        if marks.is_empty() {
            return Ok(super::bad_request(
                ErrorCode::ValidationFailed,
                "At least one attendance record is required",
            ));
        }

        let storage = self.get_storage(request)?;

        if let Some(classroom_id) = req.classroom_id {
            match storage.get_classroom_by_id(classroom_id).await {
                Ok(Some(_)) => {}
                Ok(None) => {
                    return Ok(super::not_found(
                        ErrorCode::ClassroomNotFound,
                        "Classroom not found",
                    ));
                }
                Err(e) => return Ok(super::error_response(&e, ErrorCode::InternalServerError)),
            }
        }

        let ids: Vec<i64> = marks.iter().map(|m| m.student_id).collect();
        let students = match storage.list_students_by_ids(&ids).await {
            Ok(students) => students,
            Err(e) => return Ok(super::error_response(&e, ErrorCode::InternalServerError)),
        };
        let invalid = invalid_students(&ids, &students, req.classroom_id);
        if !invalid.is_empty() {
            return Ok(super::bad_request(
                ErrorCode::ValidationFailed,
                format!("Unknown students or not in this classroom: {invalid:?}"),
            ));
        }

        let marked_by = RequireJWT::extract_user_id(request);
        match storage.upsert_attendance(req.date, &marks, marked_by).await {
            Ok(records) => {
                log_activity(
                    &storage,
                    "attendance",
                    format!("Attendance marked for {} student(s) on {}", records.len(), req.date),
                    marked_by,
                    Some(request),
                )
                .await;
                Ok(HttpResponse::Ok().json(ApiResponse::success(records, "考勤登记成功")))
            }
            Err(e) => Ok(super::error_response(&e, ErrorCode::InternalServerError)),
        }
    }

    pub async fn list_attendance(
        &self,
        query: AttendanceListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        match storage.list_attendance(query).await {
            Ok(records) => Ok(HttpResponse::Ok().json(ApiResponse::success(records, "考勤列表获取成功"))),
            Err(e) => Ok(super::error_response(&e, ErrorCode::InternalServerError)),
        }
    }

    // 家长只能查看自己孩子
    pub async fn student_summary(
        &self,
        student_id: i64,
        query: AttendanceSummaryParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        if let (Some(from), Some(to)) = (query.from, query.to)
            && to < from
        {
            return Ok(super::bad_request(
                ErrorCode::ValidationFailed,
                "`to` must not be before `from`",
            ));
        }

        let storage = self.get_storage(request)?;

        match storage.get_student_by_id(student_id).await {
            Ok(Some(_)) => {}
            Ok(None) => return Ok(super::students::student_not_found()),
            Err(e) => return Ok(super::error_response(&e, ErrorCode::InternalServerError)),
        }
        if let Some(resp) = super::deny_student_access(&storage, request, student_id).await {
            return Ok(resp);
        }

        match storage
            .list_student_attendance(student_id, query.from, query.to)
            .await
        {
            Ok(records) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                AttendanceSummary::from_records(student_id, &records),
                "出勤统计获取成功",
            ))),
            Err(e) => Ok(super::error_response(&e, ErrorCode::InternalServerError)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mark(student_id: i64, present: bool) -> AttendanceMark {
        AttendanceMark {
            student_id,
            present,
        }
    }

    fn student(id: i64, class_id: Option<i64>) -> Student {
        let now = chrono::Utc::now();
        Student {
            id,
            name: format!("s{id}"),
            roll_number: None,
            email: None,
            gender: None,
            date_of_birth: None,
            class_id,
            father_name: None,
            mother_name: None,
            guardian_name: None,
            phone: None,
            address: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_dedup_marks_last_wins() {
        let marks = dedup_marks(vec![mark(2, true), mark(1, true), mark(2, false)]);
        assert_eq!(marks.len(), 2);
        assert_eq!(marks[0].student_id, 2);
        assert!(!marks[0].present);
        assert_eq!(marks[1].student_id, 1);
    }

    #[test]
    fn test_invalid_students() {
        let found = vec![student(1, Some(10)), student(2, Some(11))];
        assert_eq!(invalid_students(&[1, 2, 3], &found, None), vec![3]);
        assert_eq!(invalid_students(&[1, 2], &found, Some(10)), vec![2]);
        assert!(invalid_students(&[1], &found, Some(10)).is_empty());
    }
}
