//! 课表条目与冲突检测

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{TimetableService, check_classroom, timetable_not_found};
use crate::models::timetable::conflict::{CandidateSlot, find_conflict};
use crate::models::timetable::entities::TimetableEntry;
use crate::models::timetable::requests::CreateEntryRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, error_response, not_found};

/// 合并本课表与其他启用课表在同一天的条目（按 ID 去重）
pub fn merge_same_day(
    own: Vec<TimetableEntry>,
    active: Vec<TimetableEntry>,
    day_of_week: i32,
) -> Vec<TimetableEntry> {
    let mut merged: Vec<TimetableEntry> = own
        .into_iter()
        .filter(|e| e.day_of_week == day_of_week)
        .collect();
    for entry in active {
        if !merged.iter().any(|e| e.id == entry.id) {
            merged.push(entry);
        }
    }
    merged
}

pub async fn list_entries(
    service: &TimetableService,
    timetable_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.get_timetable_by_id(timetable_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return Ok(timetable_not_found()),
        Err(e) => return Ok(error_response(&e, ErrorCode::InternalServerError)),
    }

    match storage.list_timetable_entries(timetable_id).await {
        Ok(entries) => Ok(HttpResponse::Ok().json(ApiResponse::success(entries, "课表条目获取成功"))),
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}

pub async fn add_entry(
    service: &TimetableService,
    timetable_id: i64,
    req: CreateEntryRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let mut candidate = match CandidateSlot::new(
        timetable_id,
        req.day_of_week,
        req.period_number,
        &req.start_time,
        &req.end_time,
    ) {
        Ok(slot) => slot,
        Err(msg) => return Ok(bad_request(ErrorCode::ValidationFailed, msg)),
    };

    let storage = service.get_storage(request)?;

    let timetable = match storage.get_timetable_by_id(timetable_id).await {
        Ok(Some(timetable)) => timetable,
        Ok(None) => return Ok(timetable_not_found()),
        Err(e) => return Ok(error_response(&e, ErrorCode::InternalServerError)),
    };

    if let Some(resp) = check_classroom(&storage, req.classroom_id).await {
        return Ok(resp);
    }
    if let Some(subject_id) = req.subject_id {
        match storage.get_subject_by_id(subject_id).await {
            Ok(Some(_)) => {}
            Ok(None) => return Ok(not_found(ErrorCode::SubjectNotFound, "Subject not found")),
            Err(e) => return Ok(error_response(&e, ErrorCode::InternalServerError)),
        }
    }
    if let Some(teacher_id) = req.teacher_id {
        match storage.get_teacher_by_id(teacher_id).await {
            Ok(Some(_)) => {}
            Ok(None) => return Ok(not_found(ErrorCode::TeacherNotFound, "Teacher not found")),
            Err(e) => return Ok(error_response(&e, ErrorCode::InternalServerError)),
        }
    }

    candidate.teacher_id = req.teacher_id;
    candidate.classroom_id = req.classroom_id.or(timetable.classroom_id);
    candidate.is_break_period = req.is_break_period;

    // 本课表可能尚未启用，需单独取其条目
    let own = match storage.list_timetable_entries(timetable_id).await {
        Ok(entries) => entries,
        Err(e) => return Ok(error_response(&e, ErrorCode::InternalServerError)),
    };
    let active = match storage.list_active_entries_on_day(req.day_of_week).await {
        Ok(entries) => entries,
        Err(e) => return Ok(error_response(&e, ErrorCode::InternalServerError)),
    };
    let same_day = merge_same_day(own, active, req.day_of_week);

    if let Some(conflict) = find_conflict(&candidate, &same_day) {
        return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::TimetableConflict,
            conflict.to_string(),
        )));
    }

    match storage.create_timetable_entry(timetable_id, req).await {
        Ok(entry) => Ok(HttpResponse::Created().json(ApiResponse::success(entry, "课表条目添加成功"))),
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}

pub async fn delete_entry(
    service: &TimetableService,
    timetable_id: i64,
    entry_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    match storage.delete_timetable_entry(timetable_id, entry_id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty("课表条目删除成功"))),
        Ok(false) => Ok(not_found(
            ErrorCode::TimetableEntryNotFound,
            "Timetable entry not found",
        )),
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: i64, timetable_id: i64, day: i32) -> TimetableEntry {
        TimetableEntry {
            id,
            timetable_id,
            day_of_week: day,
            period_number: 1,
            start_time: "09:00".into(),
            end_time: "09:45".into(),
            subject_id: None,
            teacher_id: Some(3),
            classroom_id: None,
            room_number: None,
            is_lab_period: false,
            is_break_period: false,
            notes: None,
            created_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_merge_same_day_dedups_and_filters_day() {
        let own = vec![entry(1, 7, 2), entry(2, 7, 3)];
        let active = vec![entry(1, 7, 2), entry(5, 8, 2)];
        let merged = merge_same_day(own, active, 2);
        let ids: Vec<i64> = merged.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 5]);
    }

    #[test]
    fn test_inactive_timetable_slot_still_detected() {
        // 本课表未启用时其条目不在 active 中
        let same_day = merge_same_day(vec![entry(1, 7, 2)], vec![], 2);
        let candidate = CandidateSlot::new(7, 2, 1, "10:00", "10:45").unwrap();
        assert!(find_conflict(&candidate, &same_day).is_some());
    }
}
