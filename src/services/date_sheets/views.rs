//! 教师与家长视角的考试日程

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::collections::HashMap;
use std::sync::Arc;

use super::DateSheetService;
use crate::errors::SchoolDeskError;
use crate::middlewares::RequireJWT;
use crate::models::date_sheets::entities::{
    DateSheet, DateSheetDetail, DateSheetEntry, ExamScheduleItem,
};
use crate::models::date_sheets::requests::DateSheetListParams;
use crate::models::date_sheets::schedule::{exam_schedule as build_schedule, sheets_for_teacher};
use crate::models::subjects::requests::SubjectListParams;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::fees::ledger::today;
use crate::services::{children_of, error_response, not_found, unauthorized};
use crate::storage::Storage;

/// 已发布日程中与教师所授班级相关的部分
pub async fn teacher_date_sheets(
    service: &DateSheetService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let Some(user_id) = RequireJWT::extract_user_id(request) else {
        return Ok(unauthorized());
    };

    let teacher = match storage.get_teacher_by_user_id(user_id).await {
        Ok(Some(teacher)) => teacher,
        Ok(None) => {
            return Ok(not_found(
                ErrorCode::TeacherNotFound,
                "Teacher profile not found",
            ));
        }
        Err(e) => return Ok(error_response(&e, ErrorCode::InternalServerError)),
    };

    match load_teacher_sheets(&storage, teacher.id).await {
        Ok(sheets) => Ok(HttpResponse::Ok().json(ApiResponse::success(sheets, "考试日程获取成功"))),
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}

async fn load_teacher_sheets(
    storage: &Arc<dyn Storage>,
    teacher_id: i64,
) -> Result<Vec<DateSheetDetail>, SchoolDeskError> {
    let schedule = storage.list_teacher_schedule(teacher_id).await?;
    let mut classroom_ids: Vec<i64> = schedule.iter().filter_map(|e| e.classroom_id).collect();
    classroom_ids.sort_unstable();
    classroom_ids.dedup();

    let sheets = sheets_for_teacher(
        published_sheets(storage).await?,
        &classroom_ids,
        !schedule.is_empty(),
    );
    let ids: Vec<i64> = sheets.iter().map(|s| s.id).collect();
    let mut entries = group_by_sheet(storage.list_date_sheet_entries(&ids).await?);

    Ok(sheets
        .into_iter()
        .map(|date_sheet| DateSheetDetail {
            entries: entries.remove(&date_sheet.id).unwrap_or_default(),
            date_sheet,
        })
        .collect())
}

/// 家长的孩子们即将进行的考试
pub async fn exam_schedule(
    service: &DateSheetService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let Some(user_id) = RequireJWT::extract_user_id(request) else {
        return Ok(unauthorized());
    };

    match load_exam_schedule(&storage, user_id).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(items, "考试安排获取成功"))),
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}

async fn load_exam_schedule(
    storage: &Arc<dyn Storage>,
    user_id: i64,
) -> Result<Vec<ExamScheduleItem>, SchoolDeskError> {
    let student_ids = children_of(storage, user_id).await?;
    if student_ids.is_empty() {
        return Ok(Vec::new());
    }
    let children = storage.list_students_by_ids(&student_ids).await?;

    let today = today();
    let sheets: Vec<DateSheet> = published_sheets(storage)
        .await?
        .into_iter()
        .filter(|s| s.end_date >= today)
        .collect();
    let ids: Vec<i64> = sheets.iter().map(|s| s.id).collect();
    let entries = storage.list_date_sheet_entries(&ids).await?;

    let subject_names: HashMap<i64, String> = storage
        .list_subjects(SubjectListParams::default())
        .await?
        .into_iter()
        .map(|s| (s.id, s.name))
        .collect();

    Ok(build_schedule(&children, &sheets, entries, &subject_names, today))
}

async fn published_sheets(storage: &Arc<dyn Storage>) -> Result<Vec<DateSheet>, SchoolDeskError> {
    storage
        .list_date_sheets(DateSheetListParams {
            classroom_id: None,
            is_published: Some(true),
        })
        .await
}

fn group_by_sheet(entries: Vec<DateSheetEntry>) -> HashMap<i64, Vec<DateSheetEntry>> {
    let mut grouped: HashMap<i64, Vec<DateSheetEntry>> = HashMap::new();
    for entry in entries {
        grouped.entry(entry.date_sheet_id).or_default().push(entry);
    }
    grouped
}
