//! 考试日程校验与按班级筛选

use std::collections::HashMap;

use chrono::NaiveDate;

use super::entities::{DateSheet, DateSheetEntry, ExamScheduleItem};
use super::requests::{CreateDateSheetEntryRequest, CreateDateSheetRequest};
use crate::models::students::entities::Student;
use crate::models::timetable::conflict::parse_hhmm;

pub fn validate_date_sheet(req: &CreateDateSheetRequest) -> Result<(), String> {
    if req.title.trim().is_empty() {
        return Err("Date sheet title is required".to_string());
    }
    if req.exam_type.trim().is_empty() {
        return Err("Exam type is required".to_string());
    }
    if req.end_date < req.start_date {
        return Err("end_date cannot be earlier than start_date".to_string());
    }
    Ok(())
}

/// 场次必须落在日程的日期范围内，且开始早于结束
pub fn validate_entry(sheet: &DateSheet, req: &CreateDateSheetEntryRequest) -> Result<(), String> {
    if req.exam_date < sheet.start_date || req.exam_date > sheet.end_date {
        return Err(format!(
            "exam_date must be between {} and {}",
            sheet.start_date, sheet.end_date
        ));
    }
    let start = parse_hhmm(&req.start_time)
        .ok_or_else(|| format!("Invalid start_time '{}', expected HH:MM", req.start_time))?;
    let end = parse_hhmm(&req.end_time)
        .ok_or_else(|| format!("Invalid end_time '{}', expected HH:MM", req.end_time))?;
    if start >= end {
        return Err("start_time must be earlier than end_time".to_string());
    }
    if let Some(marks) = req.max_marks
        && marks <= 0
    {
        return Err("max_marks must be positive".to_string());
    }
    Ok(())
}

/// 教师可见的日程：所授班级的日程；有课时再加上全校通用的日程
pub fn sheets_for_teacher(sheets: Vec<DateSheet>, classroom_ids: &[i64], teaches: bool) -> Vec<DateSheet> {
    sheets
        .into_iter()
        .filter(|sheet| match sheet.classroom_id {
            Some(id) => classroom_ids.contains(&id),
            None => teaches,
        })
        .collect()
}

/// 按孩子展开未结束日程中的场次，按考试日期与开始时间排序
///
/// 场次的班级优先，其次取日程的班级；两者都为空时适用于每个孩子。
pub fn exam_schedule(
    children: &[Student],
    sheets: &[DateSheet],
    entries: Vec<DateSheetEntry>,
    subject_names: &HashMap<i64, String>,
    today: NaiveDate,
) -> Vec<ExamScheduleItem> {
    let sheets: HashMap<i64, &DateSheet> = sheets
        .iter()
        .filter(|s| s.is_published && s.end_date >= today)
        .map(|s| (s.id, s))
        .collect();

    let mut items = Vec::new();
    for entry in entries {
        let Some(sheet) = sheets.get(&entry.date_sheet_id) else {
            continue;
        };
        let classroom_id = entry.classroom_id.or(sheet.classroom_id);
        for child in children {
            if classroom_id.is_some() && child.class_id != classroom_id {
                continue;
            }
            items.push(ExamScheduleItem {
                date_sheet_id: sheet.id,
                date_sheet_title: sheet.title.clone(),
                exam_type: sheet.exam_type.clone(),
                exam_date: entry.exam_date,
                start_time: entry.start_time.clone(),
                end_time: entry.end_time.clone(),
                subject_id: entry.subject_id,
                subject_name: entry.subject_id.and_then(|id| subject_names.get(&id).cloned()),
                student_id: child.id,
                child_name: child.name.clone(),
                classroom_id: child.class_id,
                venue: entry.venue.clone(),
                room_number: entry.room_number.clone(),
                max_marks: entry.max_marks,
            });
        }
    }

    items.sort_by(|a, b| {
        (a.exam_date, &a.start_time, &a.child_name).cmp(&(b.exam_date, &b.start_time, &b.child_name))
    });
    items
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 11, d).unwrap()
    }

    fn sheet(id: i64, classroom_id: Option<i64>, end: u32) -> DateSheet {
        DateSheet {
            id,
            title: format!("Mid-term {id}"),
            description: None,
            classroom_id,
            academic_year: Some("2025-2026".into()),
            exam_type: "midterm".into(),
            start_date: day(3),
            end_date: day(end),
            is_active: true,
            is_published: true,
            created_by: None,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    fn entry(id: i64, sheet_id: i64, date: u32, start: &str, classroom_id: Option<i64>) -> DateSheetEntry {
        DateSheetEntry {
            id,
            date_sheet_id: sheet_id,
            exam_date: day(date),
            start_time: start.into(),
            end_time: "12:00".into(),
            subject_id: Some(7),
            classroom_id,
            max_marks: Some(100),
            venue: Some("Hall A".into()),
            room_number: None,
            special_instructions: None,
            created_at: chrono::Utc::now(),
        }
    }

    fn child(id: i64, name: &str, class_id: Option<i64>) -> Student {
        Student {
            id,
            name: name.into(),
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
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    fn entry_req(date: u32, start: &str, end: &str) -> CreateDateSheetEntryRequest {
        CreateDateSheetEntryRequest {
            exam_date: day(date),
            start_time: start.into(),
            end_time: end.into(),
            subject_id: None,
            classroom_id: None,
            max_marks: None,
            venue: None,
            room_number: None,
            special_instructions: None,
        }
    }

    #[test]
    fn test_entry_must_fit_the_sheet_window() {
        let sheet = sheet(1, None, 10);
        assert!(validate_entry(&sheet, &entry_req(5, "09:00", "12:00")).is_ok());
        assert!(validate_entry(&sheet, &entry_req(2, "09:00", "12:00")).is_err());
        assert!(validate_entry(&sheet, &entry_req(11, "09:00", "12:00")).is_err());
        assert!(validate_entry(&sheet, &entry_req(5, "12:00", "09:00")).is_err());
        assert!(validate_entry(&sheet, &entry_req(5, "9am", "12:00")).is_err());
    }

    #[test]
    fn test_sheet_dates_in_order() {
        let mut req = CreateDateSheetRequest {
            title: "Finals".into(),
            description: None,
            classroom_id: None,
            academic_year: None,
            exam_type: "final".into(),
            start_date: day(10),
            end_date: day(10),
        };
        assert!(validate_date_sheet(&req).is_ok());
        req.end_date = day(9);
        assert!(validate_date_sheet(&req).is_err());
    }

    #[test]
    fn test_teacher_sees_own_classrooms_and_general_sheets() {
        let sheets = vec![sheet(1, Some(4), 10), sheet(2, Some(5), 10), sheet(3, None, 10)];
        let ids: Vec<i64> = sheets_for_teacher(sheets.clone(), &[4], true)
            .iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(ids, vec![1, 3]);
        assert!(sheets_for_teacher(sheets, &[], false).is_empty());
    }

    #[test]
    fn test_exam_schedule_matches_children_to_classrooms() {
        let children = [child(1, "Asha", Some(4)), child(2, "Kabir", Some(5))];
        let sheets = vec![sheet(1, Some(4), 10), sheet(2, None, 10), sheet(3, None, 4)];
        let entries = vec![
            entry(10, 1, 6, "09:00", None),
            entry(11, 2, 5, "10:00", None),
            entry(12, 2, 5, "08:00", Some(5)),
            entry(13, 3, 4, "09:00", None),
        ];
        let names = HashMap::from([(7, "Maths".to_string())]);

        let items = exam_schedule(&children, &sheets, entries, &names, day(5));
        let seen: Vec<(i64, &str)> = items
            .iter()
            .map(|i| (i.student_id, i.start_time.as_str()))
            .collect();
        // 通用场次给两个孩子，班级场次只给对应孩子，已结束的日程不出现
        assert_eq!(
            seen,
            vec![(2, "08:00"), (1, "10:00"), (2, "10:00"), (1, "09:00")]
        );
        assert_eq!(items[0].subject_name.as_deref(), Some("Maths"));
    }
}
