//! 课表条目校验与冲突检测

use super::entities::TimetableEntry;

/// 解析 HH:MM，返回当天分钟数
pub fn parse_hhmm(value: &str) -> Option<u32> {
    let (h, m) = value.trim().split_once(':')?;
    if h.is_empty() || h.len() > 2 || m.len() != 2 {
        return None;
    }
    let hours: u32 = h.parse().ok()?;
    let minutes: u32 = m.parse().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }
    Some(hours * 60 + minutes)
}

/// 待插入条目的时间槽
#[derive(Debug, Clone)]
pub struct CandidateSlot {
    pub timetable_id: i64,
    pub day_of_week: i32,
    pub period_number: i32,
    pub start: u32,
    pub end: u32,
    pub teacher_id: Option<i64>,
    pub classroom_id: Option<i64>,
    pub is_break_period: bool,
}

impl CandidateSlot {
    /// 校验星期、节次与时间段
    pub fn new(
        timetable_id: i64,
        day_of_week: i32,
        period_number: i32,
        start_time: &str,
        end_time: &str,
    ) -> Result<Self, String> {
        if !(0..=6).contains(&day_of_week) {
            return Err("day_of_week must be between 0 and 6".to_string());
        }
        if period_number < 1 {
            return Err("period_number must be at least 1".to_string());
        }
        let start = parse_hhmm(start_time)
            .ok_or_else(|| format!("Invalid start_time '{start_time}', expected HH:MM"))?;
        let end = parse_hhmm(end_time)
            .ok_or_else(|| format!("Invalid end_time '{end_time}', expected HH:MM"))?;
        if start >= end {
            return Err("start_time must be earlier than end_time".to_string());
        }
        Ok(Self {
            timetable_id,
            day_of_week,
            period_number,
            start,
            end,
            teacher_id: None,
            classroom_id: None,
            is_break_period: false,
        })
    }

    fn overlaps(&self, entry: &TimetableEntry) -> bool {
        match (parse_hhmm(&entry.start_time), parse_hhmm(&entry.end_time)) {
            (Some(start), Some(end)) => self.start < end && start < self.end,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryConflict {
    SlotTaken { day_of_week: i32, period_number: i32 },
    TeacherBusy { teacher_id: i64, entry_id: i64 },
    ClassroomBusy { classroom_id: i64, entry_id: i64 },
}

impl std::fmt::Display for EntryConflict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntryConflict::SlotTaken {
                day_of_week,
                period_number,
            } => write!(
                f,
                "Period {period_number} on day {day_of_week} is already scheduled in this timetable"
            ),
            EntryConflict::TeacherBusy {
                teacher_id,
                entry_id,
            } => write!(
                f,
                "Teacher {teacher_id} already teaches at an overlapping time (entry {entry_id})"
            ),
            EntryConflict::ClassroomBusy {
                classroom_id,
                entry_id,
            } => write!(
                f,
                "Classroom {classroom_id} is already in use at an overlapping time (entry {entry_id})"
            ),
        }
    }
}

/// 检测冲突
///
/// `same_day_entries` 为所有启用课表在同一天的条目（包含当前课表）。
pub fn find_conflict(
    candidate: &CandidateSlot,
    same_day_entries: &[TimetableEntry],
) -> Option<EntryConflict> {
    let same_day = same_day_entries
        .iter()
        .filter(|e| e.day_of_week == candidate.day_of_week);

    if same_day.clone().any(|e| {
        e.timetable_id == candidate.timetable_id && e.period_number == candidate.period_number
    }) {
        return Some(EntryConflict::SlotTaken {
            day_of_week: candidate.day_of_week,
            period_number: candidate.period_number,
        });
    }

    if candidate.is_break_period {
        return None;
    }

    let busy = same_day.filter(|e| !e.is_break_period && candidate.overlaps(e));

    for entry in busy {
        match (candidate.teacher_id, entry.teacher_id) {
            (Some(teacher_id), Some(other)) if teacher_id == other => {
                return Some(EntryConflict::TeacherBusy {
                    teacher_id,
                    entry_id: entry.id,
                });
            }
            _ => {}
        }
        match (candidate.classroom_id, entry.classroom_id) {
            (Some(classroom_id), Some(other)) if classroom_id == other => {
                return Some(EntryConflict::ClassroomBusy {
                    classroom_id,
                    entry_id: entry.id,
                });
            }
            _ => {}
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(
        id: i64,
        timetable_id: i64,
        period: i32,
        start: &str,
        end: &str,
        teacher: Option<i64>,
        classroom: Option<i64>,
    ) -> TimetableEntry {
        TimetableEntry {
            id,
            timetable_id,
            day_of_week: 1,
            period_number: period,
            start_time: start.to_string(),
            end_time: end.to_string(),
            subject_id: None,
            teacher_id: teacher,
            classroom_id: classroom,
            room_number: None,
            is_lab_period: false,
            is_break_period: false,
            notes: None,
            created_at: chrono::Utc::now(),
        }
    }

    fn candidate(timetable_id: i64, period: i32, start: &str, end: &str) -> CandidateSlot {
        CandidateSlot::new(timetable_id, 1, period, start, end).unwrap()
    }

    #[test]
    fn test_parse_hhmm() {
        assert_eq!(parse_hhmm("08:30"), Some(510));
        assert_eq!(parse_hhmm("9:05"), Some(545));
        assert_eq!(parse_hhmm("24:00"), None);
        assert_eq!(parse_hhmm("08:5"), None);
        assert_eq!(parse_hhmm("noon"), None);
    }

    #[test]
    fn test_candidate_validation() {
        assert!(CandidateSlot::new(1, 7, 1, "08:00", "09:00").is_err());
        assert!(CandidateSlot::new(1, 0, 0, "08:00", "09:00").is_err());
        assert!(CandidateSlot::new(1, 0, 1, "09:00", "09:00").is_err());
        assert!(CandidateSlot::new(1, 0, 1, "08:00", "08:45").is_ok());
    }

    #[test]
    fn test_same_period_in_same_timetable() {
        let existing = vec![entry(10, 1, 2, "09:00", "09:45", None, None)];
        let c = candidate(1, 2, "13:00", "13:45");
        assert_eq!(
            find_conflict(&c, &existing),
            Some(EntryConflict::SlotTaken {
                day_of_week: 1,
                period_number: 2
            })
        );
        // 另一张课表的同一节次不冲突
        let c = candidate(2, 2, "13:00", "13:45");
        assert_eq!(find_conflict(&c, &existing), None);
    }

    #[test]
    fn test_teacher_overlap_across_timetables() {
        let existing = vec![entry(11, 1, 1, "08:00", "08:45", Some(7), Some(100))];
        let mut c = candidate(2, 1, "08:30", "09:15");
        c.teacher_id = Some(7);
        c.classroom_id = Some(200);
        assert_eq!(
            find_conflict(&c, &existing),
            Some(EntryConflict::TeacherBusy {
                teacher_id: 7,
                entry_id: 11
            })
        );
    }

    #[test]
    fn test_adjacent_periods_do_not_overlap() {
        let existing = vec![entry(11, 1, 1, "08:00", "08:45", Some(7), Some(100))];
        let mut c = candidate(1, 2, "08:45", "09:30");
        c.teacher_id = Some(7);
        c.classroom_id = Some(100);
        assert_eq!(find_conflict(&c, &existing), None);
    }

    #[test]
    fn test_classroom_overlap() {
        let existing = vec![entry(12, 1, 1, "10:00", "10:45", Some(3), Some(100))];
        let mut c = candidate(2, 4, "10:15", "11:00");
        c.teacher_id = Some(4);
        c.classroom_id = Some(100);
        assert_eq!(
            find_conflict(&c, &existing),
            Some(EntryConflict::ClassroomBusy {
                classroom_id: 100,
                entry_id: 12
            })
        );
    }

    #[test]
    fn test_break_periods_never_conflict_on_resources() {
        let mut brk = entry(13, 1, 3, "11:00", "11:15", Some(7), Some(100));
        brk.is_break_period = true;
        let existing = vec![brk];
        let mut c = candidate(2, 3, "11:00", "11:30");
        c.teacher_id = Some(7);
        c.classroom_id = Some(100);
        assert_eq!(find_conflict(&c, &existing), None);

        let existing = vec![entry(14, 1, 1, "11:00", "11:45", Some(7), Some(100))];
        let mut c = candidate(2, 3, "11:00", "11:15");
        c.teacher_id = Some(7);
        c.is_break_period = true;
        assert_eq!(find_conflict(&c, &existing), None);
    }
}
