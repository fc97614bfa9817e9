use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::utils::money::round2;

// 考勤记录（每名学生每天一条）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct AttendanceRecord {
    pub id: i64,
    pub student_id: i64,
    pub date: NaiveDate,
    pub present: bool,
    pub marked_by: Option<i64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 出勤统计
#[derive(Debug, Clone, Serialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct AttendanceSummary {
    pub student_id: i64,
    pub total_days: u32,
    pub present_days: u32,
    pub absent_days: u32,
    pub percentage: f64,
}

impl AttendanceSummary {
    pub fn from_records(student_id: i64, records: &[AttendanceRecord]) -> Self {
        let total_days = records.len() as u32;
        let present_days = records.iter().filter(|r| r.present).count() as u32;
        let percentage = if total_days == 0 {
            0.0
        } else {
            round2(present_days as f64 * 100.0 / total_days as f64)
        };
        Self {
            student_id,
            total_days,
            present_days,
            absent_days: total_days - present_days,
            percentage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(day: u32, present: bool) -> AttendanceRecord {
        let now = chrono::Utc::now();
        AttendanceRecord {
            id: day as i64,
            student_id: 3,
            date: NaiveDate::from_ymd_opt(2025, 3, day).unwrap(),
            present,
            marked_by: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_empty_summary_is_zero_percent() {
        let summary = AttendanceSummary::from_records(3, &[]);
        assert_eq!(summary.total_days, 0);
        assert_eq!(summary.percentage, 0.0);
    }

    #[test]
    fn test_percentage_rounded_to_two_decimals() {
        let records = vec![record(1, true), record(2, false), record(3, true)];
        let summary = AttendanceSummary::from_records(3, &records);
        assert_eq!(summary.total_days, 3);
        assert_eq!(summary.present_days, 2);
        assert_eq!(summary.absent_days, 1);
        assert_eq!(summary.percentage, 66.67);
    }
}
