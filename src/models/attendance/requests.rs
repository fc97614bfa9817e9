use chrono::NaiveDate;
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct AttendanceMark {
    pub student_id: i64,
    pub present: bool,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct MarkAttendanceRequest {
    pub date: NaiveDate,
    /// 若提供，则所有学生必须属于该班级
    pub classroom_id: Option<i64>,
    pub records: Vec<AttendanceMark>,
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct AttendanceListParams {
    pub date: Option<NaiveDate>,
    pub classroom_id: Option<i64>,
    pub student_id: Option<i64>,
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct AttendanceSummaryParams {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}
