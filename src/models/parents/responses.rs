use serde::Serialize;
use ts_rs::TS;

use crate::models::attendance::entities::AttendanceSummary;
use crate::models::fees::responses::FeeDetail;
use crate::models::students::entities::Student;

/// 家长视角下的孩子概览
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/parent.ts")]
pub struct ChildOverview {
    pub student: Student,
    pub fees: Vec<FeeDetail>,
    pub total_outstanding: f64,
    pub attendance: AttendanceSummary,
}
