use chrono::NaiveDate;
use serde::Deserialize;
use ts_rs::TS;

use super::entities::LeaveStatus;
use crate::models::common::{PaginationQuery, deserialize_opt_i64};

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/leave.ts")]
pub struct ApplyLeaveRequest {
    pub leave_type: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: Option<String>,
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/leave.ts")]
pub struct LeaveDecisionRequest {
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/leave.ts")]
pub struct LeaveListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub status: Option<LeaveStatus>,
    #[serde(default, deserialize_with = "deserialize_opt_i64")]
    pub teacher_id: Option<i64>,
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/leave.ts")]
pub struct UpdateAutoApprovalRequest {
    pub enabled: Option<bool>,
    pub approval_time_minutes: Option<i32>,
    pub apply_to_leave_types: Option<Vec<String>>,
    pub notify_admin: Option<bool>,
    pub notify_teacher: Option<bool>,
}
