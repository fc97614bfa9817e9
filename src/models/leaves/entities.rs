use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::common::enums::define_string_enum;

define_string_enum! {
    pub enum LeaveStatus("../frontend/src/types/generated/leave.ts") {
        Pending => "pending",
        Approved => "approved",
        Rejected => "rejected",
    }
}

define_string_enum! {
    pub enum ApprovalType("../frontend/src/types/generated/leave.ts") {
        Auto => "auto",
        Manual => "manual",
    }
}

define_string_enum! {
    pub enum ApprovalLogStatus("../frontend/src/types/generated/leave.ts") {
        AutoApproved => "auto_approved",
        ManualApproved => "manual_approved",
        Rejected => "rejected",
    }
}

// 教师请假
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/leave.ts")]
pub struct TeacherLeave {
    pub id: i64,
    pub teacher_id: i64,
    /// sick / casual / emergency 等，自由文本
    pub leave_type: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: Option<String>,
    pub status: LeaveStatus,
    /// 系统自动审批时为空
    pub approved_by: Option<i64>,
    pub approved_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 审批日志
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/leave.ts")]
pub struct LeaveApprovalLog {
    pub id: i64,
    pub leave_id: i64,
    pub approval_type: ApprovalType,
    pub approved_by: Option<i64>,
    pub submitted_at: chrono::DateTime<chrono::Utc>,
    pub auto_approval_time: Option<chrono::DateTime<chrono::Utc>>,
    pub actual_approval_time: Option<chrono::DateTime<chrono::Utc>>,
    pub status: ApprovalLogStatus,
    pub notes: Option<String>,
}

/// 审批决定（存储层在同一事务中更新请假并写日志）
#[derive(Debug, Clone)]
pub struct LeaveDecision {
    pub leave_id: i64,
    pub status: LeaveStatus,
    pub approval_type: ApprovalType,
    pub log_status: ApprovalLogStatus,
    pub decided_by: Option<i64>,
    pub decided_at: i64,
    /// 自动审批时记录的截止时间
    pub auto_approval_time: Option<i64>,
    pub notes: Option<String>,
}

// 自动审批配置（单行）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/leave.ts")]
pub struct AutoApprovalSettings {
    pub enabled: bool,
    pub approval_time_minutes: i32,
    /// 逗号分隔的请假类型
    pub apply_to_leave_types: String,
    pub notify_admin: bool,
    pub notify_teacher: bool,
    pub updated_by: Option<i64>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
