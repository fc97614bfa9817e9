//! 请假自动审批的判定逻辑

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use ts_rs::TS;

use super::entities::{AutoApprovalSettings, LeaveStatus, TeacherLeave};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/leave.ts")]
pub enum AutoApprovalState {
    Pending,
    Overdue,
}

/// 距离自动审批的剩余时间
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/leave.ts")]
pub struct AutoApprovalStatus {
    pub status: AutoApprovalState,
    pub minutes: i64,
    pub cutoff_time: DateTime<Utc>,
}

impl AutoApprovalSettings {
    pub fn leave_types(&self) -> Vec<String> {
        self.apply_to_leave_types
            .split(',')
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect()
    }

    pub fn applies_to(&self, leave_type: &str) -> bool {
        let leave_type = leave_type.trim().to_lowercase();
        self.leave_types().iter().any(|t| *t == leave_type)
    }

    fn window(&self) -> Duration {
        Duration::minutes(self.approval_time_minutes.max(0) as i64)
    }

    /// 早于该时间提交的待审批请假可被自动通过
    pub fn cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - self.window()
    }

    /// 当前是否应被后台任务自动通过
    pub fn is_due(&self, leave: &TeacherLeave, now: DateTime<Utc>) -> bool {
        self.enabled
            && leave.status == LeaveStatus::Pending
            && self.applies_to(&leave.leave_type)
            && leave.created_at <= self.cutoff(now)
    }

    /// 不适用（未启用 / 非待审批 / 类型不匹配）时返回 None
    pub fn status_for(&self, leave: &TeacherLeave, now: DateTime<Utc>) -> Option<AutoApprovalStatus> {
        if !self.enabled
            || leave.status != LeaveStatus::Pending
            || !self.applies_to(&leave.leave_type)
        {
            return None;
        }
        let cutoff_time = leave.created_at + self.window();
        let remaining = cutoff_time - now;
        if remaining <= Duration::zero() {
            Some(AutoApprovalStatus {
                status: AutoApprovalState::Overdue,
                minutes: 0,
                cutoff_time,
            })
        } else {
            Some(AutoApprovalStatus {
                status: AutoApprovalState::Pending,
                minutes: remaining.num_minutes(),
                cutoff_time,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn settings() -> AutoApprovalSettings {
        AutoApprovalSettings {
            enabled: true,
            approval_time_minutes: 30,
            apply_to_leave_types: "sick, Emergency".to_string(),
            notify_admin: true,
            notify_teacher: true,
            updated_by: None,
            updated_at: Utc::now(),
        }
    }

    fn leave(kind: &str, created_at: DateTime<Utc>) -> TeacherLeave {
        let day = NaiveDate::from_ymd_opt(2025, 4, 1).unwrap();
        TeacherLeave {
            id: 1,
            teacher_id: 1,
            leave_type: kind.to_string(),
            start_date: day,
            end_date: day,
            reason: None,
            status: LeaveStatus::Pending,
            approved_by: None,
            approved_at: None,
            created_at,
            updated_at: created_at,
        }
    }

    #[test]
    fn test_leave_type_matching_is_trimmed_and_case_insensitive() {
        let s = settings();
        assert_eq!(s.leave_types(), vec!["sick", "emergency"]);
        assert!(s.applies_to("Sick"));
        assert!(s.applies_to("emergency"));
        assert!(!s.applies_to("casual"));
    }

    #[test]
    fn test_is_due_after_window() {
        let now = Utc::now();
        let s = settings();
        assert!(s.is_due(&leave("sick", now - Duration::minutes(30)), now));
        assert!(!s.is_due(&leave("sick", now - Duration::minutes(29)), now));
        assert!(!s.is_due(&leave("casual", now - Duration::hours(5)), now));

        let mut disabled = settings();
        disabled.enabled = false;
        assert!(!disabled.is_due(&leave("sick", now - Duration::hours(5)), now));
    }

    #[test]
    fn test_status_pending_with_minutes_left() {
        let now = Utc::now();
        let l = leave("sick", now - Duration::minutes(10));
        let status = settings().status_for(&l, now).unwrap();
        assert_eq!(status.status, AutoApprovalState::Pending);
        assert_eq!(status.minutes, 20);
        assert_eq!(status.cutoff_time, l.created_at + Duration::minutes(30));
    }

    #[test]
    fn test_status_overdue_and_not_applicable() {
        let now = Utc::now();
        let overdue = settings()
            .status_for(&leave("emergency", now - Duration::minutes(45)), now)
            .unwrap();
        assert_eq!(overdue.status, AutoApprovalState::Overdue);
        assert_eq!(overdue.minutes, 0);

        let mut approved = leave("sick", now);
        approved.status = LeaveStatus::Approved;
        assert!(settings().status_for(&approved, now).is_none());
        assert!(settings().status_for(&leave("casual", now), now).is_none());
    }
}
