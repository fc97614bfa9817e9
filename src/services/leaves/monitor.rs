//! 自动审批后台任务

use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::config::LeaveApprovalConfig;
use crate::errors::SchoolDeskError;
use crate::models::leaves::entities::{
    ApprovalLogStatus, ApprovalType, AutoApprovalSettings, LeaveDecision, LeaveStatus,
    TeacherLeave,
};
use crate::models::notifications::entities::NotificationKind;
use crate::models::users::entities::UserRole;
use crate::services::activity::log_activity;
use crate::services::notifications::notify;
use crate::storage::Storage;

const AUTO_APPROVAL_NOTE: &str = "Automatically approved by the system";

/// 启动自动审批轮询；未启用时直接返回
pub fn spawn_auto_approval_monitor(
    storage: Arc<dyn Storage>,
    config: &LeaveApprovalConfig,
) -> Option<tokio::task::JoinHandle<()>> {
    if !config.monitor_enabled {
        info!("Leave auto-approval monitor disabled");
        return None;
    }
    let period = Duration::from_secs(config.check_interval.max(1));
    info!("Leave auto-approval monitor started, interval {:?}", period);

    Some(tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        loop {
            ticker.tick().await;
            match run_once(&storage, Utc::now()).await {
                Ok(0) => debug!("No leaves due for auto-approval"),
                Ok(n) => info!("Auto-approved {} leave(s)", n),
                Err(e) => error!("Leave auto-approval check failed: {}", e),
            }
        }
    }))
}

/// 当前到期的待审批请假
pub fn due_leaves<'a>(
    settings: &AutoApprovalSettings,
    pending: &'a [TeacherLeave],
    now: DateTime<Utc>,
) -> Vec<&'a TeacherLeave> {
    pending.iter().filter(|l| settings.is_due(l, now)).collect()
}

fn auto_decision(leave: &TeacherLeave, settings: &AutoApprovalSettings, now: DateTime<Utc>) -> LeaveDecision {
    LeaveDecision {
        leave_id: leave.id,
        status: LeaveStatus::Approved,
        approval_type: ApprovalType::Auto,
        log_status: ApprovalLogStatus::AutoApproved,
        decided_by: None,
        decided_at: now.timestamp(),
        auto_approval_time: Some(settings.cutoff(now).timestamp()),
        notes: Some(AUTO_APPROVAL_NOTE.to_string()),
    }
}

/// 执行一轮检查，返回自动通过的数量；单条失败不影响其余请假
pub async fn run_once(storage: &Arc<dyn Storage>, now: DateTime<Utc>) -> Result<usize, SchoolDeskError> {
    let settings = storage.get_auto_approval_settings().await?;
    if !settings.enabled {
        return Ok(0);
    }
    let pending = storage.list_pending_leaves().await?;
    let due = due_leaves(&settings, &pending, now);
    if due.is_empty() {
        return Ok(0);
    }

    let admins = if settings.notify_admin {
        storage
            .list_user_ids_by_role(UserRole::Admin)
            .await
            .unwrap_or_else(|e| {
                warn!("查询管理员失败: {}", e);
                Vec::new()
            })
    } else {
        Vec::new()
    };

    let mut approved = 0;
    for leave in due {
        let decided = match storage.decide_leave(auto_decision(leave, &settings, now)).await {
            Ok(Some(leave)) => leave,
            // 已被人工处理
            Ok(None) => continue,
            Err(e) => {
                error!("Failed to auto-approve leave #{}: {}", leave.id, e);
                continue;
            }
        };
        approved += 1;

        let teacher = storage.get_teacher_by_id(decided.teacher_id).await.unwrap_or_else(|e| {
            warn!("查询教师失败: {}", e);
            None
        });
        let teacher_name = teacher
            .as_ref()
            .map(|t| t.name.clone())
            .unwrap_or_else(|| format!("teacher #{}", decided.teacher_id));

        if settings.notify_teacher
            && let Some(user_id) = teacher.as_ref().and_then(|t| t.user_id)
        {
            let message = format!(
                "Your {} leave ({} to {}) was automatically approved",
                decided.leave_type, decided.start_date, decided.end_date
            );
            notify(storage, &[user_id], None, &message, NotificationKind::Leave).await;
        }
        if !admins.is_empty() {
            let message = format!(
                "{} leave for {} ({} to {}) was automatically approved",
                decided.leave_type, teacher_name, decided.start_date, decided.end_date
            );
            notify(storage, &admins, None, &message, NotificationKind::Leave).await;
        }
        log_activity(
            storage,
            "leave",
            format!("Leave #{} for {} auto-approved", decided.id, teacher_name),
            None,
            None,
        )
        .await;
    }
    Ok(approved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::leaves::requests::ApplyLeaveRequest;
    use crate::models::teachers::requests::CreateTeacherRequest;
    use crate::storage::sea_orm_storage::SeaOrmStorage;
    use chrono::{Duration as ChronoDuration, NaiveDate};

    fn settings() -> AutoApprovalSettings {
        AutoApprovalSettings {
            enabled: true,
            approval_time_minutes: 30,
            apply_to_leave_types: "sick,emergency".to_string(),
            notify_admin: true,
            notify_teacher: true,
            updated_by: None,
            updated_at: Utc::now(),
        }
    }

    fn leave(id: i64, kind: &str, age_minutes: i64, now: DateTime<Utc>) -> TeacherLeave {
        let day = NaiveDate::from_ymd_opt(2025, 5, 2).unwrap();
        let created_at = now - ChronoDuration::minutes(age_minutes);
        TeacherLeave {
            id,
            teacher_id: 7,
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
    fn test_due_leaves_filters_by_type_and_age() {
        let now = Utc::now();
        let pending = vec![
            leave(1, "sick", 31, now),
            leave(2, "sick", 5, now),
            leave(3, "casual", 120, now),
            leave(4, "emergency", 30, now),
        ];
        let ids: Vec<i64> = due_leaves(&settings(), &pending, now).iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![1, 4]);
    }

    #[test]
    fn test_auto_decision_has_no_approver() {
        let now = Utc::now();
        let s = settings();
        let decision = auto_decision(&leave(9, "sick", 40, now), &s, now);
        assert_eq!(decision.leave_id, 9);
        assert_eq!(decision.status, LeaveStatus::Approved);
        assert_eq!(decision.approval_type, ApprovalType::Auto);
        assert_eq!(decision.log_status, ApprovalLogStatus::AutoApproved);
        assert!(decision.decided_by.is_none());
        assert_eq!(
            decision.auto_approval_time,
            Some((now - ChronoDuration::minutes(30)).timestamp())
        );
    }

    #[tokio::test]
    async fn test_run_once_in_background_task_approves_due_leaves() {
        let storage: Arc<dyn Storage> = Arc::new(SeaOrmStorage::in_memory().await.unwrap());
        let teacher = storage
            .create_teacher(
                CreateTeacherRequest {
                    name: "S. Iyer".into(),
                    email: None,
                    phone: None,
                    qualification: None,
                    subject: Some("Physics".into()),
                    employee_id: None,
                    date_of_joining: None,
                },
                "48213",
            )
            .await
            .unwrap();
        let day = NaiveDate::from_ymd_opt(2025, 5, 2).unwrap();
        let apply = |kind: &str| ApplyLeaveRequest {
            leave_type: kind.to_string(),
            start_date: day,
            end_date: day,
            reason: None,
        };
        let sick = storage.create_leave(teacher.id, apply("sick")).await.unwrap();
        let casual = storage.create_leave(teacher.id, apply("casual")).await.unwrap();

        let later = Utc::now() + ChronoDuration::minutes(31);
        let task_storage = storage.clone();
        let approved = tokio::spawn(async move { run_once(&task_storage, later).await })
            .await
            .unwrap()
            .unwrap();
        assert_eq!(approved, 1);

        let decided = storage.get_leave_by_id(sick.id).await.unwrap().unwrap();
        assert_eq!(decided.status, LeaveStatus::Approved);
        assert!(decided.approved_by.is_none());
        let logs = storage.list_leave_approval_logs(sick.id).await.unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].status, ApprovalLogStatus::AutoApproved);

        let untouched = storage.get_leave_by_id(casual.id).await.unwrap().unwrap();
        assert_eq!(untouched.status, LeaveStatus::Pending);

        // 已处理的请假不会再次审批
        assert_eq!(run_once(&storage, later).await.unwrap(), 0);
    }
}
