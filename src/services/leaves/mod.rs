//! 教师请假与自动审批

pub mod monitor;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::Utc;
use std::sync::Arc;

use crate::middlewares::RequireJWT;
use crate::models::leaves::entities::{
    ApprovalLogStatus, ApprovalType, LeaveDecision, LeaveStatus, TeacherLeave,
};
use crate::models::leaves::requests::{
    ApplyLeaveRequest, LeaveDecisionRequest, LeaveListParams, UpdateAutoApprovalRequest,
};
use crate::models::notifications::entities::NotificationKind;
use crate::models::users::entities::{User, UserRole};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::activity::log_activity;
use crate::services::notifications::notify;
use crate::storage::Storage;

pub struct LeaveService {
    storage: Option<Arc<dyn Storage>>,
}

/// 校验请假申请，返回规范化后的请求
pub fn validate_application(mut req: ApplyLeaveRequest) -> Result<ApplyLeaveRequest, String> {
    req.leave_type = req.leave_type.trim().to_lowercase();
    if req.leave_type.is_empty() {
        return Err("Leave type is required".to_string());
    }
    if req.end_date < req.start_date {
        return Err("End date must not be before start date".to_string());
    }
    req.reason = req
        .reason
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty());
    Ok(req)
}

/// 校验自动审批配置的更新
pub fn validate_settings_update(update: &UpdateAutoApprovalRequest) -> Result<(), &'static str> {
    if let Some(minutes) = update.approval_time_minutes
        && minutes < 1
    {
        return Err("Approval time must be at least 1 minute");
    }
    if let Some(types) = &update.apply_to_leave_types
        && types.iter().all(|t| t.trim().is_empty())
    {
        return Err("At least one leave type is required");
    }
    Ok(())
}

impl LeaveService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    pub async fn apply_leave(
        &self,
        req: ApplyLeaveRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let req = match validate_application(req) {
            Ok(req) => req,
            Err(msg) => return Ok(super::bad_request(ErrorCode::ValidationFailed, msg)),
        };
        let Some(user) = RequireJWT::extract_user_claims(request) else {
            return Ok(super::unauthorized());
        };
        let storage = self.get_storage(request)?;

        let teacher = match storage.get_teacher_by_user_id(user.id).await {
            Ok(Some(teacher)) => teacher,
            Ok(None) => {
                return Ok(super::not_found(
                    ErrorCode::TeacherNotFound,
                    "No teacher profile is linked to this account",
                ));
            }
            Err(e) => return Ok(super::error_response(&e, ErrorCode::InternalServerError)),
        };

        let leave = match storage.create_leave(teacher.id, req).await {
            Ok(leave) => leave,
            Err(e) => return Ok(super::error_response(&e, ErrorCode::InternalServerError)),
        };

        let message = format!(
            "{} applied for {} leave ({} to {})",
            teacher.name, leave.leave_type, leave.start_date, leave.end_date
        );
        match storage.list_user_ids_by_role(UserRole::Admin).await {
            Ok(admins) => {
                notify(&storage, &admins, Some(user.id), &message, NotificationKind::Leave).await;
            }
            Err(e) => tracing::warn!("查询管理员失败: {}", e),
        }
        log_activity(&storage, "leave", message, Some(user.id), Some(request)).await;

        Ok(HttpResponse::Created().json(ApiResponse::success(leave, "请假申请已提交")))
    }

    // 教师只能看到自己的请假
    pub async fn list_leaves(
        &self,
        mut query: LeaveListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let Some(user) = RequireJWT::extract_user_claims(request) else {
            return Ok(super::unauthorized());
        };
        let storage = self.get_storage(request)?;

        if user.role == UserRole::Teacher {
            match storage.get_teacher_by_user_id(user.id).await {
                Ok(Some(teacher)) => query.teacher_id = Some(teacher.id),
                Ok(None) => {
                    return Ok(super::not_found(
                        ErrorCode::TeacherNotFound,
                        "No teacher profile is linked to this account",
                    ));
                }
                Err(e) => return Ok(super::error_response(&e, ErrorCode::InternalServerError)),
            }
        }

        match storage.list_leaves_with_pagination(query).await {
            Ok(page) => Ok(HttpResponse::Ok().json(ApiResponse::success(page, "请假列表获取成功"))),
            Err(e) => Ok(super::error_response(&e, ErrorCode::InternalServerError)),
        }
    }

    pub async fn get_leave(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        match self.load_visible(&storage, id, request).await {
            Ok(leave) => Ok(HttpResponse::Ok().json(ApiResponse::success(leave, "请假获取成功"))),
            Err(resp) => Ok(resp),
        }
    }

    pub async fn approve_leave(
        &self,
        id: i64,
        req: LeaveDecisionRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        self.decide(id, req, LeaveStatus::Approved, request).await
    }

    pub async fn reject_leave(
        &self,
        id: i64,
        req: LeaveDecisionRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        self.decide(id, req, LeaveStatus::Rejected, request).await
    }

    async fn decide(
        &self,
        id: i64,
        req: LeaveDecisionRequest,
        status: LeaveStatus,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let Some(admin_id) = RequireJWT::extract_user_id(request) else {
            return Ok(super::unauthorized());
        };
        let storage = self.get_storage(request)?;

        let log_status = match status {
            LeaveStatus::Approved => ApprovalLogStatus::ManualApproved,
            _ => ApprovalLogStatus::Rejected,
        };
        let decision = LeaveDecision {
            leave_id: id,
            status,
            approval_type: ApprovalType::Manual,
            log_status,
            decided_by: Some(admin_id),
            decided_at: Utc::now().timestamp(),
            auto_approval_time: None,
            notes: req
                .notes
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty()),
        };

        let leave = match storage.decide_leave(decision).await {
            Ok(Some(leave)) => leave,
            // 区分不存在与已审批
            Ok(None) => {
                return match storage.get_leave_by_id(id).await {
                    Ok(Some(_)) => Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                        ErrorCode::LeaveStateInvalid,
                        "Leave has already been decided",
                    ))),
                    Ok(None) => Ok(leave_not_found()),
                    Err(e) => Ok(super::error_response(&e, ErrorCode::InternalServerError)),
                };
            }
            Err(e) => return Ok(super::error_response(&e, ErrorCode::InternalServerError)),
        };

        let verb = status.as_str();
        let message = format!(
            "Your {} leave ({} to {}) was {}",
            leave.leave_type, leave.start_date, leave.end_date, verb
        );
        match storage.get_teacher_by_id(leave.teacher_id).await {
            Ok(Some(teacher)) => {
                if let Some(user_id) = teacher.user_id {
                    notify(&storage, &[user_id], Some(admin_id), &message, NotificationKind::Leave)
                        .await;
                }
            }
            Ok(None) => {}
            Err(e) => tracing::warn!("查询教师失败: {}", e),
        }
        log_activity(
            &storage,
            "leave",
            format!("Leave #{} {}", leave.id, verb),
            Some(admin_id),
            Some(request),
        )
        .await;

        Ok(HttpResponse::Ok().json(ApiResponse::success(leave, "请假审批完成")))
    }

    pub async fn approval_logs(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        if let Err(resp) = self.load_visible(&storage, id, request).await {
            return Ok(resp);
        }
        match storage.list_leave_approval_logs(id).await {
            Ok(logs) => Ok(HttpResponse::Ok().json(ApiResponse::success(logs, "审批日志获取成功"))),
            Err(e) => Ok(super::error_response(&e, ErrorCode::InternalServerError)),
        }
    }

    pub async fn auto_approval_status(
        &self,
        id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        let leave = match self.load_visible(&storage, id, request).await {
            Ok(leave) => leave,
            Err(resp) => return Ok(resp),
        };
        match storage.get_auto_approval_settings().await {
            Ok(settings) => {
                let status = settings.status_for(&leave, Utc::now());
                Ok(HttpResponse::Ok().json(ApiResponse::success(status, "自动审批状态获取成功")))
            }
            Err(e) => Ok(super::error_response(&e, ErrorCode::InternalServerError)),
        }
    }

    pub async fn get_settings(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        match storage.get_auto_approval_settings().await {
            Ok(settings) => {
                Ok(HttpResponse::Ok().json(ApiResponse::success(settings, "自动审批配置获取成功")))
            }
            Err(e) => Ok(super::error_response(&e, ErrorCode::InternalServerError)),
        }
    }

    pub async fn update_settings(
        &self,
        update: UpdateAutoApprovalRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        if let Err(msg) = validate_settings_update(&update) {
            return Ok(super::bad_request(ErrorCode::ValidationFailed, msg));
        }
        let Some(admin_id) = RequireJWT::extract_user_id(request) else {
            return Ok(super::unauthorized());
        };
        let storage = self.get_storage(request)?;
        match storage.update_auto_approval_settings(update, admin_id).await {
            Ok(settings) => {
                log_activity(
                    &storage,
                    "leave",
                    "Auto-approval settings updated",
                    Some(admin_id),
                    Some(request),
                )
                .await;
                Ok(HttpResponse::Ok().json(ApiResponse::success(settings, "自动审批配置已更新")))
            }
            Err(e) => Ok(super::error_response(&e, ErrorCode::InternalServerError)),
        }
    }

    /// 管理员可查看任意请假，教师仅限本人
    async fn load_visible(
        &self,
        storage: &Arc<dyn Storage>,
        id: i64,
        request: &HttpRequest,
    ) -> Result<TeacherLeave, HttpResponse> {
        let Some(user) = RequireJWT::extract_user_claims(request) else {
            return Err(super::unauthorized());
        };
        let leave = match storage.get_leave_by_id(id).await {
            Ok(Some(leave)) => leave,
            Ok(None) => return Err(leave_not_found()),
            Err(e) => return Err(super::error_response(&e, ErrorCode::InternalServerError)),
        };
        if owns_or_admin(storage, &user, &leave).await? {
            Ok(leave)
        } else {
            Err(super::forbidden("You may only view your own leave requests"))
        }
    }
}

async fn owns_or_admin(
    storage: &Arc<dyn Storage>,
    user: &User,
    leave: &TeacherLeave,
) -> Result<bool, HttpResponse> {
    if user.is_admin() {
        return Ok(true);
    }
    match storage.get_teacher_by_user_id(user.id).await {
        Ok(teacher) => Ok(teacher.is_some_and(|t| t.id == leave.teacher_id)),
        Err(e) => Err(super::error_response(&e, ErrorCode::InternalServerError)),
    }
}

fn leave_not_found() -> HttpResponse {
    super::not_found(ErrorCode::LeaveNotFound, "Leave not found")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn application(kind: &str, start: (u32, u32), end: (u32, u32)) -> ApplyLeaveRequest {
        ApplyLeaveRequest {
            leave_type: kind.to_string(),
            start_date: NaiveDate::from_ymd_opt(2025, start.0, start.1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, end.0, end.1).unwrap(),
            reason: Some("  ".to_string()),
        }
    }

    #[test]
    fn test_application_is_normalized() {
        let req = validate_application(application(" Sick ", (3, 1), (3, 1))).unwrap();
        assert_eq!(req.leave_type, "sick");
        assert!(req.reason.is_none());
    }

    #[test]
    fn test_application_rejects_bad_input() {
        assert!(validate_application(application("", (3, 1), (3, 2))).is_err());
        assert!(validate_application(application("casual", (3, 5), (3, 2))).is_err());
    }

    #[test]
    fn test_settings_update_validation() {
        let ok = UpdateAutoApprovalRequest {
            approval_time_minutes: Some(15),
            apply_to_leave_types: Some(vec!["sick".into()]),
            ..Default::default()
        };
        assert!(validate_settings_update(&ok).is_ok());

        let zero = UpdateAutoApprovalRequest {
            approval_time_minutes: Some(0),
            ..Default::default()
        };
        assert!(validate_settings_update(&zero).is_err());

        let blank = UpdateAutoApprovalRequest {
            apply_to_leave_types: Some(vec![" ".into()]),
            ..Default::default()
        };
        assert!(validate_settings_update(&blank).is_err());
        assert!(validate_settings_update(&UpdateAutoApprovalRequest::default()).is_ok());
    }
}
