//! 家长 / 学生投诉

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::middlewares::RequireJWT;
use crate::models::complaints::entities::{Complaint, ComplaintStatus, RecipientType};
use crate::models::complaints::requests::{
    ComplaintListParams, ComplaintListQuery, ComplaintScope, CreateComplaintRequest,
    RespondComplaintRequest, UpdateComplaintStatusRequest,
};
use crate::models::notifications::entities::NotificationKind;
use crate::models::users::entities::{User, UserRole};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::activity::log_activity;
use crate::services::notifications::notify;
use crate::storage::Storage;

const MAX_TITLE_LEN: usize = 200;
const MAX_DESCRIPTION_LEN: usize = 5000;

pub struct ComplaintService {
    storage: Option<Arc<dyn Storage>>,
}

/// 校验并规范化投诉内容
pub fn validate_complaint(mut req: CreateComplaintRequest) -> Result<CreateComplaintRequest, &'static str> {
    req.title = req.title.trim().to_string();
    req.description = req.description.trim().to_string();
    if req.title.is_empty() {
        return Err("Title is required");
    }
    if req.title.chars().count() > MAX_TITLE_LEN {
        return Err("Title is too long");
    }
    if req.description.is_empty() {
        return Err("Description is required");
    }
    if req.description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err("Description is too long");
    }
    match req.recipient_type {
        RecipientType::Teacher if req.recipient_id.is_none() => {
            return Err("A teacher recipient is required");
        }
        RecipientType::Admin => req.recipient_id = None,
        RecipientType::Teacher => {}
    }
    Ok(req)
}

/// 按角色确定可见范围
pub fn scope_for(user: &User) -> ComplaintScope {
    match user.role {
        UserRole::Admin => ComplaintScope::All,
        UserRole::Teacher => ComplaintScope::AddressedToTeacher(user.id),
        UserRole::Parent | UserRole::Student => ComplaintScope::SentBy(user.id),
    }
}

fn can_view(user: &User, complaint: &Complaint) -> bool {
    match user.role {
        UserRole::Admin => true,
        UserRole::Teacher => complaint.recipient_id == Some(user.id),
        UserRole::Parent | UserRole::Student => complaint.sender_id == user.id,
    }
}

fn can_handle(user: &User, complaint: &Complaint) -> bool {
    match user.role {
        UserRole::Admin => true,
        UserRole::Teacher => complaint.recipient_id == Some(user.id),
        _ => false,
    }
}

impl ComplaintService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    pub async fn create_complaint(
        &self,
        req: CreateComplaintRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let req = match validate_complaint(req) {
            Ok(req) => req,
            Err(msg) => return Ok(super::bad_request(ErrorCode::ValidationFailed, msg)),
        };
        let Some(user) = RequireJWT::extract_user_claims(request) else {
            return Ok(super::unauthorized());
        };
        let storage = self.get_storage(request)?;

        if let Some(teacher_user_id) = req.recipient_id {
            match storage.get_user_by_id(teacher_user_id).await {
                Ok(Some(u)) if u.role == UserRole::Teacher => {}
                Ok(_) => {
                    return Ok(super::bad_request(
                        ErrorCode::ValidationFailed,
                        "Recipient is not a teacher",
                    ));
                }
                Err(e) => return Ok(super::error_response(&e, ErrorCode::InternalServerError)),
            }
        }
        if let Some(student_id) = req.student_id {
            if user.role == UserRole::Parent
                && let Some(resp) = super::deny_student_access(&storage, request, student_id).await
            {
                return Ok(resp);
            }
            match storage.get_student_by_id(student_id).await {
                Ok(Some(_)) => {}
                Ok(None) => return Ok(crate::services::students::student_not_found()),
                Err(e) => return Ok(super::error_response(&e, ErrorCode::InternalServerError)),
            }
        }

        let complaint = match storage
            .create_complaint(user.id, user.role.as_str(), req)
            .await
        {
            Ok(complaint) => complaint,
            Err(e) => return Ok(super::error_response(&e, ErrorCode::InternalServerError)),
        };

        let message = format!("New complaint: {}", complaint.title);
        let recipients = match complaint.recipient_id {
            Some(teacher_user_id) => vec![teacher_user_id],
            None => storage
                .list_user_ids_by_role(UserRole::Admin)
                .await
                .unwrap_or_else(|e| {
                    tracing::warn!("查询管理员失败: {}", e);
                    Vec::new()
                }),
        };
        notify(&storage, &recipients, Some(user.id), &message, NotificationKind::Info).await;
        log_activity(
            &storage,
            "complaint",
            format!("Complaint \"{}\" submitted", complaint.title),
            Some(user.id),
            Some(request),
        )
        .await;

        Ok(HttpResponse::Created().json(ApiResponse::success(complaint, "投诉已提交")))
    }

    pub async fn list_complaints(
        &self,
        params: ComplaintListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let Some(user) = RequireJWT::extract_user_claims(request) else {
            return Ok(super::unauthorized());
        };
        let storage = self.get_storage(request)?;
        let query = ComplaintListQuery {
            scope: scope_for(&user),
            page: params.pagination.page,
            size: params.pagination.size,
            status: params.status,
            category: params.category,
        };
        match storage.list_complaints_with_pagination(query).await {
            Ok(page) => Ok(HttpResponse::Ok().json(ApiResponse::success(page, "投诉列表获取成功"))),
            Err(e) => Ok(super::error_response(&e, ErrorCode::InternalServerError)),
        }
    }

    pub async fn get_complaint(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let Some(user) = RequireJWT::extract_user_claims(request) else {
            return Ok(super::unauthorized());
        };
        let storage = self.get_storage(request)?;
        match storage.get_complaint_by_id(id).await {
            Ok(Some(complaint)) if can_view(&user, &complaint) => {
                Ok(HttpResponse::Ok().json(ApiResponse::success(complaint, "投诉获取成功")))
            }
            Ok(Some(_)) => Ok(super::forbidden("You may not view this complaint")),
            Ok(None) => Ok(complaint_not_found()),
            Err(e) => Ok(super::error_response(&e, ErrorCode::InternalServerError)),
        }
    }

    pub async fn respond(
        &self,
        id: i64,
        req: RespondComplaintRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let response = req.response.trim().to_string();
        if response.is_empty() {
            return Ok(super::bad_request(
                ErrorCode::ValidationFailed,
                "Response is required",
            ));
        }
        let status = req.status.unwrap_or(ComplaintStatus::Resolved);
        let Some(user) = RequireJWT::extract_user_claims(request) else {
            return Ok(super::unauthorized());
        };
        let storage = self.get_storage(request)?;
        if let Err(resp) = load_handled(&storage, &user, id).await {
            return Ok(resp);
        }

        match storage.respond_complaint(id, response, status, user.id).await {
            Ok(Some(complaint)) => {
                let message = format!("Your complaint \"{}\" received a response", complaint.title);
                notify(
                    &storage,
                    &[complaint.sender_id],
                    Some(user.id),
                    &message,
                    NotificationKind::Info,
                )
                .await;
                log_activity(
                    &storage,
                    "complaint",
                    format!("Complaint #{} answered ({})", complaint.id, status),
                    Some(user.id),
                    Some(request),
                )
                .await;
                Ok(HttpResponse::Ok().json(ApiResponse::success(complaint, "投诉已回复")))
            }
            Ok(None) => Ok(complaint_not_found()),
            Err(e) => Ok(super::error_response(&e, ErrorCode::InternalServerError)),
        }
    }

    pub async fn update_status(
        &self,
        id: i64,
        req: UpdateComplaintStatusRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let Some(user) = RequireJWT::extract_user_claims(request) else {
            return Ok(super::unauthorized());
        };
        let storage = self.get_storage(request)?;
        if let Err(resp) = load_handled(&storage, &user, id).await {
            return Ok(resp);
        }

        match storage.update_complaint_status(id, req.status).await {
            Ok(Some(complaint)) => {
                log_activity(
                    &storage,
                    "complaint",
                    format!("Complaint #{} marked {}", complaint.id, req.status),
                    Some(user.id),
                    Some(request),
                )
                .await;
                Ok(HttpResponse::Ok().json(ApiResponse::success(complaint, "投诉状态已更新")))
            }
            Ok(None) => Ok(complaint_not_found()),
            Err(e) => Ok(super::error_response(&e, ErrorCode::InternalServerError)),
        }
    }
}

/// 取出当前用户有权处理的投诉
async fn load_handled(
    storage: &Arc<dyn Storage>,
    user: &User,
    id: i64,
) -> Result<Complaint, HttpResponse> {
    match storage.get_complaint_by_id(id).await {
        Ok(Some(complaint)) if can_handle(user, &complaint) => Ok(complaint),
        Ok(Some(_)) => Err(super::forbidden("You may not handle this complaint")),
        Ok(None) => Err(complaint_not_found()),
        Err(e) => Err(super::error_response(&e, ErrorCode::InternalServerError)),
    }
}

fn complaint_not_found() -> HttpResponse {
    super::not_found(ErrorCode::ComplaintNotFound, "Complaint not found")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::complaints::entities::{ComplaintCategory, ComplaintPriority};
    use crate::models::users::entities::UserStatus;

    fn request(recipient_type: RecipientType, recipient_id: Option<i64>) -> CreateComplaintRequest {
        CreateComplaintRequest {
            title: "  Broken projector ".to_string(),
            description: "Room 4 projector does not turn on".to_string(),
            category: ComplaintCategory::Facility,
            priority: Some(ComplaintPriority::High),
            recipient_type,
            recipient_id,
            student_id: None,
        }
    }

    fn user(id: i64, role: UserRole) -> User {
        User {
            id,
            username: format!("u{id}"),
            email: format!("u{id}@school.test"),
            password_hash: String::new(),
            role,
            status: UserStatus::Active,
            display_name: None,
            phone: None,
            last_login: None,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    fn complaint(sender_id: i64, recipient_id: Option<i64>) -> Complaint {
        let now = chrono::Utc::now();
        Complaint {
            id: 1,
            title: "t".into(),
            description: "d".into(),
            category: ComplaintCategory::Other,
            priority: ComplaintPriority::Normal,
            sender_id,
            sender_type: "parent".into(),
            recipient_type: if recipient_id.is_some() {
                RecipientType::Teacher
            } else {
                RecipientType::Admin
            },
            recipient_id,
            student_id: None,
            status: ComplaintStatus::Pending,
            response: None,
            responded_at: None,
            responded_by: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_validation_trims_and_drops_admin_recipient() {
        let req = validate_complaint(request(RecipientType::Admin, Some(3))).unwrap();
        assert_eq!(req.title, "Broken projector");
        assert!(req.recipient_id.is_none());
        assert!(validate_complaint(request(RecipientType::Teacher, None)).is_err());

        let mut blank = request(RecipientType::Admin, None);
        blank.description = "   ".into();
        assert!(validate_complaint(blank).is_err());
    }

    #[test]
    fn test_scope_by_role() {
        assert!(matches!(scope_for(&user(1, UserRole::Admin)), ComplaintScope::All));
        assert!(matches!(
            scope_for(&user(4, UserRole::Teacher)),
            ComplaintScope::AddressedToTeacher(4)
        ));
        assert!(matches!(
            scope_for(&user(9, UserRole::Parent)),
            ComplaintScope::SentBy(9)
        ));
    }

    #[test]
    fn test_visibility_and_handling() {
        let addressed = complaint(9, Some(4));
        assert!(can_view(&user(9, UserRole::Parent), &addressed));
        assert!(!can_view(&user(10, UserRole::Parent), &addressed));
        assert!(can_handle(&user(4, UserRole::Teacher), &addressed));
        assert!(!can_handle(&user(5, UserRole::Teacher), &addressed));
        assert!(!can_handle(&user(9, UserRole::Parent), &addressed));
        assert!(can_handle(&user(1, UserRole::Admin), &complaint(9, None)));
    }
}
