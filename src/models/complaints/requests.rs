use serde::Deserialize;
use ts_rs::TS;

use super::entities::{ComplaintCategory, ComplaintPriority, ComplaintStatus, RecipientType};
use crate::models::common::PaginationQuery;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/complaint.ts")]
pub struct CreateComplaintRequest {
    pub title: String,
    pub description: String,
    pub category: ComplaintCategory,
    pub priority: Option<ComplaintPriority>,
    pub recipient_type: RecipientType,
    pub recipient_id: Option<i64>,
    pub student_id: Option<i64>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/complaint.ts")]
pub struct RespondComplaintRequest {
    pub response: String,
    pub status: Option<ComplaintStatus>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/complaint.ts")]
pub struct UpdateComplaintStatusRequest {
    pub status: ComplaintStatus,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/complaint.ts")]
pub struct ComplaintListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub status: Option<ComplaintStatus>,
    pub category: Option<ComplaintCategory>,
}

/// 存储层可见范围
#[derive(Debug, Clone, Copy)]
pub enum ComplaintScope {
    All,
    SentBy(i64),
    AddressedToTeacher(i64),
}

#[derive(Debug, Clone)]
pub struct ComplaintListQuery {
    pub scope: ComplaintScope,
    pub page: i64,
    pub size: i64,
    pub status: Option<ComplaintStatus>,
    pub category: Option<ComplaintCategory>,
}
