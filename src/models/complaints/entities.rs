use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::common::enums::define_string_enum;

define_string_enum! {
    pub enum ComplaintCategory("../frontend/src/types/generated/complaint.ts") {
        Academic => "academic",
        Facility => "facility",
        Behavior => "behavior",
        Other => "other",
    }
}

define_string_enum! {
    pub enum ComplaintPriority("../frontend/src/types/generated/complaint.ts") {
        Normal => "normal",
        High => "high",
        Urgent => "urgent",
    }
}

define_string_enum! {
    pub enum ComplaintStatus("../frontend/src/types/generated/complaint.ts") {
        Pending => "pending",
        InProgress => "in_progress",
        Resolved => "resolved",
        Rejected => "rejected",
    }
}

define_string_enum! {
    pub enum RecipientType("../frontend/src/types/generated/complaint.ts") {
        Admin => "admin",
        Teacher => "teacher",
    }
}

// 投诉
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/complaint.ts")]
pub struct Complaint {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub category: ComplaintCategory,
    pub priority: ComplaintPriority,
    pub sender_id: i64,
    /// parent / student
    pub sender_type: String,
    pub recipient_type: RecipientType,
    /// 收件教师的用户 ID
    pub recipient_id: Option<i64>,
    pub student_id: Option<i64>,
    pub status: ComplaintStatus,
    pub response: Option<String>,
    pub responded_at: Option<chrono::DateTime<chrono::Utc>>,
    pub responded_by: Option<i64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
