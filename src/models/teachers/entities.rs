use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::common::enums::define_string_enum;

define_string_enum! {
    pub enum TeacherStatus("../frontend/src/types/generated/teacher.ts") {
        Active => "active",
        Inactive => "inactive",
    }
}

// 教师档案
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/teacher.ts")]
pub struct Teacher {
    pub id: i64,
    /// 通过注册密钥开户后关联的登录账号
    pub user_id: Option<i64>,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub qualification: Option<String>,
    pub subject: Option<String>,
    pub employee_id: Option<String>,
    pub date_of_joining: Option<NaiveDate>,
    pub secret_key: Option<String>,
    pub status: TeacherStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/teacher.ts")]
pub struct SecretKeyResponse {
    pub secret_key: String,
}
