use crate::models::users::entities::{User, UserRole};
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub struct LoginResponse {
    pub access_token: String,
    /// 访问令牌剩余秒数
    pub expires_in: i64,
    pub user: User,
    /// 前端据此选择仪表盘
    pub dashboard: String,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub struct RefreshTokenResponse {
    pub access_token: String,
    pub expires_in: i64,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub struct UserInfoResponse {
    pub user: User,
}

/// 当前登录用户及其关联的在册档案
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub struct CurrentUserResponse {
    pub user: User,
    pub teacher_id: Option<i64>,
    /// 家长名下的学生
    pub children: Vec<i64>,
}

/// 注册密钥对应的在册档案摘要
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub struct SecretKeyLookupResponse {
    pub record_id: i64,
    pub name: String,
    pub email: Option<String>,
    /// 家长关联的学生姓名；教师为空
    pub student_name: Option<String>,
}

pub fn dashboard_for(role: &UserRole) -> &'static str {
    match role {
        UserRole::Admin => "/admin",
        UserRole::Teacher => "/teacher",
        UserRole::Parent => "/parent",
        UserRole::Student => "/student",
    }
}
