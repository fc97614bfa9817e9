use super::entities::{UserRole, UserStatus};
use crate::models::common::PaginationQuery;
use serde::Deserialize;
use ts_rs::TS;

/// `GET /api/v1/users` 查询参数
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct UserListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub role: Option<UserRole>,
    pub status: Option<UserStatus>,
    /// 匹配用户名、邮箱或显示名
    pub search: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    /// 入库前替换为哈希
    pub password: String,
    pub role: UserRole,
    pub display_name: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<UserRole>,
    pub status: Option<UserStatus>,
    pub display_name: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct SetUserStatusRequest {
    pub status: UserStatus,
}

impl From<SetUserStatusRequest> for UpdateUserRequest {
    fn from(req: SetUserStatusRequest) -> Self {
        Self {
            status: Some(req.status),
            ..Default::default()
        }
    }
}

/// 存储层使用的列表条件
#[derive(Debug, Clone, Default)]
pub struct UserListQuery {
    pub page: i64,
    pub size: i64,
    pub role: Option<UserRole>,
    pub status: Option<UserStatus>,
    pub search: Option<String>,
}

impl From<UserListParams> for UserListQuery {
    fn from(params: UserListParams) -> Self {
        Self {
            page: params.pagination.page.max(1),
            size: params.pagination.size.clamp(1, 100),
            role: params.role,
            status: params.status,
            search: params
                .search
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
        }
    }
}
