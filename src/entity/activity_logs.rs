//! 操作日志实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "activity_logs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub timestamp: i64,
    pub user_id: Option<i64>,
    pub category: String,
    #[sea_orm(column_type = "Text")]
    pub message: String,
    pub ip_address: Option<String>,
    pub remote_addr: Option<String>,
    pub x_forwarded_for: Option<String>,
    pub x_real_ip: Option<String>,
    pub x_client_ip: Option<String>,
    pub ip_type: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub user_agent: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub additional_data: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_delete = "SetNull"
    )]
    User,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_activity_log(self) -> crate::models::activity::entities::ActivityLog {
        use crate::models::activity::entities::ActivityLog;

        // 附加数据按 JSON 存储，解析失败时原样保留为字符串
        let additional_data = self.additional_data.map(|raw| {
            serde_json::from_str(&raw).unwrap_or(serde_json::Value::String(raw))
        });

        ActivityLog {
            id: self.id,
            timestamp: super::to_datetime(self.timestamp),
            user_id: self.user_id,
            category: self.category,
            message: self.message,
            ip_address: self.ip_address,
            remote_addr: self.remote_addr,
            x_forwarded_for: self.x_forwarded_for,
            x_real_ip: self.x_real_ip,
            x_client_ip: self.x_client_ip,
            ip_type: self.ip_type,
            user_agent: self.user_agent,
            additional_data,
        }
    }
}
