//! 自动审批配置实体（单行表）

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "auto_leave_approval")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub auto_approval_enabled: bool,
    pub approval_time_minutes: i32,
    pub apply_to_leave_types: String,
    pub notify_admin: bool,
    pub notify_teacher: bool,
    pub updated_by: Option<i64>,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_settings(self) -> crate::models::leaves::entities::AutoApprovalSettings {
        crate::models::leaves::entities::AutoApprovalSettings {
            enabled: self.auto_approval_enabled,
            approval_time_minutes: self.approval_time_minutes,
            apply_to_leave_types: self.apply_to_leave_types,
            notify_admin: self.notify_admin,
            notify_teacher: self.notify_teacher,
            updated_by: self.updated_by,
            updated_at: super::to_datetime(self.updated_at),
        }
    }
}
