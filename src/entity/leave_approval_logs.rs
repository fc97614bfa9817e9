//! 请假审批日志实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "leave_approval_logs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub leave_id: i64,
    pub approval_type: String,
    pub approved_by: Option<i64>,
    pub submitted_at: i64,
    pub auto_approval_time: Option<i64>,
    pub actual_approval_time: Option<i64>,
    pub status: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::teacher_leaves::Entity",
        from = "Column::LeaveId",
        to = "super::teacher_leaves::Column::Id",
        on_delete = "Cascade"
    )]
    Leave,
}

impl Related<super::teacher_leaves::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Leave.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_log(self) -> crate::models::leaves::entities::LeaveApprovalLog {
        use crate::models::leaves::entities::{ApprovalLogStatus, ApprovalType, LeaveApprovalLog};
        use super::to_datetime;

        LeaveApprovalLog {
            id: self.id,
            leave_id: self.leave_id,
            approval_type: self.approval_type.parse().unwrap_or(ApprovalType::Manual),
            approved_by: self.approved_by,
            submitted_at: to_datetime(self.submitted_at),
            auto_approval_time: self.auto_approval_time.map(to_datetime),
            actual_approval_time: self.actual_approval_time.map(to_datetime),
            status: self
                .status
                .parse()
                .unwrap_or(ApprovalLogStatus::ManualApproved),
            notes: self.notes,
        }
    }
}
