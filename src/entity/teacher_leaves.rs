//! 教师请假实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "teacher_leaves")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub teacher_id: i64,
    pub leave_type: String,
    pub start_date: Date,
    pub end_date: Date,
    #[sea_orm(column_type = "Text", nullable)]
    pub reason: Option<String>,
    pub status: String,
    pub approved_by: Option<i64>,
    pub approved_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::teachers::Entity",
        from = "Column::TeacherId",
        to = "super::teachers::Column::Id",
        on_delete = "Cascade"
    )]
    Teacher,
    #[sea_orm(has_many = "super::leave_approval_logs::Entity")]
    ApprovalLogs,
}

impl Related<super::teachers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Teacher.def()
    }
}

impl Related<super::leave_approval_logs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ApprovalLogs.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_leave(self) -> crate::models::leaves::entities::TeacherLeave {
        use crate::models::leaves::entities::{LeaveStatus, TeacherLeave};
        use super::to_datetime;

        TeacherLeave {
            id: self.id,
            teacher_id: self.teacher_id,
            leave_type: self.leave_type,
            start_date: self.start_date,
            end_date: self.end_date,
            reason: self.reason,
            status: self.status.parse().unwrap_or(LeaveStatus::Pending),
            approved_by: self.approved_by,
            approved_at: self.approved_at.map(to_datetime),
            created_at: to_datetime(self.created_at),
            updated_at: to_datetime(self.updated_at),
        }
    }
}
