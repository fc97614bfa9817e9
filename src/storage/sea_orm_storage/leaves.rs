//! 教师请假与自动审批存储操作

use super::SeaOrmStorage;
use crate::entity::auto_leave_approval::{
    ActiveModel as SettingsActiveModel, Column as SettingsColumn, Entity as AutoLeaveApproval,
};
use crate::entity::leave_approval_logs::{
    ActiveModel as LogActiveModel, Column as LogColumn, Entity as LeaveApprovalLogs,
};
use crate::entity::teacher_leaves::{ActiveModel, Column, Entity as TeacherLeaves};
use crate::errors::{Result, SchoolDeskError};
use crate::models::{
    PaginatedResponse, PaginationInfo,
    leaves::{
        entities::{AutoApprovalSettings, LeaveApprovalLog, LeaveDecision, LeaveStatus, TeacherLeave},
        requests::{ApplyLeaveRequest, LeaveListParams, UpdateAutoApprovalRequest},
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

const DEFAULT_APPROVAL_MINUTES: i32 = 30;
const DEFAULT_LEAVE_TYPES: &str = "sick,emergency";

impl SeaOrmStorage {
    pub async fn create_leave_impl(
        &self,
        teacher_id: i64,
        req: ApplyLeaveRequest,
    ) -> Result<TeacherLeave> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            teacher_id: Set(teacher_id),
            leave_type: Set(req.leave_type.trim().to_lowercase()),
            start_date: Set(req.start_date),
            end_date: Set(req.end_date),
            reason: Set(req.reason),
            status: Set(LeaveStatus::Pending.to_string()),
            approved_by: Set(None),
            approved_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("提交请假失败: {e}")))?;

        Ok(result.into_leave())
    }

    pub async fn get_leave_by_id_impl(&self, id: i64) -> Result<Option<TeacherLeave>> {
        let result = TeacherLeaves::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询请假失败: {e}")))?;

        Ok(result.map(|m| m.into_leave()))
    }

    pub async fn list_leaves_with_pagination_impl(
        &self,
        query: LeaveListParams,
    ) -> Result<PaginatedResponse<TeacherLeave>> {
        let (page, size) = query.pagination.normalized();

        let mut select = TeacherLeaves::find();

        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }
        if let Some(teacher_id) = query.teacher_id {
            select = select.filter(Column::TeacherId.eq(teacher_id));
        }

        let paginator = select
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询请假总数失败: {e}")))?;
        let leaves = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询请假列表失败: {e}")))?;

        Ok(PaginatedResponse {
            items: leaves.into_iter().map(|m| m.into_leave()).collect(),
            pagination: PaginationInfo::new(page, size, total),
        })
    }

    /// 所有待审批请假，按提交时间升序
    pub async fn list_pending_leaves_impl(&self) -> Result<Vec<TeacherLeave>> {
        let leaves = TeacherLeaves::find()
            .filter(Column::Status.eq(LeaveStatus::Pending.to_string()))
            .order_by_asc(Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询待审批请假失败: {e}")))?;

        Ok(leaves.into_iter().map(|m| m.into_leave()).collect())
    }

    /// 审批请假并写入审批日志；请假已不是待审批状态时返回 None
    pub async fn decide_leave_impl(&self, decision: LeaveDecision) -> Result<Option<TeacherLeave>> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("开启事务失败: {e}")))?;

        let Some(leave) = TeacherLeaves::find_by_id(decision.leave_id)
            .one(&txn)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询请假失败: {e}")))?
        else {
            return Ok(None);
        };
        if leave.status != LeaveStatus::Pending.as_str() {
            return Ok(None);
        }

        let updated = ActiveModel {
            id: Set(leave.id),
            status: Set(decision.status.to_string()),
            approved_by: Set(decision.decided_by),
            approved_at: Set(Some(decision.decided_at)),
            updated_at: Set(decision.decided_at),
            ..Default::default()
        }
        .update(&txn)
        .await
        .map_err(|e| SchoolDeskError::database_operation(format!("更新请假状态失败: {e}")))?;

        LogActiveModel {
            leave_id: Set(leave.id),
            approval_type: Set(decision.approval_type.to_string()),
            approved_by: Set(decision.decided_by),
            submitted_at: Set(leave.created_at),
            auto_approval_time: Set(decision.auto_approval_time),
            actual_approval_time: Set(Some(decision.decided_at)),
            status: Set(decision.log_status.to_string()),
            notes: Set(decision.notes),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| SchoolDeskError::database_operation(format!("写入审批日志失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(Some(updated.into_leave()))
    }

    pub async fn list_leave_approval_logs_impl(&self, leave_id: i64) -> Result<Vec<LeaveApprovalLog>> {
        let logs = LeaveApprovalLogs::find()
            .filter(LogColumn::LeaveId.eq(leave_id))
            .order_by_asc(LogColumn::Id)
            .all(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询审批日志失败: {e}")))?;

        Ok(logs.into_iter().map(|m| m.into_log()).collect())
    }

    /// 读取配置；表为空时写入默认行
    pub async fn get_auto_approval_settings_impl(&self) -> Result<AutoApprovalSettings> {
        let existing = AutoLeaveApproval::find()
            .order_by_asc(SettingsColumn::Id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询自动审批配置失败: {e}")))?;

        if let Some(row) = existing {
            return Ok(row.into_settings());
        }

        let created = SettingsActiveModel {
            auto_approval_enabled: Set(true),
            approval_time_minutes: Set(DEFAULT_APPROVAL_MINUTES),
            apply_to_leave_types: Set(DEFAULT_LEAVE_TYPES.to_string()),
            notify_admin: Set(true),
            notify_teacher: Set(true),
            updated_by: Set(None),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| SchoolDeskError::database_operation(format!("初始化自动审批配置失败: {e}")))?;

        Ok(created.into_settings())
    }

    pub async fn update_auto_approval_settings_impl(
        &self,
        update: UpdateAutoApprovalRequest,
        updated_by: i64,
    ) -> Result<AutoApprovalSettings> {
        // 确保配置行存在
        self.get_auto_approval_settings_impl().await?;
        let row = AutoLeaveApproval::find()
            .order_by_asc(SettingsColumn::Id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询自动审批配置失败: {e}")))?
            .ok_or_else(|| SchoolDeskError::database_operation("自动审批配置缺失"))?;

        let mut model = SettingsActiveModel {
            id: Set(row.id),
            updated_by: Set(Some(updated_by)),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(enabled) = update.enabled {
            model.auto_approval_enabled = Set(enabled);
        }
        if let Some(minutes) = update.approval_time_minutes {
            model.approval_time_minutes = Set(minutes);
        }
        if let Some(types) = update.apply_to_leave_types {
            let joined = types
                .iter()
                .map(|t| t.trim().to_lowercase())
                .filter(|t| !t.is_empty())
                .collect::<Vec<_>>()
                .join(",");
            model.apply_to_leave_types = Set(joined);
        }
        if let Some(notify_admin) = update.notify_admin {
            model.notify_admin = Set(notify_admin);
        }
        if let Some(notify_teacher) = update.notify_teacher {
            model.notify_teacher = Set(notify_teacher);
        }

        let saved = model
            .update(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("更新自动审批配置失败: {e}")))?;

        Ok(saved.into_settings())
    }
}
