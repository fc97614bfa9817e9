use sea_orm_migration::prelude::*;

use crate::m20250301_000001_create_core_tables::{Classrooms, Students, Subjects, Teachers, Users};

#[derive(DeriveMigrationName)]
pub struct Migration;

fn id_col<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col)
        .big_integer()
        .not_null()
        .auto_increment()
        .primary_key()
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 考勤表
        manager
            .create_table(
                Table::create()
                    .table(Attendance::Table)
                    .if_not_exists()
                    .col(id_col(Attendance::Id))
                    .col(ColumnDef::new(Attendance::StudentId).big_integer().not_null())
                    .col(ColumnDef::new(Attendance::Date).date().not_null())
                    .col(
                        ColumnDef::new(Attendance::Present)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Attendance::MarkedBy).big_integer().null())
                    .col(ColumnDef::new(Attendance::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Attendance::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Attendance::Table, Attendance::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Attendance::Table, Attendance::MarkedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_attendance_student_date")
                    .table(Attendance::Table)
                    .col(Attendance::StudentId)
                    .col(Attendance::Date)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 课表
        manager
            .create_table(
                Table::create()
                    .table(Timetables::Table)
                    .if_not_exists()
                    .col(id_col(Timetables::Id))
                    .col(ColumnDef::new(Timetables::Name).string().not_null())
                    .col(ColumnDef::new(Timetables::Description).text().null())
                    .col(ColumnDef::new(Timetables::ClassroomId).big_integer().null())
                    .col(ColumnDef::new(Timetables::AcademicYear).string().null())
                    .col(ColumnDef::new(Timetables::Semester).string().null())
                    .col(
                        ColumnDef::new(Timetables::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Timetables::IsPublished)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Timetables::CreatedBy).big_integer().null())
                    .col(ColumnDef::new(Timetables::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Timetables::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Timetables::Table, Timetables::ClassroomId)
                            .to(Classrooms::Table, Classrooms::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Timetables::Table, Timetables::CreatedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // 课表条目
        manager
            .create_table(
                Table::create()
                    .table(TimetableEntries::Table)
                    .if_not_exists()
                    .col(id_col(TimetableEntries::Id))
                    .col(
                        ColumnDef::new(TimetableEntries::TimetableId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(TimetableEntries::DayOfWeek).integer().not_null())
                    .col(
                        ColumnDef::new(TimetableEntries::PeriodNumber)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(TimetableEntries::StartTime).string().not_null())
                    .col(ColumnDef::new(TimetableEntries::EndTime).string().not_null())
                    .col(ColumnDef::new(TimetableEntries::SubjectId).big_integer().null())
                    .col(ColumnDef::new(TimetableEntries::TeacherId).big_integer().null())
                    .col(
                        ColumnDef::new(TimetableEntries::ClassroomId)
                            .big_integer()
                            .null(),
                    )
                    .col(ColumnDef::new(TimetableEntries::RoomNumber).string().null())
                    .col(
                        ColumnDef::new(TimetableEntries::IsLabPeriod)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(TimetableEntries::IsBreakPeriod)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(TimetableEntries::Notes).text().null())
                    .col(
                        ColumnDef::new(TimetableEntries::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(TimetableEntries::Table, TimetableEntries::TimetableId)
                            .to(Timetables::Table, Timetables::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(TimetableEntries::Table, TimetableEntries::SubjectId)
                            .to(Subjects::Table, Subjects::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(TimetableEntries::Table, TimetableEntries::TeacherId)
                            .to(Teachers::Table, Teachers::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(TimetableEntries::Table, TimetableEntries::ClassroomId)
                            .to(Classrooms::Table, Classrooms::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_timetable_entries_slot")
                    .table(TimetableEntries::Table)
                    .col(TimetableEntries::DayOfWeek)
                    .col(TimetableEntries::PeriodNumber)
                    .to_owned(),
            )
            .await?;

        // 教师请假
        manager
            .create_table(
                Table::create()
                    .table(TeacherLeaves::Table)
                    .if_not_exists()
                    .col(id_col(TeacherLeaves::Id))
                    .col(ColumnDef::new(TeacherLeaves::TeacherId).big_integer().not_null())
                    .col(ColumnDef::new(TeacherLeaves::LeaveType).string().not_null())
                    .col(ColumnDef::new(TeacherLeaves::StartDate).date().not_null())
                    .col(ColumnDef::new(TeacherLeaves::EndDate).date().not_null())
                    .col(ColumnDef::new(TeacherLeaves::Reason).text().null())
                    .col(ColumnDef::new(TeacherLeaves::Status).string().not_null())
                    .col(ColumnDef::new(TeacherLeaves::ApprovedBy).big_integer().null())
                    .col(ColumnDef::new(TeacherLeaves::ApprovedAt).big_integer().null())
                    .col(ColumnDef::new(TeacherLeaves::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(TeacherLeaves::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(TeacherLeaves::Table, TeacherLeaves::TeacherId)
                            .to(Teachers::Table, Teachers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(TeacherLeaves::Table, TeacherLeaves::ApprovedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_teacher_leaves_status")
                    .table(TeacherLeaves::Table)
                    .col(TeacherLeaves::Status)
                    .to_owned(),
            )
            .await?;

        // 请假审批日志
        manager
            .create_table(
                Table::create()
                    .table(LeaveApprovalLogs::Table)
                    .if_not_exists()
                    .col(id_col(LeaveApprovalLogs::Id))
                    .col(
                        ColumnDef::new(LeaveApprovalLogs::LeaveId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LeaveApprovalLogs::ApprovalType)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LeaveApprovalLogs::ApprovedBy)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(LeaveApprovalLogs::SubmittedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LeaveApprovalLogs::AutoApprovalTime)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(LeaveApprovalLogs::ActualApprovalTime)
                            .big_integer()
                            .null(),
                    )
                    .col(ColumnDef::new(LeaveApprovalLogs::Status).string().not_null())
                    .col(ColumnDef::new(LeaveApprovalLogs::Notes).text().null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(LeaveApprovalLogs::Table, LeaveApprovalLogs::LeaveId)
                            .to(TeacherLeaves::Table, TeacherLeaves::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 自动审批配置（单行）
        manager
            .create_table(
                Table::create()
                    .table(AutoLeaveApproval::Table)
                    .if_not_exists()
                    .col(id_col(AutoLeaveApproval::Id))
                    .col(
                        ColumnDef::new(AutoLeaveApproval::AutoApprovalEnabled)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(AutoLeaveApproval::ApprovalTimeMinutes)
                            .integer()
                            .not_null()
                            .default(30),
                    )
                    .col(
                        ColumnDef::new(AutoLeaveApproval::ApplyToLeaveTypes)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AutoLeaveApproval::NotifyAdmin)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(AutoLeaveApproval::NotifyTeacher)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(AutoLeaveApproval::UpdatedBy)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(AutoLeaveApproval::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        let seed = Query::insert()
            .into_table(AutoLeaveApproval::Table)
            .columns([
                AutoLeaveApproval::AutoApprovalEnabled,
                AutoLeaveApproval::ApprovalTimeMinutes,
                AutoLeaveApproval::ApplyToLeaveTypes,
                AutoLeaveApproval::NotifyAdmin,
                AutoLeaveApproval::NotifyTeacher,
                AutoLeaveApproval::UpdatedAt,
            ])
            .values_panic([
                true.into(),
                30.into(),
                "sick,emergency".into(),
                true.into(),
                true.into(),
                0i64.into(),
            ])
            .to_owned();
        manager.exec_stmt(seed).await?;

        // 投诉
        manager
            .create_table(
                Table::create()
                    .table(Complaints::Table)
                    .if_not_exists()
                    .col(id_col(Complaints::Id))
                    .col(ColumnDef::new(Complaints::Title).string().not_null())
                    .col(ColumnDef::new(Complaints::Description).text().not_null())
                    .col(ColumnDef::new(Complaints::Category).string().not_null())
                    .col(ColumnDef::new(Complaints::Priority).string().not_null())
                    .col(ColumnDef::new(Complaints::SenderId).big_integer().not_null())
                    .col(ColumnDef::new(Complaints::SenderType).string().not_null())
                    .col(ColumnDef::new(Complaints::RecipientType).string().not_null())
                    .col(ColumnDef::new(Complaints::RecipientId).big_integer().null())
                    .col(ColumnDef::new(Complaints::StudentId).big_integer().null())
                    .col(ColumnDef::new(Complaints::Status).string().not_null())
                    .col(ColumnDef::new(Complaints::Response).text().null())
                    .col(ColumnDef::new(Complaints::RespondedAt).big_integer().null())
                    .col(ColumnDef::new(Complaints::RespondedBy).big_integer().null())
                    .col(ColumnDef::new(Complaints::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Complaints::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Complaints::Table, Complaints::SenderId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Complaints::Table, Complaints::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // 通知
        manager
            .create_table(
                Table::create()
                    .table(Notifications::Table)
                    .if_not_exists()
                    .col(id_col(Notifications::Id))
                    .col(ColumnDef::new(Notifications::UserId).big_integer().not_null())
                    .col(ColumnDef::new(Notifications::SenderId).big_integer().null())
                    .col(ColumnDef::new(Notifications::Message).text().not_null())
                    .col(ColumnDef::new(Notifications::Kind).string().not_null())
                    .col(
                        ColumnDef::new(Notifications::IsRead)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Notifications::CreatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Notifications::Table, Notifications::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_notifications_user_read")
                    .table(Notifications::Table)
                    .col(Notifications::UserId)
                    .col(Notifications::IsRead)
                    .to_owned(),
            )
            .await?;

        // 私信
        manager
            .create_table(
                Table::create()
                    .table(Messages::Table)
                    .if_not_exists()
                    .col(id_col(Messages::Id))
                    .col(ColumnDef::new(Messages::SenderId).big_integer().not_null())
                    .col(ColumnDef::new(Messages::RecipientId).big_integer().not_null())
                    .col(ColumnDef::new(Messages::Body).text().not_null())
                    .col(
                        ColumnDef::new(Messages::IsRead)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Messages::CreatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Messages::Table, Messages::SenderId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Messages::Table, Messages::RecipientId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_messages_recipient")
                    .table(Messages::Table)
                    .col(Messages::RecipientId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Messages::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Notifications::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Complaints::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AutoLeaveApproval::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(LeaveApprovalLogs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TeacherLeaves::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TimetableEntries::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Timetables::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Attendance::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Attendance {
    #[sea_orm(iden = "attendance")]
    Table,
    Id,
    StudentId,
    Date,
    Present,
    MarkedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Timetables {
    #[sea_orm(iden = "timetables")]
    Table,
    Id,
    Name,
    Description,
    ClassroomId,
    AcademicYear,
    Semester,
    IsActive,
    IsPublished,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum TimetableEntries {
    #[sea_orm(iden = "timetable_entries")]
    Table,
    Id,
    TimetableId,
    DayOfWeek,
    PeriodNumber,
    StartTime,
    EndTime,
    SubjectId,
    TeacherId,
    ClassroomId,
    RoomNumber,
    IsLabPeriod,
    IsBreakPeriod,
    Notes,
    CreatedAt,
}

#[derive(DeriveIden)]
enum TeacherLeaves {
    #[sea_orm(iden = "teacher_leaves")]
    Table,
    Id,
    TeacherId,
    LeaveType,
    StartDate,
    EndDate,
    Reason,
    Status,
    ApprovedBy,
    ApprovedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum LeaveApprovalLogs {
    #[sea_orm(iden = "leave_approval_logs")]
    Table,
    Id,
    LeaveId,
    ApprovalType,
    ApprovedBy,
    SubmittedAt,
    AutoApprovalTime,
    ActualApprovalTime,
    Status,
    Notes,
}

#[derive(DeriveIden)]
enum AutoLeaveApproval {
    #[sea_orm(iden = "auto_leave_approval")]
    Table,
    Id,
    AutoApprovalEnabled,
    ApprovalTimeMinutes,
    ApplyToLeaveTypes,
    NotifyAdmin,
    NotifyTeacher,
    UpdatedBy,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Complaints {
    #[sea_orm(iden = "complaints")]
    Table,
    Id,
    Title,
    Description,
    Category,
    Priority,
    SenderId,
    SenderType,
    RecipientType,
    RecipientId,
    StudentId,
    Status,
    Response,
    RespondedAt,
    RespondedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Notifications {
    #[sea_orm(iden = "notifications")]
    Table,
    Id,
    UserId,
    SenderId,
    Message,
    Kind,
    IsRead,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Messages {
    #[sea_orm(iden = "messages")]
    Table,
    Id,
    SenderId,
    RecipientId,
    Body,
    IsRead,
    CreatedAt,
}
