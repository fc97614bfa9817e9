use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

fn pk<T: IntoIden>(col: T) -> ColumnDef {
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
        // 创建用户表
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(pk(Users::Id))
                    .col(
                        ColumnDef::new(Users::Username)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Users::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Users::Role).string().not_null())
                    .col(ColumnDef::new(Users::Status).string().not_null())
                    .col(ColumnDef::new(Users::DisplayName).string().null())
                    .col(ColumnDef::new(Users::Phone).string().null())
                    .col(ColumnDef::new(Users::LastLogin).big_integer().null())
                    .col(ColumnDef::new(Users::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Users::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 创建教师表
        manager
            .create_table(
                Table::create()
                    .table(Teachers::Table)
                    .if_not_exists()
                    .col(pk(Teachers::Id))
                    .col(ColumnDef::new(Teachers::UserId).big_integer().null())
                    .col(ColumnDef::new(Teachers::Name).string().not_null())
                    .col(ColumnDef::new(Teachers::Email).string().null().unique_key())
                    .col(ColumnDef::new(Teachers::Phone).string().null())
                    .col(ColumnDef::new(Teachers::Qualification).string().null())
                    .col(ColumnDef::new(Teachers::Subject).string().null())
                    .col(
                        ColumnDef::new(Teachers::EmployeeId)
                            .string()
                            .null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Teachers::DateOfJoining).date().null())
                    .col(
                        ColumnDef::new(Teachers::SecretKey)
                            .string()
                            .null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Teachers::Status).string().not_null())
                    .col(ColumnDef::new(Teachers::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Teachers::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Teachers::Table, Teachers::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建教室（班级）表
        manager
            .create_table(
                Table::create()
                    .table(Classrooms::Table)
                    .if_not_exists()
                    .col(pk(Classrooms::Id))
                    .col(
                        ColumnDef::new(Classrooms::Name)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Classrooms::Grade).string().null())
                    .col(ColumnDef::new(Classrooms::Section).string().null())
                    .col(ColumnDef::new(Classrooms::Stream).string().null())
                    .col(ColumnDef::new(Classrooms::AcademicYear).string().null())
                    .col(ColumnDef::new(Classrooms::Capacity).integer().null())
                    .col(ColumnDef::new(Classrooms::ClassTeacherId).big_integer().null())
                    .col(ColumnDef::new(Classrooms::Room).string().null())
                    .col(ColumnDef::new(Classrooms::Status).string().not_null())
                    .col(ColumnDef::new(Classrooms::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Classrooms::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Classrooms::Table, Classrooms::ClassTeacherId)
                            .to(Teachers::Table, Teachers::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建学生表
        manager
            .create_table(
                Table::create()
                    .table(Students::Table)
                    .if_not_exists()
                    .col(pk(Students::Id))
                    .col(ColumnDef::new(Students::Name).string().not_null())
                    .col(ColumnDef::new(Students::RollNumber).string().null())
                    .col(ColumnDef::new(Students::Email).string().null().unique_key())
                    .col(ColumnDef::new(Students::Gender).string().null())
                    .col(ColumnDef::new(Students::DateOfBirth).date().null())
                    .col(ColumnDef::new(Students::ClassId).big_integer().null())
                    .col(ColumnDef::new(Students::FatherName).string().null())
                    .col(ColumnDef::new(Students::MotherName).string().null())
                    .col(ColumnDef::new(Students::GuardianName).string().null())
                    .col(ColumnDef::new(Students::Phone).string().null())
                    .col(ColumnDef::new(Students::Address).text().null())
                    .col(ColumnDef::new(Students::IsActive).boolean().not_null())
                    .col(ColumnDef::new(Students::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Students::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Students::Table, Students::ClassId)
                            .to(Classrooms::Table, Classrooms::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建家长表
        manager
            .create_table(
                Table::create()
                    .table(Parents::Table)
                    .if_not_exists()
                    .col(pk(Parents::Id))
                    .col(ColumnDef::new(Parents::UserId).big_integer().null())
                    .col(ColumnDef::new(Parents::StudentId).big_integer().null())
                    .col(ColumnDef::new(Parents::Name).string().not_null())
                    .col(ColumnDef::new(Parents::Email).string().null())
                    .col(ColumnDef::new(Parents::Phone).string().null())
                    .col(ColumnDef::new(Parents::Address).text().null())
                    .col(ColumnDef::new(Parents::Relation).string().null())
                    .col(
                        ColumnDef::new(Parents::SecretKey)
                            .string()
                            .null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Parents::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Parents::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Parents::Table, Parents::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Parents::Table, Parents::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建科目表
        manager
            .create_table(
                Table::create()
                    .table(Subjects::Table)
                    .if_not_exists()
                    .col(pk(Subjects::Id))
                    .col(ColumnDef::new(Subjects::Name).string().not_null())
                    .col(ColumnDef::new(Subjects::Code).string().null())
                    .col(ColumnDef::new(Subjects::Stream).string().null())
                    .col(ColumnDef::new(Subjects::ClassroomId).big_integer().null())
                    .col(ColumnDef::new(Subjects::TeacherId).big_integer().null())
                    .col(ColumnDef::new(Subjects::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Subjects::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Subjects::Table, Subjects::ClassroomId)
                            .to(Classrooms::Table, Classrooms::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Subjects::Table, Subjects::TeacherId)
                            .to(Teachers::Table, Teachers::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建操作日志表
        manager
            .create_table(
                Table::create()
                    .table(ActivityLogs::Table)
                    .if_not_exists()
                    .col(pk(ActivityLogs::Id))
                    .col(ColumnDef::new(ActivityLogs::Timestamp).big_integer().not_null())
                    .col(ColumnDef::new(ActivityLogs::UserId).big_integer().null())
                    .col(ColumnDef::new(ActivityLogs::Category).string().not_null())
                    .col(ColumnDef::new(ActivityLogs::Message).text().not_null())
                    .col(ColumnDef::new(ActivityLogs::IpAddress).string().null())
                    .col(ColumnDef::new(ActivityLogs::RemoteAddr).string().null())
                    .col(ColumnDef::new(ActivityLogs::XForwardedFor).string().null())
                    .col(ColumnDef::new(ActivityLogs::XRealIp).string().null())
                    .col(ColumnDef::new(ActivityLogs::XClientIp).string().null())
                    .col(ColumnDef::new(ActivityLogs::IpType).string().null())
                    .col(ColumnDef::new(ActivityLogs::UserAgent).text().null())
                    .col(ColumnDef::new(ActivityLogs::AdditionalData).text().null())
                    .to_owned(),
            )
            .await?;

        // 创建索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_users_role")
                    .table(Users::Table)
                    .col(Users::Role)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_students_class_id")
                    .table(Students::Table)
                    .col(Students::ClassId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_parents_user_id")
                    .table(Parents::Table)
                    .col(Parents::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_activity_logs_timestamp")
                    .table(ActivityLogs::Table)
                    .col(ActivityLogs::Timestamp)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ActivityLogs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Subjects::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Parents::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Students::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Classrooms::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Teachers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
pub(crate) enum Users {
    #[sea_orm(iden = "users")]
    Table,
    Id,
    Username,
    Email,
    PasswordHash,
    Role,
    Status,
    DisplayName,
    Phone,
    LastLogin,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub(crate) enum Teachers {
    #[sea_orm(iden = "teachers")]
    Table,
    Id,
    UserId,
    Name,
    Email,
    Phone,
    Qualification,
    Subject,
    EmployeeId,
    DateOfJoining,
    SecretKey,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub(crate) enum Classrooms {
    #[sea_orm(iden = "classrooms")]
    Table,
    Id,
    Name,
    Grade,
    Section,
    Stream,
    AcademicYear,
    Capacity,
    ClassTeacherId,
    Room,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub(crate) enum Students {
    #[sea_orm(iden = "students")]
    Table,
    Id,
    Name,
    RollNumber,
    Email,
    Gender,
    DateOfBirth,
    ClassId,
    FatherName,
    MotherName,
    GuardianName,
    Phone,
    Address,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub(crate) enum Parents {
    #[sea_orm(iden = "parents")]
    Table,
    Id,
    UserId,
    StudentId,
    Name,
    Email,
    Phone,
    Address,
    Relation,
    SecretKey,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub(crate) enum Subjects {
    #[sea_orm(iden = "subjects")]
    Table,
    Id,
    Name,
    Code,
    Stream,
    ClassroomId,
    TeacherId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ActivityLogs {
    #[sea_orm(iden = "activity_logs")]
    Table,
    Id,
    Timestamp,
    UserId,
    Category,
    Message,
    IpAddress,
    RemoteAddr,
    XForwardedFor,
    XRealIp,
    XClientIp,
    IpType,
    UserAgent,
    AdditionalData,
}
