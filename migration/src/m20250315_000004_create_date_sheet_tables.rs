use sea_orm_migration::prelude::*;

use crate::m20250301_000001_create_core_tables::{Classrooms, Subjects, Users};

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
        // 考试日程表
        manager
            .create_table(
                Table::create()
                    .table(DateSheets::Table)
                    .if_not_exists()
                    .col(id_col(DateSheets::Id))
                    .col(ColumnDef::new(DateSheets::Title).string().not_null())
                    .col(ColumnDef::new(DateSheets::Description).text().null())
                    .col(ColumnDef::new(DateSheets::ClassroomId).big_integer().null())
                    .col(ColumnDef::new(DateSheets::AcademicYear).string().null())
                    .col(ColumnDef::new(DateSheets::ExamType).string().not_null())
                    .col(ColumnDef::new(DateSheets::StartDate).date().not_null())
                    .col(ColumnDef::new(DateSheets::EndDate).date().not_null())
                    .col(
                        ColumnDef::new(DateSheets::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(DateSheets::IsPublished)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(DateSheets::CreatedBy).big_integer().null())
                    .col(ColumnDef::new(DateSheets::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(DateSheets::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(DateSheets::Table, DateSheets::ClassroomId)
                            .to(Classrooms::Table, Classrooms::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(DateSheets::Table, DateSheets::CreatedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // 考试场次
        manager
            .create_table(
                Table::create()
                    .table(DateSheetEntries::Table)
                    .if_not_exists()
                    .col(id_col(DateSheetEntries::Id))
                    .col(
                        ColumnDef::new(DateSheetEntries::DateSheetId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(DateSheetEntries::ExamDate).date().not_null())
                    .col(ColumnDef::new(DateSheetEntries::StartTime).string().not_null())
                    .col(ColumnDef::new(DateSheetEntries::EndTime).string().not_null())
                    .col(ColumnDef::new(DateSheetEntries::SubjectId).big_integer().null())
                    .col(
                        ColumnDef::new(DateSheetEntries::ClassroomId)
                            .big_integer()
                            .null(),
                    )
                    .col(ColumnDef::new(DateSheetEntries::MaxMarks).integer().null())
                    .col(ColumnDef::new(DateSheetEntries::Venue).string().null())
                    .col(ColumnDef::new(DateSheetEntries::RoomNumber).string().null())
                    .col(
                        ColumnDef::new(DateSheetEntries::SpecialInstructions)
                            .text()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(DateSheetEntries::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(DateSheetEntries::Table, DateSheetEntries::DateSheetId)
                            .to(DateSheets::Table, DateSheets::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(DateSheetEntries::Table, DateSheetEntries::SubjectId)
                            .to(Subjects::Table, Subjects::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(DateSheetEntries::Table, DateSheetEntries::ClassroomId)
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
                    .name("idx_date_sheet_entries_exam_date")
                    .table(DateSheetEntries::Table)
                    .col(DateSheetEntries::ExamDate)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DateSheetEntries::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(DateSheets::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum DateSheets {
    #[sea_orm(iden = "date_sheets")]
    Table,
    Id,
    Title,
    Description,
    ClassroomId,
    AcademicYear,
    ExamType,
    StartDate,
    EndDate,
    IsActive,
    IsPublished,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum DateSheetEntries {
    #[sea_orm(iden = "date_sheet_entries")]
    Table,
    Id,
    DateSheetId,
    ExamDate,
    StartTime,
    EndTime,
    SubjectId,
    ClassroomId,
    MaxMarks,
    Venue,
    RoomNumber,
    SpecialInstructions,
    CreatedAt,
}
