use sea_orm_migration::prelude::*;

use crate::m20250301_000001_create_core_tables::{Classrooms, Users};
use crate::m20250301_000002_create_fee_tables::FeeTypes;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 班级收费标准
        manager
            .create_table(
                Table::create()
                    .table(ClassFees::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ClassFees::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ClassFees::ClassroomId).big_integer().not_null())
                    .col(ColumnDef::new(ClassFees::FeeTypeId).big_integer().not_null())
                    .col(ColumnDef::new(ClassFees::AcademicYear).string().not_null())
                    .col(ColumnDef::new(ClassFees::Semester).string().null())
                    .col(ColumnDef::new(ClassFees::BaseAmount).double().not_null())
                    .col(
                        ColumnDef::new(ClassFees::AdjustmentAmount)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(ColumnDef::new(ClassFees::AdjustmentReason).text().null())
                    .col(ColumnDef::new(ClassFees::AdjustedBy).big_integer().null())
                    .col(ColumnDef::new(ClassFees::AdjustedAt).big_integer().null())
                    .col(ColumnDef::new(ClassFees::DueDate).date().null())
                    .col(
                        ColumnDef::new(ClassFees::LateFeeApplicable)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(ClassFees::LateFeeRate)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(ColumnDef::new(ClassFees::Description).text().null())
                    .col(
                        ColumnDef::new(ClassFees::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(ClassFees::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(ClassFees::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(ClassFees::Table, ClassFees::ClassroomId)
                            .to(Classrooms::Table, Classrooms::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ClassFees::Table, ClassFees::FeeTypeId)
                            .to(FeeTypes::Table, FeeTypes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ClassFees::Table, ClassFees::AdjustedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // 每个班级每学年每种费用只有一条标准
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_class_fees_class_type_year")
                    .table(ClassFees::Table)
                    .col(ClassFees::ClassroomId)
                    .col(ClassFees::FeeTypeId)
                    .col(ClassFees::AcademicYear)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ClassFees::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum ClassFees {
    #[sea_orm(iden = "class_fees")]
    Table,
    Id,
    ClassroomId,
    FeeTypeId,
    AcademicYear,
    Semester,
    BaseAmount,
    AdjustmentAmount,
    AdjustmentReason,
    AdjustedBy,
    AdjustedAt,
    DueDate,
    LateFeeApplicable,
    LateFeeRate,
    Description,
    IsActive,
    CreatedAt,
    UpdatedAt,
}
