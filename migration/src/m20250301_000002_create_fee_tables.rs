use sea_orm_migration::prelude::*;

use crate::m20250301_000001_create_core_tables::{Students, Users};

#[derive(DeriveMigrationName)]
pub struct Migration;

/// 默认费用类型：(名称, 描述, 是否周期性, 周期, 默认金额)
const DEFAULT_FEE_TYPES: [(&str, &str, bool, Option<&str>, f64); 6] = [
    ("Exam", "Examination fees", true, Some("quarterly"), 500.0),
    ("Enrollment", "Enrollment and admission fees", false, None, 1000.0),
    ("Trip", "Educational trips and excursions", false, None, 2000.0),
    ("Activities", "Extra-curricular activities", true, Some("monthly"), 300.0),
    ("Bus", "School bus transportation", true, Some("monthly"), 1500.0),
    ("Others", "Miscellaneous fees", false, None, 0.0),
];

fn unix_now() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or_default()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建费用类型表
        manager
            .create_table(
                Table::create()
                    .table(FeeTypes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FeeTypes::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(FeeTypes::Name)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(FeeTypes::Description).text().null())
                    .col(
                        ColumnDef::new(FeeTypes::IsRecurring)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(FeeTypes::Frequency).string().null())
                    .col(ColumnDef::new(FeeTypes::DefaultAmount).double().null())
                    .col(
                        ColumnDef::new(FeeTypes::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(FeeTypes::CreatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 创建费用表
        manager
            .create_table(
                Table::create()
                    .table(Fees::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Fees::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Fees::StudentId).big_integer().not_null())
                    .col(ColumnDef::new(Fees::FeeTypeId).big_integer().null())
                    .col(ColumnDef::new(Fees::Amount).double().not_null())
                    .col(ColumnDef::new(Fees::DueDate).date().null())
                    .col(ColumnDef::new(Fees::Paid).boolean().not_null().default(false))
                    .col(ColumnDef::new(Fees::PaymentDate).date().null())
                    .col(ColumnDef::new(Fees::AcademicYear).string().null())
                    .col(ColumnDef::new(Fees::Semester).string().null())
                    .col(ColumnDef::new(Fees::Description).text().null())
                    .col(
                        ColumnDef::new(Fees::LateFeeApplicable)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Fees::LateFeeRate)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(ColumnDef::new(Fees::FatherName).string().null())
                    .col(ColumnDef::new(Fees::MotherName).string().null())
                    .col(ColumnDef::new(Fees::GuardianName).string().null())
                    .col(ColumnDef::new(Fees::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Fees::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Fees::Table, Fees::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Fees::Table, Fees::FeeTypeId)
                            .to(FeeTypes::Table, FeeTypes::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建折扣表
        manager
            .create_table(
                Table::create()
                    .table(Discounts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Discounts::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Discounts::StudentId).big_integer().not_null())
                    .col(ColumnDef::new(Discounts::FeeId).big_integer().null())
                    .col(ColumnDef::new(Discounts::DiscountType).string().not_null())
                    .col(ColumnDef::new(Discounts::DiscountValue).double().not_null())
                    .col(ColumnDef::new(Discounts::Reason).text().null())
                    .col(ColumnDef::new(Discounts::ApprovedBy).big_integer().null())
                    .col(ColumnDef::new(Discounts::ValidFrom).date().null())
                    .col(ColumnDef::new(Discounts::ValidUntil).date().null())
                    .col(
                        ColumnDef::new(Discounts::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Discounts::CreatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Discounts::Table, Discounts::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Discounts::Table, Discounts::FeeId)
                            .to(Fees::Table, Fees::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建缴费记录表
        manager
            .create_table(
                Table::create()
                    .table(Payments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Payments::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Payments::FeeId).big_integer().not_null())
                    .col(ColumnDef::new(Payments::Amount).double().not_null())
                    .col(ColumnDef::new(Payments::PaidOn).date().not_null())
                    .col(
                        ColumnDef::new(Payments::TransactionId)
                            .string()
                            .null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Payments::PaymentMethod).string().not_null())
                    .col(ColumnDef::new(Payments::ReceivedBy).big_integer().null())
                    .col(ColumnDef::new(Payments::CreatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Payments::Table, Payments::FeeId)
                            .to(Fees::Table, Fees::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Payments::Table, Payments::ReceivedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建收据表
        manager
            .create_table(
                Table::create()
                    .table(Receipts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Receipts::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Receipts::PaymentId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Receipts::ReceiptNumber)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Receipts::IssuedAt).big_integer().not_null())
                    .col(ColumnDef::new(Receipts::IssuedTo).string().not_null())
                    .col(ColumnDef::new(Receipts::ParentName).string().null())
                    .col(ColumnDef::new(Receipts::TotalAmount).double().not_null())
                    .col(ColumnDef::new(Receipts::PaymentMethod).string().null())
                    .col(ColumnDef::new(Receipts::Notes).text().null())
                    .col(ColumnDef::new(Receipts::GeneratedBy).string().null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Receipts::Table, Receipts::PaymentId)
                            .to(Payments::Table, Payments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_fees_student_id")
                    .table(Fees::Table)
                    .col(Fees::StudentId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_payments_fee_id")
                    .table(Payments::Table)
                    .col(Payments::FeeId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_discounts_student_id")
                    .table(Discounts::Table)
                    .col(Discounts::StudentId)
                    .to_owned(),
            )
            .await?;

        // 写入默认费用类型
        let now = unix_now();
        for (name, description, recurring, frequency, amount) in DEFAULT_FEE_TYPES {
            let insert = Query::insert()
                .into_table(FeeTypes::Table)
                .columns([
                    FeeTypes::Name,
                    FeeTypes::Description,
                    FeeTypes::IsRecurring,
                    FeeTypes::Frequency,
                    FeeTypes::DefaultAmount,
                    FeeTypes::IsActive,
                    FeeTypes::CreatedAt,
                ])
                .values_panic([
                    name.into(),
                    description.into(),
                    recurring.into(),
                    frequency.map(|f| f.to_string()).into(),
                    amount.into(),
                    true.into(),
                    now.into(),
                ])
                .to_owned();
            manager.exec_stmt(insert).await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Receipts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Payments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Discounts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Fees::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(FeeTypes::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
pub(crate) enum FeeTypes {
    #[sea_orm(iden = "fee_types")]
    Table,
    Id,
    Name,
    Description,
    IsRecurring,
    Frequency,
    DefaultAmount,
    IsActive,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Fees {
    #[sea_orm(iden = "fees")]
    Table,
    Id,
    StudentId,
    FeeTypeId,
    Amount,
    DueDate,
    Paid,
    PaymentDate,
    AcademicYear,
    Semester,
    Description,
    LateFeeApplicable,
    LateFeeRate,
    FatherName,
    MotherName,
    GuardianName,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Discounts {
    #[sea_orm(iden = "discounts")]
    Table,
    Id,
    StudentId,
    FeeId,
    DiscountType,
    DiscountValue,
    Reason,
    ApprovedBy,
    ValidFrom,
    ValidUntil,
    IsActive,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Payments {
    #[sea_orm(iden = "payments")]
    Table,
    Id,
    FeeId,
    Amount,
    PaidOn,
    TransactionId,
    PaymentMethod,
    ReceivedBy,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Receipts {
    #[sea_orm(iden = "receipts")]
    Table,
    Id,
    PaymentId,
    ReceiptNumber,
    IssuedAt,
    IssuedTo,
    ParentName,
    TotalAmount,
    PaymentMethod,
    Notes,
    GeneratedBy,
}
