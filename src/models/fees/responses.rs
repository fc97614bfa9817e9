use serde::Serialize;
use ts_rs::TS;

use super::entities::{Fee, Payment, Receipt};
use super::ledger::FeeLedger;

/// 费用详情（附台账与缴费记录）
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/fee.ts")]
pub struct FeeDetail {
    pub fee: Fee,
    pub fee_type_name: Option<String>,
    pub ledger: FeeLedger,
    pub payments: Vec<Payment>,
}

/// 缴费结果
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/fee.ts")]
pub struct PaymentResult {
    pub payment: Payment,
    pub receipt: Receipt,
    pub ledger: FeeLedger,
}

/// 按班级收费标准批量生成的结果
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/fee.ts")]
pub struct ClassFeeGeneration {
    pub classroom_id: i64,
    pub academic_year: String,
    pub students: usize,
    /// 已有同类型同学年费用而跳过的数量
    pub skipped: usize,
    pub fees: Vec<Fee>,
}
