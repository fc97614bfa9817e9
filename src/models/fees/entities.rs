use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::common::enums::define_string_enum;
use crate::utils::money::round2;

define_string_enum! {
    pub enum DiscountType("../frontend/src/types/generated/fee.ts") {
        Percentage => "percentage",
        FixedAmount => "fixed_amount",
    }
}

define_string_enum! {
    pub enum PaymentMethod("../frontend/src/types/generated/fee.ts") {
        Cash => "cash",
        Card => "card",
        Bank => "bank",
        Cheque => "cheque",
        Upi => "upi",
        Qr => "qr",
        Online => "online",
    }
}

define_string_enum! {
    pub enum PaymentStatus("../frontend/src/types/generated/fee.ts") {
        Pending => "pending",
        Paid => "paid",
        Overdue => "overdue",
        Advance => "advance",
    }
}

impl PaymentMethod {
    /// 线上支付方式需要生成交易号
    pub fn is_online(&self) -> bool {
        matches!(
            self,
            PaymentMethod::Upi | PaymentMethod::Qr | PaymentMethod::Online
        )
    }
}

// 费用类型
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/fee.ts")]
pub struct FeeType {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub is_recurring: bool,
    pub frequency: Option<String>,
    pub default_amount: Option<f64>,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

// 学生应缴费用
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/fee.ts")]
pub struct Fee {
    pub id: i64,
    pub student_id: i64,
    pub fee_type_id: Option<i64>,
    pub amount: f64,
    pub due_date: Option<NaiveDate>,
    pub paid: bool,
    pub payment_date: Option<NaiveDate>,
    pub academic_year: Option<String>,
    pub semester: Option<String>,
    pub description: Option<String>,
    pub late_fee_applicable: bool,
    /// 每逾期一天按最终金额收取的百分比
    pub late_fee_rate: f64,
    // 创建时的家长信息快照
    pub father_name: Option<String>,
    pub mother_name: Option<String>,
    pub guardian_name: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Fee {
    pub fn parent_name_snapshot(&self) -> Option<&str> {
        [&self.father_name, &self.mother_name, &self.guardian_name]
            .into_iter()
            .filter_map(|n| n.as_deref())
            .find(|n| !n.trim().is_empty())
    }
}

// 班级收费标准，按班级批量生成学生费用
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/fee.ts")]
pub struct ClassFee {
    pub id: i64,
    pub classroom_id: i64,
    pub fee_type_id: i64,
    pub academic_year: String,
    pub semester: Option<String>,
    pub base_amount: f64,
    /// 管理员调整额，可为负
    pub adjustment_amount: f64,
    pub adjustment_reason: Option<String>,
    pub adjusted_by: Option<i64>,
    pub adjusted_at: Option<chrono::DateTime<chrono::Utc>>,
    pub due_date: Option<NaiveDate>,
    pub late_fee_applicable: bool,
    pub late_fee_rate: f64,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl ClassFee {
    pub fn current_amount(&self) -> f64 {
        round2(self.base_amount + self.adjustment_amount)
    }
}

/// 班级收费标准的写入内容；同一 (班级, 费用类型, 学年) 已存在时覆盖
#[derive(Debug, Clone)]
pub struct NewClassFee {
    pub classroom_id: i64,
    pub fee_type_id: i64,
    pub academic_year: String,
    pub semester: Option<String>,
    pub base_amount: f64,
    pub due_date: Option<NaiveDate>,
    pub late_fee_applicable: bool,
    pub late_fee_rate: f64,
    pub description: Option<String>,
}

// 折扣
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/fee.ts")]
pub struct Discount {
    pub id: i64,
    pub student_id: i64,
    /// 为空表示对该学生通用，不计入单笔费用的台账
    pub fee_id: Option<i64>,
    pub discount_type: DiscountType,
    pub discount_value: f64,
    pub reason: Option<String>,
    pub approved_by: Option<i64>,
    pub valid_from: Option<NaiveDate>,
    pub valid_until: Option<NaiveDate>,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

// 缴费记录
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/fee.ts")]
pub struct Payment {
    pub id: i64,
    pub fee_id: i64,
    pub amount: f64,
    pub paid_on: NaiveDate,
    pub transaction_id: Option<String>,
    pub payment_method: PaymentMethod,
    pub received_by: Option<i64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

// 收据
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/fee.ts")]
pub struct Receipt {
    pub id: i64,
    pub payment_id: i64,
    pub receipt_number: String,
    pub issued_at: chrono::DateTime<chrono::Utc>,
    pub issued_to: String,
    pub parent_name: Option<String>,
    pub total_amount: f64,
    pub payment_method: Option<String>,
    pub notes: Option<String>,
    pub generated_by: Option<String>,
}

/// 待写入的费用（金额已解析，家长信息已快照）
#[derive(Debug, Clone)]
pub struct NewFee {
    pub student_id: i64,
    pub fee_type_id: Option<i64>,
    pub amount: f64,
    pub due_date: Option<NaiveDate>,
    pub academic_year: Option<String>,
    pub semester: Option<String>,
    pub description: Option<String>,
    pub late_fee_applicable: bool,
    pub late_fee_rate: f64,
    pub father_name: Option<String>,
    pub mother_name: Option<String>,
    pub guardian_name: Option<String>,
}

/// 一次缴费事务的输入（存储层在同一事务中写入缴费、收据并更新费用状态）
#[derive(Debug, Clone)]
pub struct NewPayment {
    pub fee_id: i64,
    pub amount: f64,
    pub paid_on: NaiveDate,
    pub payment_method: PaymentMethod,
    pub transaction_id: Option<String>,
    pub received_by: Option<i64>,
    pub receipt_number: String,
    pub issued_to: String,
    pub parent_name: Option<String>,
    pub notes: String,
    pub generated_by: Option<String>,
    /// 本次缴费后费用是否结清
    pub settles_fee: bool,
}
