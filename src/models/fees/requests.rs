use chrono::NaiveDate;
use serde::Deserialize;
use ts_rs::TS;

use super::entities::{DiscountType, PaymentMethod};
use crate::models::common::{PaginationQuery, deserialize_opt_bool, deserialize_opt_i64};

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/fee.ts")]
pub struct CreateFeeTypeRequest {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub is_recurring: bool,
    pub frequency: Option<String>,
    pub default_amount: Option<f64>,
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/fee.ts")]
pub struct UpdateFeeTypeRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_recurring: Option<bool>,
    pub frequency: Option<String>,
    pub default_amount: Option<f64>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/fee.ts")]
pub struct FeeListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "deserialize_opt_i64")]
    pub student_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_opt_i64")]
    pub fee_type_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_opt_bool")]
    pub paid: Option<bool>,
    pub academic_year: Option<String>,
}

// 存储层查询参数
#[derive(Debug, Clone, Default)]
pub struct FeeListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub student_id: Option<i64>,
    pub fee_type_id: Option<i64>,
    pub paid: Option<bool>,
    pub academic_year: Option<String>,
}

impl From<FeeListParams> for FeeListQuery {
    fn from(params: FeeListParams) -> Self {
        Self {
            page: Some(params.pagination.page),
            size: Some(params.pagination.size),
            student_id: params.student_id,
            fee_type_id: params.fee_type_id,
            paid: params.paid,
            academic_year: params.academic_year,
        }
    }
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/fee.ts")]
pub struct CreateFeeRequest {
    pub student_id: i64,
    pub fee_type_id: Option<i64>,
    /// 缺省时取费用类型的默认金额
    pub amount: Option<f64>,
    pub due_date: Option<NaiveDate>,
    pub academic_year: Option<String>,
    pub semester: Option<String>,
    pub description: Option<String>,
    pub late_fee_applicable: Option<bool>,
    pub late_fee_rate: Option<f64>,
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/fee.ts")]
pub struct UpdateFeeRequest {
    pub amount: Option<f64>,
    pub due_date: Option<NaiveDate>,
    pub academic_year: Option<String>,
    pub semester: Option<String>,
    pub description: Option<String>,
    pub late_fee_applicable: Option<bool>,
    pub late_fee_rate: Option<f64>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/fee.ts")]
pub struct CreateDiscountRequest {
    pub student_id: i64,
    pub fee_id: Option<i64>,
    pub discount_type: DiscountType,
    pub discount_value: f64,
    pub reason: Option<String>,
    pub valid_from: Option<NaiveDate>,
    pub valid_until: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/fee.ts")]
pub struct DiscountListParams {
    pub student_id: i64,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/fee.ts")]
pub struct RecordPaymentRequest {
    /// 缺省时为剩余应缴金额
    pub amount: Option<f64>,
    pub payment_method: PaymentMethod,
    pub payment_date: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/fee.ts")]
pub struct ClassFeeListParams {
    /// 缺省时取班级的学年
    pub academic_year: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/fee.ts")]
pub struct SetupClassFeeRequest {
    pub fee_type_id: i64,
    /// 缺省时取费用类型的默认金额
    pub base_amount: Option<f64>,
    pub academic_year: Option<String>,
    pub semester: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub description: Option<String>,
    pub late_fee_applicable: Option<bool>,
    pub late_fee_rate: Option<f64>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/fee.ts")]
pub struct AdjustClassFeeRequest {
    pub adjustment_amount: f64,
    pub adjustment_reason: Option<String>,
}
