//! 批量组装费用台账

use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::Arc;

use crate::errors::SchoolDeskError;
use crate::models::fees::entities::{Discount, Fee, Payment};
use crate::models::fees::ledger::FeeLedger;
use crate::models::fees::responses::FeeDetail;
use crate::storage::Storage;

pub(crate) fn today() -> NaiveDate {
    chrono::Utc::now().date_naive()
}

/// 为一组费用加载折扣、缴费记录与类型名称并计算台账
pub async fn fee_details(
    storage: &Arc<dyn Storage>,
    fees: Vec<Fee>,
) -> Result<Vec<FeeDetail>, SchoolDeskError> {
    if fees.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<i64> = fees.iter().map(|f| f.id).collect();
    let discounts = storage.list_active_discounts_for_fees(&ids).await?;
    let payments = storage.list_payments_for_fees(&ids).await?;
    let type_names: HashMap<i64, String> = storage
        .list_fee_types()
        .await?
        .into_iter()
        .map(|t| (t.id, t.name))
        .collect();

    Ok(assemble(fees, discounts, payments, &type_names, today()))
}

/// 单笔费用的详情
pub async fn fee_detail(
    storage: &Arc<dyn Storage>,
    fee: Fee,
) -> Result<FeeDetail, SchoolDeskError> {
    let fee_id = fee.id;
    fee_details(storage, vec![fee])
        .await?
        .pop()
        .ok_or_else(|| SchoolDeskError::not_found(format!("费用 {fee_id} 不存在")))
}

pub fn assemble(
    fees: Vec<Fee>,
    discounts: Vec<Discount>,
    payments: Vec<Payment>,
    type_names: &HashMap<i64, String>,
    today: NaiveDate,
) -> Vec<FeeDetail> {
    let mut discounts_by_fee: HashMap<i64, Vec<Discount>> = HashMap::new();
    for d in discounts {
        if let Some(fee_id) = d.fee_id {
            discounts_by_fee.entry(fee_id).or_default().push(d);
        }
    }
    let mut payments_by_fee: HashMap<i64, Vec<Payment>> = HashMap::new();
    for p in payments {
        payments_by_fee.entry(p.fee_id).or_default().push(p);
    }

    fees.into_iter()
        .map(|fee| {
            let discounts = discounts_by_fee.remove(&fee.id).unwrap_or_default();
            let payments = payments_by_fee.remove(&fee.id).unwrap_or_default();
            let ledger = FeeLedger::compute(&fee, &discounts, &payments, today);
            let fee_type_name = fee.fee_type_id.and_then(|id| type_names.get(&id).cloned());
            FeeDetail {
                fee,
                fee_type_name,
                ledger,
                payments,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fees::entities::{DiscountType, PaymentMethod, PaymentStatus};

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, d).unwrap()
    }

    fn fee(id: i64, amount: f64) -> Fee {
        let now = chrono::Utc::now();
        Fee {
            id,
            student_id: 1,
            fee_type_id: Some(2),
            amount,
            due_date: Some(date(10)),
            paid: false,
            payment_date: None,
            academic_year: None,
            semester: None,
            description: None,
            late_fee_applicable: false,
            late_fee_rate: 0.0,
            father_name: None,
            mother_name: None,
            guardian_name: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn payment(fee_id: i64, amount: f64) -> Payment {
        Payment {
            id: fee_id * 10,
            fee_id,
            amount,
            paid_on: date(1),
            transaction_id: None,
            payment_method: PaymentMethod::Cash,
            received_by: None,
            created_at: chrono::Utc::now(),
        }
    }

    fn discount(fee_id: Option<i64>, value: f64) -> Discount {
        Discount {
            id: 1,
            student_id: 1,
            fee_id,
            discount_type: DiscountType::FixedAmount,
            discount_value: value,
            reason: None,
            approved_by: None,
            valid_from: None,
            valid_until: None,
            is_active: true,
            created_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_assemble_groups_by_fee() {
        let names = HashMap::from([(2, "Exam".to_string())]);
        let details = assemble(
            vec![fee(1, 100.0), fee(2, 50.0)],
            vec![discount(Some(1), 20.0), discount(None, 99.0)],
            vec![payment(1, 30.0), payment(2, 50.0)],
            &names,
            date(5),
        );

        assert_eq!(details.len(), 2);
        assert_eq!(details[0].fee_type_name.as_deref(), Some("Exam"));
        assert_eq!(details[0].ledger.final_amount, 80.0);
        assert_eq!(details[0].ledger.remaining_amount, 50.0);
        assert_eq!(details[0].payments.len(), 1);
        assert_eq!(details[1].ledger.status, PaymentStatus::Paid);
    }
}
