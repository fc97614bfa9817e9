//! 单笔费用的台账计算
//!
//! 纯计算，不访问存储；金额统一保留两位小数。

use chrono::NaiveDate;
use serde::Serialize;
use ts_rs::TS;

use super::entities::{Discount, DiscountType, Fee, Payment, PaymentStatus};
use crate::utils::money::round2;

#[derive(Debug, Clone, Serialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/fee.ts")]
pub struct FeeLedger {
    pub fee_id: i64,
    pub total_amount: f64,
    pub discount_amount: f64,
    pub final_amount: f64,
    pub total_paid: f64,
    pub remaining_amount: f64,
    pub advance_amount: f64,
    pub days_overdue: i64,
    pub late_fee: f64,
    pub status: PaymentStatus,
    pub due_date: Option<NaiveDate>,
}

impl FeeLedger {
    /// `discounts` 与 `payments` 应已按 fee_id 过滤；未启用的折扣在此处忽略
    pub fn compute(fee: &Fee, discounts: &[Discount], payments: &[Payment], today: NaiveDate) -> Self {
        let total_discount: f64 = discounts
            .iter()
            .filter(|d| d.is_active)
            .map(|d| match d.discount_type {
                DiscountType::Percentage => fee.amount * d.discount_value / 100.0,
                DiscountType::FixedAmount => d.discount_value,
            })
            .sum();
        let total_discount = round2(total_discount);

        let final_amount = round2((fee.amount - total_discount).max(0.0));
        let total_paid = round2(payments.iter().map(|p| p.amount).sum());
        let remaining_amount = round2((final_amount - total_paid).max(0.0));
        let advance_amount = round2((total_paid - final_amount).max(0.0));

        let days_overdue = match fee.due_date {
            Some(due) if !fee.paid && today > due => (today - due).num_days(),
            _ => 0,
        };

        let late_fee = if fee.late_fee_applicable && days_overdue > 0 {
            round2(final_amount * fee.late_fee_rate / 100.0 * days_overdue as f64)
        } else {
            0.0
        };

        let status = if advance_amount > 0.0 {
            PaymentStatus::Advance
        } else if remaining_amount == 0.0 {
            PaymentStatus::Paid
        } else if days_overdue > 0 {
            PaymentStatus::Overdue
        } else {
            PaymentStatus::Pending
        };

        Self {
            fee_id: fee.id,
            total_amount: round2(fee.amount),
            discount_amount: total_discount,
            final_amount,
            total_paid,
            remaining_amount,
            advance_amount,
            days_overdue,
            late_fee,
            status,
            due_date: fee.due_date,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::fees::entities::PaymentMethod;

    pub(crate) fn fee(amount: f64, due: Option<NaiveDate>) -> Fee {
        let now = chrono::Utc::now();
        Fee {
            id: 1,
            student_id: 1,
            fee_type_id: Some(1),
            amount,
            due_date: due,
            paid: false,
            payment_date: None,
            academic_year: None,
            semester: None,
            description: None,
            late_fee_applicable: true,
            late_fee_rate: 0.0,
            father_name: None,
            mother_name: None,
            guardian_name: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn discount(kind: DiscountType, value: f64, active: bool) -> Discount {
        Discount {
            id: 1,
            student_id: 1,
            fee_id: Some(1),
            discount_type: kind,
            discount_value: value,
            reason: None,
            approved_by: None,
            valid_from: None,
            valid_until: None,
            is_active: active,
            created_at: chrono::Utc::now(),
        }
    }

    pub(crate) fn payment(amount: f64) -> Payment {
        Payment {
            id: 1,
            fee_id: 1,
            amount,
            paid_on: date(2025, 1, 1),
            transaction_id: None,
            payment_method: PaymentMethod::Cash,
            received_by: None,
            created_at: chrono::Utc::now(),
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_percentage_and_fixed_discounts() {
        let f = fee(1000.0, None);
        let discounts = vec![
            discount(DiscountType::Percentage, 10.0, true),
            discount(DiscountType::FixedAmount, 50.0, true),
            discount(DiscountType::FixedAmount, 500.0, false),
        ];
        let ledger = FeeLedger::compute(&f, &discounts, &[], date(2025, 1, 1));
        assert_eq!(ledger.discount_amount, 150.0);
        assert_eq!(ledger.final_amount, 850.0);
        assert_eq!(ledger.remaining_amount, 850.0);
        assert_eq!(ledger.status, PaymentStatus::Pending);
    }

    #[test]
    fn test_final_amount_never_negative() {
        let f = fee(100.0, None);
        let discounts = vec![discount(DiscountType::FixedAmount, 250.0, true)];
        let ledger = FeeLedger::compute(&f, &discounts, &[], date(2025, 1, 1));
        assert_eq!(ledger.final_amount, 0.0);
        assert_eq!(ledger.status, PaymentStatus::Paid);
    }

    #[test]
    fn test_partial_payment_then_overpayment() {
        let f = fee(500.0, None);
        let partial = FeeLedger::compute(&f, &[], &[payment(200.0)], date(2025, 1, 1));
        assert_eq!(partial.remaining_amount, 300.0);
        assert_eq!(partial.advance_amount, 0.0);

        let over = FeeLedger::compute(
            &f,
            &[],
            &[payment(200.0), payment(400.0)],
            date(2025, 1, 1),
        );
        assert_eq!(over.remaining_amount, 0.0);
        assert_eq!(over.advance_amount, 100.0);
        assert_eq!(over.status, PaymentStatus::Advance);
    }

    #[test]
    fn test_overdue_with_late_fee() {
        let mut f = fee(1000.0, Some(date(2025, 1, 10)));
        f.late_fee_rate = 1.0;
        let ledger = FeeLedger::compute(&f, &[], &[], date(2025, 1, 15));
        assert_eq!(ledger.days_overdue, 5);
        assert_eq!(ledger.late_fee, 50.0);
        assert_eq!(ledger.status, PaymentStatus::Overdue);
    }

    #[test]
    fn test_paid_fee_is_never_overdue() {
        let mut f = fee(1000.0, Some(date(2025, 1, 10)));
        f.paid = true;
        f.late_fee_rate = 2.0;
        let ledger = FeeLedger::compute(&f, &[], &[payment(1000.0)], date(2025, 3, 1));
        assert_eq!(ledger.days_overdue, 0);
        assert_eq!(ledger.late_fee, 0.0);
        assert_eq!(ledger.status, PaymentStatus::Paid);
    }

    #[test]
    fn test_late_fee_disabled() {
        let mut f = fee(1000.0, Some(date(2025, 1, 10)));
        f.late_fee_applicable = false;
        f.late_fee_rate = 5.0;
        let ledger = FeeLedger::compute(&f, &[], &[], date(2025, 1, 12));
        assert_eq!(ledger.days_overdue, 2);
        assert_eq!(ledger.late_fee, 0.0);
    }

    #[test]
    fn test_rounding_to_cents() {
        let f = fee(99.99, None);
        let discounts = vec![discount(DiscountType::Percentage, 33.333, true)];
        let ledger = FeeLedger::compute(&f, &discounts, &[], date(2025, 1, 1));
        assert_eq!(ledger.discount_amount, 33.33);
        assert_eq!(ledger.final_amount, 66.66);
    }
}
