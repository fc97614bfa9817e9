use serde::Serialize;
use std::collections::BTreeMap;
use ts_rs::TS;

use super::entities::PaymentStatus;
use super::ledger::FeeLedger;
use crate::utils::money::round2;

#[derive(Debug, Clone, Default, Serialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/fee.ts")]
pub struct StatusCounts {
    pub pending: u64,
    pub paid: u64,
    pub overdue: u64,
    pub advance: u64,
}

#[derive(Debug, Clone, Serialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/fee.ts")]
pub struct FeeTypeBreakdown {
    pub fee_type_id: Option<i64>,
    pub name: String,
    pub count: u64,
    pub billed: f64,
    pub collected: f64,
    pub outstanding: f64,
}

// 收费统计
#[derive(Debug, Clone, Serialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/fee.ts")]
pub struct FeeAnalytics {
    pub total_fees: u64,
    pub total_billed: f64,
    pub total_collected: f64,
    pub total_outstanding: f64,
    pub status_counts: StatusCounts,
    pub by_fee_type: Vec<FeeTypeBreakdown>,
}

impl FeeAnalytics {
    /// 由 (费用类型 ID, 费用类型名称, 台账) 聚合；按费用类型 ID 排序输出
    pub fn aggregate<'a, I>(items: I) -> Self
    where
        I: IntoIterator<Item = (Option<i64>, &'a str, &'a FeeLedger)>,
    {
        let mut counts = StatusCounts::default();
        let mut groups: BTreeMap<Option<i64>, FeeTypeBreakdown> = BTreeMap::new();
        let (mut total, mut billed, mut collected, mut outstanding) = (0u64, 0.0, 0.0, 0.0);

        for (fee_type_id, name, ledger) in items {
            total += 1;
            billed += ledger.final_amount;
            collected += ledger.total_paid;
            outstanding += ledger.remaining_amount;

            match ledger.status {
                PaymentStatus::Pending => counts.pending += 1,
                PaymentStatus::Paid => counts.paid += 1,
                PaymentStatus::Overdue => counts.overdue += 1,
                PaymentStatus::Advance => counts.advance += 1,
            }

            let group = groups
                .entry(fee_type_id)
                .or_insert_with(|| FeeTypeBreakdown {
                    fee_type_id,
                    name: name.to_string(),
                    count: 0,
                    billed: 0.0,
                    collected: 0.0,
                    outstanding: 0.0,
                });
            group.count += 1;
            group.billed = round2(group.billed + ledger.final_amount);
            group.collected = round2(group.collected + ledger.total_paid);
            group.outstanding = round2(group.outstanding + ledger.remaining_amount);
        }

        Self {
            total_fees: total,
            total_billed: round2(billed),
            total_collected: round2(collected),
            total_outstanding: round2(outstanding),
            status_counts: counts,
            by_fee_type: groups.into_values().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fees::ledger::tests::{fee, payment};
    use chrono::NaiveDate;

    #[test]
    fn test_aggregate_groups_by_fee_type() {
        let today = NaiveDate::from_ymd_opt(2025, 2, 1).unwrap();
        let bus = FeeLedger::compute(&fee(1500.0, None), &[], &[payment(1500.0)], today);
        let exam = FeeLedger::compute(&fee(500.0, None), &[], &[payment(100.0)], today);
        let exam_due = FeeLedger::compute(
            &fee(500.0, NaiveDate::from_ymd_opt(2025, 1, 1)),
            &[],
            &[],
            today,
        );

        let analytics = FeeAnalytics::aggregate([
            (Some(5), "Bus", &bus),
            (Some(1), "Exam", &exam),
            (Some(1), "Exam", &exam_due),
        ]);

        assert_eq!(analytics.total_fees, 3);
        assert_eq!(analytics.total_billed, 2500.0);
        assert_eq!(analytics.total_collected, 1600.0);
        assert_eq!(analytics.total_outstanding, 900.0);
        assert_eq!(
            analytics.status_counts,
            StatusCounts {
                pending: 1,
                paid: 1,
                overdue: 1,
                advance: 0
            }
        );
        assert_eq!(analytics.by_fee_type.len(), 2);
        assert_eq!(analytics.by_fee_type[0].name, "Exam");
        assert_eq!(analytics.by_fee_type[0].count, 2);
        assert_eq!(analytics.by_fee_type[0].outstanding, 900.0);
    }

    #[test]
    fn test_aggregate_empty() {
        let analytics = FeeAnalytics::aggregate(std::iter::empty());
        assert_eq!(analytics.total_fees, 0);
        assert!(analytics.by_fee_type.is_empty());
    }
}
