//! SeaORM 实体定义
//!
//! 这些实体用于数据库操作，与 models 模块中的业务实体分离。
//! Storage 层使用这些实体进行 CRUD 操作，然后转换为 models 中的业务实体。
//! 时间戳统一以 Unix 秒存储。

pub mod prelude;

pub mod activity_logs;
pub mod attendance;
pub mod auto_leave_approval;
pub mod class_fees;
pub mod classrooms;
pub mod complaints;
pub mod date_sheet_entries;
pub mod date_sheets;
pub mod discounts;
pub mod fee_types;
pub mod fees;
pub mod leave_approval_logs;
pub mod messages;
pub mod notifications;
pub mod parents;
pub mod payments;
pub mod receipts;
pub mod students;
pub mod subjects;
pub mod teacher_leaves;
pub mod teachers;
pub mod timetable_entries;
pub mod timetables;
pub mod users;

use chrono::{DateTime, Utc};

/// Unix 秒转 UTC 时间，非法值回落到纪元
pub(crate) fn to_datetime(ts: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(ts, 0).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_datetime() {
        assert_eq!(to_datetime(0), DateTime::<Utc>::UNIX_EPOCH);
        assert_eq!(to_datetime(1_700_000_000).timestamp(), 1_700_000_000);
        assert_eq!(to_datetime(i64::MAX), DateTime::<Utc>::default());
    }
}
