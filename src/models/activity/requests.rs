use crate::models::common::{PaginationQuery, deserialize_opt_i64};
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/activity.ts")]
pub struct ActivityLogListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub category: Option<String>,
    #[serde(default, deserialize_with = "deserialize_opt_i64")]
    pub user_id: Option<i64>,
    pub search: Option<String>,
}
