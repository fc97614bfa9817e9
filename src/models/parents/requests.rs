use serde::Deserialize;
use ts_rs::TS;

use crate::models::common::{PaginationQuery, deserialize_opt_i64};

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/parent.ts")]
pub struct ParentListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "deserialize_opt_i64")]
    pub student_id: Option<i64>,
    pub search: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/parent.ts")]
pub struct CreateParentRequest {
    pub name: String,
    pub student_id: Option<i64>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub relation: Option<String>,
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/parent.ts")]
pub struct UpdateParentRequest {
    pub name: Option<String>,
    pub student_id: Option<i64>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub relation: Option<String>,
}
