use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::FeeService;
use super::ledger::fee_details;
use crate::models::fees::analytics::FeeAnalytics;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::error_response;

const UNCATEGORIZED: &str = "Uncategorized";

// 全部费用的收费统计
pub async fn fee_analytics(
    service: &FeeService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let fees = match storage.list_all_fees().await {
        Ok(fees) => fees,
        Err(e) => return Ok(error_response(&e, ErrorCode::InternalServerError)),
    };
    let details = match fee_details(&storage, fees).await {
        Ok(details) => details,
        Err(e) => return Ok(error_response(&e, ErrorCode::InternalServerError)),
    };

    let analytics = FeeAnalytics::aggregate(details.iter().map(|d| {
        (
            d.fee.fee_type_id,
            d.fee_type_name.as_deref().unwrap_or(UNCATEGORIZED),
            &d.ledger,
        )
    }));

    Ok(HttpResponse::Ok().json(ApiResponse::success(analytics, "收费统计获取成功")))
}
