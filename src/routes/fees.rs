use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::PaginationQuery;
use crate::models::fees::requests::{
    CreateDiscountRequest, CreateFeeRequest, CreateFeeTypeRequest, DiscountListParams,
    FeeListParams, RecordPaymentRequest, UpdateFeeRequest, UpdateFeeTypeRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::FeeService;
use crate::utils::SafeIDI64;

static FEE_SERVICE: Lazy<FeeService> = Lazy::new(FeeService::new_lazy);

// 费用类型
pub async fn list_fee_types(req: HttpRequest) -> ActixResult<HttpResponse> {
    FEE_SERVICE.list_fee_types(&req).await
}

pub async fn create_fee_type(
    req: HttpRequest,
    body: web::Json<CreateFeeTypeRequest>,
) -> ActixResult<HttpResponse> {
    FEE_SERVICE.create_fee_type(body.into_inner(), &req).await
}

pub async fn get_fee_type(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    FEE_SERVICE.get_fee_type(id.0, &req).await
}

pub async fn update_fee_type(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<UpdateFeeTypeRequest>,
) -> ActixResult<HttpResponse> {
    FEE_SERVICE
        .update_fee_type(id.0, body.into_inner(), &req)
        .await
}

pub async fn toggle_fee_type(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    FEE_SERVICE.toggle_fee_type(id.0, &req).await
}

pub async fn delete_fee_type(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    FEE_SERVICE.delete_fee_type(id.0, &req).await
}

// 费用
pub async fn list_fees(
    req: HttpRequest,
    query: web::Query<FeeListParams>,
) -> ActixResult<HttpResponse> {
    FEE_SERVICE.list_fees(query.into_inner(), &req).await
}

pub async fn create_fee(
    req: HttpRequest,
    body: web::Json<CreateFeeRequest>,
) -> ActixResult<HttpResponse> {
    FEE_SERVICE.create_fee(body.into_inner(), &req).await
}

pub async fn get_fee(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    FEE_SERVICE.get_fee(id.0, &req).await
}

pub async fn update_fee(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<UpdateFeeRequest>,
) -> ActixResult<HttpResponse> {
    FEE_SERVICE.update_fee(id.0, body.into_inner(), &req).await
}

pub async fn delete_fee(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    FEE_SERVICE.delete_fee(id.0, &req).await
}

pub async fn fee_summary(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    FEE_SERVICE.fee_summary(id.0, &req).await
}

pub async fn student_fees(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    FEE_SERVICE.student_fees(id.0, &req).await
}

pub async fn record_payment(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<RecordPaymentRequest>,
) -> ActixResult<HttpResponse> {
    FEE_SERVICE
        .record_payment(id.0, body.into_inner(), &req)
        .await
}

pub async fn analytics(req: HttpRequest) -> ActixResult<HttpResponse> {
    FEE_SERVICE.analytics(&req).await
}

// 减免
pub async fn list_discounts(
    req: HttpRequest,
    query: web::Query<DiscountListParams>,
) -> ActixResult<HttpResponse> {
    FEE_SERVICE.list_discounts(query.into_inner(), &req).await
}

pub async fn create_discount(
    req: HttpRequest,
    body: web::Json<CreateDiscountRequest>,
) -> ActixResult<HttpResponse> {
    FEE_SERVICE.create_discount(body.into_inner(), &req).await
}

pub async fn deactivate_discount(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    FEE_SERVICE.deactivate_discount(id.0, &req).await
}

// 收据
pub async fn list_receipts(
    req: HttpRequest,
    query: web::Query<PaginationQuery>,
) -> ActixResult<HttpResponse> {
    FEE_SERVICE.list_receipts(query.into_inner(), &req).await
}

pub async fn get_receipt(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    FEE_SERVICE.get_receipt(id.0, &req).await
}

// 配置路由
pub fn configure_fee_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/fee-types")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_fee_types))
                    .route(
                        web::post()
                            .to(create_fee_type)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    ),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_fee_type))
                    .route(
                        web::put()
                            .to(update_fee_type)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    )
                    .route(
                        web::delete()
                            .to(delete_fee_type)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    ),
            )
            .service(
                web::resource("/{id}/toggle").route(
                    web::post()
                        .to(toggle_fee_type)
                        .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                ),
            ),
    );

    // 家长可查看并缴纳自己孩子的费用，其余操作仅管理员
    cfg.service(
        web::scope("/api/v1/fees")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(
                        web::get()
                            .to(list_fees)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    )
                    .route(
                        web::post()
                            .to(create_fee)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    ),
            )
            .service(
                web::resource("/analytics").route(
                    web::get()
                        .to(analytics)
                        .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                ),
            )
            .service(
                web::resource("/students/{id}").route(
                    web::get()
                        .to(student_fees)
                        .wrap(middlewares::RequireRole::new_any(UserRole::payer_roles())),
                ),
            )
            .service(
                web::resource("/{id}")
                    .route(
                        web::get()
                            .to(get_fee)
                            .wrap(middlewares::RequireRole::new_any(UserRole::payer_roles())),
                    )
                    .route(
                        web::put()
                            .to(update_fee)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    )
                    .route(
                        web::delete()
                            .to(delete_fee)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    ),
            )
            .service(
                web::resource("/{id}/summary").route(
                    web::get()
                        .to(fee_summary)
                        .wrap(middlewares::RequireRole::new_any(UserRole::payer_roles())),
                ),
            )
            .service(
                web::resource("/{id}/payments").route(
                    web::post()
                        .to(record_payment)
                        .wrap(middlewares::RequireRole::new_any(UserRole::payer_roles())),
                ),
            ),
    );

    cfg.service(
        web::scope("/api/v1/discounts")
            .wrap(middlewares::RequireJWT)
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles()))
                    .route("", web::get().to(list_discounts))
                    .route("", web::post().to(create_discount))
                    .route("/{id}/deactivate", web::post().to(deactivate_discount)),
            ),
    );

    cfg.service(
        web::scope("/api/v1/receipts")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("").route(
                    web::get()
                        .to(list_receipts)
                        .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                ),
            )
            .service(
                web::resource("/{id}").route(
                    web::get()
                        .to(get_receipt)
                        .wrap(middlewares::RequireRole::new_any(UserRole::payer_roles())),
                ),
            ),
    );
}
