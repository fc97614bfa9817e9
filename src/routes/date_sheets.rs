use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::date_sheets::requests::{
    CreateDateSheetEntryRequest, CreateDateSheetRequest, DateSheetListParams,
};
use crate::models::users::entities::UserRole;
use crate::services::DateSheetService;
use crate::utils::{SafeEntryIdI64, SafeIDI64};

static DATE_SHEET_SERVICE: Lazy<DateSheetService> = Lazy::new(DateSheetService::new_lazy);

pub async fn list_date_sheets(
    req: HttpRequest,
    query: web::Query<DateSheetListParams>,
) -> ActixResult<HttpResponse> {
    DATE_SHEET_SERVICE
        .list_date_sheets(query.into_inner(), &req)
        .await
}

pub async fn create_date_sheet(
    req: HttpRequest,
    body: web::Json<CreateDateSheetRequest>,
) -> ActixResult<HttpResponse> {
    DATE_SHEET_SERVICE
        .create_date_sheet(body.into_inner(), &req)
        .await
}

pub async fn get_date_sheet(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    DATE_SHEET_SERVICE.get_date_sheet(id.0, &req).await
}

pub async fn publish_date_sheet(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    DATE_SHEET_SERVICE.publish_date_sheet(id.0, &req).await
}

pub async fn delete_date_sheet(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    DATE_SHEET_SERVICE.delete_date_sheet(id.0, &req).await
}

pub async fn add_entry(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<CreateDateSheetEntryRequest>,
) -> ActixResult<HttpResponse> {
    DATE_SHEET_SERVICE
        .add_entry(id.0, body.into_inner(), &req)
        .await
}

pub async fn delete_entry(
    req: HttpRequest,
    id: SafeIDI64,
    entry_id: SafeEntryIdI64,
) -> ActixResult<HttpResponse> {
    DATE_SHEET_SERVICE.delete_entry(id.0, entry_id.0, &req).await
}

pub async fn teacher_date_sheets(req: HttpRequest) -> ActixResult<HttpResponse> {
    DATE_SHEET_SERVICE.teacher_date_sheets(&req).await
}

pub async fn exam_schedule(req: HttpRequest) -> ActixResult<HttpResponse> {
    DATE_SHEET_SERVICE.exam_schedule(&req).await
}

// 配置路由
pub fn configure_date_sheet_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/date-sheets")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_date_sheets))
                    .route(
                        web::post()
                            .to(create_date_sheet)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    ),
            )
            // 固定路径需先于 /{id} 注册
            .service(
                web::resource("/mine").route(
                    web::get()
                        .to(teacher_date_sheets)
                        .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles())),
                ),
            )
            .service(
                web::resource("/exam-schedule").route(
                    web::get()
                        .to(exam_schedule)
                        .wrap(middlewares::RequireRole::new_any(UserRole::parent_roles())),
                ),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_date_sheet))
                    .route(
                        web::delete()
                            .to(delete_date_sheet)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    ),
            )
            .service(
                web::resource("/{id}/publish").route(
                    web::post()
                        .to(publish_date_sheet)
                        .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                ),
            )
            .service(
                web::resource("/{id}/entries").route(
                    web::post()
                        .to(add_entry)
                        .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                ),
            )
            .service(
                web::resource("/{id}/entries/{entry_id}").route(
                    web::delete()
                        .to(delete_entry)
                        .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                ),
            ),
    );
}
