use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::timetable::requests::{
    CreateEntryRequest, CreateTimetableRequest, TimetableListParams, UpdateTimetableRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::TimetableService;
use crate::utils::{SafeEntryIdI64, SafeIDI64};

static TIMETABLE_SERVICE: Lazy<TimetableService> = Lazy::new(TimetableService::new_lazy);

pub async fn list_timetables(
    req: HttpRequest,
    query: web::Query<TimetableListParams>,
) -> ActixResult<HttpResponse> {
    TIMETABLE_SERVICE.list_timetables(query.into_inner(), &req).await
}

pub async fn create_timetable(
    req: HttpRequest,
    body: web::Json<CreateTimetableRequest>,
) -> ActixResult<HttpResponse> {
    TIMETABLE_SERVICE.create_timetable(body.into_inner(), &req).await
}

pub async fn get_timetable(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    TIMETABLE_SERVICE.get_timetable(id.0, &req).await
}

pub async fn update_timetable(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<UpdateTimetableRequest>,
) -> ActixResult<HttpResponse> {
    TIMETABLE_SERVICE
        .update_timetable(id.0, body.into_inner(), &req)
        .await
}

pub async fn publish_timetable(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    TIMETABLE_SERVICE.publish_timetable(id.0, &req).await
}

pub async fn delete_timetable(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    TIMETABLE_SERVICE.delete_timetable(id.0, &req).await
}

pub async fn list_entries(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    TIMETABLE_SERVICE.list_entries(id.0, &req).await
}

pub async fn add_entry(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<CreateEntryRequest>,
) -> ActixResult<HttpResponse> {
    TIMETABLE_SERVICE
        .add_entry(id.0, body.into_inner(), &req)
        .await
}

pub async fn delete_entry(
    req: HttpRequest,
    id: SafeIDI64,
    entry_id: SafeEntryIdI64,
) -> ActixResult<HttpResponse> {
    TIMETABLE_SERVICE.delete_entry(id.0, entry_id.0, &req).await
}

// 配置路由
pub fn configure_timetable_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/timetables")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_timetables))
                    .route(
                        web::post()
                            .to(create_timetable)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    ),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_timetable))
                    .route(
                        web::put()
                            .to(update_timetable)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    )
                    .route(
                        web::delete()
                            .to(delete_timetable)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    ),
            )
            .service(
                web::resource("/{id}/publish").route(
                    web::post()
                        .to(publish_timetable)
                        .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                ),
            )
            .service(
                web::resource("/{id}/entries")
                    .route(web::get().to(list_entries))
                    .route(
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
