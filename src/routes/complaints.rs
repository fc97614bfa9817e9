use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::complaints::requests::{
    ComplaintListParams, CreateComplaintRequest, RespondComplaintRequest,
    UpdateComplaintStatusRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::ComplaintService;
use crate::utils::SafeIDI64;

static COMPLAINT_SERVICE: Lazy<ComplaintService> = Lazy::new(ComplaintService::new_lazy);

pub async fn create_complaint(
    req: HttpRequest,
    body: web::Json<CreateComplaintRequest>,
) -> ActixResult<HttpResponse> {
    COMPLAINT_SERVICE.create_complaint(body.into_inner(), &req).await
}

pub async fn list_complaints(
    req: HttpRequest,
    query: web::Query<ComplaintListParams>,
) -> ActixResult<HttpResponse> {
    COMPLAINT_SERVICE.list_complaints(query.into_inner(), &req).await
}

pub async fn get_complaint(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    COMPLAINT_SERVICE.get_complaint(id.0, &req).await
}

pub async fn respond(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<RespondComplaintRequest>,
) -> ActixResult<HttpResponse> {
    COMPLAINT_SERVICE.respond(id.0, body.into_inner(), &req).await
}

pub async fn update_status(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<UpdateComplaintStatusRequest>,
) -> ActixResult<HttpResponse> {
    COMPLAINT_SERVICE
        .update_status(id.0, body.into_inner(), &req)
        .await
}

// 配置路由
pub fn configure_complaint_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/complaints")
            .wrap(middlewares::RequireJWT)
            .service(
                // 列表按角色限定范围
                web::resource("")
                    .route(web::get().to(list_complaints))
                    .route(
                        web::post()
                            .to(create_complaint)
                            .wrap(middlewares::RequireRole::new_any(UserRole::family_roles())),
                    ),
            )
            .route("/{id}", web::get().to(get_complaint))
            .service(
                web::scope("/{id}")
                    .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles()))
                    .route("/respond", web::post().to(respond))
                    .route("/status", web::put().to(update_status)),
            ),
    );
}
