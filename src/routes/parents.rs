use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::parents::requests::{
    CreateParentRequest, ParentListParams, UpdateParentRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::ParentService;
use crate::utils::SafeIDI64;

static PARENT_SERVICE: Lazy<ParentService> = Lazy::new(ParentService::new_lazy);

pub async fn list_parents(
    req: HttpRequest,
    query: web::Query<ParentListParams>,
) -> ActixResult<HttpResponse> {
    PARENT_SERVICE.list_parents(query.into_inner(), &req).await
}

pub async fn create_parent(
    req: HttpRequest,
    body: web::Json<CreateParentRequest>,
) -> ActixResult<HttpResponse> {
    PARENT_SERVICE.create_parent(body.into_inner(), &req).await
}

pub async fn get_parent(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    PARENT_SERVICE.get_parent(id.0, &req).await
}

pub async fn update_parent(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<UpdateParentRequest>,
) -> ActixResult<HttpResponse> {
    PARENT_SERVICE
        .update_parent(id.0, body.into_inner(), &req)
        .await
}

pub async fn delete_parent(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    PARENT_SERVICE.delete_parent(id.0, &req).await
}

pub async fn regenerate_secret_key(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    PARENT_SERVICE.regenerate_secret_key(id.0, &req).await
}

pub async fn my_children(req: HttpRequest) -> ActixResult<HttpResponse> {
    PARENT_SERVICE.my_children(&req).await
}

// 配置路由
pub fn configure_parent_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/parents")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("/me/children").route(
                    web::get()
                        .to(my_children)
                        .wrap(middlewares::RequireRole::new_any(UserRole::parent_roles())),
                ),
            )
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles()))
                    .route("", web::get().to(list_parents))
                    .route("", web::post().to(create_parent))
                    .route("/{id}", web::get().to(get_parent))
                    .route("/{id}", web::put().to(update_parent))
                    .route("/{id}", web::delete().to(delete_parent))
                    .route("/{id}/secret-key", web::post().to(regenerate_secret_key)),
            ),
    );
}
