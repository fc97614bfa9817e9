use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::classrooms::requests::{
    ClassroomListParams, CreateClassroomRequest, UpdateClassroomRequest,
};
use crate::models::fees::requests::{
    AdjustClassFeeRequest, ClassFeeListParams, SetupClassFeeRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::{ClassroomService, FeeService};
use crate::utils::{SafeEntryIdI64, SafeIDI64};

static CLASSROOM_SERVICE: Lazy<ClassroomService> = Lazy::new(ClassroomService::new_lazy);
static FEE_SERVICE: Lazy<FeeService> = Lazy::new(FeeService::new_lazy);

pub async fn list_classrooms(
    req: HttpRequest,
    query: web::Query<ClassroomListParams>,
) -> ActixResult<HttpResponse> {
    CLASSROOM_SERVICE.list_classrooms(query.into_inner(), &req).await
}

pub async fn create_classroom(
    req: HttpRequest,
    body: web::Json<CreateClassroomRequest>,
) -> ActixResult<HttpResponse> {
    CLASSROOM_SERVICE.create_classroom(body.into_inner(), &req).await
}

pub async fn get_classroom(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    CLASSROOM_SERVICE.get_classroom(id.0, &req).await
}

pub async fn update_classroom(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<UpdateClassroomRequest>,
) -> ActixResult<HttpResponse> {
    CLASSROOM_SERVICE
        .update_classroom(id.0, body.into_inner(), &req)
        .await
}

pub async fn delete_classroom(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    CLASSROOM_SERVICE.delete_classroom(id.0, &req).await
}

pub async fn list_class_fees(
    req: HttpRequest,
    id: SafeIDI64,
    query: web::Query<ClassFeeListParams>,
) -> ActixResult<HttpResponse> {
    FEE_SERVICE
        .list_class_fees(id.0, query.into_inner(), &req)
        .await
}

pub async fn setup_class_fee(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<SetupClassFeeRequest>,
) -> ActixResult<HttpResponse> {
    FEE_SERVICE
        .setup_class_fee(id.0, body.into_inner(), &req)
        .await
}

pub async fn adjust_class_fee(
    req: HttpRequest,
    id: SafeIDI64,
    entry_id: SafeEntryIdI64,
    body: web::Json<AdjustClassFeeRequest>,
) -> ActixResult<HttpResponse> {
    FEE_SERVICE
        .adjust_class_fee(id.0, entry_id.0, body.into_inner(), &req)
        .await
}

pub async fn generate_class_fees(
    req: HttpRequest,
    id: SafeIDI64,
    query: web::Query<ClassFeeListParams>,
) -> ActixResult<HttpResponse> {
    FEE_SERVICE
        .generate_class_fees(id.0, query.into_inner(), &req)
        .await
}

// 配置路由
pub fn configure_classroom_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/classrooms")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(
                        web::get()
                            .to(list_classrooms)
                            .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles())),
                    )
                    .route(
                        web::post()
                            .to(create_classroom)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    ),
            )
            .service(
                web::resource("/{id}")
                    .route(
                        web::get()
                            .to(get_classroom)
                            .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles())),
                    )
                    .route(
                        web::put()
                            .to(update_classroom)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    )
                    .route(
                        web::delete()
                            .to(delete_classroom)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    ),
            )
            // 班级收费标准
            .service(
                web::resource("/{id}/fees")
                    .route(
                        web::get()
                            .to(list_class_fees)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    )
                    .route(
                        web::put()
                            .to(setup_class_fee)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    ),
            )
            .service(
                web::resource("/{id}/fees/generate").route(
                    web::post()
                        .to(generate_class_fees)
                        .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                ),
            )
            .service(
                web::resource("/{id}/fees/{entry_id}/adjust").route(
                    web::post()
                        .to(adjust_class_fee)
                        .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                ),
            ),
    );
}
