use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::leaves::requests::{
    ApplyLeaveRequest, LeaveDecisionRequest, LeaveListParams, UpdateAutoApprovalRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::LeaveService;
use crate::utils::SafeIDI64;

static LEAVE_SERVICE: Lazy<LeaveService> = Lazy::new(LeaveService::new_lazy);

pub async fn apply_leave(
    req: HttpRequest,
    body: web::Json<ApplyLeaveRequest>,
) -> ActixResult<HttpResponse> {
    LEAVE_SERVICE.apply_leave(body.into_inner(), &req).await
}

pub async fn list_leaves(
    req: HttpRequest,
    query: web::Query<LeaveListParams>,
) -> ActixResult<HttpResponse> {
    LEAVE_SERVICE.list_leaves(query.into_inner(), &req).await
}

pub async fn get_leave(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    LEAVE_SERVICE.get_leave(id.0, &req).await
}

// 审批说明可省略，请求体可为空
pub async fn approve_leave(
    req: HttpRequest,
    id: SafeIDI64,
    body: Option<web::Json<LeaveDecisionRequest>>,
) -> ActixResult<HttpResponse> {
    let body = body.map(|b| b.into_inner()).unwrap_or_default();
    LEAVE_SERVICE.approve_leave(id.0, body, &req).await
}

pub async fn reject_leave(
    req: HttpRequest,
    id: SafeIDI64,
    body: Option<web::Json<LeaveDecisionRequest>>,
) -> ActixResult<HttpResponse> {
    let body = body.map(|b| b.into_inner()).unwrap_or_default();
    LEAVE_SERVICE.reject_leave(id.0, body, &req).await
}

pub async fn approval_logs(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    LEAVE_SERVICE.approval_logs(id.0, &req).await
}

pub async fn auto_approval_status(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    LEAVE_SERVICE.auto_approval_status(id.0, &req).await
}

pub async fn get_settings(req: HttpRequest) -> ActixResult<HttpResponse> {
    LEAVE_SERVICE.get_settings(&req).await
}

pub async fn update_settings(
    req: HttpRequest,
    body: web::Json<UpdateAutoApprovalRequest>,
) -> ActixResult<HttpResponse> {
    LEAVE_SERVICE.update_settings(body.into_inner(), &req).await
}

// 配置路由
pub fn configure_leave_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/leaves")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("/auto-approval/settings")
                    .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles()))
                    .route(web::get().to(get_settings))
                    .route(web::put().to(update_settings)),
            )
            .service(
                web::resource("")
                    .route(
                        web::get()
                            .to(list_leaves)
                            .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles())),
                    )
                    .route(
                        web::post()
                            .to(apply_leave)
                            .wrap(middlewares::RequireRole::new(&UserRole::Teacher)),
                    ),
            )
            .service(
                web::scope("/{id}")
                    .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles()))
                    .route("", web::get().to(get_leave))
                    .route("/logs", web::get().to(approval_logs))
                    .route("/auto-approval", web::get().to(auto_approval_status))
                    .service(
                        web::scope("")
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles()))
                            .route("/approve", web::post().to(approve_leave))
                            .route("/reject", web::post().to(reject_leave)),
                    ),
            ),
    );
}
