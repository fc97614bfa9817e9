use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::activity::requests::ActivityLogListParams;
use crate::models::users::entities::UserRole;
use crate::services::ActivityService;

static ACTIVITY_SERVICE: Lazy<ActivityService> = Lazy::new(ActivityService::new_lazy);

pub async fn list_logs(
    req: HttpRequest,
    query: web::Query<ActivityLogListParams>,
) -> ActixResult<HttpResponse> {
    ACTIVITY_SERVICE.list_logs(query.into_inner(), &req).await
}

// 配置路由
pub fn configure_activity_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/activity-logs")
            .wrap(middlewares::RequireJWT)
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles()))
                    .route("", web::get().to(list_logs)),
            ),
    );
}
