use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::attendance::requests::{
    AttendanceListParams, AttendanceSummaryParams, MarkAttendanceRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::AttendanceService;
use crate::utils::SafeIDI64;

static ATTENDANCE_SERVICE: Lazy<AttendanceService> = Lazy::new(AttendanceService::new_lazy);

pub async fn mark_attendance(
    req: HttpRequest,
    body: web::Json<MarkAttendanceRequest>,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE.mark_attendance(body.into_inner(), &req).await
}

pub async fn list_attendance(
    req: HttpRequest,
    query: web::Query<AttendanceListParams>,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE.list_attendance(query.into_inner(), &req).await
}

pub async fn student_summary(
    req: HttpRequest,
    id: SafeIDI64,
    query: web::Query<AttendanceSummaryParams>,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE
        .student_summary(id.0, query.into_inner(), &req)
        .await
}

// 配置路由
pub fn configure_attendance_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/attendance")
            .wrap(middlewares::RequireJWT)
            .service(
                // 家长仅能查看自己孩子的汇总
                web::resource("/students/{id}/summary").route(
                    web::get()
                        .to(student_summary)
                        .wrap(middlewares::RequireRole::new_any(UserRole::all_roles())),
                ),
            )
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles()))
                    .route("", web::get().to(list_attendance))
                    .route("/mark", web::post().to(mark_attendance)),
            ),
    );
}
