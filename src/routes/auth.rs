use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RateLimit};
use crate::models::auth::requests::{
    ChangePasswordRequest, LoginRequest, OnboardingRegisterRequest, SecretKeyLookupQuery,
};
use crate::services::AuthService;
use crate::services::auth::OnboardingKind;

// 懒加载的全局 AuthService 实例
static AUTH_SERVICE: Lazy<AuthService> = Lazy::new(AuthService::new_lazy);

pub async fn login(
    req: HttpRequest,
    user_data: web::Json<LoginRequest>,
) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.login(user_data.into_inner(), &req).await
}

pub async fn refresh_token(request: HttpRequest) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.refresh_token(&request).await
}

pub async fn logout(req: HttpRequest) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.logout(&req).await
}

pub async fn get_user(request: HttpRequest) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.get_user(&request).await
}

pub async fn change_password(
    req: HttpRequest,
    body: web::Json<ChangePasswordRequest>,
) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.change_password(body.into_inner(), &req).await
}

pub async fn parent_lookup(
    req: HttpRequest,
    query: web::Query<SecretKeyLookupQuery>,
) -> ActixResult<HttpResponse> {
    AUTH_SERVICE
        .lookup_secret_key(OnboardingKind::Parent, query.into_inner(), &req)
        .await
}

pub async fn parent_register(
    req: HttpRequest,
    body: web::Json<OnboardingRegisterRequest>,
) -> ActixResult<HttpResponse> {
    AUTH_SERVICE
        .register_with_secret_key(OnboardingKind::Parent, body.into_inner(), &req)
        .await
}

pub async fn teacher_lookup(
    req: HttpRequest,
    query: web::Query<SecretKeyLookupQuery>,
) -> ActixResult<HttpResponse> {
    AUTH_SERVICE
        .lookup_secret_key(OnboardingKind::Teacher, query.into_inner(), &req)
        .await
}

pub async fn teacher_register(
    req: HttpRequest,
    body: web::Json<OnboardingRegisterRequest>,
) -> ActixResult<HttpResponse> {
    AUTH_SERVICE
        .register_with_secret_key(OnboardingKind::Teacher, body.into_inner(), &req)
        .await
}

// 配置路由
pub fn configure_auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/auth")
            .service(
                web::resource("/login")
                    .wrap(RateLimit::login())
                    .route(web::post().to(login)),
            )
            .route("/refresh", web::post().to(refresh_token))
            .route("/logout", web::post().to(logout))
            .service(
                web::resource("/parent-lookup")
                    .wrap(RateLimit::secret_key_lookup())
                    .route(web::get().to(parent_lookup)),
            )
            .service(
                web::resource("/parent-register")
                    .wrap(RateLimit::register())
                    .route(web::post().to(parent_register)),
            )
            .service(
                web::resource("/teacher-lookup")
                    .wrap(RateLimit::secret_key_lookup())
                    .route(web::get().to(teacher_lookup)),
            )
            .service(
                web::resource("/teacher-register")
                    .wrap(RateLimit::register())
                    .route(web::post().to(teacher_register)),
            )
            .service(
                web::scope("")
                    .wrap(middlewares::RequireJWT)
                    .route("/me", web::get().to(get_user))
                    .route("/password", web::put().to(change_password)),
            ),
    );
}
