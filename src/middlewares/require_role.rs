//! 角色校验，必须放在 [`RequireJWT`](super::RequireJWT) 之内
//!
//! 路由上通常写成 `.wrap(RequireRole::new_any(UserRole::staff_roles()))`。

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use std::sync::Arc;
use tracing::info;

use crate::models::{
    ErrorCode,
    users::entities::{self, UserRole},
};

use super::create_error_response;

#[derive(Clone)]
pub struct RequireRole {
    allowed: Arc<[UserRole]>,
}

impl RequireRole {
    pub fn new(role: &UserRole) -> Self {
        Self {
            allowed: Arc::from([role.clone()]),
        }
    }

    /// 满足任一角色即可
    pub fn new_any(roles: &[&UserRole]) -> Self {
        Self {
            allowed: roles.iter().map(|r| (*r).clone()).collect(),
        }
    }

    pub fn allows(&self, role: Option<&UserRole>) -> bool {
        role.is_some_and(|role| self.allowed.contains(role))
    }

    /// 拒绝时返回给客户端的说明
    pub fn denial_message(&self) -> String {
        let roles: Vec<&str> = self.allowed.iter().map(UserRole::as_str).collect();
        format!("Access denied. Requires role: {}", roles.join(" or "))
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireRole
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireRoleMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireRoleMiddleware {
            service: Rc::new(service),
            rule: self.clone(),
        }))
    }
}

pub struct RequireRoleMiddleware<S> {
    service: Rc<S>,
    rule: RequireRole,
}

impl<S, B> Service<ServiceRequest> for RequireRoleMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let rule = self.rule.clone();

        Box::pin(async move {
            let current = req
                .extensions()
                .get::<entities::User>()
                .map(|user| (user.id, user.role.clone()));

            match current {
                Some((_, role)) if rule.allows(Some(&role)) => {
                    Ok(srv.call(req).await?.map_into_left_body())
                }
                Some((user_id, role)) => {
                    info!("User {} ({}) denied access to {}", user_id, role, req.path());
                    Ok(req.into_response(
                        create_error_response(
                            StatusCode::FORBIDDEN,
                            ErrorCode::Forbidden,
                            &rule.denial_message(),
                        )
                        .map_into_right_body(),
                    ))
                }
                None => {
                    info!("No authenticated user on {}, RequireJWT missing", req.path());
                    Ok(req.into_response(
                        create_error_response(
                            StatusCode::UNAUTHORIZED,
                            ErrorCode::Unauthorized,
                            "Authentication required",
                        )
                        .map_into_right_body(),
                    ))
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, HttpResponse, test as actix_test, web};

    fn user_with_role(role: UserRole) -> entities::User {
        let now = chrono::Utc::now();
        entities::User {
            id: 9,
            username: "someone".into(),
            email: "someone@example.com".into(),
            password_hash: String::new(),
            role,
            status: entities::UserStatus::Active,
            display_name: None,
            phone: None,
            last_login: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_allows() {
        let staff = RequireRole::new_any(UserRole::staff_roles());
        assert!(staff.allows(Some(&UserRole::Teacher)));
        assert!(staff.allows(Some(&UserRole::Admin)));
        assert!(!staff.allows(Some(&UserRole::Parent)));
        assert!(!staff.allows(None));
        assert_eq!(
            RequireRole::new_any(UserRole::payer_roles()).denial_message(),
            "Access denied. Requires role: admin or parent"
        );
    }

    #[actix_web::test]
    async fn test_forbidden_for_wrong_role() {
        let app = actix_test::init_service(
            App::new().service(
                web::resource("/admin")
                    .wrap(RequireRole::new(&UserRole::Admin))
                    .route(web::get().to(HttpResponse::Ok)),
            ),
        )
        .await;

        let req = actix_test::TestRequest::get().uri("/admin").to_request();
        assert_eq!(
            actix_test::call_service(&app, req).await.status(),
            StatusCode::UNAUTHORIZED
        );

        let req = actix_test::TestRequest::get().uri("/admin").to_request();
        req.extensions_mut().insert(user_with_role(UserRole::Parent));
        assert_eq!(
            actix_test::call_service(&app, req).await.status(),
            StatusCode::FORBIDDEN
        );

        let req = actix_test::TestRequest::get().uri("/admin").to_request();
        req.extensions_mut().insert(user_with_role(UserRole::Admin));
        assert_eq!(actix_test::call_service(&app, req).await.status(), StatusCode::OK);
    }
}
