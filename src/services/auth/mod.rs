pub mod login;
pub mod logout;
pub mod onboarding;
pub mod password;
pub mod token;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::models::auth::requests::{
    ChangePasswordRequest, LoginRequest, OnboardingRegisterRequest, SecretKeyLookupQuery,
};
use crate::storage::Storage;

pub use onboarding::OnboardingKind;

pub struct AuthService {
    storage: Option<Arc<dyn Storage>>,
}

impl AuthService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    pub(crate) fn get_config(&self) -> &AppConfig {
        AppConfig::get()
    }

    // 登录验证
    pub async fn login(
        &self,
        login_request: LoginRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        login::handle_login(self, login_request, request).await
    }

    // 刷新令牌
    pub async fn refresh_token(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        token::handle_refresh_token(self, request).await
    }

    // 注销
    pub async fn logout(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        logout::handle_logout(self, request).await
    }

    // 获取当前用户信息
    pub async fn get_user(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        token::handle_get_user(self, request).await
    }

    // 修改密码
    pub async fn change_password(
        &self,
        change_request: ChangePasswordRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        password::handle_change_password(self, change_request, request).await
    }

    // 凭注册密钥查询档案
    pub async fn lookup_secret_key(
        &self,
        kind: OnboardingKind,
        query: SecretKeyLookupQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        onboarding::handle_lookup(self, kind, query, request).await
    }

    // 凭注册密钥开户
    pub async fn register_with_secret_key(
        &self,
        kind: OnboardingKind,
        register_request: OnboardingRegisterRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        onboarding::handle_register(self, kind, register_request, request).await
    }
}
