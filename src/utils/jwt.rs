//! 访问令牌与刷新令牌
//!
//! 访问令牌通过 `Authorization: Bearer` 传递；刷新令牌只存在于 HttpOnly cookie 中。

use actix_web::cookie::{Cookie, SameSite, time::Duration as CookieDuration};
use chrono::{Duration, Utc};
use jsonwebtoken::errors::{Error as JwtError, ErrorKind};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::models::users::entities::UserRole;

pub const REFRESH_COOKIE: &str = "refresh_token";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// 用户 ID
    pub sub: String,
    pub role: UserRole,
    pub token_type: TokenKind,
    pub exp: usize,
    pub iat: usize,
}

impl Claims {
    pub fn user_id(&self) -> Option<i64> {
        self.sub.parse().ok()
    }
}

#[derive(Debug)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    /// 刷新令牌有效期，同时作为 cookie 的 max-age
    pub refresh_ttl: Duration,
}

pub struct JwtUtils;

impl JwtUtils {
    fn secret() -> &'static str {
        &AppConfig::get().jwt.secret
    }

    fn sign(user_id: i64, role: &UserRole, kind: TokenKind, ttl: Duration) -> Result<String, JwtError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            role: role.clone(),
            token_type: kind,
            exp: (now + ttl).timestamp() as usize,
            iat: now.timestamp() as usize,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(Self::secret().as_bytes()),
        )
    }

    pub fn access_ttl() -> Duration {
        Duration::minutes(AppConfig::get().jwt.access_token_expiry)
    }

    /// 勾选“记住我”时使用更长的刷新有效期
    pub fn refresh_ttl(remember_me: bool) -> Duration {
        let jwt = &AppConfig::get().jwt;
        if remember_me {
            Duration::days(jwt.refresh_token_remember_me_expiry)
        } else {
            Duration::days(jwt.refresh_token_expiry)
        }
    }

    pub fn generate_access_token(user_id: i64, role: &UserRole) -> Result<String, JwtError> {
        Self::sign(user_id, role, TokenKind::Access, Self::access_ttl())
    }

    pub fn generate_token_pair(
        user_id: i64,
        role: &UserRole,
        remember_me: bool,
    ) -> Result<TokenPair, JwtError> {
        let refresh_ttl = Self::refresh_ttl(remember_me);
        Ok(TokenPair {
            access_token: Self::generate_access_token(user_id, role)?,
            refresh_token: Self::sign(user_id, role, TokenKind::Refresh, refresh_ttl)?,
            refresh_ttl,
        })
    }

    /// 校验签名、有效期与令牌类型
    pub fn verify(token: &str, expected: TokenKind) -> Result<Claims, JwtError> {
        let claims = decode::<Claims>(
            token,
            &DecodingKey::from_secret(Self::secret().as_bytes()),
            &Validation::default(),
        )?
        .claims;
        if claims.token_type != expected {
            return Err(JwtError::from(ErrorKind::InvalidToken));
        }
        Ok(claims)
    }

    pub fn verify_access_token(token: &str) -> Result<Claims, JwtError> {
        Self::verify(token, TokenKind::Access)
    }

    pub fn verify_refresh_token(token: &str) -> Result<Claims, JwtError> {
        Self::verify(token, TokenKind::Refresh)
    }

    fn cookie(value: String, max_age: CookieDuration) -> Cookie<'static> {
        Cookie::build(REFRESH_COOKIE, value)
            .path("/api/v1/auth")
            .max_age(max_age)
            .same_site(SameSite::Strict)
            .http_only(true)
            .secure(AppConfig::get().is_production())
            .finish()
    }

    pub fn create_refresh_token_cookie(pair: &TokenPair) -> Cookie<'static> {
        Self::cookie(
            pair.refresh_token.clone(),
            CookieDuration::seconds(pair.refresh_ttl.num_seconds()),
        )
    }

    /// max-age=0 让浏览器删除该 cookie
    pub fn create_empty_refresh_token_cookie() -> Cookie<'static> {
        Self::cookie(String::new(), CookieDuration::ZERO)
    }

    pub fn extract_refresh_token_from_cookie(req: &actix_web::HttpRequest) -> Option<String> {
        req.cookie(REFRESH_COOKIE)
            .map(|cookie| cookie.value().to_string())
            .filter(|v| !v.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_serialize_role_and_kind_as_strings() {
        let claims = Claims {
            sub: "42".into(),
            role: UserRole::Parent,
            token_type: TokenKind::Refresh,
            exp: 10,
            iat: 1,
        };
        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(json["role"], "parent");
        assert_eq!(json["token_type"], "refresh");
        assert_eq!(claims.user_id(), Some(42));

        let bad = Claims {
            sub: "abc".into(),
            ..claims
        };
        assert_eq!(bad.user_id(), None);
    }
}
