//! JWT-backed request identity.

use std::future::{Ready, ready};

use actix_web::cookie::time::Duration as CookieDuration;
use actix_web::cookie::{Cookie, SameSite};
use actix_web::error::ErrorUnauthorized;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::domain::user::User;
use crate::models::config::ServerConfig;

/// Cookie the access token travels in.
pub const AUTH_COOKIE: &str = "access_token";

#[derive(Clone, Debug, Serialize, Deserialize)]
/// Claims carried by the access token and available to every handler.
pub struct AuthenticatedUser {
    pub sub: String,
    pub user_id: i32,
    pub is_superuser: bool,
    pub exp: usize,
}

impl AuthenticatedUser {
    #[must_use]
    pub fn new(user: &User, ttl_minutes: i64) -> Self {
        let exp = Utc::now() + Duration::minutes(ttl_minutes);
        Self {
            sub: user.username.clone(),
            user_id: user.id,
            is_superuser: user.is_superuser,
            exp: exp.timestamp() as usize,
        }
    }

    pub fn to_jwt(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    pub fn from_jwt(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
    }
}

/// Session cookie carrying a freshly minted token. HttpOnly keeps it away
/// from page scripts.
#[must_use]
pub fn auth_cookie(token: &str, ttl_minutes: i64) -> Cookie<'static> {
    Cookie::build(AUTH_COOKIE, token.to_string())
        .path("/")
        .same_site(SameSite::Lax)
        .http_only(true)
        .max_age(CookieDuration::minutes(ttl_minutes))
        .finish()
}

/// Immediately-expiring replacement that logs the browser out.
#[must_use]
pub fn clear_auth_cookie() -> Cookie<'static> {
    Cookie::build(AUTH_COOKIE, "")
        .path("/")
        .same_site(SameSite::Lax)
        .http_only(true)
        .max_age(CookieDuration::ZERO)
        .finish()
}

impl FromRequest for AuthenticatedUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let user = req.app_data::<web::Data<ServerConfig>>().and_then(|config| {
            let cookie = req.cookie(AUTH_COOKIE)?;
            Self::from_jwt(cookie.value(), &config.secret).ok()
        });
        ready(user.ok_or_else(|| ErrorUnauthorized("Not authenticated")))
    }
}
