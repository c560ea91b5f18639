//! Double-submit CSRF protection.
//!
//! Every rendered page response carries a readable `csrf_token` cookie;
//! state-changing endpoints require the same value in the `X-CSRF-Token`
//! header. The [`CsrfToken`] extractor enforces the match and answers 403
//! when it fails.

use std::future::{Ready, ready};

use actix_web::cookie::{Cookie, SameSite};
use actix_web::error::ErrorForbidden;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use rand::distr::{Alphanumeric, SampleString};

pub const CSRF_COOKIE: &str = "csrf_token";
pub const CSRF_HEADER: &str = "X-CSRF-Token";

const TOKEN_LEN: usize = 32;

#[must_use]
pub fn generate_token() -> String {
    Alphanumeric.sample_string(&mut rand::rng(), TOKEN_LEN)
}

/// Cookie the browser echoes back through the header. Deliberately not
/// HttpOnly: page scripts must be able to read it.
#[must_use]
pub fn csrf_cookie(token: &str) -> Cookie<'static> {
    Cookie::build(CSRF_COOKIE, token.to_string())
        .path("/")
        .same_site(SameSite::Lax)
        .http_only(false)
        .finish()
}

#[derive(Debug, Clone, Copy)]
/// Proof that the request carried a header token matching the cookie.
pub struct CsrfToken;

impl FromRequest for CsrfToken {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let cookie = req.cookie(CSRF_COOKIE).map(|c| c.value().to_string());
        let header = req
            .headers()
            .get(CSRF_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let matched = match (cookie, header) {
            (Some(cookie), Some(header)) => !cookie.is_empty() && cookie == header,
            _ => false,
        };

        if matched {
            ready(Ok(CsrfToken))
        } else {
            ready(Err(ErrorForbidden("CSRF token missing or invalid")))
        }
    }
}
