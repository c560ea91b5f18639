//! Login, registration and logout.

use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use serde::Deserialize;
use tera::{Context, Tera};

use crate::csrf::CsrfToken;
use crate::forms::auth::{LoginForm, RegisterForm};
use crate::middleware::login_redirect_url;
use crate::models::auth::{AuthenticatedUser, auth_cookie, clear_auth_cookie};
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{alert_level_to_str, redirect, render_template};
use crate::services::{ServiceError, auth as auth_service};

#[derive(Deserialize)]
struct NextQuery {
    next: Option<String>,
}

/// Alerts-only context for pages rendered outside a session.
fn guest_context(flash_messages: &IncomingFlashMessages) -> Context {
    let alerts: Vec<(&'static str, &str)> = flash_messages
        .iter()
        .map(|message| (alert_level_to_str(&message.level()), message.content()))
        .collect();

    let mut context = Context::new();
    context.insert("alerts", &alerts);
    context
}

#[get("/login")]
pub async fn login_page(
    req: HttpRequest,
    query: web::Query<NextQuery>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let mut context = guest_context(&flash_messages);
    context.insert("next", query.next.as_deref().unwrap_or(""));
    render_template(&req, &tera, "auth/login.html", &context)
}

#[post("/login")]
pub async fn login(
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    web::Form(form): web::Form<LoginForm>,
) -> impl Responder {
    // On failure the browser goes back to the form, keeping the return URL.
    let back = match form.safe_next() {
        Some(next) => login_redirect_url(next),
        None => "/login".to_string(),
    };

    match auth_service::login(repo.get_ref(), &form) {
        Ok(user) => {
            let claims = AuthenticatedUser::new(&user, server_config.token_ttl_minutes);
            match claims.to_jwt(&server_config.secret) {
                Ok(token) => HttpResponse::SeeOther()
                    .insert_header((header::LOCATION, form.safe_next().unwrap_or("/dashboard")))
                    .cookie(auth_cookie(&token, server_config.token_ttl_minutes))
                    .finish(),
                Err(err) => {
                    log::error!("Failed to sign an access token: {err}");
                    HttpResponse::InternalServerError().finish()
                }
            }
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Неверные данные.").send();
            redirect(&back)
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect(&back)
        }
        Err(err) => {
            log::error!("Failed to log in: {err}");
            FlashMessage::error("Ошибка при входе.").send();
            redirect(&back)
        }
    }
}

#[get("/register")]
pub async fn register_page(
    req: HttpRequest,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let context = guest_context(&flash_messages);
    render_template(&req, &tera, "auth/register.html", &context)
}

#[post("/register")]
pub async fn register(
    _csrf: CsrfToken,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<RegisterForm>,
) -> impl Responder {
    match auth_service::register(repo.get_ref(), &form) {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({"next": "/login"})),
        Err(ServiceError::Form(message)) => {
            HttpResponse::BadRequest().json(serde_json::json!({"detail": message}))
        }
        Err(err) => {
            log::error!("Failed to register a user: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/logout")]
pub async fn logout() -> impl Responder {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, "/login"))
        .cookie(clear_auth_cookie())
        .finish()
}
