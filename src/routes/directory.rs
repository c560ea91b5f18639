//! Brand, category and prompt dictionary pages and mutations.

use actix_web::{HttpRequest, HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::csrf::CsrfToken;
use crate::domain::directory::DirectoryKind;
use crate::forms::directory::DirectoryForm;
use crate::models::auth::AuthenticatedUser;
use crate::repository::DieselRepository;
use crate::routes::{ACCESS_DENIED_DETAIL, base_context, redirect, render_template};
use crate::services::{ServiceError, directory as directory_service};

fn unknown_kind(kind: &str) -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({
        "success": false,
        "error": format!("Справочник '{kind}' не найден."),
    }))
}

#[get("/directory/{kind}")]
pub async fn directory_page(
    req: HttpRequest,
    kind: web::Path<String>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let Some(kind) = DirectoryKind::parse(&kind.into_inner()) else {
        return HttpResponse::NotFound()
            .json(serde_json::json!({"detail": "Справочник не найден"}));
    };

    match directory_service::load_directory_page(repo.get_ref(), &user, kind) {
        Ok(data) => {
            let mut context = base_context(&flash_messages, &user, kind.as_str());
            context.insert("kind", kind.as_str());
            context.insert("kind_title", kind.title());
            context.insert("entries", &data.entries);

            render_template(&req, &tera, "directory/index.html", &context)
        }
        Err(err) => {
            log::error!("Failed to load the {kind} directory: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/directory/{kind}/new")]
pub async fn new_entry_form(
    req: HttpRequest,
    kind: web::Path<String>,
    user: AuthenticatedUser,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let Some(kind) = DirectoryKind::parse(&kind.into_inner()) else {
        return HttpResponse::NotFound()
            .json(serde_json::json!({"detail": "Справочник не найден"}));
    };

    let mut context = base_context(&flash_messages, &user, kind.as_str());
    context.insert("kind", kind.as_str());
    context.insert("kind_title", kind.title());
    context.insert("entry", &None::<()>);

    render_template(&req, &tera, "directory/form.html", &context)
}

#[get("/directory/{kind}/update/{entry_id}")]
pub async fn edit_entry_form(
    req: HttpRequest,
    path: web::Path<(String, i32)>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let (kind, entry_id) = path.into_inner();
    let Some(kind) = DirectoryKind::parse(&kind) else {
        return HttpResponse::NotFound()
            .json(serde_json::json!({"detail": "Справочник не найден"}));
    };

    match directory_service::load_directory_form(repo.get_ref(), &user, kind, entry_id) {
        Ok(entry) => {
            let mut context = base_context(&flash_messages, &user, kind.as_str());
            context.insert("kind", kind.as_str());
            context.insert("kind_title", kind.title());
            context.insert("entry", &entry);

            render_template(&req, &tera, "directory/form.html", &context)
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Элемент не найден").send();
            redirect(&format!("/directory/{kind}"))
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Недостаточно прав.").send();
            redirect(&format!("/directory/{kind}"))
        }
        Err(err) => {
            log::error!("Failed to load the {kind} entry form: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/directory/{kind}/new")]
pub async fn create_entry(
    _csrf: CsrfToken,
    kind: web::Path<String>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<DirectoryForm>,
) -> impl Responder {
    let kind = kind.into_inner();
    let Some(kind) = DirectoryKind::parse(&kind) else {
        return HttpResponse::NotFound()
            .json(serde_json::json!({"detail": format!("Справочник '{kind}' не найден.")}));
    };

    match directory_service::create_entry(repo.get_ref(), &user, kind, &form) {
        Ok(outcome) => HttpResponse::Ok().json(outcome),
        Err(ServiceError::Form(message)) => {
            HttpResponse::BadRequest().json(serde_json::json!({"detail": message}))
        }
        Err(err) => {
            log::error!("Failed to create a {kind} entry: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/directory/{kind}/update/{entry_id}")]
pub async fn update_entry(
    _csrf: CsrfToken,
    path: web::Path<(String, i32)>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<DirectoryForm>,
) -> impl Responder {
    let (kind, entry_id) = path.into_inner();
    let Some(kind) = DirectoryKind::parse(&kind) else {
        return unknown_kind(&kind);
    };

    match directory_service::update_entry(repo.get_ref(), &user, kind, entry_id, &form) {
        Ok(outcome) => HttpResponse::Ok().json(outcome),
        Err(ServiceError::Form(message)) => {
            HttpResponse::BadRequest().json(serde_json::json!({"detail": message}))
        }
        Err(ServiceError::NotFound) => HttpResponse::NotFound()
            .json(serde_json::json!({"success": false, "error": "Элемент не найден"})),
        Err(ServiceError::Unauthorized) => {
            HttpResponse::Forbidden().json(serde_json::json!({"detail": ACCESS_DENIED_DETAIL}))
        }
        Err(err) => {
            log::error!("Failed to update the {kind} entry: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/directory/{kind}/delete/{entry_id}")]
pub async fn delete_entry(
    _csrf: CsrfToken,
    path: web::Path<(String, i32)>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let (kind, entry_id) = path.into_inner();
    let Some(kind) = DirectoryKind::parse(&kind) else {
        return unknown_kind(&kind);
    };

    match directory_service::delete_entry(repo.get_ref(), &user, kind, entry_id) {
        Ok(outcome) => HttpResponse::Ok().json(outcome),
        Err(ServiceError::NotFound) => HttpResponse::NotFound()
            .json(serde_json::json!({"success": false, "error": "Элемент не найден"})),
        Err(ServiceError::Unauthorized) => {
            HttpResponse::Forbidden().json(serde_json::json!({"detail": ACCESS_DENIED_DETAIL}))
        }
        Err(err) => {
            log::error!("Failed to delete the {kind} entry: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
