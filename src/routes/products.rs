//! Product form pages, saving and the image gallery.

use actix_multipart::form::MultipartForm;
use actix_web::{HttpRequest, HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::csrf::CsrfToken;
use crate::forms::product::{GalleryImageForm, SaveProductForm};
use crate::models::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::main::dashboard_state;
use crate::routes::{ACCESS_DENIED_DETAIL, TableViews, base_context, redirect, render_template};
use crate::services::{ServiceError, products as products_service};

#[get("/product/new/form")]
pub async fn new_product_form(
    req: HttpRequest,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    form_page(&req, &user, repo.get_ref(), &flash_messages, &tera, None)
}

#[get("/product/{product_id}/form")]
pub async fn edit_product_form(
    req: HttpRequest,
    product_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    form_page(
        &req,
        &user,
        repo.get_ref(),
        &flash_messages,
        &tera,
        Some(product_id.into_inner()),
    )
}

fn form_page(
    req: &HttpRequest,
    user: &AuthenticatedUser,
    repo: &DieselRepository,
    flash_messages: &IncomingFlashMessages,
    tera: &Tera,
    product_id: Option<i32>,
) -> HttpResponse {
    match products_service::load_product_form(repo, user, product_id) {
        Ok(data) => {
            let mut context = base_context(flash_messages, user, "dashboard");
            context.insert("product", &data.product);
            context.insert("main_image", &data.main_image);
            context.insert("images", &data.images);
            context.insert("brands", &data.brands);
            context.insert("categories", &data.categories);
            context.insert("prompts", &data.prompts);
            // Listing state arrives in the query; the save posts it back
            // so the answer can point at the right dashboard page.
            context.insert("query_string", req.query_string());

            render_template(req, tera, "products/form.html", &context)
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Продукт не найден").send();
            redirect("/dashboard")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Недостаточно прав.").send();
            redirect("/dashboard")
        }
        Err(err) => {
            log::error!("Failed to load the product form: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// Creates or updates a product. The dashboard posts here with its
/// current listing state in the query string so the answer can point
/// back at the right page.
#[post("/product/save")]
pub async fn save_product(
    req: HttpRequest,
    _csrf: CsrfToken,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    views: web::Data<TableViews>,
    MultipartForm(form): MultipartForm<SaveProductForm>,
) -> impl Responder {
    let state = dashboard_state(&views.dashboard, req.query_string());

    match products_service::save_product(
        repo.get_ref(),
        &user,
        &form,
        &state,
        &server_config.upload_dir,
    ) {
        Ok(saved) => HttpResponse::Ok().json(saved),
        Err(ServiceError::Form(message)) => {
            HttpResponse::BadRequest().json(serde_json::json!({"detail": message}))
        }
        Err(ServiceError::NotFound) => {
            HttpResponse::NotFound().json(serde_json::json!({"detail": "Продукт не найден"}))
        }
        Err(ServiceError::Unauthorized) => {
            HttpResponse::Forbidden().json(serde_json::json!({"detail": ACCESS_DENIED_DETAIL}))
        }
        Err(err) => {
            log::error!("Failed to save the product: {err}");
            HttpResponse::InternalServerError()
                .json(serde_json::json!({"error": "Internal server error"}))
        }
    }
}

#[post("/product/{product_id}/delete")]
pub async fn delete_product(
    _csrf: CsrfToken,
    product_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match products_service::delete_product(repo.get_ref(), &user, product_id.into_inner()) {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({"success": true})),
        Err(ServiceError::NotFound) => HttpResponse::NotFound()
            .json(serde_json::json!({"detail": "Товар не найден или нет прав доступа"})),
        Err(err) => {
            log::error!("Failed to delete the product: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/product/{product_id}/gallery")]
pub async fn upload_gallery_image(
    _csrf: CsrfToken,
    product_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    MultipartForm(form): MultipartForm<GalleryImageForm>,
) -> impl Responder {
    match products_service::upload_gallery_image(
        repo.get_ref(),
        &user,
        product_id.into_inner(),
        &form.image,
        &server_config.upload_dir,
    ) {
        Ok(image) => HttpResponse::Ok().json(image),
        Err(ServiceError::NotFound) => HttpResponse::NotFound()
            .json(serde_json::json!({"detail": "Продукт не найден для загрузки изображения"})),
        Err(ServiceError::Unauthorized) => {
            HttpResponse::Forbidden().json(serde_json::json!({"detail": ACCESS_DENIED_DETAIL}))
        }
        Err(err) => {
            log::error!("Failed to store the gallery image: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/product/image/{image_id}/delete")]
pub async fn delete_image(
    _csrf: CsrfToken,
    image_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match products_service::delete_image(repo.get_ref(), &user, image_id.into_inner()) {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({"status": "ok"})),
        Err(ServiceError::NotFound) => HttpResponse::NotFound()
            .json(serde_json::json!({"detail": "Изображение не найдено"})),
        Err(ServiceError::Unauthorized) => {
            HttpResponse::Forbidden().json(serde_json::json!({"detail": ACCESS_DENIED_DETAIL}))
        }
        Err(err) => {
            log::error!("Failed to delete the product image: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
