//! Review table pages, CRUD, file ingestion and analysis runs.

use actix_multipart::form::MultipartForm;
use actix_web::{HttpRequest, HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use serde::Deserialize;
use tera::Tera;

use crate::csrf::CsrfToken;
use crate::forms::review::{AnalyzeForm, ReviewForm, UploadReviewsForm};
use crate::models::auth::AuthenticatedUser;
use crate::repository::DieselRepository;
use crate::routes::{
    ACCESS_DENIED_DETAIL, TableViews, add_alert, base_context, insert_table_state,
    insert_table_view, page_nav, redirect, render_template, sort_links,
};
use crate::services::{ServiceError, reviews as reviews_service};
use crate::table::{Page, TableConfig, TableConfigError, TableDefaults, TableState};

/// Filter keys the review table accepts from the URL.
const REVIEW_FILTERS: &[&str] = &[
    "importance",
    "source",
    "text",
    "advantages",
    "disadvantages",
    "normalized_rating_min",
    "normalized_rating_max",
];
/// Columns the review table sorts by.
const REVIEW_SORTS: &[&str] = &[
    "id",
    "importance",
    "source",
    "text",
    "advantages",
    "disadvantages",
    "normalized_rating",
];

/// The review view description, validated at startup.
pub(crate) fn review_table() -> Result<TableConfig, TableConfigError> {
    TableConfig::builder()
        .data_url("/analyze/data")
        .defaults(TableDefaults::new().filter_keys(REVIEW_FILTERS))
        .sort_fields(REVIEW_SORTS)
        .row_target("review-rows")
        .card_target("review-cards")
        .build()
}

/// Review listing state with the product id pinned, so every URL the
/// state produces keeps addressing the same product.
fn review_state(config: &TableConfig, product_id: i32, query: &str) -> TableState {
    TableState::from_query_str(
        config
            .defaults
            .clone()
            .pin_filter("product_id", product_id.to_string()),
        query,
    )
}

#[get("/analyze/{product_id}")]
pub async fn analyze_page(
    req: HttpRequest,
    product_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    views: web::Data<TableViews>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let product_id = product_id.into_inner();
    let config = &views.reviews;
    let state = review_state(config, product_id, req.query_string());

    let data = match reviews_service::load_analyze_page(repo.get_ref(), &user, product_id) {
        Ok(data) => data,
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Продукт не найден").send();
            return redirect("/dashboard");
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Недостаточно прав.").send();
            return redirect("/dashboard");
        }
        Err(err) => {
            log::error!("Failed to load the review page: {err}");
            return HttpResponse::InternalServerError().finish();
        }
    };

    // A failed listing still renders the page frame with an error row.
    let (reviews, load_error) =
        match reviews_service::analyze_data(repo.get_ref(), &user, product_id, &state) {
            Ok(page) => (page, false),
            Err(err) => {
                log::error!("Failed to load the review listing: {err}");
                (Page::empty(&state), true)
            }
        };

    let base = format!("/analyze/{product_id}");
    let mut context = base_context(&flash_messages, &user, "dashboard");
    if load_error {
        add_alert(&mut context, "danger", "Ошибка загрузки данных");
    }
    context.insert("product", &data.product);
    context.insert("prompts", &data.prompts);
    context.insert("reviews", &reviews.items);
    context.insert("total", &reviews.total);
    context.insert("load_error", &load_error);
    context.insert("sort_links", &sort_links(&state, &base, &config.sort_fields));
    context.insert("has_pagination", &reviews.has_pagination());
    context.insert(
        "page_nav",
        &page_nav(&state, &base, reviews.page, reviews.total_pages),
    );
    // The script reloads rows from here and appends the visible state
    // itself, so only the pin travels in the URL.
    context.insert(
        "data_url",
        &format!("{}?product_id={product_id}", config.data_url),
    );
    insert_table_view(&mut context, config);
    insert_table_state(&mut context, &state, &base);

    render_template(&req, &tera, "reviews/index.html", &context)
}

#[derive(Deserialize)]
struct ReviewDataParams {
    product_id: i32,
}

#[get("/analyze/data")]
pub async fn analyze_data(
    req: HttpRequest,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    views: web::Data<TableViews>,
    params: web::Query<ReviewDataParams>,
) -> impl Responder {
    let state = review_state(&views.reviews, params.product_id, req.query_string());

    match reviews_service::analyze_data(repo.get_ref(), &user, params.product_id, &state) {
        Ok(page) => HttpResponse::Ok().json(page),
        Err(err) => {
            log::error!("Failed to load review data: {err}");
            HttpResponse::InternalServerError()
                .json(serde_json::json!({"error": "Не удалось загрузить отзывы"}))
        }
    }
}

#[post("/analyze/{product_id}/reviews")]
pub async fn add_review(
    _csrf: CsrfToken,
    product_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<ReviewForm>,
) -> impl Responder {
    match reviews_service::add_review(repo.get_ref(), &user, product_id.into_inner(), form) {
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
            log::error!("Failed to add a review: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/review/{review_id}/update")]
pub async fn update_review(
    _csrf: CsrfToken,
    review_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<ReviewForm>,
) -> impl Responder {
    match reviews_service::update_review(repo.get_ref(), &user, review_id.into_inner(), form) {
        Ok(saved) => HttpResponse::Ok().json(saved),
        Err(ServiceError::Form(message)) => {
            HttpResponse::BadRequest().json(serde_json::json!({"detail": message}))
        }
        Err(ServiceError::NotFound) => {
            HttpResponse::NotFound().json(serde_json::json!({"detail": "Отзыв не найден"}))
        }
        Err(err) => {
            log::error!("Failed to update the review: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// Answers 200 with `success: false` when the row is gone, so the script
/// can show the message without an error path.
#[post("/review/{review_id}/delete")]
pub async fn delete_review(
    _csrf: CsrfToken,
    review_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match reviews_service::delete_review(repo.get_ref(), &user, review_id.into_inner()) {
        Ok(deleted) => HttpResponse::Ok().json(deleted),
        Err(ServiceError::NotFound) => HttpResponse::Ok()
            .json(serde_json::json!({"success": false, "error": "Отзыв не найден"})),
        Err(err) => {
            log::error!("Failed to delete the review: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/analyze/{product_id}/reviews/clear")]
pub async fn clear_reviews(
    _csrf: CsrfToken,
    product_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match reviews_service::clear_reviews(repo.get_ref(), &user, product_id.into_inner()) {
        Ok(cleared) => HttpResponse::Ok().json(cleared),
        Err(err) => {
            log::error!("Failed to clear reviews: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/analyze/{product_id}/upload")]
pub async fn upload_reviews(
    _csrf: CsrfToken,
    product_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    MultipartForm(form): MultipartForm<UploadReviewsForm>,
) -> impl Responder {
    match reviews_service::upload_reviews(repo.get_ref(), &user, product_id.into_inner(), &form.file)
    {
        Ok(report) => HttpResponse::Ok().json(report),
        Err(ServiceError::NotFound) => {
            HttpResponse::NotFound().json(serde_json::json!({"detail": "Продукт не найден"}))
        }
        Err(ServiceError::Unauthorized) => {
            HttpResponse::Forbidden().json(serde_json::json!({"detail": ACCESS_DENIED_DETAIL}))
        }
        Err(err) => {
            log::error!("Failed to ingest the review file: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/analyze/{product_id}")]
pub async fn analyze(
    _csrf: CsrfToken,
    product_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<AnalyzeForm>,
) -> impl Responder {
    match reviews_service::analyze(repo.get_ref(), &user, product_id.into_inner(), &form) {
        Ok(outcome) => HttpResponse::Ok().json(outcome),
        Err(ServiceError::NotFound) => {
            HttpResponse::NotFound().json(serde_json::json!({"detail": "Продукт не найден"}))
        }
        Err(ServiceError::Unauthorized) => {
            HttpResponse::Forbidden().json(serde_json::json!({"detail": ACCESS_DENIED_DETAIL}))
        }
        Err(err) => {
            log::error!("Failed to run the analysis: {err}");
            HttpResponse::InternalServerError()
                .json(serde_json::json!({"error": "Ошибка анализа"}))
        }
    }
}
