//! Dashboard pages and listing data.

use actix_web::{HttpRequest, HttpResponse, Responder, get, web};
use actix_web_flash_messages::IncomingFlashMessages;
use serde::Deserialize;
use tera::Tera;

use crate::dto::products::DashboardPageData;
use crate::models::auth::AuthenticatedUser;
use crate::repository::DieselRepository;
use crate::routes::{
    TableViews, add_alert, base_context, insert_table_state, insert_table_view, page_nav,
    redirect, render_template, sort_links,
};
use crate::services::products as products_service;
use crate::table::{Page, TableConfig, TableConfigError, TableDefaults, TableState};

/// Filter keys the dashboard accepts from the URL.
const DASHBOARD_FILTERS: &[&str] = &["name", "ean", "upc", "brand_id", "category_id"];
/// Columns the dashboard table sorts by.
const DASHBOARD_SORTS: &[&str] = &["id", "name", "ean", "upc", "brand", "category"];

/// The dashboard view description, validated at startup.
pub(crate) fn dashboard_table() -> Result<TableConfig, TableConfigError> {
    TableConfig::builder()
        .data_url("/dashboard/data")
        .defaults(TableDefaults::new().filter_keys(DASHBOARD_FILTERS))
        .sort_fields(DASHBOARD_SORTS)
        .row_target("product-rows")
        .card_target("product-cards")
        .build()
}

pub(crate) fn dashboard_state(config: &TableConfig, query: &str) -> TableState {
    TableState::from_query_str(config.defaults.clone(), query)
}

#[derive(Deserialize)]
struct HighlightParams {
    highlight_id: Option<i32>,
    new_created: Option<String>,
}

#[get("/")]
pub async fn index() -> impl Responder {
    redirect("/dashboard")
}

#[get("/dashboard")]
pub async fn dashboard(
    req: HttpRequest,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    views: web::Data<TableViews>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
    highlight: web::Query<HighlightParams>,
) -> impl Responder {
    let config = &views.dashboard;
    let state = dashboard_state(config, req.query_string());

    // A failed listing still renders the shell: the filter controls keep
    // the requested state and the body shows an error row instead.
    let (data, load_error) = match products_service::load_dashboard_page(repo.get_ref(), &user, &state)
    {
        Ok(data) => (data, false),
        Err(err) => {
            log::error!("Failed to load the dashboard: {err}");
            let empty = DashboardPageData {
                products: Page::empty(&state),
                brands: Vec::new(),
                categories: Vec::new(),
            };
            (empty, true)
        }
    };

    let mut context = base_context(&flash_messages, &user, "dashboard");
    if load_error {
        add_alert(&mut context, "danger", "Ошибка загрузки данных");
    }
    context.insert("products", &data.products.items);
    context.insert("total", &data.products.total);
    context.insert("brands", &data.brands);
    context.insert("categories", &data.categories);
    context.insert("load_error", &load_error);
    context.insert("highlight_id", &highlight.highlight_id);
    context.insert("new_created", &highlight.new_created.is_some());
    context.insert("data_url", &config.data_url);
    context.insert(
        "sort_links",
        &sort_links(&state, "/dashboard", &config.sort_fields),
    );
    context.insert("has_pagination", &data.products.has_pagination());
    context.insert(
        "page_nav",
        &page_nav(&state, "/dashboard", data.products.page, data.products.total_pages),
    );
    insert_table_view(&mut context, config);
    insert_table_state(&mut context, &state, "/dashboard");

    render_template(&req, &tera, "main/index.html", &context)
}

#[get("/dashboard/data")]
pub async fn dashboard_data(
    req: HttpRequest,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    views: web::Data<TableViews>,
) -> impl Responder {
    let state = dashboard_state(&views.dashboard, req.query_string());

    match products_service::dashboard_data(repo.get_ref(), &user, &state) {
        Ok(page) => HttpResponse::Ok().json(page),
        Err(err) => {
            log::error!("Failed to load dashboard data: {err}");
            HttpResponse::InternalServerError()
                .json(serde_json::json!({"error": "Не удалось загрузить список товаров"}))
        }
    }
}

#[derive(Deserialize)]
struct HighlightPageParams {
    product_id: i32,
}

/// Which page of the filtered listing shows the product, for the
/// post-save jump.
#[get("/highlight-page")]
pub async fn highlight_page(
    req: HttpRequest,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    views: web::Data<TableViews>,
    params: web::Query<HighlightPageParams>,
) -> impl Responder {
    let state = dashboard_state(&views.dashboard, req.query_string());

    match products_service::highlight_page(repo.get_ref(), &user, params.product_id, &state) {
        Ok(result) => HttpResponse::Ok().json(result),
        Err(err) => {
            log::error!("Failed to locate the product page: {err}");
            HttpResponse::InternalServerError()
                .json(serde_json::json!({"error": "Не удалось определить страницу"}))
        }
    }
}
