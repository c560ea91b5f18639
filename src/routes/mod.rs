//! HTTP handlers and the template/redirect helpers they share.

use std::collections::BTreeMap;

use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse};
use actix_web_flash_messages::{IncomingFlashMessages, Level};
use serde::Serialize;
use tera::{Context, Tera};

use crate::csrf;
use crate::models::auth::AuthenticatedUser;
use crate::pagination::page_window;
use crate::table::{TableConfig, TableConfigError, TableState};

pub mod auth;
pub mod directory;
pub mod main;
pub mod products;
pub mod reviews;

/// Body of every 403 answer on object access.
pub(crate) const ACCESS_DENIED_DETAIL: &str = "Недостаточно прав для доступа к этому ресурсу.";

#[derive(Clone)]
/// Table views of the site, each validated once at startup.
pub struct TableViews {
    pub dashboard: TableConfig,
    pub reviews: TableConfig,
}

impl TableViews {
    pub fn build() -> Result<Self, TableConfigError> {
        Ok(Self {
            dashboard: main::dashboard_table()?,
            reviews: reviews::review_table()?,
        })
    }
}

/// Inserts the static description of the view its script reads: where to
/// fetch data and which elements to render into.
pub(crate) fn insert_table_view(context: &mut Context, config: &TableConfig) {
    context.insert("row_target", &config.row_target);
    context.insert("card_target", &config.card_target);
}

/// Maps a flash level onto the alert class templates use.
#[must_use]
pub fn alert_level_to_str(level: &Level) -> &'static str {
    match level {
        Level::Debug => "secondary",
        Level::Info => "info",
        Level::Success => "success",
        Level::Warning => "warning",
        Level::Error => "danger",
    }
}

/// Context every page starts from: flash alerts, the signed-in user and
/// the active menu item.
pub(crate) fn base_context(
    flash_messages: &IncomingFlashMessages,
    user: &AuthenticatedUser,
    active_menu: &str,
) -> Context {
    let alerts: Vec<(&'static str, &str)> = flash_messages
        .iter()
        .map(|message| (alert_level_to_str(&message.level()), message.content()))
        .collect();

    let mut context = Context::new();
    context.insert("alerts", &alerts);
    context.insert("user", user);
    context.insert("active_menu", active_menu);
    context
}

/// Appends an alert to a context built by [`base_context`], for errors
/// that surface while the page itself is being assembled.
pub(crate) fn add_alert(context: &mut Context, level: &'static str, message: &str) {
    let mut alerts: Vec<(String, String)> = context
        .get("alerts")
        .and_then(|value| serde_json::from_value(value.clone()).ok())
        .unwrap_or_default();
    alerts.push((level.to_string(), message.to_string()));
    context.insert("alerts", &alerts);
}

/// Renders a page and attaches the CSRF cookie scripts echo back through
/// the `X-CSRF-Token` header. An existing cookie value is kept.
pub(crate) fn render_template(
    req: &HttpRequest,
    tera: &Tera,
    template_name: &str,
    context: &Context,
) -> HttpResponse {
    let token = match req.cookie(csrf::CSRF_COOKIE) {
        Some(cookie) if !cookie.value().is_empty() => cookie.value().to_string(),
        _ => csrf::generate_token(),
    };

    match tera.render(template_name, context) {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .cookie(csrf::csrf_cookie(&token))
            .body(body),
        Err(err) => {
            log::error!("Failed to render template {template_name}: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// 303 redirect browser form flows expect.
pub(crate) fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// URL of the listing with the state moved to the given page, reduced to
/// non-default parameters.
pub(crate) fn page_url(state: &TableState, base: &str, page: usize) -> String {
    let mut state = state.clone();
    state.set_page(page);
    state_url(&state, base)
}

/// URL of the listing for the given state, reduced to non-default
/// parameters.
pub(crate) fn state_url(state: &TableState, base: &str) -> String {
    let query = state.non_default_query_string();
    if query.is_empty() {
        base.to_string()
    } else {
        format!("{base}?{query}")
    }
}

/// Per-column sort links, keyed by field: clicking a header toggles
/// direction on the current column and starts ascending on a new one,
/// back on page 1.
pub(crate) fn sort_links(
    state: &TableState,
    base: &str,
    fields: &[impl AsRef<str>],
) -> BTreeMap<String, String> {
    fields
        .iter()
        .map(|field| {
            let field = field.as_ref();
            let mut toggled = state.clone();
            toggled.toggle_sort(field);
            (field.to_string(), state_url(&toggled, base))
        })
        .collect()
}

#[derive(Serialize)]
/// Pagination block of a listing page: the numbered window plus
/// prev/next, each entry already carrying its URL.
pub(crate) struct PageNav {
    pub pages: Vec<Option<(usize, String)>>,
    pub prev: Option<String>,
    pub next: Option<String>,
    pub current: usize,
    pub total_pages: usize,
}

pub(crate) fn page_nav(
    state: &TableState,
    base: &str,
    current: usize,
    total_pages: usize,
) -> PageNav {
    let pages = page_window(current, total_pages)
        .into_iter()
        .map(|page| page.map(|n| (n, page_url(state, base, n))))
        .collect();

    PageNav {
        pages,
        prev: (current > 1).then(|| page_url(state, base, current - 1)),
        next: (current < total_pages).then(|| page_url(state, base, current + 1)),
        current,
        total_pages,
    }
}

/// Inserts the pieces of the table state templates render: current
/// filters, sort, limit and the canonical URL of the state itself.
pub(crate) fn insert_table_state(context: &mut Context, state: &TableState, base: &str) {
    context.insert("filters", &state.filters);
    // Pinned filters sit in `filters` too, so "any filter active" has to
    // ignore them.
    let filters_active = state
        .filters
        .iter()
        .any(|(key, value)| state.defaults().filters.get(key) != Some(value));
    context.insert("filters_active", &filters_active);
    context.insert("page", &state.page);
    context.insert("limit", &state.limit);
    context.insert("sort_by", &state.sort_by);
    context.insert("sort_dir", state.sort_dir.as_str());
    context.insert("state_url", &state_url(state, base));
    // Non-default query alone, for links that carry the state elsewhere.
    context.insert("state_query", &state.non_default_query_string());
    let mut reset = state.clone();
    reset.reset_sort();
    context.insert("reset_sort_url", &state_url(&reset, base));
}
