#[cfg(feature = "server")]
use actix_cors::Cors;
#[cfg(feature = "server")]
use actix_files::Files;
#[cfg(feature = "server")]
use actix_web::cookie::Key;
#[cfg(feature = "server")]
use actix_web::{App, HttpServer, middleware as actix_middleware, web};
#[cfg(feature = "server")]
use actix_web_flash_messages::{FlashMessagesFramework, storage::CookieMessageStore};
#[cfg(feature = "server")]
use tera::Tera;

#[cfg(feature = "server")]
use crate::db::establish_connection_pool;
#[cfg(feature = "server")]
use crate::middleware::RedirectUnauthorized;
#[cfg(feature = "server")]
use crate::models::config::ServerConfig;
#[cfg(feature = "server")]
use crate::repository::DieselRepository;
#[cfg(feature = "server")]
use crate::routes::TableViews;
#[cfg(feature = "server")]
use crate::routes::auth::{login, login_page, logout, register, register_page};
#[cfg(feature = "server")]
use crate::routes::directory::{
    create_entry, delete_entry, directory_page, edit_entry_form, new_entry_form, update_entry,
};
#[cfg(feature = "server")]
use crate::routes::main::{dashboard, dashboard_data, highlight_page, index};
#[cfg(feature = "server")]
use crate::routes::products::{
    delete_image, delete_product, edit_product_form, new_product_form, save_product,
    upload_gallery_image,
};
#[cfg(feature = "server")]
use crate::routes::reviews::{
    add_review, analyze, analyze_data, analyze_page, clear_reviews, delete_review, update_review,
    upload_reviews,
};

#[cfg(feature = "server")]
pub mod csrf;
pub mod db;
pub mod domain;
pub mod dto;
#[cfg(feature = "server")]
pub mod forms;
#[cfg(feature = "server")]
pub mod middleware;
pub mod models;
pub mod pagination;
pub mod repository;
#[cfg(feature = "server")]
pub mod routes;
pub mod schema;
#[cfg(feature = "server")]
pub mod services;
pub mod table;

/// Builds and runs the Actix-Web HTTP server using the provided configuration.
#[cfg(feature = "server")]
pub async fn run(server_config: ServerConfig) -> std::io::Result<()> {
    let table_views = TableViews::build()
        .map_err(|e| std::io::Error::other(format!("Invalid table view: {e}")))?;

    std::fs::create_dir_all(&server_config.upload_dir)?;

    // Establish Diesel connection pool for the SQLite database.
    let pool = establish_connection_pool(&server_config.database_url).map_err(|e| {
        std::io::Error::other(format!("Failed to establish database connection: {e}"))
    })?;

    let repo = DieselRepository::new(pool);

    // Key and store for flash messages.
    let secret_key = Key::from(server_config.secret.as_bytes());

    let message_store = CookieMessageStore::builder(secret_key).build();
    let message_framework = FlashMessagesFramework::builder(message_store).build();

    let tera = Tera::new(&server_config.templates_dir)
        .map_err(|e| std::io::Error::other(format!("Template parsing error(s): {e}")))?;

    let bind_address = (server_config.address.clone(), server_config.port);

    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .wrap(message_framework.clone())
            .wrap(actix_middleware::Compress::default())
            .wrap(actix_middleware::Logger::default())
            .service(Files::new("/assets", "./assets"))
            .service(Files::new("/uploads", server_config.upload_dir.clone()))
            .service(index)
            .service(login_page)
            .service(login)
            .service(register_page)
            .service(register)
            .service(logout)
            .service(
                web::scope("")
                    .wrap(RedirectUnauthorized)
                    .service(dashboard)
                    .service(dashboard_data)
                    .service(highlight_page)
                    // Fixed path segments register ahead of the `{product_id}`
                    // routes they would otherwise match into.
                    .service(new_product_form)
                    .service(edit_product_form)
                    .service(save_product)
                    .service(delete_product)
                    .service(upload_gallery_image)
                    .service(delete_image)
                    .service(analyze_data)
                    .service(analyze_page)
                    .service(add_review)
                    .service(update_review)
                    .service(delete_review)
                    .service(clear_reviews)
                    .service(upload_reviews)
                    .service(analyze)
                    .service(directory_page)
                    .service(new_entry_form)
                    .service(edit_entry_form)
                    .service(create_entry)
                    .service(update_entry)
                    .service(delete_entry),
            )
            .app_data(web::Data::new(tera.clone()))
            .app_data(web::Data::new(repo.clone()))
            .app_data(web::Data::new(table_views.clone()))
            .app_data(web::Data::new(server_config.clone()))
    })
    .bind(bind_address)?
    .run()
    .await
}
