//! Database models shared across the repository layer.

#[cfg(feature = "server")]
pub mod auth;
pub mod config;
pub mod directory;
pub mod product;
pub mod review;
pub mod user;
