//! Form and JSON payload definitions backing the dashboard routes.

use thiserror::Error;
use validator::ValidationErrors;

pub mod auth;
pub mod directory;
pub mod product;
pub mod review;

#[derive(Debug, Error)]
/// Errors that can occur when processing form data.
pub enum FormError {
    #[error("validation errors: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("missing name")]
    MissingName,

    #[error("invalid ean")]
    InvalidEan,

    #[error("invalid upc")]
    InvalidUpc,
}
