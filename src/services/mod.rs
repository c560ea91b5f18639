//! Application services between HTTP handlers and the repository layer.
//!
//! Services are free functions generic over the repository traits they
//! need, so unit tests can drive them with mocks. Handlers translate
//! [`ServiceError`] values into flash messages, redirects or JSON error
//! bodies.

use thiserror::Error;

use crate::models::auth::AuthenticatedUser;
use crate::repository::errors::RepositoryError;

pub mod auth;
pub mod directory;
pub mod products;
pub mod reviews;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Not found")]
    NotFound,

    #[error("{0}")]
    Form(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Rows visible to the user: everything for a superuser, own rows
/// otherwise.
#[must_use]
pub fn visibility_scope(user: &AuthenticatedUser) -> Option<i32> {
    if user.is_superuser {
        None
    } else {
        Some(user.user_id)
    }
}

/// Whether the user may modify an object owned by `owner_id`.
#[must_use]
pub fn owns(user: &AuthenticatedUser, owner_id: i32) -> bool {
    user.is_superuser || user.user_id == owner_id
}
