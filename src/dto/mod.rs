//! DTO modules that bridge services with templates and APIs.

pub mod directory;
pub mod products;
pub mod reviews;
