//! Domain aggregates exposed by the service layer.

pub mod directory;
pub mod product;
pub mod rating;
pub mod review;
pub mod user;
