//! List-view state handling shared by every table on the site.
//!
//! A [`TableState`] is the single source of truth for one rendered table:
//! current page, page size, sort order and active filters. Handlers restore
//! it from the request query string, mutate it through the operations below
//! and serialize it back into URLs, so the address bar, the filter controls
//! and the rendered rows can never disagree.

pub mod config;
pub mod page;
pub mod state;

pub use config::{TableConfig, TableConfigError};
pub use page::Page;
pub use state::{DEFAULT_PAGE_LIMIT, DEFAULT_SORT_FIELD, SortDir, StateChange, TableDefaults, TableState};
