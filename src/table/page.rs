//! The page entity returned by every `…/data` endpoint.

use serde::{Deserialize, Serialize};

use crate::table::state::{SortDir, TableState};

#[derive(Debug, Clone, Serialize, Deserialize)]
/// One page of a filtered, sorted listing.
///
/// `sort_by`/`sort_dir` echo the state the page was produced for, so a
/// consumer holding newer state can recognize and drop a stale response.
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub limit: usize,
    pub total: usize,
    pub total_pages: usize,
    pub sort_by: String,
    pub sort_dir: SortDir,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: usize, state: &TableState) -> Self {
        Self {
            items,
            page: state.page,
            limit: state.limit,
            total,
            total_pages: total.div_ceil(state.limit.max(1)),
            sort_by: state.sort_by.clone(),
            sort_dir: state.sort_dir,
        }
    }

    pub fn empty(state: &TableState) -> Self {
        Self::new(Vec::new(), 0, state)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Pagination controls only make sense with more than one page.
    pub fn has_pagination(&self) -> bool {
        self.total_pages > 1
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            limit: self.limit,
            total: self.total,
            total_pages: self.total_pages,
            sort_by: self.sort_by,
            sort_dir: self.sort_dir,
        }
    }
}
