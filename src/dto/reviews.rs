//! DTOs shaped for the analyze page and the review endpoints.

use serde::Serialize;

use crate::domain::directory::DirectoryEntry;
use crate::domain::product::Product;

/// Product and prompt picker of the analyze page. The review rows load
/// separately, so a listing failure can still render the page.
pub struct AnalyzePageData {
    pub product: Product,
    pub prompts: Vec<DirectoryEntry>,
}

/// Result of adding or editing a single review.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ReviewSaved {
    pub status: &'static str,
    pub id: i32,
}

impl ReviewSaved {
    #[must_use]
    pub fn new(id: i32) -> Self {
        Self { status: "ok", id }
    }
}

/// Result of deleting a single review.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ReviewDeleted {
    pub success: bool,
    pub deleted_id: i32,
}

/// Result of clearing every review of a product.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ReviewsCleared {
    pub status: &'static str,
    pub deleted: usize,
}

impl ReviewsCleared {
    #[must_use]
    pub fn new(deleted: usize) -> Self {
        Self {
            status: "ok",
            deleted,
        }
    }
}

/// Outcome of a review file upload, per-row errors included.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct UploadReport {
    pub status: &'static str,
    /// Rows that passed validation and were inserted.
    pub success_count: usize,
    /// Rows the file carried, valid or not.
    pub total_rows: usize,
    /// Rows skipped because no significant field was present.
    pub empty_rows: usize,
    pub errors: Vec<String>,
    /// Reviews the product has after the upload, within the caller's
    /// visibility.
    pub total: usize,
}

/// Result of running the review analysis.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AnalysisOutcome {
    pub result: String,
}
