use actix_multipart::form::{MultipartForm, tempfile::TempFile};
use serde::Deserialize;

use crate::domain::review::ReviewDraft;

#[derive(Deserialize, Default)]
/// JSON payload for adding or editing a single review.
pub struct ReviewForm {
    pub importance: Option<i32>,
    pub source: Option<String>,
    pub text: Option<String>,
    pub advantages: Option<String>,
    pub disadvantages: Option<String>,
    pub raw_rating: Option<String>,
    pub rating: Option<f64>,
    pub max_rating: Option<f64>,
}

impl From<ReviewForm> for ReviewDraft {
    fn from(form: ReviewForm) -> Self {
        Self {
            importance: form.importance,
            source: form.source,
            text: form.text,
            advantages: form.advantages,
            disadvantages: form.disadvantages,
            raw_rating: form.raw_rating,
            rating: form.rating,
            max_rating: form.max_rating,
        }
    }
}

#[derive(MultipartForm)]
/// Review file upload, CSV or JSON.
pub struct UploadReviewsForm {
    #[multipart(limit = "10MB")]
    pub file: TempFile,
}

#[derive(Deserialize, Default)]
/// JSON payload of an analysis run: the chosen prompt plus the review
/// filters active on the page. Zero and empty string mean "no filter".
pub struct AnalyzeForm {
    pub prompt_id: Option<i32>,
    pub importance: Option<i32>,
    pub source: Option<String>,
    pub text: Option<String>,
    pub advantages: Option<String>,
    pub disadvantages: Option<String>,
    pub normalized_rating_min: Option<i32>,
    pub normalized_rating_max: Option<i32>,
}
