use serde::{Deserialize, Serialize};

use crate::domain::rating::{RatingFields, derive_rating};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct Review {
    pub id: i32,
    pub product_id: i32,
    pub user_id: i32,
    pub importance: Option<i32>,
    pub source: Option<String>,
    pub text: Option<String>,
    pub advantages: Option<String>,
    pub disadvantages: Option<String>,
    pub raw_rating: Option<String>,
    pub rating: Option<f64>,
    pub max_rating: Option<f64>,
    pub normalized_rating: Option<i32>,
}

#[derive(Clone, Debug, Default, PartialEq)]
/// Raw review fields as they arrive from a form or an uploaded file,
/// before rating reconciliation and bounds checks.
pub struct ReviewDraft {
    pub importance: Option<i32>,
    pub source: Option<String>,
    pub text: Option<String>,
    pub advantages: Option<String>,
    pub disadvantages: Option<String>,
    pub raw_rating: Option<String>,
    pub rating: Option<f64>,
    pub max_rating: Option<f64>,
}

impl ReviewDraft {
    /// A row with no meaningful content. Importance alone does not count.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.source.as_deref().is_none_or(str::is_empty)
            && self.text.as_deref().is_none_or(str::is_empty)
            && self.advantages.as_deref().is_none_or(str::is_empty)
            && self.disadvantages.as_deref().is_none_or(str::is_empty)
            && self.raw_rating.as_deref().is_none_or(str::is_empty)
            && self.rating.is_none()
            && self.max_rating.is_none()
    }
}

struct NormalizedReview {
    importance: Option<i32>,
    source: Option<String>,
    text: Option<String>,
    advantages: Option<String>,
    disadvantages: Option<String>,
    rating: RatingFields,
}

/// Field-level problems are reported in Russian so they can go straight
/// into upload reports and flash messages.
fn validate_draft(draft: ReviewDraft) -> Result<NormalizedReview, Vec<String>> {
    let source = normalize(draft.source);
    let rating = derive_rating(draft.raw_rating, draft.rating, draft.max_rating);

    let mut problems = Vec::new();
    if let Some(importance) = draft.importance
        && importance < 1
    {
        problems.push("поле 'importance' — значение должно быть не меньше 1".to_string());
    }
    if let Some(source) = &source
        && source.chars().count() > 100
    {
        problems.push("поле 'source' — длина не должна превышать 100 символов".to_string());
    }
    if let Some(value) = rating.rating
        && value < 0.0
    {
        problems.push("поле 'rating' — значение должно быть не меньше 0".to_string());
    }
    if let Some(value) = rating.max_rating
        && value < 0.0
    {
        problems.push("поле 'max_rating' — значение должно быть не меньше 0".to_string());
    }
    if !(0..=100).contains(&rating.normalized_rating) {
        problems.push("поле 'normalized_rating' — значение должно быть от 0 до 100".to_string());
    }

    if !problems.is_empty() {
        return Err(problems);
    }

    Ok(NormalizedReview {
        importance: draft.importance,
        source,
        text: normalize(draft.text),
        advantages: normalize(draft.advantages),
        disadvantages: normalize(draft.disadvantages),
        rating,
    })
}

#[derive(Clone, Debug, Deserialize, Default)]
pub struct NewReview {
    pub product_id: i32,
    pub user_id: i32,
    pub importance: Option<i32>,
    pub source: Option<String>,
    pub text: Option<String>,
    pub advantages: Option<String>,
    pub disadvantages: Option<String>,
    pub raw_rating: Option<String>,
    pub rating: Option<f64>,
    pub max_rating: Option<f64>,
    pub normalized_rating: Option<i32>,
}

impl NewReview {
    /// Normalizes and checks a draft row. All field problems are reported
    /// at once.
    pub fn from_draft(
        product_id: i32,
        user_id: i32,
        draft: ReviewDraft,
    ) -> Result<Self, Vec<String>> {
        let normalized = validate_draft(draft)?;
        Ok(Self {
            product_id,
            user_id,
            importance: normalized.importance,
            source: normalized.source,
            text: normalized.text,
            advantages: normalized.advantages,
            disadvantages: normalized.disadvantages,
            raw_rating: normalized.rating.raw_rating,
            rating: normalized.rating.rating,
            max_rating: normalized.rating.max_rating,
            normalized_rating: Some(normalized.rating.normalized_rating),
        })
    }
}

#[derive(Clone, Debug, Deserialize, Default)]
pub struct UpdateReview {
    pub importance: Option<i32>,
    pub source: Option<String>,
    pub text: Option<String>,
    pub advantages: Option<String>,
    pub disadvantages: Option<String>,
    pub raw_rating: Option<String>,
    pub rating: Option<f64>,
    pub max_rating: Option<f64>,
    pub normalized_rating: Option<i32>,
}

impl UpdateReview {
    pub fn from_draft(draft: ReviewDraft) -> Result<Self, Vec<String>> {
        let normalized = validate_draft(draft)?;
        Ok(Self {
            importance: normalized.importance,
            source: normalized.source,
            text: normalized.text,
            advantages: normalized.advantages,
            disadvantages: normalized.disadvantages,
            raw_rating: normalized.rating.raw_rating,
            rating: normalized.rating.rating,
            max_rating: normalized.rating.max_rating,
            normalized_rating: Some(normalized.rating.normalized_rating),
        })
    }
}

fn normalize(value: Option<String>) -> Option<String> {
    value.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}
