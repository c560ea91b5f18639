use diesel::prelude::*;

use crate::domain::review::{
    NewReview as DomainNewReview, Review as DomainReview, UpdateReview as DomainUpdateReview,
};
use crate::models::product::Product;

#[derive(Debug, Clone, Identifiable, Queryable, Associations)]
#[diesel(belongs_to(Product, foreign_key = product_id))]
#[diesel(table_name = crate::schema::reviews)]
/// Diesel model for [`crate::domain::review::Review`].
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

#[derive(Insertable)]
#[diesel(table_name = crate::schema::reviews)]
/// Insertable form of [`Review`]. Uploads insert these in bulk.
pub struct NewReview<'a> {
    pub product_id: i32,
    pub user_id: i32,
    pub importance: Option<i32>,
    pub source: Option<&'a str>,
    pub text: Option<&'a str>,
    pub advantages: Option<&'a str>,
    pub disadvantages: Option<&'a str>,
    pub raw_rating: Option<&'a str>,
    pub rating: Option<f64>,
    pub max_rating: Option<f64>,
    pub normalized_rating: Option<i32>,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::reviews)]
#[diesel(treat_none_as_null = true)]
/// Data used when updating a [`Review`] record.
pub struct UpdateReview<'a> {
    pub importance: Option<i32>,
    pub source: Option<&'a str>,
    pub text: Option<&'a str>,
    pub advantages: Option<&'a str>,
    pub disadvantages: Option<&'a str>,
    pub raw_rating: Option<&'a str>,
    pub rating: Option<f64>,
    pub max_rating: Option<f64>,
    pub normalized_rating: Option<i32>,
}

impl From<Review> for DomainReview {
    fn from(review: Review) -> Self {
        Self {
            id: review.id,
            product_id: review.product_id,
            user_id: review.user_id,
            importance: review.importance,
            source: review.source,
            text: review.text,
            advantages: review.advantages,
            disadvantages: review.disadvantages,
            raw_rating: review.raw_rating,
            rating: review.rating,
            max_rating: review.max_rating,
            normalized_rating: review.normalized_rating,
        }
    }
}

impl<'a> From<&'a DomainNewReview> for NewReview<'a> {
    fn from(review: &'a DomainNewReview) -> Self {
        Self {
            product_id: review.product_id,
            user_id: review.user_id,
            importance: review.importance,
            source: review.source.as_deref(),
            text: review.text.as_deref(),
            advantages: review.advantages.as_deref(),
            disadvantages: review.disadvantages.as_deref(),
            raw_rating: review.raw_rating.as_deref(),
            rating: review.rating,
            max_rating: review.max_rating,
            normalized_rating: review.normalized_rating,
        }
    }
}

impl<'a> From<&'a DomainUpdateReview> for UpdateReview<'a> {
    fn from(review: &'a DomainUpdateReview) -> Self {
        Self {
            importance: review.importance,
            source: review.source.as_deref(),
            text: review.text.as_deref(),
            advantages: review.advantages.as_deref(),
            disadvantages: review.disadvantages.as_deref(),
            raw_rating: review.raw_rating.as_deref(),
            rating: review.rating,
            max_rating: review.max_rating,
            normalized_rating: review.normalized_rating,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::review::ReviewDraft;

    #[test]
    fn from_domain_newreview() {
        let draft = ReviewDraft {
            source: Some("ozon".to_string()),
            text: Some("Хороший сок".to_string()),
            raw_rating: Some("4/5".to_string()),
            ..ReviewDraft::default()
        };
        let domain = DomainNewReview::from_draft(7, 2, draft).expect("valid draft");
        let new: NewReview = (&domain).into();
        assert_eq!(new.product_id, 7);
        assert_eq!(new.user_id, 2);
        assert_eq!(new.source, Some("ozon"));
        assert_eq!(new.normalized_rating, Some(80));
    }
}
