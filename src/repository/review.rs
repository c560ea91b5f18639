//! Repository implementation for product reviews.

use diesel::prelude::*;

use crate::domain::review::{NewReview, Review, UpdateReview};
use crate::models::review::{
    NewReview as DbNewReview, Review as DbReview, UpdateReview as DbUpdateReview,
};
use crate::repository::errors::RepositoryResult;
use crate::repository::{DieselRepository, ReviewListQuery, ReviewReader, ReviewWriter};
use crate::table::SortDir;

impl ReviewReader for DieselRepository {
    fn get_review_by_id(&self, id: i32) -> RepositoryResult<Option<Review>> {
        use crate::schema::reviews;

        let mut conn = self.conn()?;
        let review = reviews::table
            .find(id)
            .first::<DbReview>(&mut conn)
            .optional()?;

        Ok(review.map(Into::into))
    }

    fn list_reviews(&self, query: ReviewListQuery) -> RepositoryResult<(usize, Vec<Review>)> {
        use crate::schema::reviews;

        let mut conn = self.conn()?;

        let query_builder = || {
            let mut q = reviews::table
                .filter(reviews::product_id.eq(query.product_id))
                .into_boxed::<diesel::sqlite::Sqlite>();

            if let Some(user_id) = query.user_id {
                q = q.filter(reviews::user_id.eq(user_id));
            }
            if let Some(importance) = query.importance {
                q = q.filter(reviews::importance.eq(importance));
            }
            if let Some(source) = &query.source {
                q = q.filter(reviews::source.like(format!("%{source}%")));
            }
            if let Some(text) = &query.text {
                q = q.filter(reviews::text.like(format!("%{text}%")));
            }
            if let Some(advantages) = &query.advantages {
                q = q.filter(reviews::advantages.like(format!("%{advantages}%")));
            }
            if let Some(disadvantages) = &query.disadvantages {
                q = q.filter(reviews::disadvantages.like(format!("%{disadvantages}%")));
            }
            if let Some(min) = query.rating_min {
                q = q.filter(reviews::normalized_rating.ge(min));
            }
            if let Some(max) = query.rating_max {
                q = q.filter(reviews::normalized_rating.le(max));
            }
            q
        };

        let total = query_builder().count().get_result::<i64>(&mut conn)? as usize;

        let mut items = query_builder();
        if let Some(pagination) = &query.pagination {
            let offset = ((pagination.page.max(1) - 1) * pagination.per_page) as i64;
            items = items.offset(offset).limit(pagination.per_page as i64);
        }

        let items = match (query.sort_by.as_str(), query.sort_dir) {
            ("importance", SortDir::Asc) => items.order(reviews::importance.asc()),
            ("importance", SortDir::Desc) => items.order(reviews::importance.desc()),
            ("source", SortDir::Asc) => items.order(reviews::source.asc()),
            ("source", SortDir::Desc) => items.order(reviews::source.desc()),
            ("text", SortDir::Asc) => items.order(reviews::text.asc()),
            ("text", SortDir::Desc) => items.order(reviews::text.desc()),
            ("advantages", SortDir::Asc) => items.order(reviews::advantages.asc()),
            ("advantages", SortDir::Desc) => items.order(reviews::advantages.desc()),
            ("disadvantages", SortDir::Asc) => items.order(reviews::disadvantages.asc()),
            ("disadvantages", SortDir::Desc) => items.order(reviews::disadvantages.desc()),
            ("normalized_rating", SortDir::Asc) => items.order(reviews::normalized_rating.asc()),
            ("normalized_rating", SortDir::Desc) => items.order(reviews::normalized_rating.desc()),
            (_, SortDir::Asc) => items.order(reviews::id.asc()),
            (_, SortDir::Desc) => items.order(reviews::id.desc()),
        };

        let reviews = items
            .load::<DbReview>(&mut conn)?
            .into_iter()
            .map(Into::into)
            .collect();

        Ok((total, reviews))
    }
}

impl ReviewWriter for DieselRepository {
    fn create_review(&self, new_review: &NewReview) -> RepositoryResult<Review> {
        use crate::schema::reviews;

        let mut conn = self.conn()?;
        let db_new_review: DbNewReview = new_review.into();

        let review = diesel::insert_into(reviews::table)
            .values(&db_new_review)
            .get_result::<DbReview>(&mut conn)?;

        Ok(review.into())
    }

    fn create_reviews(&self, new_reviews: &[NewReview]) -> RepositoryResult<usize> {
        use crate::schema::reviews;

        let mut conn = self.conn()?;
        let insertables: Vec<DbNewReview> = new_reviews.iter().map(Into::into).collect();

        let affected = diesel::insert_into(reviews::table)
            .values(&insertables)
            .execute(&mut conn)?;

        Ok(affected)
    }

    fn update_review(&self, review_id: i32, updates: &UpdateReview) -> RepositoryResult<Review> {
        use crate::schema::reviews;

        let mut conn = self.conn()?;
        let db_updates: DbUpdateReview = updates.into();

        let review = diesel::update(reviews::table.find(review_id))
            .set(&db_updates)
            .get_result::<DbReview>(&mut conn)?;

        Ok(review.into())
    }

    fn delete_review(&self, review_id: i32) -> RepositoryResult<()> {
        use crate::schema::reviews;

        let mut conn = self.conn()?;
        diesel::delete(reviews::table.find(review_id)).execute(&mut conn)?;
        Ok(())
    }

    fn delete_reviews_for_product(
        &self,
        product_id: i32,
        user_id: Option<i32>,
    ) -> RepositoryResult<usize> {
        use crate::schema::reviews;

        let mut conn = self.conn()?;
        let affected = match user_id {
            Some(user_id) => diesel::delete(
                reviews::table
                    .filter(reviews::product_id.eq(product_id))
                    .filter(reviews::user_id.eq(user_id)),
            )
            .execute(&mut conn)?,
            None => diesel::delete(reviews::table.filter(reviews::product_id.eq(product_id)))
                .execute(&mut conn)?,
        };

        Ok(affected)
    }
}
