use crate::db::{DbConnection, DbPool};
use crate::domain::directory::{
    DirectoryEntry, DirectoryKind, NewDirectoryEntry, UpdateDirectoryEntry,
};
use crate::domain::product::{
    NewProduct, NewProductImage, Product, ProductImage, ProductListItem, UpdateProduct,
};
use crate::domain::review::{NewReview, Review, UpdateReview};
use crate::domain::user::{NewUser, User};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::table::{SortDir, TableState};

pub mod directory;
pub mod errors;
#[cfg(feature = "test-mocks")]
pub mod mock;
pub mod product;
pub mod review;
pub mod user;

/// Diesel-backed repository over an r2d2 SQLite pool.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool,
}

impl DieselRepository {
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub(crate) fn conn(&self) -> Result<DbConnection, RepositoryError> {
        self.pool.get().map_err(RepositoryError::from)
    }
}

#[derive(Debug, Clone)]
pub struct Pagination {
    pub page: usize,
    pub per_page: usize,
}

/// Filter over a nullable reference column: a concrete id or the rows
/// where the reference is unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefFilter {
    Id(i32),
    IsNull,
}

impl RefFilter {
    /// Parses a query parameter value: `"null"` selects unassigned rows,
    /// a number selects an exact id, anything else is ignored.
    pub fn from_param(value: &str) -> Option<Self> {
        if value.eq_ignore_ascii_case("null") {
            Some(RefFilter::IsNull)
        } else {
            value.trim().parse().ok().map(RefFilter::Id)
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProductListQuery {
    /// Restrict to one owner. `None` means all rows (superuser view).
    pub user_id: Option<i32>,
    pub name: Option<String>,
    pub ean: Option<String>,
    pub upc: Option<String>,
    pub brand: Option<RefFilter>,
    pub category: Option<RefFilter>,
    pub sort_by: String,
    pub sort_dir: SortDir,
    pub pagination: Option<Pagination>,
}

impl ProductListQuery {
    pub fn new() -> Self {
        Self {
            user_id: None,
            name: None,
            ean: None,
            upc: None,
            brand: None,
            category: None,
            sort_by: crate::table::DEFAULT_SORT_FIELD.to_string(),
            sort_dir: SortDir::default(),
            pagination: None,
        }
    }

    /// Builds the query the dashboard table state describes, pagination
    /// included.
    pub fn from_state(state: &TableState) -> Self {
        Self {
            user_id: None,
            name: state.filters.get("name").cloned(),
            ean: state.filters.get("ean").cloned(),
            upc: state.filters.get("upc").cloned(),
            brand: state
                .filters
                .get("brand_id")
                .and_then(|v| RefFilter::from_param(v)),
            category: state
                .filters
                .get("category_id")
                .and_then(|v| RefFilter::from_param(v)),
            sort_by: state.sort_by.clone(),
            sort_dir: state.sort_dir,
            pagination: Some(Pagination {
                page: state.page,
                per_page: state.limit,
            }),
        }
    }

    pub fn owner(mut self, user_id: i32) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }

    /// Drops pagination so the whole ordered listing comes back.
    pub fn unpaged(mut self) -> Self {
        self.pagination = None;
        self
    }
}

impl Default for ProductListQuery {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone)]
pub struct ReviewListQuery {
    pub product_id: i32,
    /// Restrict to one owner. `None` means all rows (superuser view).
    pub user_id: Option<i32>,
    pub importance: Option<i32>,
    pub source: Option<String>,
    pub text: Option<String>,
    pub advantages: Option<String>,
    pub disadvantages: Option<String>,
    /// Inclusive bounds on `normalized_rating`.
    pub rating_min: Option<i32>,
    pub rating_max: Option<i32>,
    pub sort_by: String,
    pub sort_dir: SortDir,
    pub pagination: Option<Pagination>,
}

impl ReviewListQuery {
    pub fn new(product_id: i32) -> Self {
        Self {
            product_id,
            user_id: None,
            importance: None,
            source: None,
            text: None,
            advantages: None,
            disadvantages: None,
            rating_min: None,
            rating_max: None,
            sort_by: crate::table::DEFAULT_SORT_FIELD.to_string(),
            sort_dir: SortDir::default(),
            pagination: None,
        }
    }

    pub fn from_state(product_id: i32, state: &TableState) -> Self {
        let int = |key: &str| {
            state
                .filters
                .get(key)
                .and_then(|v| v.trim().parse::<i32>().ok())
        };
        Self {
            product_id,
            user_id: None,
            importance: int("importance"),
            source: state.filters.get("source").cloned(),
            text: state.filters.get("text").cloned(),
            advantages: state.filters.get("advantages").cloned(),
            disadvantages: state.filters.get("disadvantages").cloned(),
            rating_min: int("normalized_rating_min"),
            rating_max: int("normalized_rating_max"),
            sort_by: state.sort_by.clone(),
            sort_dir: state.sort_dir,
            pagination: Some(Pagination {
                page: state.page,
                per_page: state.limit,
            }),
        }
    }

    pub fn owner(mut self, user_id: i32) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }

    pub fn unpaged(mut self) -> Self {
        self.pagination = None;
        self
    }
}

pub trait UserReader {
    fn get_user_by_id(&self, id: i32) -> RepositoryResult<Option<User>>;
    fn get_user_by_username(&self, username: &str) -> RepositoryResult<Option<User>>;
}

pub trait UserWriter {
    fn create_user(&self, new_user: &NewUser) -> RepositoryResult<User>;
}

pub trait ProductReader {
    fn get_product_by_id(&self, id: i32) -> RepositoryResult<Option<Product>>;
    fn list_products(
        &self,
        query: ProductListQuery,
    ) -> RepositoryResult<(usize, Vec<ProductListItem>)>;
    /// 0-based position of a product in the full ordered listing the
    /// query describes, pagination ignored.
    fn product_position(
        &self,
        product_id: i32,
        query: ProductListQuery,
    ) -> RepositoryResult<Option<usize>>;
    fn list_product_images(&self, product_id: i32) -> RepositoryResult<Vec<ProductImage>>;
    fn get_product_image(&self, image_id: i32) -> RepositoryResult<Option<ProductImage>>;
}

pub trait ProductWriter {
    fn create_product(&self, new_product: &NewProduct) -> RepositoryResult<Product>;
    fn update_product(
        &self,
        product_id: i32,
        updates: &UpdateProduct,
    ) -> RepositoryResult<Product>;
    fn delete_product(&self, product_id: i32) -> RepositoryResult<()>;
    fn set_analysis_result(&self, product_id: i32, analysis: &str) -> RepositoryResult<()>;
    fn add_product_image(&self, new_image: &NewProductImage) -> RepositoryResult<ProductImage>;
    /// Inserts the image as the main one, demoting any current main
    /// image of the product in the same transaction.
    fn replace_main_image(&self, new_image: &NewProductImage) -> RepositoryResult<ProductImage>;
    fn delete_product_image(&self, image_id: i32) -> RepositoryResult<()>;
}

pub trait ReviewReader {
    fn get_review_by_id(&self, id: i32) -> RepositoryResult<Option<Review>>;
    fn list_reviews(&self, query: ReviewListQuery) -> RepositoryResult<(usize, Vec<Review>)>;
}

pub trait ReviewWriter {
    fn create_review(&self, new_review: &NewReview) -> RepositoryResult<Review>;
    fn create_reviews(&self, new_reviews: &[NewReview]) -> RepositoryResult<usize>;
    fn update_review(&self, review_id: i32, updates: &UpdateReview) -> RepositoryResult<Review>;
    fn delete_review(&self, review_id: i32) -> RepositoryResult<()>;
    /// Deletes the product's reviews, either one owner's or everyone's.
    fn delete_reviews_for_product(
        &self,
        product_id: i32,
        user_id: Option<i32>,
    ) -> RepositoryResult<usize>;
}

pub trait DirectoryReader {
    fn get_directory_entry(
        &self,
        kind: DirectoryKind,
        id: i32,
    ) -> RepositoryResult<Option<DirectoryEntry>>;
    /// Entries ordered by name. `user_id = None` lists all owners.
    fn list_directory_entries(
        &self,
        kind: DirectoryKind,
        user_id: Option<i32>,
    ) -> RepositoryResult<Vec<DirectoryEntry>>;
}

pub trait DirectoryWriter {
    fn create_directory_entry(
        &self,
        kind: DirectoryKind,
        new_entry: &NewDirectoryEntry,
    ) -> RepositoryResult<DirectoryEntry>;
    fn update_directory_entry(
        &self,
        kind: DirectoryKind,
        id: i32,
        updates: &UpdateDirectoryEntry,
    ) -> RepositoryResult<DirectoryEntry>;
    fn delete_directory_entry(&self, kind: DirectoryKind, id: i32) -> RepositoryResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::TableDefaults;

    #[test]
    fn ref_filter_parses_ids_and_null() {
        assert_eq!(RefFilter::from_param("7"), Some(RefFilter::Id(7)));
        assert_eq!(RefFilter::from_param(" 12 "), Some(RefFilter::Id(12)));
        assert_eq!(RefFilter::from_param("null"), Some(RefFilter::IsNull));
        assert_eq!(RefFilter::from_param("NULL"), Some(RefFilter::IsNull));
        assert_eq!(RefFilter::from_param("sony"), None);
    }

    #[test]
    fn product_query_from_state() {
        let defaults = TableDefaults::new()
            .filter_keys(&["name", "ean", "upc", "brand_id", "category_id"]);
        let state = TableState::from_query_str(
            defaults,
            "name=%D0%A1%D0%BE%D0%BA&brand_id=null&sort_by=name&sort_dir=desc&page=2",
        );

        let query = ProductListQuery::from_state(&state).owner(3);
        assert_eq!(query.user_id, Some(3));
        assert_eq!(query.name.as_deref(), Some("Сок"));
        assert_eq!(query.brand, Some(RefFilter::IsNull));
        assert_eq!(query.category, None);
        assert_eq!(query.sort_by, "name");
        assert_eq!(query.sort_dir, SortDir::Desc);
        let pagination = query.pagination.clone().expect("paginated");
        assert_eq!(pagination.page, 2);
        assert_eq!(pagination.per_page, 10);

        assert!(query.unpaged().pagination.is_none());
    }

    #[test]
    fn review_query_from_state() {
        let defaults = TableDefaults::new().filter_keys(&[
            "importance",
            "source",
            "text",
            "normalized_rating_min",
            "normalized_rating_max",
        ]);
        let state = TableState::from_query_str(
            defaults,
            "importance=2&source=wb&normalized_rating_min=40&normalized_rating_max=oops",
        );

        let query = ReviewListQuery::from_state(5, &state).owner(4);
        assert_eq!(query.product_id, 5);
        assert_eq!(query.user_id, Some(4));
        assert_eq!(query.importance, Some(2));
        assert_eq!(query.source.as_deref(), Some("wb"));
        assert_eq!(query.rating_min, Some(40));
        assert_eq!(query.rating_max, None);
    }
}
