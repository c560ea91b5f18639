//! Mock repository implementations for isolating services in tests.

use mockall::mock;

use crate::domain::directory::{
    DirectoryEntry, DirectoryKind, NewDirectoryEntry, UpdateDirectoryEntry,
};
use crate::domain::product::{
    NewProduct, NewProductImage, Product, ProductImage, ProductListItem, UpdateProduct,
};
use crate::domain::review::{NewReview, Review, UpdateReview};
use crate::domain::user::{NewUser, User};
use crate::repository::errors::RepositoryResult;
use crate::repository::{
    DirectoryReader, DirectoryWriter, ProductListQuery, ProductReader, ProductWriter,
    ReviewListQuery, ReviewReader, ReviewWriter, UserReader, UserWriter,
};

mock! {
    pub Repository {}

    impl UserReader for Repository {
        fn get_user_by_id(&self, id: i32) -> RepositoryResult<Option<User>>;
        fn get_user_by_username(&self, username: &str) -> RepositoryResult<Option<User>>;
    }

    impl UserWriter for Repository {
        fn create_user(&self, new_user: &NewUser) -> RepositoryResult<User>;
    }

    impl ProductReader for Repository {
        fn get_product_by_id(&self, id: i32) -> RepositoryResult<Option<Product>>;
        fn list_products(
            &self,
            query: ProductListQuery,
        ) -> RepositoryResult<(usize, Vec<ProductListItem>)>;
        fn product_position(
            &self,
            product_id: i32,
            query: ProductListQuery,
        ) -> RepositoryResult<Option<usize>>;
        fn list_product_images(&self, product_id: i32) -> RepositoryResult<Vec<ProductImage>>;
        fn get_product_image(&self, image_id: i32) -> RepositoryResult<Option<ProductImage>>;
    }

    impl ProductWriter for Repository {
        fn create_product(&self, new_product: &NewProduct) -> RepositoryResult<Product>;
        fn update_product(
            &self,
            product_id: i32,
            updates: &UpdateProduct,
        ) -> RepositoryResult<Product>;
        fn delete_product(&self, product_id: i32) -> RepositoryResult<()>;
        fn set_analysis_result(&self, product_id: i32, analysis: &str) -> RepositoryResult<()>;
        fn add_product_image(&self, new_image: &NewProductImage) -> RepositoryResult<ProductImage>;
        fn replace_main_image(&self, new_image: &NewProductImage) -> RepositoryResult<ProductImage>;
        fn delete_product_image(&self, image_id: i32) -> RepositoryResult<()>;
    }

    impl ReviewReader for Repository {
        fn get_review_by_id(&self, id: i32) -> RepositoryResult<Option<Review>>;
        fn list_reviews(&self, query: ReviewListQuery) -> RepositoryResult<(usize, Vec<Review>)>;
    }

    impl ReviewWriter for Repository {
        fn create_review(&self, new_review: &NewReview) -> RepositoryResult<Review>;
        fn create_reviews(&self, new_reviews: &[NewReview]) -> RepositoryResult<usize>;
        fn update_review(
            &self,
            review_id: i32,
            updates: &UpdateReview,
        ) -> RepositoryResult<Review>;
        fn delete_review(&self, review_id: i32) -> RepositoryResult<()>;
        fn delete_reviews_for_product(
            &self,
            product_id: i32,
            user_id: Option<i32>,
        ) -> RepositoryResult<usize>;
    }

    impl DirectoryReader for Repository {
        fn get_directory_entry(
            &self,
            kind: DirectoryKind,
            id: i32,
        ) -> RepositoryResult<Option<DirectoryEntry>>;
        fn list_directory_entries(
            &self,
            kind: DirectoryKind,
            user_id: Option<i32>,
        ) -> RepositoryResult<Vec<DirectoryEntry>>;
    }

    impl DirectoryWriter for Repository {
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
}
