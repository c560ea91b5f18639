//! Repository implementation for products and their images.

use std::collections::HashMap;

use diesel::prelude::*;

use crate::domain::product::{
    NewProduct, NewProductImage, Product, ProductImage, ProductListItem, UpdateProduct,
};
use crate::models::product::{
    NewProduct as DbNewProduct, NewProductImage as DbNewProductImage, Product as DbProduct,
    ProductImage as DbProductImage, UpdateProduct as DbUpdateProduct,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{
    DieselRepository, ProductListQuery, ProductReader, ProductWriter, RefFilter,
};
use crate::table::SortDir;

impl ProductReader for DieselRepository {
    fn get_product_by_id(&self, id: i32) -> RepositoryResult<Option<Product>> {
        use crate::schema::products;

        let mut conn = self.conn()?;
        let product = products::table
            .find(id)
            .first::<DbProduct>(&mut conn)
            .optional()?;

        Ok(product.map(Into::into))
    }

    fn list_products(
        &self,
        query: ProductListQuery,
    ) -> RepositoryResult<(usize, Vec<ProductListItem>)> {
        use crate::schema::{brands, categories, product_images, products, prompts};

        let mut conn = self.conn()?;

        let query_builder = || {
            let mut q = products::table
                .left_join(brands::table)
                .left_join(categories::table)
                .left_join(prompts::table)
                .into_boxed::<diesel::sqlite::Sqlite>();

            if let Some(user_id) = query.user_id {
                q = q.filter(products::user_id.eq(user_id));
            }
            if let Some(name) = &query.name {
                q = q.filter(products::name.like(format!("%{name}%")));
            }
            if let Some(ean) = &query.ean {
                q = q.filter(products::ean.like(format!("%{ean}%")));
            }
            if let Some(upc) = &query.upc {
                q = q.filter(products::upc.like(format!("%{upc}%")));
            }
            q = match query.brand {
                Some(RefFilter::Id(id)) => q.filter(products::brand_id.eq(id)),
                Some(RefFilter::IsNull) => q.filter(products::brand_id.is_null()),
                None => q,
            };
            match query.category {
                Some(RefFilter::Id(id)) => q.filter(products::category_id.eq(id)),
                Some(RefFilter::IsNull) => q.filter(products::category_id.is_null()),
                None => q,
            }
        };

        let total = query_builder().count().get_result::<i64>(&mut conn)? as usize;

        let mut items = query_builder();
        if let Some(pagination) = &query.pagination {
            let offset = ((pagination.page.max(1) - 1) * pagination.per_page) as i64;
            items = items.offset(offset).limit(pagination.per_page as i64);
        }

        let items = match (query.sort_by.as_str(), query.sort_dir) {
            ("name", SortDir::Asc) => items.order(products::name.asc()),
            ("name", SortDir::Desc) => items.order(products::name.desc()),
            ("ean", SortDir::Asc) => items.order(products::ean.asc()),
            ("ean", SortDir::Desc) => items.order(products::ean.desc()),
            ("upc", SortDir::Asc) => items.order(products::upc.asc()),
            ("upc", SortDir::Desc) => items.order(products::upc.desc()),
            ("brand", SortDir::Asc) => items.order(brands::name.nullable().asc()),
            ("brand", SortDir::Desc) => items.order(brands::name.nullable().desc()),
            ("category", SortDir::Asc) => items.order(categories::name.nullable().asc()),
            ("category", SortDir::Desc) => items.order(categories::name.nullable().desc()),
            (_, SortDir::Asc) => items.order(products::id.asc()),
            (_, SortDir::Desc) => items.order(products::id.desc()),
        };

        let rows = items
            .select((
                DbProduct::as_select(),
                brands::name.nullable(),
                categories::name.nullable(),
                prompts::name.nullable(),
            ))
            .load::<(DbProduct, Option<String>, Option<String>, Option<String>)>(&mut conn)?;

        let product_ids: Vec<i32> = rows.iter().map(|(product, ..)| product.id).collect();
        let main_images: HashMap<i32, String> = product_images::table
            .filter(product_images::product_id.eq_any(&product_ids))
            .filter(product_images::is_main.eq(true))
            .load::<DbProductImage>(&mut conn)?
            .into_iter()
            .map(|image| (image.product_id, image.image_path))
            .collect();

        let items = rows
            .into_iter()
            .map(|(product, brand_name, category_name, prompt_name)| {
                let main_image = main_images.get(&product.id).cloned();
                ProductListItem {
                    product: product.into(),
                    brand_name,
                    category_name,
                    prompt_name,
                    main_image,
                }
            })
            .collect();

        Ok((total, items))
    }

    fn product_position(
        &self,
        product_id: i32,
        query: ProductListQuery,
    ) -> RepositoryResult<Option<usize>> {
        use crate::schema::{brands, categories, products, prompts};

        let mut conn = self.conn()?;
        let query = query.unpaged();

        let query_builder = || {
            let mut q = products::table
                .left_join(brands::table)
                .left_join(categories::table)
                .left_join(prompts::table)
                .into_boxed::<diesel::sqlite::Sqlite>();

            if let Some(user_id) = query.user_id {
                q = q.filter(products::user_id.eq(user_id));
            }
            if let Some(name) = &query.name {
                q = q.filter(products::name.like(format!("%{name}%")));
            }
            if let Some(ean) = &query.ean {
                q = q.filter(products::ean.like(format!("%{ean}%")));
            }
            if let Some(upc) = &query.upc {
                q = q.filter(products::upc.like(format!("%{upc}%")));
            }
            q = match query.brand {
                Some(RefFilter::Id(id)) => q.filter(products::brand_id.eq(id)),
                Some(RefFilter::IsNull) => q.filter(products::brand_id.is_null()),
                None => q,
            };
            match query.category {
                Some(RefFilter::Id(id)) => q.filter(products::category_id.eq(id)),
                Some(RefFilter::IsNull) => q.filter(products::category_id.is_null()),
                None => q,
            }
        };

        let items = match (query.sort_by.as_str(), query.sort_dir) {
            ("name", SortDir::Asc) => query_builder().order(products::name.asc()),
            ("name", SortDir::Desc) => query_builder().order(products::name.desc()),
            ("ean", SortDir::Asc) => query_builder().order(products::ean.asc()),
            ("ean", SortDir::Desc) => query_builder().order(products::ean.desc()),
            ("upc", SortDir::Asc) => query_builder().order(products::upc.asc()),
            ("upc", SortDir::Desc) => query_builder().order(products::upc.desc()),
            ("brand", SortDir::Asc) => query_builder().order(brands::name.nullable().asc()),
            ("brand", SortDir::Desc) => query_builder().order(brands::name.nullable().desc()),
            ("category", SortDir::Asc) => query_builder().order(categories::name.nullable().asc()),
            ("category", SortDir::Desc) => {
                query_builder().order(categories::name.nullable().desc())
            }
            (_, SortDir::Asc) => query_builder().order(products::id.asc()),
            (_, SortDir::Desc) => query_builder().order(products::id.desc()),
        };

        let ids = items.select(products::id).load::<i32>(&mut conn)?;

        Ok(ids.iter().position(|id| *id == product_id))
    }

    fn list_product_images(&self, product_id: i32) -> RepositoryResult<Vec<ProductImage>> {
        use crate::schema::product_images;

        let mut conn = self.conn()?;
        let images = product_images::table
            .filter(product_images::product_id.eq(product_id))
            .order(product_images::is_main.desc())
            .then_order_by(product_images::id.asc())
            .load::<DbProductImage>(&mut conn)?;

        Ok(images.into_iter().map(Into::into).collect())
    }

    fn get_product_image(&self, image_id: i32) -> RepositoryResult<Option<ProductImage>> {
        use crate::schema::product_images;

        let mut conn = self.conn()?;
        let image = product_images::table
            .find(image_id)
            .first::<DbProductImage>(&mut conn)
            .optional()?;

        Ok(image.map(Into::into))
    }
}

impl ProductWriter for DieselRepository {
    fn create_product(&self, new_product: &NewProduct) -> RepositoryResult<Product> {
        use crate::schema::products;

        let mut conn = self.conn()?;
        let db_new_product: DbNewProduct = new_product.into();

        let product = diesel::insert_into(products::table)
            .values(&db_new_product)
            .get_result::<DbProduct>(&mut conn)?;

        Ok(product.into())
    }

    fn update_product(
        &self,
        product_id: i32,
        updates: &UpdateProduct,
    ) -> RepositoryResult<Product> {
        use crate::schema::products;

        let mut conn = self.conn()?;
        let db_updates: DbUpdateProduct = updates.into();

        let product = diesel::update(products::table.find(product_id))
            .set(&db_updates)
            .get_result::<DbProduct>(&mut conn)?;

        Ok(product.into())
    }

    fn delete_product(&self, product_id: i32) -> RepositoryResult<()> {
        use crate::schema::products;

        let mut conn = self.conn()?;
        diesel::delete(products::table.find(product_id)).execute(&mut conn)?;
        Ok(())
    }

    fn set_analysis_result(&self, product_id: i32, analysis: &str) -> RepositoryResult<()> {
        use crate::schema::products;

        let mut conn = self.conn()?;
        diesel::update(products::table.find(product_id))
            .set(products::analysis_result.eq(analysis))
            .execute(&mut conn)?;
        Ok(())
    }

    fn add_product_image(&self, new_image: &NewProductImage) -> RepositoryResult<ProductImage> {
        use crate::schema::product_images;

        let mut conn = self.conn()?;
        let db_new_image: DbNewProductImage = new_image.into();

        let image = diesel::insert_into(product_images::table)
            .values(&db_new_image)
            .get_result::<DbProductImage>(&mut conn)?;

        Ok(image.into())
    }

    fn replace_main_image(&self, new_image: &NewProductImage) -> RepositoryResult<ProductImage> {
        use crate::schema::product_images;

        let mut conn = self.conn()?;
        let db_new_image: DbNewProductImage = new_image.into();

        conn.transaction::<DbProductImage, diesel::result::Error, _>(|conn| {
            diesel::update(
                product_images::table
                    .filter(product_images::product_id.eq(new_image.product_id))
                    .filter(product_images::is_main.eq(true)),
            )
            .set(product_images::is_main.eq(false))
            .execute(conn)?;

            diesel::insert_into(product_images::table)
                .values(&db_new_image)
                .get_result::<DbProductImage>(conn)
        })
        .map(Into::into)
        .map_err(RepositoryError::from)
    }

    fn delete_product_image(&self, image_id: i32) -> RepositoryResult<()> {
        use crate::schema::product_images;

        let mut conn = self.conn()?;
        diesel::delete(product_images::table.find(image_id)).execute(&mut conn)?;
        Ok(())
    }
}
