use diesel::prelude::*;

use crate::domain::product::{
    NewProduct as DomainNewProduct, NewProductImage as DomainNewProductImage,
    Product as DomainProduct, ProductImage as DomainProductImage,
    UpdateProduct as DomainUpdateProduct,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::products)]
/// Diesel model for [`crate::domain::product::Product`].
pub struct Product {
    pub id: i32,
    pub user_id: i32,
    pub name: Option<String>,
    pub description: Option<String>,
    pub ean: Option<String>,
    pub upc: Option<String>,
    pub brand_id: Option<i32>,
    pub category_id: Option<i32>,
    pub prompt_id: Option<i32>,
    pub analysis_result: Option<String>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::products)]
/// Insertable form of [`Product`].
pub struct NewProduct<'a> {
    pub user_id: i32,
    pub name: Option<&'a str>,
    pub description: Option<&'a str>,
    pub ean: Option<&'a str>,
    pub upc: Option<&'a str>,
    pub brand_id: Option<i32>,
    pub category_id: Option<i32>,
    pub prompt_id: Option<i32>,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::products)]
#[diesel(treat_none_as_null = true)]
/// Data used when updating a [`Product`] record. `None` clears the column,
/// matching the full-form save semantics.
pub struct UpdateProduct<'a> {
    pub name: Option<&'a str>,
    pub description: Option<&'a str>,
    pub ean: Option<&'a str>,
    pub upc: Option<&'a str>,
    pub brand_id: Option<i32>,
    pub category_id: Option<i32>,
    pub prompt_id: Option<i32>,
}

#[derive(Debug, Clone, Identifiable, Queryable, Associations)]
#[diesel(belongs_to(Product, foreign_key = product_id))]
#[diesel(table_name = crate::schema::product_images)]
pub struct ProductImage {
    pub id: i32,
    pub product_id: i32,
    pub user_id: i32,
    pub image_path: String,
    pub is_main: bool,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::product_images)]
pub struct NewProductImage<'a> {
    pub product_id: i32,
    pub user_id: i32,
    pub image_path: &'a str,
    pub is_main: bool,
}

impl From<Product> for DomainProduct {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            user_id: product.user_id,
            name: product.name,
            description: product.description,
            ean: product.ean,
            upc: product.upc,
            brand_id: product.brand_id,
            category_id: product.category_id,
            prompt_id: product.prompt_id,
            analysis_result: product.analysis_result,
        }
    }
}

impl<'a> From<&'a DomainNewProduct> for NewProduct<'a> {
    fn from(product: &'a DomainNewProduct) -> Self {
        Self {
            user_id: product.user_id,
            name: product.name.as_deref(),
            description: product.description.as_deref(),
            ean: product.ean.as_deref(),
            upc: product.upc.as_deref(),
            brand_id: product.brand_id,
            category_id: product.category_id,
            prompt_id: product.prompt_id,
        }
    }
}

impl<'a> From<&'a DomainUpdateProduct> for UpdateProduct<'a> {
    fn from(product: &'a DomainUpdateProduct) -> Self {
        Self {
            name: product.name.as_deref(),
            description: product.description.as_deref(),
            ean: product.ean.as_deref(),
            upc: product.upc.as_deref(),
            brand_id: product.brand_id,
            category_id: product.category_id,
            prompt_id: product.prompt_id,
        }
    }
}

impl From<ProductImage> for DomainProductImage {
    fn from(image: ProductImage) -> Self {
        Self {
            id: image.id,
            product_id: image.product_id,
            user_id: image.user_id,
            image_path: image.image_path,
            is_main: image.is_main,
        }
    }
}

impl<'a> From<&'a DomainNewProductImage> for NewProductImage<'a> {
    fn from(image: &'a DomainNewProductImage) -> Self {
        Self {
            product_id: image.product_id,
            user_id: image.user_id,
            image_path: image.image_path.as_str(),
            is_main: image.is_main,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_product_into_domain() {
        let db = Product {
            id: 5,
            user_id: 1,
            name: Some("Сок".into()),
            description: None,
            ean: Some("4601234567893".into()),
            upc: None,
            brand_id: Some(2),
            category_id: None,
            prompt_id: None,
            analysis_result: None,
        };
        let domain: DomainProduct = db.into();
        assert_eq!(domain.id, 5);
        assert_eq!(domain.name.as_deref(), Some("Сок"));
        assert_eq!(domain.brand_id, Some(2));
    }

    #[test]
    fn from_domain_update_keeps_cleared_fields() {
        let domain = DomainUpdateProduct::new(
            Some("Сок".to_string()),
            None,
            None,
            None,
            None,
            Some(1),
            None,
        );
        let update: UpdateProduct = (&domain).into();
        assert_eq!(update.name, Some("Сок"));
        assert_eq!(update.ean, None);
        assert_eq!(update.category_id, None);
    }
}
