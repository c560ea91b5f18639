use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
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

#[derive(Clone, Debug, Serialize, PartialEq)]
/// A product together with the joined reference names the dashboard shows.
pub struct ProductListItem {
    pub product: Product,
    pub brand_name: Option<String>,
    pub category_name: Option<String>,
    pub prompt_name: Option<String>,
    pub main_image: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Default)]
pub struct NewProduct {
    pub user_id: i32,
    pub name: Option<String>,
    pub description: Option<String>,
    pub ean: Option<String>,
    pub upc: Option<String>,
    pub brand_id: Option<i32>,
    pub category_id: Option<i32>,
    pub prompt_id: Option<i32>,
}

impl NewProduct {
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        user_id: i32,
        name: Option<String>,
        description: Option<String>,
        ean: Option<String>,
        upc: Option<String>,
        brand_id: Option<i32>,
        category_id: Option<i32>,
        prompt_id: Option<i32>,
    ) -> Self {
        Self {
            user_id,
            name: normalize(name),
            description: normalize(description),
            ean: normalize(ean),
            upc: normalize(upc),
            brand_id,
            category_id,
            prompt_id,
        }
    }
}

#[derive(Clone, Debug, Deserialize, Default)]
pub struct UpdateProduct {
    pub name: Option<String>,
    pub description: Option<String>,
    pub ean: Option<String>,
    pub upc: Option<String>,
    pub brand_id: Option<i32>,
    pub category_id: Option<i32>,
    pub prompt_id: Option<i32>,
}

impl UpdateProduct {
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: Option<String>,
        description: Option<String>,
        ean: Option<String>,
        upc: Option<String>,
        brand_id: Option<i32>,
        category_id: Option<i32>,
        prompt_id: Option<i32>,
    ) -> Self {
        Self {
            name: normalize(name),
            description: normalize(description),
            ean: normalize(ean),
            upc: normalize(upc),
            brand_id,
            category_id,
            prompt_id,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct ProductImage {
    pub id: i32,
    pub product_id: i32,
    pub user_id: i32,
    pub image_path: String,
    pub is_main: bool,
}

#[derive(Clone, Debug)]
pub struct NewProductImage {
    pub product_id: i32,
    pub user_id: i32,
    pub image_path: String,
    pub is_main: bool,
}

fn normalize(value: Option<String>) -> Option<String> {
    value.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_product_drops_blank_fields() {
        let product = NewProduct::new(
            1,
            Some("  Сок  ".to_string()),
            Some(String::new()),
            Some(" 4601234567893 ".to_string()),
            None,
            Some(2),
            None,
            None,
        );
        assert_eq!(product.name.as_deref(), Some("Сок"));
        assert_eq!(product.description, None);
        assert_eq!(product.ean.as_deref(), Some("4601234567893"));
        assert_eq!(product.brand_id, Some(2));
    }
}
