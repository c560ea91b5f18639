//! DTOs shaped for the dashboard table and the product form.

use serde::Serialize;

use crate::domain::directory::DirectoryEntry;
use crate::domain::product::{Product, ProductImage, ProductListItem};
use crate::table::Page;

/// A referenced directory entry, nested the way the JSON rows carry it.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct NamedRef {
    pub id: i32,
    pub name: String,
}

/// One dashboard row, flattened for templates and the `/dashboard/data`
/// endpoint.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ProductRow {
    pub id: i32,
    pub name: Option<String>,
    pub description: Option<String>,
    pub ean: Option<String>,
    pub upc: Option<String>,
    pub brand: Option<NamedRef>,
    pub category: Option<NamedRef>,
    pub prompt: Option<NamedRef>,
    pub main_image: Option<String>,
    pub has_analysis: bool,
}

impl From<ProductListItem> for ProductRow {
    fn from(item: ProductListItem) -> Self {
        let ProductListItem {
            product,
            brand_name,
            category_name,
            prompt_name,
            main_image,
        } = item;
        Self {
            id: product.id,
            name: product.name,
            description: product.description,
            ean: product.ean,
            upc: product.upc,
            brand: named_ref(product.brand_id, brand_name),
            category: named_ref(product.category_id, category_name),
            prompt: named_ref(product.prompt_id, prompt_name),
            main_image,
            has_analysis: product.analysis_result.is_some(),
        }
    }
}

fn named_ref(id: Option<i32>, name: Option<String>) -> Option<NamedRef> {
    match (id, name) {
        (Some(id), Some(name)) => Some(NamedRef { id, name }),
        _ => None,
    }
}

/// Aggregated data required to render the dashboard page.
pub struct DashboardPageData {
    pub products: Page<ProductRow>,
    pub brands: Vec<DirectoryEntry>,
    pub categories: Vec<DirectoryEntry>,
}

/// Aggregated data required to render the product form.
pub struct ProductFormData {
    /// `None` when the form creates a new product.
    pub product: Option<Product>,
    pub main_image: Option<ProductImage>,
    /// Gallery images, main image excluded.
    pub images: Vec<ProductImage>,
    pub brands: Vec<DirectoryEntry>,
    pub categories: Vec<DirectoryEntry>,
    pub prompts: Vec<DirectoryEntry>,
}

/// Answer of `/highlight-page`: which page a row lands on under the
/// current filters and sort, if it is visible at all.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct HighlightPage {
    pub found: bool,
    pub page: Option<usize>,
}

/// Result of a product save, pointing the client back at the dashboard
/// page that shows the saved row.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SavedProduct {
    pub url: String,
    pub product_id: i32,
}

/// Response of a gallery image upload.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct UploadedImage {
    pub id: i32,
    pub path: String,
    pub is_main: bool,
}

impl From<ProductImage> for UploadedImage {
    fn from(image: ProductImage) -> Self {
        Self {
            id: image.id,
            path: format!("/uploads/{}", image.image_path),
            is_main: image.is_main,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_nests_named_refs() {
        let item = ProductListItem {
            product: Product {
                id: 5,
                user_id: 1,
                name: Some("Сок".to_string()),
                brand_id: Some(2),
                category_id: Some(9),
                ..Product::default()
            },
            brand_name: Some("Добрый".to_string()),
            category_name: None,
            prompt_name: None,
            main_image: Some("abc.png".to_string()),
        };

        let row = ProductRow::from(item);
        assert_eq!(
            row.brand,
            Some(NamedRef {
                id: 2,
                name: "Добрый".to_string()
            })
        );
        // The category id is set but its name did not join.
        assert_eq!(row.category, None);
        assert_eq!(row.main_image.as_deref(), Some("abc.png"));
        assert!(!row.has_analysis);
    }
}
