use actix_multipart::form::{MultipartForm, tempfile::TempFile, text::Text};

use crate::domain::product::{NewProduct, UpdateProduct};
use crate::forms::FormError;

/// Multipart form saving a product. One endpoint covers create and
/// update, so `id` is optional, and selects post `""` for "not set".
#[derive(MultipartForm)]
pub struct SaveProductForm {
    pub id: Option<Text<String>>,
    pub name: Option<Text<String>>,
    pub description: Option<Text<String>>,
    pub ean: Option<Text<String>>,
    pub upc: Option<Text<String>>,
    pub brand_id: Option<Text<String>>,
    pub category_id: Option<Text<String>>,
    pub prompt_id: Option<Text<String>>,
    #[multipart(limit = "10MB")]
    pub photo: Option<TempFile>,
}

impl SaveProductForm {
    #[must_use]
    pub fn product_id(&self) -> Option<i32> {
        parse_id(&self.id)
    }

    pub fn validate(&self) -> Result<(), FormError> {
        if text(&self.name)
            .as_deref()
            .map(str::trim)
            .is_none_or(str::is_empty)
        {
            return Err(FormError::MissingName);
        }
        if text(&self.ean).is_some_and(|v| v.chars().count() > 13) {
            return Err(FormError::InvalidEan);
        }
        if text(&self.upc).is_some_and(|v| v.chars().count() > 12) {
            return Err(FormError::InvalidUpc);
        }
        Ok(())
    }

    #[must_use]
    pub fn new_product(&self, user_id: i32) -> NewProduct {
        NewProduct::new(
            user_id,
            text(&self.name),
            text(&self.description),
            text(&self.ean),
            text(&self.upc),
            parse_id(&self.brand_id),
            parse_id(&self.category_id),
            parse_id(&self.prompt_id),
        )
    }

    /// The uploaded photo, if the field actually carried one.
    #[must_use]
    pub fn photo_file(&self) -> Option<&TempFile> {
        self.photo.as_ref().filter(|file| file.size > 0)
    }
}

#[derive(MultipartForm)]
pub struct GalleryImageForm {
    #[multipart(limit = "10MB")]
    pub image: TempFile,
}

impl From<&SaveProductForm> for UpdateProduct {
    fn from(form: &SaveProductForm) -> Self {
        UpdateProduct::new(
            text(&form.name),
            text(&form.description),
            text(&form.ean),
            text(&form.upc),
            parse_id(&form.brand_id),
            parse_id(&form.category_id),
            parse_id(&form.prompt_id),
        )
    }
}

fn text(field: &Option<Text<String>>) -> Option<String> {
    field.as_ref().map(|value| value.0.clone())
}

fn parse_id(field: &Option<Text<String>>) -> Option<i32> {
    field.as_ref().and_then(|value| value.trim().parse().ok())
}
