//! Dashboard listing and product CRUD.

use std::path::Path;

use actix_multipart::form::tempfile::TempFile;
use uuid::Uuid;

use crate::domain::directory::DirectoryKind;
use crate::domain::product::{NewProductImage, UpdateProduct};
use crate::dto::products::{
    DashboardPageData, HighlightPage, ProductFormData, ProductRow, SavedProduct, UploadedImage,
};
use crate::forms::FormError;
use crate::forms::product::SaveProductForm;
use crate::models::auth::AuthenticatedUser;
use crate::repository::{DirectoryReader, ProductListQuery, ProductReader, ProductWriter};
use crate::services::{ServiceError, ServiceResult, owns, visibility_scope};
use crate::table::{Page, TableState};

/// Loads the product page plus the directories the filter panel offers.
pub fn load_dashboard_page<R>(
    repo: &R,
    user: &AuthenticatedUser,
    state: &TableState,
) -> ServiceResult<DashboardPageData>
where
    R: ProductReader + DirectoryReader + ?Sized,
{
    let products = dashboard_data(repo, user, state)?;

    let scope = visibility_scope(user);
    let brands = repo
        .list_directory_entries(DirectoryKind::Brand, scope)
        .map_err(ServiceError::from)?;
    let categories = repo
        .list_directory_entries(DirectoryKind::Category, scope)
        .map_err(ServiceError::from)?;

    Ok(DashboardPageData {
        products,
        brands,
        categories,
    })
}

/// The product page the table state describes, rows flattened for
/// rendering.
pub fn dashboard_data<R>(
    repo: &R,
    user: &AuthenticatedUser,
    state: &TableState,
) -> ServiceResult<Page<ProductRow>>
where
    R: ProductReader + ?Sized,
{
    let mut query = ProductListQuery::from_state(state);
    if let Some(user_id) = visibility_scope(user) {
        query = query.owner(user_id);
    }

    let (total, items) = repo.list_products(query).map_err(|err| {
        log::error!("Failed to list products: {err}");
        err
    })?;

    let rows = items.into_iter().map(ProductRow::from).collect();
    Ok(Page::new(rows, total, state))
}

/// Which page of the current listing shows the given product.
pub fn highlight_page<R>(
    repo: &R,
    user: &AuthenticatedUser,
    product_id: i32,
    state: &TableState,
) -> ServiceResult<HighlightPage>
where
    R: ProductReader + ?Sized,
{
    let mut query = ProductListQuery::from_state(state);
    if let Some(user_id) = visibility_scope(user) {
        query = query.owner(user_id);
    }

    let page = repo
        .product_position(product_id, query)
        .map_err(|err| {
            log::error!("Failed to locate product in listing: {err}");
            err
        })?
        .map(|index| index / state.limit + 1);

    Ok(HighlightPage {
        found: page.is_some(),
        page,
    })
}

/// Loads the create/edit product form together with its dropdowns.
pub fn load_product_form<R>(
    repo: &R,
    user: &AuthenticatedUser,
    product_id: Option<i32>,
) -> ServiceResult<ProductFormData>
where
    R: ProductReader + DirectoryReader + ?Sized,
{
    let (product, main_image, images) = match product_id {
        Some(product_id) => {
            let product = repo
                .get_product_by_id(product_id)?
                .ok_or(ServiceError::NotFound)?;
            if !owns(user, product.user_id) {
                return Err(ServiceError::Unauthorized);
            }
            let mut images = repo.list_product_images(product.id)?;
            let main_image = images
                .iter()
                .position(|image| image.is_main)
                .map(|index| images.remove(index));
            (Some(product), main_image, images)
        }
        None => (None, None, Vec::new()),
    };

    let scope = visibility_scope(user);
    Ok(ProductFormData {
        product,
        main_image,
        images,
        brands: repo.list_directory_entries(DirectoryKind::Brand, scope)?,
        categories: repo.list_directory_entries(DirectoryKind::Category, scope)?,
        prompts: repo.list_directory_entries(DirectoryKind::Prompt, scope)?,
    })
}

/// Creates or updates a product, stores an uploaded main image and
/// answers with the dashboard URL that shows the saved row.
pub fn save_product<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: &SaveProductForm,
    state: &TableState,
    upload_dir: &str,
) -> ServiceResult<SavedProduct>
where
    R: ProductReader + ProductWriter + ?Sized,
{
    form.validate().map_err(form_message)?;

    let product = match form.product_id() {
        Some(product_id) => {
            let existing = repo
                .get_product_by_id(product_id)?
                .ok_or(ServiceError::NotFound)?;
            if !owns(user, existing.user_id) {
                return Err(ServiceError::Unauthorized);
            }
            repo.update_product(product_id, &UpdateProduct::from(form))
                .map_err(|err| {
                    log::error!("Failed to update product: {err}");
                    ServiceError::from(err)
                })?
        }
        None => repo
            .create_product(&form.new_product(user.user_id))
            .map_err(|err| {
                log::error!("Failed to create product: {err}");
                ServiceError::from(err)
            })?,
    };

    if let Some(photo) = form.photo_file() {
        let filename = store_upload(photo, upload_dir)?;
        repo.replace_main_image(&NewProductImage {
            product_id: product.id,
            user_id: user.user_id,
            image_path: filename,
            is_main: true,
        })?;
    }

    // Land the client on the page showing the saved row. When the row is
    // filtered out, the forwarded state stays as it was.
    let mut state = state.clone();
    let mut query = ProductListQuery::from_state(&state);
    if let Some(user_id) = visibility_scope(user) {
        query = query.owner(user_id);
    }
    if let Some(index) = repo.product_position(product.id, query)? {
        state.set_page(index / state.limit + 1);
    }

    let mut url = format!("/dashboard?highlight_id={}&new_created=1", product.id);
    let query_string = state.non_default_query_string();
    if !query_string.is_empty() {
        url.push('&');
        url.push_str(&query_string);
    }

    Ok(SavedProduct {
        url,
        product_id: product.id,
    })
}

/// Deletes a product with its images. Rows of other owners look exactly
/// like missing ones.
pub fn delete_product<R>(
    repo: &R,
    user: &AuthenticatedUser,
    product_id: i32,
) -> ServiceResult<()>
where
    R: ProductReader + ProductWriter + ?Sized,
{
    let product = repo
        .get_product_by_id(product_id)?
        .ok_or(ServiceError::NotFound)?;
    if !owns(user, product.user_id) {
        return Err(ServiceError::NotFound);
    }

    repo.delete_product(product_id).map_err(|err| {
        log::error!("Failed to delete product: {err}");
        ServiceError::from(err)
    })
}

/// Stores a gallery image for the product.
pub fn upload_gallery_image<R>(
    repo: &R,
    user: &AuthenticatedUser,
    product_id: i32,
    image: &TempFile,
    upload_dir: &str,
) -> ServiceResult<UploadedImage>
where
    R: ProductReader + ProductWriter + ?Sized,
{
    let product = repo
        .get_product_by_id(product_id)?
        .ok_or(ServiceError::NotFound)?;
    if !owns(user, product.user_id) {
        return Err(ServiceError::Unauthorized);
    }

    let filename = store_upload(image, upload_dir)?;
    let image = repo
        .add_product_image(&NewProductImage {
            product_id: product.id,
            user_id: user.user_id,
            image_path: filename,
            is_main: false,
        })
        .map_err(|err| {
            log::error!("Failed to store gallery image: {err}");
            ServiceError::from(err)
        })?;

    Ok(UploadedImage::from(image))
}

/// Deletes a gallery image; permission follows the owning product.
pub fn delete_image<R>(repo: &R, user: &AuthenticatedUser, image_id: i32) -> ServiceResult<()>
where
    R: ProductReader + ProductWriter + ?Sized,
{
    let image = repo
        .get_product_image(image_id)?
        .ok_or(ServiceError::NotFound)?;
    let product = repo
        .get_product_by_id(image.product_id)?
        .ok_or(ServiceError::NotFound)?;
    if !owns(user, product.user_id) {
        return Err(ServiceError::Unauthorized);
    }

    repo.delete_product_image(image_id).map_err(|err| {
        log::error!("Failed to delete product image: {err}");
        ServiceError::from(err)
    })
}

/// Copies an upload into `upload_dir` under a fresh UUID filename,
/// keeping the original extension.
fn store_upload(upload: &TempFile, upload_dir: &str) -> ServiceResult<String> {
    let ext = upload
        .file_name
        .as_deref()
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| format!(".{ext}"))
        .unwrap_or_default();
    let filename = format!("{}{ext}", Uuid::new_v4().simple());

    std::fs::copy(upload.file.path(), Path::new(upload_dir).join(&filename)).map_err(|err| {
        log::error!("Failed to store uploaded file: {err}");
        ServiceError::Io(err)
    })?;

    Ok(filename)
}

fn form_message(err: FormError) -> ServiceError {
    let message = match err {
        FormError::MissingName => "Название товара обязательно",
        FormError::InvalidEan => "Поле EAN длиннее 13 символов",
        FormError::InvalidUpc => "Поле UPC длиннее 12 символов",
        FormError::Validation(_) => "Ошибка валидации формы",
    };
    ServiceError::Form(message.to_string())
}
