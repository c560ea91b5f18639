//! Brand, category and prompt dictionary maintenance.

use validator::Validate;

use crate::domain::directory::{DirectoryEntry, DirectoryKind, UpdateDirectoryEntry};
use crate::dto::directory::{DirectoryOutcome, DirectoryPageData};
use crate::forms::directory::DirectoryForm;
use crate::models::auth::AuthenticatedUser;
use crate::repository::{DirectoryReader, DirectoryWriter};
use crate::services::{ServiceError, ServiceResult, owns, visibility_scope};

/// Loads the directory listing within the caller's visibility.
pub fn load_directory_page<R>(
    repo: &R,
    user: &AuthenticatedUser,
    kind: DirectoryKind,
) -> ServiceResult<DirectoryPageData>
where
    R: DirectoryReader + ?Sized,
{
    let entries = repo
        .list_directory_entries(kind, visibility_scope(user))
        .map_err(|err| {
            log::error!("Failed to list {kind} directory: {err}");
            ServiceError::from(err)
        })?;

    Ok(DirectoryPageData { kind, entries })
}

/// Loads one entry for the edit form.
pub fn load_directory_form<R>(
    repo: &R,
    user: &AuthenticatedUser,
    kind: DirectoryKind,
    entry_id: i32,
) -> ServiceResult<DirectoryEntry>
where
    R: DirectoryReader + ?Sized,
{
    let entry = repo
        .get_directory_entry(kind, entry_id)?
        .ok_or(ServiceError::NotFound)?;
    if !owns(user, entry.user_id) {
        return Err(ServiceError::Unauthorized);
    }
    Ok(entry)
}

/// Creates an entry owned by the caller.
pub fn create_entry<R>(
    repo: &R,
    user: &AuthenticatedUser,
    kind: DirectoryKind,
    form: &DirectoryForm,
) -> ServiceResult<DirectoryOutcome>
where
    R: DirectoryWriter + ?Sized,
{
    form.validate()
        .map_err(|_| ServiceError::Form("Название обязательно".to_string()))?;

    repo.create_directory_entry(kind, &form.new_entry(user.user_id))
        .map_err(|err| {
            log::error!("Failed to create {kind} entry: {err}");
            ServiceError::from(err)
        })?;

    Ok(DirectoryOutcome::ok(kind))
}

/// Renames an entry.
pub fn update_entry<R>(
    repo: &R,
    user: &AuthenticatedUser,
    kind: DirectoryKind,
    entry_id: i32,
    form: &DirectoryForm,
) -> ServiceResult<DirectoryOutcome>
where
    R: DirectoryReader + DirectoryWriter + ?Sized,
{
    form.validate()
        .map_err(|_| ServiceError::Form("Название обязательно".to_string()))?;

    let entry = repo
        .get_directory_entry(kind, entry_id)?
        .ok_or(ServiceError::NotFound)?;
    if !owns(user, entry.user_id) {
        return Err(ServiceError::Unauthorized);
    }

    repo.update_directory_entry(kind, entry.id, &UpdateDirectoryEntry::from(form))
        .map_err(|err| {
            log::error!("Failed to update {kind} entry: {err}");
            ServiceError::from(err)
        })?;

    Ok(DirectoryOutcome::ok(kind))
}

/// Deletes an entry.
pub fn delete_entry<R>(
    repo: &R,
    user: &AuthenticatedUser,
    kind: DirectoryKind,
    entry_id: i32,
) -> ServiceResult<DirectoryOutcome>
where
    R: DirectoryReader + DirectoryWriter + ?Sized,
{
    let entry = repo
        .get_directory_entry(kind, entry_id)?
        .ok_or(ServiceError::NotFound)?;
    if !owns(user, entry.user_id) {
        return Err(ServiceError::Unauthorized);
    }

    repo.delete_directory_entry(kind, entry.id).map_err(|err| {
        log::error!("Failed to delete {kind} entry: {err}");
        ServiceError::from(err)
    })?;

    Ok(DirectoryOutcome::ok(kind))
}
