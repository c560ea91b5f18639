use serde::Deserialize;
use validator::Validate;

use crate::domain::directory::{NewDirectoryEntry, UpdateDirectoryEntry};

#[derive(Deserialize, Validate)]
/// JSON payload for creating or editing a directory entry.
pub struct DirectoryForm {
    #[validate(length(min = 1))]
    pub name: String,
    pub description: Option<String>,
}

impl DirectoryForm {
    #[must_use]
    pub fn new_entry(&self, user_id: i32) -> NewDirectoryEntry {
        NewDirectoryEntry::new(user_id, self.name.clone(), self.description.clone())
    }
}

impl From<&DirectoryForm> for UpdateDirectoryEntry {
    fn from(form: &DirectoryForm) -> Self {
        UpdateDirectoryEntry::new(form.name.clone(), form.description.clone())
    }
}
