use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub password_hash: String,
    pub is_superuser: bool,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub is_superuser: bool,
}

impl NewUser {
    #[must_use]
    pub fn new(username: String, password_hash: String) -> Self {
        Self {
            username: username.trim().to_lowercase(),
            password_hash,
            is_superuser: false,
        }
    }
}
