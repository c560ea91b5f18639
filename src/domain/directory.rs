use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// The three reference dictionaries a product links to.
pub enum DirectoryKind {
    Brand,
    Category,
    Prompt,
}

impl DirectoryKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "brand" => Some(DirectoryKind::Brand),
            "category" => Some(DirectoryKind::Category),
            "prompt" => Some(DirectoryKind::Prompt),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            DirectoryKind::Brand => "brand",
            DirectoryKind::Category => "category",
            DirectoryKind::Prompt => "prompt",
        }
    }

    /// Page heading shown for the directory.
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            DirectoryKind::Brand => "Бренды",
            DirectoryKind::Category => "Категории",
            DirectoryKind::Prompt => "Промпты",
        }
    }
}

impl fmt::Display for DirectoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
/// One entry of a brand/category/prompt dictionary.
pub struct DirectoryEntry {
    pub id: i32,
    pub user_id: i32,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewDirectoryEntry {
    pub user_id: i32,
    pub name: String,
    pub description: Option<String>,
}

impl NewDirectoryEntry {
    #[must_use]
    pub fn new(user_id: i32, name: String, description: Option<String>) -> Self {
        Self {
            user_id,
            name: name.trim().to_string(),
            description: description
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct UpdateDirectoryEntry {
    pub name: String,
    pub description: Option<String>,
}

impl UpdateDirectoryEntry {
    #[must_use]
    pub fn new(name: String, description: Option<String>) -> Self {
        Self {
            name: name.trim().to_string(),
            description: description
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_kinds() {
        assert_eq!(DirectoryKind::parse("brand"), Some(DirectoryKind::Brand));
        assert_eq!(DirectoryKind::parse("category"), Some(DirectoryKind::Category));
        assert_eq!(DirectoryKind::parse("prompt"), Some(DirectoryKind::Prompt));
        assert_eq!(DirectoryKind::parse("vendor"), None);
    }

    #[test]
    fn new_entry_trims_fields() {
        let entry = NewDirectoryEntry::new(1, "  Sony  ".to_string(), Some("  ".to_string()));
        assert_eq!(entry.name, "Sony");
        assert_eq!(entry.description, None);
    }
}
