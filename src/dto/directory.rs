//! DTOs shaped for the directory pages and their CRUD endpoints.

use serde::Serialize;

use crate::domain::directory::{DirectoryEntry, DirectoryKind};

/// Aggregated data required to render a directory listing page.
pub struct DirectoryPageData {
    pub kind: DirectoryKind,
    pub entries: Vec<DirectoryEntry>,
}

/// Outcome of a directory mutation: success points back at the listing,
/// failure carries the reason.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DirectoryOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DirectoryOutcome {
    #[must_use]
    pub fn ok(kind: DirectoryKind) -> Self {
        Self {
            success: true,
            url: Some(format!("/directory/{kind}")),
            error: None,
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            url: None,
            error: Some(message.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_serializes_without_empty_fields() {
        let ok = serde_json::to_value(DirectoryOutcome::ok(DirectoryKind::Brand)).unwrap();
        assert_eq!(
            ok,
            serde_json::json!({"success": true, "url": "/directory/brand"})
        );

        let err = serde_json::to_value(DirectoryOutcome::error("Элемент не найден")).unwrap();
        assert_eq!(
            err,
            serde_json::json!({"success": false, "error": "Элемент не найден"})
        );
    }
}
