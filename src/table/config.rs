//! Static description of one table view, checked once at startup.

use thiserror::Error;

use crate::table::state::TableDefaults;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid table config: {}", .problems.join("; "))]
/// All configuration problems found at once, not just the first.
pub struct TableConfigError {
    pub problems: Vec<String>,
}

#[derive(Debug, Clone)]
/// Where a table view fetches its data and how it renders.
pub struct TableConfig {
    pub data_url: String,
    pub defaults: TableDefaults,
    pub sort_fields: Vec<String>,
    /// Element id of the desktop table body, when the view has one.
    pub row_target: Option<String>,
    /// Element id of the mobile cards container, when the view has one.
    pub card_target: Option<String>,
}

impl TableConfig {
    pub fn builder() -> TableConfigBuilder {
        TableConfigBuilder::default()
    }
}

#[derive(Debug, Default)]
pub struct TableConfigBuilder {
    data_url: Option<String>,
    defaults: TableDefaults,
    sort_fields: Vec<String>,
    row_target: Option<String>,
    card_target: Option<String>,
}

impl TableConfigBuilder {
    #[must_use]
    pub fn data_url(mut self, url: impl Into<String>) -> Self {
        self.data_url = Some(url.into());
        self
    }

    #[must_use]
    pub fn defaults(mut self, defaults: TableDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    #[must_use]
    pub fn sort_fields(mut self, fields: &[&str]) -> Self {
        self.sort_fields = fields.iter().map(|f| (*f).to_string()).collect();
        self
    }

    #[must_use]
    pub fn row_target(mut self, id: impl Into<String>) -> Self {
        self.row_target = Some(id.into());
        self
    }

    #[must_use]
    pub fn card_target(mut self, id: impl Into<String>) -> Self {
        self.card_target = Some(id.into());
        self
    }

    /// Validates the whole configuration and reports every problem found.
    pub fn build(self) -> Result<TableConfig, TableConfigError> {
        let mut problems = Vec::new();

        let data_url = match self.data_url.as_deref() {
            Some(url) if !url.is_empty() => url.to_string(),
            _ => {
                problems.push("data_url is required".to_string());
                String::new()
            }
        };
        if self.row_target.is_none() && self.card_target.is_none() {
            problems.push("at least one render target (row_target or card_target) is required".to_string());
        }
        if self.sort_fields.is_empty() {
            problems.push("sort_fields must not be empty".to_string());
        } else if !self.sort_fields.contains(&self.defaults.sort_by) {
            problems.push(format!(
                "default sort field '{}' is not in sort_fields",
                self.defaults.sort_by
            ));
        }

        if !problems.is_empty() {
            return Err(TableConfigError { problems });
        }

        Ok(TableConfig {
            data_url,
            defaults: self.defaults,
            sort_fields: self.sort_fields,
            row_target: self.row_target,
            card_target: self.card_target,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_config_builds() {
        let config = TableConfig::builder()
            .data_url("/dashboard/data")
            .sort_fields(&["id", "name"])
            .row_target("product-rows")
            .card_target("product-cards")
            .build()
            .expect("valid config");
        assert_eq!(config.data_url, "/dashboard/data");
        assert_eq!(config.sort_fields.len(), 2);
    }

    #[test]
    fn all_problems_reported_at_once() {
        let err = TableConfig::builder().build().expect_err("invalid config");
        assert_eq!(err.problems.len(), 3);
        assert!(err.problems[0].contains("data_url"));
        assert!(err.problems[1].contains("render target"));
        assert!(err.problems[2].contains("sort_fields"));
        assert!(err.to_string().contains("; "));
    }

    #[test]
    fn default_sort_field_must_be_sortable() {
        let err = TableConfig::builder()
            .data_url("/dashboard/data")
            .row_target("rows")
            .sort_fields(&["name"])
            .build()
            .expect_err("id is not sortable here");
        assert_eq!(err.problems.len(), 1);
        assert!(err.problems[0].contains("'id'"));
    }
}
