//! The table view state and its URL mappings.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Page size every table starts with.
pub const DEFAULT_PAGE_LIMIT: usize = 10;
/// Sort column every table starts with.
pub const DEFAULT_SORT_FIELD: &str = "id";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDir {
    #[default]
    Asc,
    Desc,
}

impl SortDir {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SortDir::Asc => "asc",
            SortDir::Desc => "desc",
        }
    }

    /// Parses `"asc"`/`"desc"`; anything else is `None` so the caller can
    /// substitute the view default.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "asc" => Some(SortDir::Asc),
            "desc" => Some(SortDir::Desc),
            _ => None,
        }
    }

    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            SortDir::Asc => SortDir::Desc,
            SortDir::Desc => SortDir::Asc,
        }
    }
}

impl fmt::Display for SortDir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
/// Per-view defaults a [`TableState`] is measured against.
///
/// `filters` holds pinned filter values the user cannot override (a review
/// table pins its `product_id` here). `filter_keys` is the allow-list of
/// user-controlled filter names accepted from the URL.
pub struct TableDefaults {
    pub limit: usize,
    pub sort_by: String,
    pub sort_dir: SortDir,
    pub filters: BTreeMap<String, String>,
    pub filter_keys: Vec<String>,
}

impl Default for TableDefaults {
    fn default() -> Self {
        Self {
            limit: DEFAULT_PAGE_LIMIT,
            sort_by: DEFAULT_SORT_FIELD.to_string(),
            sort_dir: SortDir::Asc,
            filters: BTreeMap::new(),
            filter_keys: Vec::new(),
        }
    }
}

impl TableDefaults {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn sort(mut self, field: impl Into<String>, dir: SortDir) -> Self {
        self.sort_by = field.into();
        self.sort_dir = dir;
        self
    }

    #[must_use]
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit.max(1);
        self
    }

    /// Pins a filter to a fixed value for the lifetime of the view.
    #[must_use]
    pub fn pin_filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn filter_keys(mut self, keys: &[&str]) -> Self {
        self.filter_keys = keys.iter().map(|k| (*k).to_string()).collect();
        self
    }

    fn default_value(&self, key: &str) -> Option<String> {
        match key {
            "page" => Some("1".to_string()),
            "limit" => Some(self.limit.to_string()),
            "sort_by" => Some(self.sort_by.clone()),
            "sort_dir" => Some(self.sort_dir.as_str().to_string()),
            _ => self.filters.get(key).cloned(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
/// A partial update applied to a [`TableState`].
///
/// Field semantics follow the filter form contract: `sort_by: Some("")`
/// clears sorting back to the view default (field and direction),
/// `sort_by: None` leaves sorting untouched. An empty string filter value
/// removes that filter. Unless `page` is given explicitly, any change lands
/// the state back on page 1.
pub struct StateChange {
    pub page: Option<usize>,
    pub limit: Option<usize>,
    pub sort_by: Option<String>,
    pub sort_dir: Option<SortDir>,
    pub filters: BTreeMap<String, String>,
}

impl StateChange {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn page(mut self, page: usize) -> Self {
        self.page = Some(page);
        self
    }

    #[must_use]
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub fn sort_by(mut self, field: impl Into<String>) -> Self {
        self.sort_by = Some(field.into());
        self
    }

    #[must_use]
    pub fn sort_dir(mut self, dir: SortDir) -> Self {
        self.sort_dir = Some(dir);
        self
    }

    #[must_use]
    pub fn filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.insert(key.into(), value.into());
        self
    }

    fn touches_state(&self) -> bool {
        self.limit.is_some()
            || self.sort_by.is_some()
            || self.sort_dir.is_some()
            || !self.filters.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
/// Explicit view state of one table: page, page size, sort and filters.
pub struct TableState {
    pub page: usize,
    pub limit: usize,
    pub sort_by: String,
    pub sort_dir: SortDir,
    pub filters: BTreeMap<String, String>,
    defaults: TableDefaults,
}

impl TableState {
    /// State with every value at its view default.
    #[must_use]
    pub fn new(defaults: TableDefaults) -> Self {
        Self {
            page: 1,
            limit: defaults.limit,
            sort_by: defaults.sort_by.clone(),
            sort_dir: defaults.sort_dir,
            filters: defaults.filters.clone(),
            defaults,
        }
    }

    /// Rebuilds a state from URL query parameters.
    ///
    /// Only allow-listed filter keys are read; malformed `page`/`limit`
    /// values and unknown sort directions fall back to the defaults, so a
    /// hand-edited URL can degrade but never fail.
    #[must_use]
    pub fn restore(defaults: TableDefaults, params: &BTreeMap<String, String>) -> Self {
        let mut state = Self::new(defaults);

        if let Some(page) = params.get("page").and_then(|v| v.parse::<usize>().ok()) {
            state.page = page.max(1);
        }
        if let Some(limit) = params.get("limit").and_then(|v| v.parse::<usize>().ok()) {
            state.limit = limit.max(1);
        }
        if let Some(sort_by) = params.get("sort_by").filter(|v| !v.is_empty()) {
            state.sort_by = sort_by.clone();
        }
        if let Some(dir) = params.get("sort_dir").and_then(|v| SortDir::parse(v)) {
            state.sort_dir = dir;
        }
        for key in &state.defaults.filter_keys {
            if let Some(value) = params.get(key)
                && !value.is_empty()
            {
                state.filters.insert(key.clone(), value.clone());
            }
        }

        state
    }

    /// Restores a state from a raw query string (`a=1&b=2`).
    #[must_use]
    pub fn from_query_str(defaults: TableDefaults, query: &str) -> Self {
        let pairs: Vec<(String, String)> =
            serde_html_form::from_str(query).unwrap_or_default();
        let params = pairs.into_iter().collect();
        Self::restore(defaults, &params)
    }

    #[must_use]
    pub fn defaults(&self) -> &TableDefaults {
        &self.defaults
    }

    /// Applies a partial update. Sort and filter changes reset the page to 1
    /// unless the update carries an explicit page.
    pub fn set_filters(&mut self, change: StateChange) {
        let touched = change.touches_state();

        if let Some(limit) = change.limit {
            self.limit = limit.max(1);
        }

        match change.sort_by.as_deref() {
            // Empty string clears sorting back to the view default.
            Some("") => {
                self.sort_by = self.defaults.sort_by.clone();
                self.sort_dir = self.defaults.sort_dir;
            }
            Some(field) => {
                self.sort_by = field.to_string();
                if let Some(dir) = change.sort_dir {
                    self.sort_dir = dir;
                }
            }
            None => {
                if let Some(dir) = change.sort_dir {
                    self.sort_dir = dir;
                }
            }
        }

        for (key, value) in change.filters {
            if value.is_empty() {
                self.filters.remove(&key);
            } else {
                self.filters.insert(key, value);
            }
        }

        match change.page {
            Some(page) => self.page = page.max(1),
            None if touched => self.page = 1,
            None => {}
        }
    }

    /// Column header click: the current column flips direction, a new column
    /// starts ascending. Either way the state lands on page 1.
    pub fn toggle_sort(&mut self, field: &str) {
        if self.sort_by == field {
            self.sort_dir = self.sort_dir.toggled();
        } else {
            self.sort_by = field.to_string();
            self.sort_dir = SortDir::Asc;
        }
        self.page = 1;
    }

    /// Restores the default sort field and direction without touching
    /// filters.
    pub fn reset_sort(&mut self) {
        self.sort_by = self.defaults.sort_by.clone();
        self.sort_dir = self.defaults.sort_dir;
        self.page = 1;
    }

    pub fn set_limit(&mut self, limit: usize) {
        self.limit = limit.max(1);
        self.page = 1;
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    /// The complete state as ordered key/value pairs: pinned filters first,
    /// then page/limit/sort, then user filters. Pinned keys win over user
    /// values for the same name.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs: Vec<(String, String)> = self
            .defaults
            .filters
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        pairs.push(("page".to_string(), self.page.to_string()));
        pairs.push(("limit".to_string(), self.limit.to_string()));
        pairs.push(("sort_by".to_string(), self.sort_by.clone()));
        pairs.push(("sort_dir".to_string(), self.sort_dir.as_str().to_string()));

        for (key, value) in &self.filters {
            if !self.defaults.filters.contains_key(key) {
                pairs.push((key.clone(), value.clone()));
            }
        }

        pairs
    }

    /// The state reduced to what belongs in the address bar: pairs whose
    /// value is non-empty and differs from the view default. An all-default
    /// state serializes to nothing, keeping URLs clean.
    #[must_use]
    pub fn non_default_pairs(&self) -> Vec<(String, String)> {
        self.query_pairs()
            .into_iter()
            .filter(|(key, value)| {
                !value.is_empty()
                    && self.defaults.default_value(key).as_deref() != Some(value.as_str())
            })
            .collect()
    }

    #[must_use]
    pub fn query_string(&self) -> String {
        encode_pairs(&self.query_pairs())
    }

    #[must_use]
    pub fn non_default_query_string(&self) -> String {
        encode_pairs(&self.non_default_pairs())
    }
}

fn encode_pairs(pairs: &[(String, String)]) -> String {
    serde_html_form::to_string(pairs).unwrap_or_default()
}
