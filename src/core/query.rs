//! Query state for list screens and server-side query parameters

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Page size used when a screen does not configure one
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Sentinel filter value meaning "no restriction"
pub const FILTER_ALL: &str = "all";

/// Sort direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// The opposite direction, for header-click toggling
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

/// Sort field and direction
///
/// # Format
/// - `field:asc` or `field` (ascending)
/// - `field:desc` (descending)
///
/// # Example
/// ```
/// use bizlist::core::query::{SortDirection, SortSpec};
///
/// let sort: SortSpec = "created_at:desc".parse().unwrap();
/// assert_eq!(sort.key, "created_at");
/// assert_eq!(sort.direction, SortDirection::Desc);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub key: String,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(key: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            key: key.into(),
            direction,
        }
    }

    pub fn asc(key: impl Into<String>) -> Self {
        Self::new(key, SortDirection::Asc)
    }

    pub fn desc(key: impl Into<String>) -> Self {
        Self::new(key, SortDirection::Desc)
    }
}

impl FromStr for SortSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (key, direction) = match s.split_once(':') {
            Some((key, "asc")) => (key, SortDirection::Asc),
            Some((key, "desc")) => (key, SortDirection::Desc),
            Some((_, other)) => return Err(format!("invalid sort direction '{other}'")),
            None => (s, SortDirection::Asc),
        };

        let key = key.trim();
        if key.is_empty() {
            return Err("sort key must not be empty".to_string());
        }

        Ok(Self::new(key, direction))
    }
}

impl fmt::Display for SortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let direction = match self.direction {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        };
        write!(f, "{}:{}", self.key, direction)
    }
}

/// Selected value of a categorical filter
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterValue {
    /// No restriction (the "all" option of a select box)
    #[default]
    All,
    /// Keep only items whose field equals this value
    Only(String),
}

impl FilterValue {
    pub fn is_all(&self) -> bool {
        matches!(self, FilterValue::All)
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        if value.eq_ignore_ascii_case(FILTER_ALL) {
            FilterValue::All
        } else {
            FilterValue::Only(value.to_string())
        }
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        FilterValue::from(value.as_str())
    }
}

impl<T: Into<FilterValue>> From<Option<T>> for FilterValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(FilterValue::All, Into::into)
    }
}

/// Client-side view state of one list screen.
///
/// Every setter that changes what the filtered set contains resets `page`
/// to 1. The page stored here is a request; readers clamp it against the
/// current filtered count (see `ListController::page`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryState {
    search_term: String,
    filters: IndexMap<String, FilterValue>,
    sort: Option<SortSpec>,
    page: usize,
    page_size: usize,
}

impl Default for QueryState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl QueryState {
    /// Create a query state with a fixed page size (minimum 1)
    pub fn new(page_size: usize) -> Self {
        Self {
            search_term: String::new(),
            filters: IndexMap::new(),
            sort: None,
            page: 1,
            page_size: page_size.max(1),
        }
    }

    /// Builder-style initial sort
    pub fn with_sort(mut self, sort: Option<SortSpec>) -> Self {
        self.sort = sort;
        self
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn filters(&self) -> &IndexMap<String, FilterValue> {
        &self.filters
    }

    /// Filters that actually restrict the set
    pub fn active_filters(&self) -> impl Iterator<Item = (&str, &str)> {
        self.filters.iter().filter_map(|(name, value)| match value {
            FilterValue::All => None,
            FilterValue::Only(v) => Some((name.as_str(), v.as_str())),
        })
    }

    pub fn filter(&self, name: &str) -> &FilterValue {
        static ALL: FilterValue = FilterValue::All;
        self.filters.get(name).unwrap_or(&ALL)
    }

    pub fn sort(&self) -> Option<&SortSpec> {
        self.sort.as_ref()
    }

    /// Requested page (1-based, unclamped)
    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
        self.page = 1;
    }

    pub fn set_filter(&mut self, name: impl Into<String>, value: impl Into<FilterValue>) {
        self.filters.insert(name.into(), value.into());
        self.page = 1;
    }

    pub fn clear_filter(&mut self, name: &str) {
        self.filters.shift_remove(name);
        self.page = 1;
    }

    pub fn set_sort(&mut self, key: impl Into<String>, direction: SortDirection) {
        self.sort = Some(SortSpec::new(key, direction));
        self.page = 1;
    }

    pub fn clear_sort(&mut self) {
        self.sort = None;
        self.page = 1;
    }

    pub(crate) fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    /// Reset search, filters and page, keeping sort and page size
    pub fn reset(&mut self) {
        self.search_term.clear();
        self.filters.clear();
        self.page = 1;
    }
}

/// Query parameters forwarded verbatim to a list endpoint.
///
/// Used for predicates the backend applies itself (e.g. `status=won`).
///
/// # Example
/// ```
/// use bizlist::core::query::QueryParams;
///
/// let params = QueryParams::new().with("status", "won").with("owner", "me");
/// assert_eq!(params.get("status"), Some("won"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryParams(IndexMap<String, String>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_state_defaults() {
        let state = QueryState::default();
        assert_eq!(state.page(), 1);
        assert_eq!(state.page_size(), DEFAULT_PAGE_SIZE);
        assert_eq!(state.search_term(), "");
        assert!(state.sort().is_none());
        assert!(state.filter("status").is_all());
    }

    #[test]
    fn test_page_size_minimum_one() {
        assert_eq!(QueryState::new(0).page_size(), 1);
    }

    #[test]
    fn test_setters_reset_page() {
        let mut state = QueryState::new(10);

        state.set_page(4);
        state.set_search_term("acme");
        assert_eq!(state.page(), 1);

        state.set_page(4);
        state.set_filter("status", "won");
        assert_eq!(state.page(), 1);

        state.set_page(4);
        state.set_sort("name", SortDirection::Desc);
        assert_eq!(state.page(), 1);

        state.set_page(4);
        state.clear_filter("status");
        assert_eq!(state.page(), 1);
    }

    #[test]
    fn test_all_sentinel_is_inactive() {
        let mut state = QueryState::default();
        state.set_filter("status", "ALL");
        state.set_filter("source", "web");

        let active: Vec<_> = state.active_filters().collect();
        assert_eq!(active, vec![("source", "web")]);
    }

    #[test]
    fn test_filter_value_from_option() {
        assert_eq!(FilterValue::from(None::<&str>), FilterValue::All);
        assert_eq!(
            FilterValue::from(Some("won")),
            FilterValue::Only("won".to_string())
        );
    }

    #[test]
    fn test_sort_spec_parse() {
        assert_eq!("name".parse::<SortSpec>().unwrap(), SortSpec::asc("name"));
        assert_eq!(
            "amount:desc".parse::<SortSpec>().unwrap(),
            SortSpec::desc("amount")
        );
        assert!("amount:sideways".parse::<SortSpec>().is_err());
        assert!(":desc".parse::<SortSpec>().is_err());
    }

    #[test]
    fn test_sort_spec_display() {
        assert_eq!(SortSpec::desc("created_at").to_string(), "created_at:desc");
        assert_eq!(SortDirection::Asc.toggled(), SortDirection::Desc);
    }

    #[test]
    fn test_reset_keeps_sort() {
        let mut state = QueryState::new(5).with_sort(Some(SortSpec::asc("name")));
        state.set_search_term("x");
        state.set_filter("status", "won");
        state.reset();

        assert_eq!(state.search_term(), "");
        assert!(state.filters().is_empty());
        assert_eq!(state.sort(), Some(&SortSpec::asc("name")));
    }

    #[test]
    fn test_query_params_serialize_in_order() {
        let params = QueryParams::new().with("status", "won").with("owner", "me");
        let pairs: Vec<_> = params.iter().collect();
        assert_eq!(pairs, vec![("status", "won"), ("owner", "me")]);
        assert_eq!(
            serde_json::to_string(&params).unwrap(),
            r#"{"status":"won","owner":"me"}"#
        );
    }
}
