//! Client-side list controller: search, filter, sort and paginate a fetched collection

use crate::core::field::FieldValue;
use crate::core::query::{FilterValue, QueryState, SortDirection, SortSpec};
use crate::core::Entity;
use crate::list::paginator::{self, PaginationMeta};
use serde::Serialize;

/// Derive the visible collection from raw items and query state.
///
/// Pure: the same inputs always give the same output and `items` is never
/// touched. Steps, in order:
/// 1. free-text search over `search_fields` (case-insensitive substring,
///    any field may match, empty term matches all)
/// 2. every non-"all" filter keeps items whose field equals the value
/// 3. stable sort by the sort key, if any
pub fn derive<'a, T: Entity>(
    items: &'a [T],
    query: &QueryState,
    search_fields: &[String],
) -> Vec<&'a T> {
    let needle = query.search_term().trim().to_lowercase();
    let filters: Vec<(&str, &str)> = query.active_filters().collect();

    let mut view: Vec<&T> = items
        .iter()
        .filter(|item| matches_search(*item, &needle, search_fields))
        .filter(|item| {
            filters.iter().all(|(field, expected)| {
                item.field_value(field)
                    .is_some_and(|value| value.matches_filter(expected))
            })
        })
        .collect();

    if let Some(sort) = query.sort() {
        sort_view(&mut view, sort);
    }

    view
}

fn matches_search<T: Entity>(item: &T, needle: &str, fields: &[String]) -> bool {
    if needle.is_empty() {
        return true;
    }
    fields.iter().any(|field| {
        item.field_value(field)
            .is_some_and(|value| value.contains_text(needle))
    })
}

fn sort_view<T: Entity>(view: &mut [&T], sort: &SortSpec) {
    // Each key is read once; sort_by is stable so ties keep input order.
    let mut keyed: Vec<(Option<FieldValue>, &T)> = view
        .iter()
        .map(|item| (item.field_value(&sort.key), *item))
        .collect();

    keyed.sort_by(|(a, _), (b, _)| {
        let ordering = FieldValue::sort_cmp(a.as_ref(), b.as_ref());
        match sort.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });

    for (slot, (_, item)) in view.iter_mut().zip(keyed) {
        *slot = item;
    }
}

/// One rendered page of a list screen
#[derive(Debug, Serialize)]
pub struct ListView<'a, T> {
    pub items: Vec<&'a T>,
    pub pagination: PaginationMeta,
}

/// Holds the full fetched collection plus the user's query state.
///
/// The filtered/sorted view is never stored; it is recomputed from
/// `(items, query)` whenever it is read.
///
/// # Example
/// ```rust,ignore
/// let mut leads = ListController::<Lead>::new(10);
/// leads.replace_items(fetched);
/// leads.set_search_term("acme");
/// leads.set_filter("status", "qualified");
/// leads.set_sort("created_at", SortDirection::Desc);
///
/// let page = leads.view();
/// println!("{} of {}", page.pagination.page, page.pagination.total_pages);
/// ```
#[derive(Debug, Clone)]
pub struct ListController<T: Entity> {
    items: Vec<T>,
    query: QueryState,
    search_fields: Vec<String>,
}

impl<T: Entity> Default for ListController<T> {
    fn default() -> Self {
        Self::with_query(QueryState::default())
    }
}

impl<T: Entity> ListController<T> {
    /// Empty controller with a fixed page size, searching `T::search_fields()`
    pub fn new(page_size: usize) -> Self {
        Self::with_query(QueryState::new(page_size))
    }

    pub fn with_query(query: QueryState) -> Self {
        Self {
            items: Vec::new(),
            query,
            search_fields: T::search_fields().iter().map(|f| f.to_string()).collect(),
        }
    }

    /// Override the fields free-text search looks at
    pub fn with_search_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.search_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Raw collection as last fetched
    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn query(&self) -> &QueryState {
        &self.query
    }

    pub fn search_fields(&self) -> &[String] {
        &self.search_fields
    }

    pub fn find(&self, id: &str) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Replace the raw collection wholesale (no merge with the previous one)
    pub fn replace_items(&mut self, items: Vec<T>) {
        self.items = items;
        let page = self.page();
        self.query.set_page(page);
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.query.set_search_term(term);
    }

    pub fn set_filter(&mut self, name: impl Into<String>, value: impl Into<FilterValue>) {
        self.query.set_filter(name, value);
    }

    pub fn clear_filter(&mut self, name: &str) {
        self.query.clear_filter(name);
    }

    pub fn set_sort(&mut self, key: impl Into<String>, direction: SortDirection) {
        self.query.set_sort(key, direction);
    }

    /// Sort by `key`, flipping the direction if it is already the sort key
    pub fn toggle_sort(&mut self, key: &str) {
        let direction = match self.query.sort() {
            Some(current) if current.key == key => current.direction.toggled(),
            _ => SortDirection::Asc,
        };
        self.query.set_sort(key, direction);
    }

    /// Clear search and filters, keeping sort
    pub fn reset_query(&mut self) {
        self.query.reset();
    }

    /// Filtered and sorted view of the whole collection
    pub fn derive(&self) -> Vec<&T> {
        derive(&self.items, &self.query, &self.search_fields)
    }

    /// Number of items passing search and filters
    pub fn filtered_count(&self) -> usize {
        self.derive().len()
    }

    pub fn page_count(&self) -> usize {
        paginator::page_count(self.filtered_count(), self.query.page_size())
    }

    /// Current page, clamped against the current filtered count
    pub fn page(&self) -> usize {
        paginator::clamp_page(
            self.query.page(),
            self.filtered_count(),
            self.query.page_size(),
        )
    }

    pub fn go_to_page(&mut self, page: usize) -> usize {
        let clamped =
            paginator::clamp_page(page, self.filtered_count(), self.query.page_size());
        self.query.set_page(clamped);
        clamped
    }

    pub fn next_page(&mut self) -> usize {
        self.go_to_page(self.page().saturating_add(1))
    }

    pub fn previous_page(&mut self) -> usize {
        self.go_to_page(self.page().saturating_sub(1))
    }

    /// Items on the current page
    pub fn page_items(&self) -> Vec<&T> {
        self.view().items
    }

    /// Current page together with its pagination metadata
    pub fn view(&self) -> ListView<'_, T> {
        let derived = self.derive();
        let total = derived.len();
        let page_size = self.query.page_size();
        let page = paginator::clamp_page(self.query.page(), total, page_size);

        ListView {
            items: paginator::paginate(&derived, page, page_size).to_vec(),
            pagination: PaginationMeta::new(page, page_size, total),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    #[derive(Clone, Debug)]
    struct Row {
        id: String,
        name: String,
        company: Option<String>,
        status: String,
        created_at: Option<DateTime<Utc>>,
    }

    impl Entity for Row {
        fn resource_name() -> &'static str {
            "rows"
        }

        fn resource_name_singular() -> &'static str {
            "row"
        }

        fn id(&self) -> &str {
            &self.id
        }

        fn search_fields() -> &'static [&'static str] {
            &["name", "company"]
        }

        fn field_value(&self, field: &str) -> Option<FieldValue> {
            match field {
                "name" => Some(FieldValue::String(self.name.clone())),
                "company" => self.company.clone().map(FieldValue::String),
                "status" => Some(FieldValue::String(self.status.clone())),
                "created_at" => self.created_at.map(FieldValue::DateTime),
                _ => None,
            }
        }
    }

    fn row(id: usize, name: &str, company: Option<&str>, status: &str) -> Row {
        Row {
            id: id.to_string(),
            name: name.to_string(),
            company: company.map(str::to_string),
            status: status.to_string(),
            created_at: Some(Utc.with_ymd_and_hms(2024, 1, id as u32 % 28 + 1, 0, 0, 0).unwrap()),
        }
    }

    fn ids<T: Entity>(items: &[&T]) -> Vec<String> {
        items.iter().map(|i| i.id().to_string()).collect()
    }

    #[test]
    fn test_search_matches_any_configured_field() {
        let mut list = ListController::new(10);
        list.replace_items(vec![
            row(1, "Ada", Some("Acme Inc"), "new"),
            row(2, "Bob", Some("Beta Co"), "new"),
            row(3, "acme fan", None, "new"),
        ]);

        list.set_search_term("ACME");
        assert_eq!(ids(&list.derive()), vec!["1", "3"]);
    }

    #[test]
    fn test_missing_field_does_not_match() {
        let mut list = ListController::new(10);
        list.replace_items(vec![row(1, "Ada", None, "new")]);

        list.set_filter("company", "Acme");
        assert!(list.derive().is_empty());

        list.set_filter("company", "all");
        list.set_filter("nonexistent", "x");
        assert!(list.derive().is_empty());
    }

    #[test]
    fn test_search_fields_override() {
        let mut list = ListController::new(10).with_search_fields(["status"]);
        list.replace_items(vec![row(1, "Ada", None, "won"), row(2, "Won Li", None, "lost")]);

        list.set_search_term("won");
        assert_eq!(ids(&list.derive()), vec!["1"]);
    }

    #[test]
    fn test_missing_sort_key_sorts_first() {
        let mut dated = row(1, "a", None, "new");
        dated.created_at = Some(Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap());
        let mut undated = row(2, "b", None, "new");
        undated.created_at = None;

        let mut list = ListController::new(10);
        list.replace_items(vec![dated, undated]);

        list.set_sort("created_at", SortDirection::Asc);
        assert_eq!(ids(&list.derive()), vec!["2", "1"]);

        list.set_sort("created_at", SortDirection::Desc);
        assert_eq!(ids(&list.derive()), vec!["1", "2"]);
    }

    #[test]
    fn test_sort_ties_keep_input_order() {
        let mut list = ListController::new(10);
        list.replace_items(vec![
            row(1, "same", None, "x"),
            row(2, "Same", None, "x"),
            row(3, "a", None, "x"),
        ]);

        list.set_sort("name", SortDirection::Asc);
        assert_eq!(ids(&list.derive()), vec!["3", "1", "2"]);

        list.set_sort("name", SortDirection::Desc);
        assert_eq!(ids(&list.derive()), vec!["1", "2", "3"]);
    }

    #[test]
    fn test_toggle_sort() {
        let mut list: ListController<Row> = ListController::new(10);
        list.toggle_sort("name");
        assert_eq!(list.query().sort(), Some(&SortSpec::asc("name")));
        list.toggle_sort("name");
        assert_eq!(list.query().sort(), Some(&SortSpec::desc("name")));
        list.toggle_sort("status");
        assert_eq!(list.query().sort(), Some(&SortSpec::asc("status")));
    }

    #[test]
    fn test_replace_items_clamps_page() {
        let mut list = ListController::new(10);
        list.replace_items((1..=30).map(|i| row(i, "n", None, "x")).collect());
        assert_eq!(list.go_to_page(3), 3);

        list.replace_items((1..=12).map(|i| row(i, "n", None, "x")).collect());
        assert_eq!(list.query().page(), 2);
        assert_eq!(list.page_items().len(), 2);
    }

    #[test]
    fn test_page_clamped_on_read_after_filter_shrinks() {
        let mut list = ListController::new(2);
        list.replace_items(vec![
            row(1, "a", None, "won"),
            row(2, "b", None, "lost"),
            row(3, "c", None, "lost"),
            row(4, "d", None, "lost"),
            row(5, "e", None, "won"),
        ]);
        list.go_to_page(3);

        // Filter resets to page 1 regardless
        list.set_filter("status", "won");
        assert_eq!(list.page(), 1);
        assert_eq!(ids(&list.page_items()), vec!["1", "5"]);
    }

    #[test]
    fn test_view_of_empty_collection() {
        let list: ListController<Row> = ListController::new(10);
        let view = list.view();
        assert!(view.items.is_empty());
        assert_eq!(view.pagination.page, 1);
        assert_eq!(view.pagination.total_pages, 1);
    }

    #[test]
    fn test_find_by_id() {
        let mut list = ListController::new(10);
        list.replace_items(vec![row(1, "a", None, "x")]);
        assert!(list.find("1").is_some());
        assert!(list.find("2").is_none());
    }
}
