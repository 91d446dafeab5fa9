//! Table filters and per-screen table state

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use crate::query::Filter;
use crate::query::OrderBy;
use crate::query::Query;
use crate::query::SortOrder;

use super::result::RangeSummary;

/// Search text, per-column filters and the active sort of one table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableFilters {
    /// Free-text search across the screen's search fields.
    pub search: String,
    /// Column key to filter text.
    pub column_filters: BTreeMap<String, String>,
    /// Active sort column, if any.
    pub sort_by: Option<String>,
    pub sort_order: SortOrder,
}

impl TableFilters {
    /// Returns the active sort direction of a column, if it is the sort key.
    pub fn sort_of(&self, key: &str) -> Option<SortOrder> {
        (self.sort_by.as_deref() == Some(key)).then_some(self.sort_order)
    }

    /// Returns `true` if search or column filters differ from `other`.
    pub fn narrows_differently(&self, other: &TableFilters) -> bool {
        self.search != other.search || self.column_filters != other.column_filters
    }
}

/// A partial update of [`TableFilters`]; unset parts keep their value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterPatch {
    pub search: Option<String>,
    pub column_filters: Option<BTreeMap<String, String>>,
    pub sort_by: Option<String>,
    pub sort_order: Option<SortOrder>,
}

impl FilterPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = Some(text.into());
        self
    }

    pub fn column_filters(mut self, filters: BTreeMap<String, String>) -> Self {
        self.column_filters = Some(filters);
        self
    }

    pub fn sort(mut self, key: impl Into<String>, order: SortOrder) -> Self {
        self.sort_by = Some(key.into());
        self.sort_order = Some(order);
        self
    }
}

/// Filters, page position and column visibility of one table.
///
/// Any change to the search text or the column filters moves back to page 1.
/// Sorting alone never changes the page.
///
/// # Example
///
/// ```
/// use backoffice_lib::table::TableState;
///
/// let mut state = TableState::new(["name", "email"], 10);
/// state.set_page(4);
/// state.toggle_sort("name");
/// assert_eq!(state.page(), 4);
///
/// state.set_search("acme");
/// assert_eq!(state.page(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableState {
    filters: TableFilters,
    page: usize,
    page_size: usize,
    columns: Vec<String>,
    hidden: BTreeSet<String>,
}

impl TableState {
    /// Creates a state on page 1 with every column visible.
    pub fn new<I, S>(columns: I, page_size: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            filters: TableFilters::default(),
            page: 1,
            page_size: page_size.max(1),
            columns: columns.into_iter().map(Into::into).collect(),
            hidden: BTreeSet::new(),
        }
    }

    pub fn filters(&self) -> &TableFilters {
        &self.filters
    }

    /// Current 1-based page.
    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Sets the search text. Returns `true` if it changed.
    pub fn set_search(&mut self, text: impl Into<String>) -> bool {
        self.merge_filters(FilterPatch::new().search(text))
    }

    /// Sets one column filter; blank text removes it. Returns `true` if it changed.
    pub fn set_column_filter(&mut self, key: impl Into<String>, value: impl Into<String>) -> bool {
        let mut column_filters = self.filters.column_filters.clone();
        let (key, value) = (key.into(), value.into());
        if value.trim().is_empty() {
            column_filters.remove(&key);
        } else {
            column_filters.insert(key, value);
        }
        self.merge_filters(FilterPatch::new().column_filters(column_filters))
    }

    /// Removes one column filter. Returns `true` if one was set.
    pub fn clear_column_filter(&mut self, key: &str) -> bool {
        self.set_column_filter(key, "")
    }

    /// Applies a partial filter update.
    ///
    /// Resets to page 1 when the search text or the column filters changed.
    /// Returns `true` if anything changed.
    pub fn merge_filters(&mut self, patch: FilterPatch) -> bool {
        let previous = self.filters.clone();
        if let Some(search) = patch.search {
            self.filters.search = search;
        }
        if let Some(column_filters) = patch.column_filters {
            self.filters.column_filters = column_filters;
        }
        if let Some(sort_by) = patch.sort_by {
            self.filters.sort_by = Some(sort_by);
        }
        if let Some(sort_order) = patch.sort_order {
            self.filters.sort_order = sort_order;
        }
        if self.filters.narrows_differently(&previous) {
            self.page = 1;
        }
        self.filters != previous
    }

    /// Sorts by a column in the given direction. Keeps the page.
    pub fn set_sort(&mut self, key: impl Into<String>, order: SortOrder) {
        self.merge_filters(FilterPatch::new().sort(key, order));
    }

    /// Flips the direction if `key` is already the sort column, otherwise
    /// sorts ascending by it. Keeps the page.
    pub fn toggle_sort(&mut self, key: &str) {
        let order = match self.filters.sort_of(key) {
            Some(order) => order.flip(),
            None => SortOrder::Asc,
        };
        self.set_sort(key, order);
    }

    /// Moves to a page; values below 1 become 1.
    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    /// Changes the page size and moves to page 1.
    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
        self.page = 1;
    }

    /// Keeps the page inside `[1, max(total_pages, 1)]` for `total` rows.
    pub fn clamp_page(&mut self, total: usize) {
        let last = total.div_ceil(self.page_size).max(1);
        self.page = self.page.clamp(1, last);
    }

    /// Flips the visibility of a column. Returns the new visibility, or
    /// `None` for unknown keys.
    pub fn toggle_column(&mut self, key: &str) -> Option<bool> {
        if !self.columns.iter().any(|c| c == key) {
            return None;
        }
        if self.hidden.remove(key) {
            Some(true)
        } else {
            self.hidden.insert(key.to_string());
            Some(false)
        }
    }

    pub fn is_visible(&self, key: &str) -> bool {
        !self.hidden.contains(key) && self.columns.iter().any(|c| c == key)
    }

    /// Visible column keys, in column order.
    pub fn visible_columns(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| !self.hidden.contains(c.as_str()))
            .map(String::as_str)
            .collect()
    }

    /// Builds the query for the current page.
    ///
    /// Search text is matched against `search_fields`; each column filter
    /// becomes a case-insensitive contains on its column. Without an active
    /// sort, `default_order` applies.
    pub fn to_query(&self, search_fields: &[&str], default_order: Option<&OrderBy>) -> Query {
        let mut query = Query::new()
            .search(search_fields, &self.filters.search)
            .page(self.page, self.page_size);
        for (key, value) in &self.filters.column_filters {
            query = query.filter(Filter::contains(key.as_str(), value.as_str()));
        }
        let order = match &self.filters.sort_by {
            Some(key) => Some(OrderBy::by(key.as_str(), self.filters.sort_order)),
            None => default_order.cloned(),
        };
        match order {
            Some(order) => query.order_by(order),
            None => query,
        }
    }

    /// "Showing x to y of z entries" for `total` rows.
    pub fn range_summary(&self, total: usize) -> RangeSummary {
        RangeSummary::new(self.page, self.page_size, total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> TableState {
        let mut s = TableState::new(["name", "email", "company", "actions"], 10);
        s.set_page(5);
        s
    }

    #[test]
    fn test_search_change_resets_page() {
        let mut s = state();
        assert!(s.set_search("acme"));
        assert_eq!(s.page(), 1);

        s.set_page(3);
        assert!(!s.set_search("acme"));
        assert_eq!(s.page(), 3);
    }

    #[test]
    fn test_column_filter_change_resets_page() {
        let mut s = state();
        assert!(s.set_column_filter("company", "globex"));
        assert_eq!(s.page(), 1);

        s.set_page(2);
        assert!(s.clear_column_filter("company"));
        assert_eq!(s.page(), 1);

        s.set_page(2);
        assert!(!s.clear_column_filter("company"));
        assert_eq!(s.page(), 2);
    }

    #[test]
    fn test_sort_change_keeps_page() {
        let mut s = state();
        s.toggle_sort("name");
        assert_eq!(s.filters().sort_of("name"), Some(SortOrder::Asc));
        s.toggle_sort("name");
        assert_eq!(s.filters().sort_of("name"), Some(SortOrder::Desc));
        s.toggle_sort("email");
        assert_eq!(s.filters().sort_of("email"), Some(SortOrder::Asc));
        assert_eq!(s.filters().sort_of("name"), None);
        s.set_sort("company", SortOrder::Desc);
        assert_eq!(s.page(), 5);
    }

    #[test]
    fn test_merge_with_sort_only_keeps_page() {
        let mut s = state();
        let patch = FilterPatch::new().sort("name", SortOrder::Desc);
        assert!(s.merge_filters(patch));
        assert_eq!(s.page(), 5);

        let patch = FilterPatch::new().search("x").sort("name", SortOrder::Asc);
        s.merge_filters(patch);
        assert_eq!(s.page(), 1);
    }

    #[test]
    fn test_page_size_resets_and_clamp() {
        let mut s = state();
        s.set_page_size(50);
        assert_eq!(s.page(), 1);
        assert_eq!(s.page_size(), 50);

        s.set_page(9);
        s.clamp_page(120);
        assert_eq!(s.page(), 3);
        s.clamp_page(0);
        assert_eq!(s.page(), 1);
        s.set_page(0);
        assert_eq!(s.page(), 1);
    }

    #[test]
    fn test_column_visibility() {
        let mut s = state();
        assert_eq!(s.toggle_column("email"), Some(false));
        assert_eq!(s.visible_columns(), vec!["name", "company", "actions"]);
        assert_eq!(s.toggle_column("email"), Some(true));
        assert_eq!(s.toggle_column("nope"), None);
        assert!(!s.is_visible("nope"));
    }

    #[test]
    fn test_to_query() {
        let mut s = state();
        s.set_search("jo");
        s.set_column_filter("company", "acme");
        s.set_page(2);
        let default = OrderBy::desc("created_at");

        let q = s.to_query(&["name", "email"], Some(&default));
        assert_eq!(q.range_bounds(), Some((10, 19)));
        assert_eq!(q.order(), Some(&default));
        assert_eq!(q.filters(), &[Filter::contains("company", "acme")]);
        assert_eq!(q.search_terms().map(|s| s.text.as_str()), Some("jo"));

        s.toggle_sort("name");
        let q = s.to_query(&["name"], Some(&default));
        assert_eq!(q.order(), Some(&OrderBy::asc("name")));
    }
}
