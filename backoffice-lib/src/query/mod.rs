//! Query description handed to a [`RemoteStore`](crate::store::RemoteStore).
//!
//! # Shared Types
//!
//! - [`Filter`] - Filter conditions
//! - [`OrderBy`] / [`SortOrder`] - Ordering of results
//! - [`Range`] - Inclusive row range for one page
//! - [`Query`] - Search, filters, order and range combined
//! - [`QueryResult`] - Rows plus the total count of matching rows

mod filter;
mod order;
mod range;

pub use filter::Filter;
pub use order::OrderBy;
pub use order::SortOrder;
pub use range::Range;

use crate::model::Row;

/// Free-text search across several columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Search {
    /// Columns the text is matched against.
    pub fields: Vec<String>,
    /// Text to look for, matched case-insensitively.
    pub text: String,
}

/// A query against one remote table.
///
/// # Example
///
/// ```
/// use backoffice_lib::query::{Filter, OrderBy, Query};
///
/// let query = Query::new()
///     .search(&["name", "email", "company"], "acme")
///     .filter(Filter::eq("status", "active"))
///     .order_by(OrderBy::desc("created_at"))
///     .page(2, 25);
///
/// assert_eq!(query.range_bounds(), Some((25, 49)));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    search: Option<Search>,
    filters: Vec<Filter>,
    order_by: Option<OrderBy>,
    range: Option<Range>,
}

impl Query {
    /// Creates a query that returns every row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the free-text search. Blank text clears it.
    pub fn search(mut self, fields: &[&str], text: &str) -> Self {
        let text = text.trim();
        self.search = (!text.is_empty() && !fields.is_empty()).then(|| Search {
            fields: fields.iter().map(|f| (*f).to_string()).collect(),
            text: text.to_string(),
        });
        self
    }

    /// Adds a filter condition, ANDed with the others.
    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Sets the ordering of results.
    pub fn order_by(mut self, order: OrderBy) -> Self {
        self.order_by = Some(order);
        self
    }

    /// Limits the result to an inclusive row range.
    pub fn range(mut self, range: Range) -> Self {
        self.range = Some(range);
        self
    }

    /// Drops the row range so every matching row is returned.
    pub fn unbounded(mut self) -> Self {
        self.range = None;
        self
    }

    /// Limits the result to one 1-based page.
    pub fn page(self, page: usize, page_size: usize) -> Self {
        self.range(Range::for_page(page, page_size))
    }

    /// Returns the search, if any.
    pub fn search_terms(&self) -> Option<&Search> {
        self.search.as_ref()
    }

    /// Returns the filters.
    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    /// Returns the ordering, if any.
    pub fn order(&self) -> Option<&OrderBy> {
        self.order_by.as_ref()
    }

    /// Returns the row range, if any.
    pub fn row_range(&self) -> Option<Range> {
        self.range
    }

    /// Returns `(start, end)` of the row range, if any.
    pub fn range_bounds(&self) -> Option<(usize, usize)> {
        self.range.map(|r| (r.start, r.end))
    }

    /// Folds search and filters into one condition.
    ///
    /// Returns `None` when the query matches every row.
    pub fn condition(&self) -> Option<Filter> {
        let search = self.search.as_ref().and_then(|s| {
            let fields: Vec<&str> = s.fields.iter().map(String::as_str).collect();
            Filter::search(&fields, &s.text)
        });
        let mut parts: Vec<Filter> = search.into_iter().collect();
        parts.extend(self.filters.iter().cloned());
        match parts.len() {
            0 => None,
            1 => parts.pop(),
            _ => Some(Filter::And(parts)),
        }
    }
}

impl std::fmt::Display for Query {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.condition() {
            Some(c) => write!(f, "where {c}")?,
            None => f.write_str("all")?,
        }
        if let Some(order) = &self.order_by {
            write!(f, " order by {order}")?;
        }
        if let Some(r) = self.range {
            write!(f, " range {}-{}", r.start, r.end)?;
        }
        Ok(())
    }
}

/// Rows returned by a query, with the count of all matching rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryResult {
    /// Rows inside the requested range.
    pub rows: Vec<Row>,
    /// Number of rows matching the query, ignoring the range.
    pub total_count: usize,
}

impl QueryResult {
    /// Creates a result.
    pub fn new(rows: Vec<Row>, total_count: usize) -> Self {
        Self { rows, total_count }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_condition_combines_search_and_filters() {
        let q = Query::new()
            .search(&["name"], "jo")
            .filter(Filter::eq("status", "active"));
        let c = q.condition().unwrap();
        assert!(matches!(c, Filter::And(ref v) if v.len() == 2));
    }

    #[test]
    fn test_blank_search_is_dropped() {
        let q = Query::new().search(&["name"], "  ");
        assert!(q.search_terms().is_none());
        assert!(q.condition().is_none());
    }

    #[test]
    fn test_display() {
        let q = Query::new()
            .search(&["name"], "jo")
            .order_by(OrderBy::desc("created_at"))
            .page(1, 10);
        assert_eq!(
            q.to_string(),
            "where (name ilike '%jo%') order by created_at desc range 0-9"
        );
    }
}
