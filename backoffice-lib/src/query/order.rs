//! Ordering types for queries.

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

/// Sort direction for ordering results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Ascending order (A-Z, 0-9).
    #[default]
    Asc,
    /// Descending order (Z-A, 9-0).
    Desc,
}

impl SortOrder {
    /// Returns the opposite direction.
    pub fn flip(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }

    /// Returns `"asc"` or `"desc"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Specifies the ordering of query results.
///
/// Multiple fields can be chained together for secondary sorting.
///
/// # Example
///
/// ```
/// use backoffice_lib::query::OrderBy;
///
/// let order = OrderBy::desc("created_at").then_asc("name");
/// assert_eq!(order.fields().len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub(crate) fields: Vec<(String, SortOrder)>,
}

impl OrderBy {
    /// Creates an order on a single field.
    pub fn by(field: impl Into<String>, order: SortOrder) -> Self {
        Self {
            fields: vec![(field.into(), order)],
        }
    }

    /// Creates an ascending order on a field.
    pub fn asc(field: impl Into<String>) -> Self {
        Self::by(field, SortOrder::Asc)
    }

    /// Creates a descending order on a field.
    pub fn desc(field: impl Into<String>) -> Self {
        Self::by(field, SortOrder::Desc)
    }

    /// Adds a secondary ascending order on a field.
    pub fn then_asc(mut self, field: impl Into<String>) -> Self {
        self.fields.push((field.into(), SortOrder::Asc));
        self
    }

    /// Adds a secondary descending order on a field.
    pub fn then_desc(mut self, field: impl Into<String>) -> Self {
        self.fields.push((field.into(), SortOrder::Desc));
        self
    }

    /// Returns the ordered fields with their directions.
    pub fn fields(&self) -> &[(String, SortOrder)] {
        &self.fields
    }
}

impl fmt::Display for OrderBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<_> = self
            .fields
            .iter()
            .map(|(field, order)| format!("{field} {order}"))
            .collect();
        f.write_str(&parts.join(", "))
    }
}
