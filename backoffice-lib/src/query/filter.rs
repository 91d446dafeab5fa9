//! Filter conditions for remote queries.

use std::cmp::Ordering;
use std::fmt;

use crate::model::TableRow;
use crate::model::Value;

/// A filter condition for querying rows.
///
/// Filters combine through `And`/`Or`. A store evaluates them with
/// [`Filter::matches`], or translates them into its own query language.
///
/// # Example
///
/// ```
/// use backoffice_lib::query::Filter;
///
/// // Simple equality filter
/// let filter = Filter::eq("status", "active");
///
/// // Free-text search across several columns
/// let search = Filter::search(&["name", "email", "company"], "acme").unwrap();
///
/// // Using combinators
/// let filter = filter.and_also(search);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Equality: `field = value`
    Eq(String, Value),
    /// Not equal: `field <> value`
    Ne(String, Value),
    /// Greater than: `field > value`
    Gt(String, Value),
    /// Greater than or equal: `field >= value`
    Ge(String, Value),
    /// Less than: `field < value`
    Lt(String, Value),
    /// Less than or equal: `field <= value`
    Le(String, Value),
    /// Case-insensitive substring match: `field ilike '%value%'`
    Contains(String, String),
    /// Is null: `field is null`
    IsNull(String),
    /// Is not null: `field is not null`
    IsNotNull(String),
    /// Logical AND of multiple filters.
    And(Vec<Filter>),
    /// Logical OR of multiple filters.
    Or(Vec<Filter>),
}

impl Filter {
    /// Creates an equality filter.
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::Eq(field.into(), value.into())
    }

    /// Creates a not-equal filter.
    pub fn ne(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::Ne(field.into(), value.into())
    }

    /// Creates a greater-than filter.
    pub fn gt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::Gt(field.into(), value.into())
    }

    /// Creates a greater-than-or-equal filter.
    pub fn ge(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::Ge(field.into(), value.into())
    }

    /// Creates a less-than filter.
    pub fn lt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::Lt(field.into(), value.into())
    }

    /// Creates a less-than-or-equal filter.
    pub fn le(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::Le(field.into(), value.into())
    }

    /// Creates a case-insensitive contains filter.
    pub fn contains(field: impl Into<String>, value: impl Into<String>) -> Self {
        Filter::Contains(field.into(), value.into())
    }

    /// Creates an is-null filter.
    pub fn is_null(field: impl Into<String>) -> Self {
        Filter::IsNull(field.into())
    }

    /// Creates an is-not-null filter.
    pub fn is_not_null(field: impl Into<String>) -> Self {
        Filter::IsNotNull(field.into())
    }

    /// Creates a logical AND of multiple filters.
    pub fn and(filters: impl IntoIterator<Item = Filter>) -> Self {
        Filter::And(filters.into_iter().collect())
    }

    /// Creates a logical OR of multiple filters.
    pub fn or(filters: impl IntoIterator<Item = Filter>) -> Self {
        Filter::Or(filters.into_iter().collect())
    }

    /// ORs a case-insensitive contains over every field.
    ///
    /// Returns `None` when `text` is blank or no fields are given.
    pub fn search(fields: &[&str], text: &str) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() || fields.is_empty() {
            return None;
        }
        Some(Filter::or(fields.iter().map(|f| Filter::contains(*f, text))))
    }

    /// Combines this filter with another using logical AND.
    pub fn and_also(self, other: Filter) -> Self {
        match self {
            Filter::And(mut filters) => {
                filters.push(other);
                Filter::And(filters)
            }
            _ => Filter::And(vec![self, other]),
        }
    }

    /// Combines this filter with another using logical OR.
    pub fn or_else(self, other: Filter) -> Self {
        match self {
            Filter::Or(mut filters) => {
                filters.push(other);
                Filter::Or(filters)
            }
            _ => Filter::Or(vec![self, other]),
        }
    }

    /// Evaluates the filter against a row.
    ///
    /// Comparisons between incompatible types never match. An empty `And`
    /// matches everything, an empty `Or` matches nothing.
    pub fn matches<R: TableRow>(&self, row: &R) -> bool {
        let cmp = |field: &str, value: &Value| row.field(field).compare(value);
        match self {
            Filter::Eq(f, v) => cmp(f, v) == Some(Ordering::Equal),
            Filter::Ne(f, v) => matches!(cmp(f, v), Some(o) if o != Ordering::Equal),
            Filter::Gt(f, v) => cmp(f, v) == Some(Ordering::Greater),
            Filter::Ge(f, v) => matches!(cmp(f, v), Some(Ordering::Greater | Ordering::Equal)),
            Filter::Lt(f, v) => cmp(f, v) == Some(Ordering::Less),
            Filter::Le(f, v) => matches!(cmp(f, v), Some(Ordering::Less | Ordering::Equal)),
            Filter::Contains(f, needle) => {
                let value = row.field(f);
                !value.is_null()
                    && value
                        .to_string()
                        .to_lowercase()
                        .contains(&needle.to_lowercase())
            }
            Filter::IsNull(f) => row.field(f).is_null(),
            Filter::IsNotNull(f) => !row.field(f).is_null(),
            Filter::And(filters) => filters.iter().all(|f| f.matches(row)),
            Filter::Or(filters) => filters.iter().any(|f| f.matches(row)),
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let join = |f: &mut fmt::Formatter<'_>, filters: &[Filter], op: &str| {
            let parts: Vec<_> = filters.iter().map(ToString::to_string).collect();
            write!(f, "({})", parts.join(op))
        };
        match self {
            Filter::Eq(field, v) => write!(f, "{field} = '{v}'"),
            Filter::Ne(field, v) => write!(f, "{field} <> '{v}'"),
            Filter::Gt(field, v) => write!(f, "{field} > '{v}'"),
            Filter::Ge(field, v) => write!(f, "{field} >= '{v}'"),
            Filter::Lt(field, v) => write!(f, "{field} < '{v}'"),
            Filter::Le(field, v) => write!(f, "{field} <= '{v}'"),
            Filter::Contains(field, v) => write!(f, "{field} ilike '%{v}%'"),
            Filter::IsNull(field) => write!(f, "{field} is null"),
            Filter::IsNotNull(field) => write!(f, "{field} is not null"),
            Filter::And(filters) => join(f, filters, " and "),
            Filter::Or(filters) => join(f, filters, " or "),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Row;

    fn acme() -> Row {
        Row::new()
            .set("name", "Jane Doe")
            .set("company", "ACME Corp")
            .set("budget", 5000i64)
            .set("phone", Value::Null)
    }

    #[test]
    fn test_contains_is_case_insensitive() {
        assert!(Filter::contains("company", "acme").matches(&acme()));
        assert!(Filter::contains("name", "DOE").matches(&acme()));
        assert!(!Filter::contains("phone", "").matches(&acme()));
    }

    #[test]
    fn test_comparisons() {
        let row = acme();
        assert!(Filter::gt("budget", 4000i64).matches(&row));
        assert!(Filter::ge("budget", 5000i64).matches(&row));
        assert!(!Filter::lt("budget", 5000i64).matches(&row));
        assert!(Filter::ne("budget", 1i64).matches(&row));
        assert!(!Filter::eq("budget", "5000").matches(&row));
    }

    #[test]
    fn test_search() {
        let row = acme();
        let hit = Filter::search(&["name", "company"], "corp").unwrap();
        let miss = Filter::search(&["name", "company"], "globex").unwrap();
        assert!(hit.matches(&row));
        assert!(!miss.matches(&row));
        assert!(Filter::search(&["name"], "   ").is_none());
        assert!(Filter::search(&[], "acme").is_none());
    }

    #[test]
    fn test_null_checks() {
        let row = acme();
        assert!(Filter::is_null("phone").matches(&row));
        assert!(Filter::is_null("missing").matches(&row));
        assert!(Filter::is_not_null("name").matches(&row));
    }

    #[test]
    fn test_combinators() {
        let f = Filter::eq("a", 1i64).and_also(Filter::eq("b", 2i64));
        assert!(matches!(&f, Filter::And(v) if v.len() == 2));
        let f = f.and_also(Filter::eq("c", 3i64));
        assert!(matches!(&f, Filter::And(v) if v.len() == 3));

        assert!(Filter::and([]).matches(&acme()));
        assert!(!Filter::or([]).matches(&acme()));
    }

    #[test]
    fn test_display() {
        let f = Filter::search(&["name", "email"], "jo").unwrap();
        assert_eq!(f.to_string(), "(name ilike '%jo%' or email ilike '%jo%')");
    }
}
