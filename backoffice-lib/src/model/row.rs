//! Dynamic table row

use std::collections::HashMap;
use std::str::FromStr;

use chrono::DateTime;
use chrono::NaiveDate;
use chrono::NaiveTime;
use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::Value;
use super::types::Money;
use crate::error::FieldError;

/// Name of the primary key field every table row carries.
pub const ID_FIELD: &str = "id";

/// One record as exchanged with the remote store.
///
/// Rows hold field values as a `HashMap<String, Value>`. The typed getters
/// accept either the native variant or a string that parses into it, so rows
/// decoded from JSON work the same as rows built in code.
///
/// # Example
///
/// ```
/// use backoffice_lib::model::Row;
///
/// let row = Row::new()
///     .set("company", "Acme")
///     .set("status", "active");
///
/// assert_eq!(row.get_string("company").unwrap(), Some("Acme"));
/// assert_eq!(row.get_string("phone").unwrap(), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    pub(crate) fields: HashMap<String, Value>,
}

impl Row {
    /// Creates an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty row with the given id.
    pub fn with_id(id: Uuid) -> Self {
        Self::new().set(ID_FIELD, id)
    }

    /// Returns the row id, if set and well formed.
    pub fn id(&self) -> Option<Uuid> {
        self.get_uuid(ID_FIELD).ok().flatten()
    }

    /// Sets the row id.
    pub fn set_id(&mut self, id: Uuid) {
        self.insert(ID_FIELD, id);
    }

    // =========================================================================
    // Raw field access
    // =========================================================================

    /// Returns a reference to the field value, if it exists.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Returns the field value, or `Value::Null` when absent.
    pub fn value(&self, field: &str) -> Value {
        self.fields.get(field).cloned().unwrap_or_default()
    }

    /// Returns `true` if the row contains the given field.
    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Returns a reference to all fields.
    pub fn fields(&self) -> &HashMap<String, Value> {
        &self.fields
    }

    /// Returns the number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the row has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    // =========================================================================
    // Setters
    // =========================================================================

    /// Sets a field value (builder pattern).
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    /// Inserts a field value.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(field.into(), value.into());
    }

    /// Removes a field and returns its value.
    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.fields.remove(field)
    }

    /// Overwrites this row's fields with every field of `patch`.
    ///
    /// The id of `self` is kept even if the patch carries another one.
    pub fn merge(&mut self, patch: &Row) {
        let id = self.fields.get(ID_FIELD).cloned();
        for (key, value) in &patch.fields {
            self.fields.insert(key.clone(), value.clone());
        }
        if let Some(id) = id {
            self.fields.insert(ID_FIELD.to_string(), id);
        }
    }

    // =========================================================================
    // Typed getters
    //
    // Ok(None) when the field is absent or null, Err on a value of the wrong
    // type or text that does not parse.
    // =========================================================================

    /// Gets a string field value.
    pub fn get_string(&self, field: &str) -> Result<Option<&str>, FieldError> {
        match self.fields.get(field) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.as_str())),
            Some(other) => Err(FieldError::type_mismatch(field, "string", other.type_name())),
        }
    }

    /// Gets a string field value, treating empty text as absent.
    pub fn get_text(&self, field: &str) -> Result<Option<String>, FieldError> {
        Ok(self
            .get_string(field)?
            .filter(|s| !s.is_empty())
            .map(str::to_string))
    }

    /// Gets a boolean field value.
    pub fn get_bool(&self, field: &str) -> Result<Option<bool>, FieldError> {
        match self.fields.get(field) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(Value::String(s)) => parse(field, s).map(Some),
            Some(other) => Err(FieldError::type_mismatch(field, "bool", other.type_name())),
        }
    }

    /// Gets an integer field value.
    pub fn get_i64(&self, field: &str) -> Result<Option<i64>, FieldError> {
        match self.fields.get(field) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Int(n)) => Ok(Some(*n)),
            Some(Value::Decimal(d)) if d.fract().is_zero() => {
                i64::try_from(*d).map(Some).map_err(|_| FieldError::invalid(field, d.to_string()))
            }
            Some(Value::String(s)) => parse(field, s).map(Some),
            Some(other) => Err(FieldError::type_mismatch(field, "int", other.type_name())),
        }
    }

    /// Gets a decimal field value. Integers widen.
    pub fn get_decimal(&self, field: &str) -> Result<Option<Decimal>, FieldError> {
        match self.fields.get(field) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Decimal(d)) => Ok(Some(*d)),
            Some(Value::Int(n)) => Ok(Some(Decimal::from(*n))),
            Some(Value::String(s)) => parse(field, s).map(Some),
            Some(other) => Err(FieldError::type_mismatch(field, "decimal", other.type_name())),
        }
    }

    /// Gets a money field value.
    pub fn get_money(&self, field: &str) -> Result<Option<Money>, FieldError> {
        Ok(self.get_decimal(field)?.map(Money::new))
    }

    /// Gets a UUID field value.
    pub fn get_uuid(&self, field: &str) -> Result<Option<Uuid>, FieldError> {
        match self.fields.get(field) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Uuid(id)) => Ok(Some(*id)),
            Some(Value::String(s)) if s.is_empty() => Ok(None),
            Some(Value::String(s)) => parse(field, s).map(Some),
            Some(other) => Err(FieldError::type_mismatch(field, "uuid", other.type_name())),
        }
    }

    /// Gets a date field value (`YYYY-MM-DD` when stored as text).
    pub fn get_date(&self, field: &str) -> Result<Option<NaiveDate>, FieldError> {
        match self.fields.get(field) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Date(d)) => Ok(Some(*d)),
            Some(Value::DateTime(dt)) => Ok(Some(dt.date_naive())),
            Some(Value::String(s)) if s.is_empty() => Ok(None),
            Some(Value::String(s)) => parse(field, s).map(Some),
            Some(other) => Err(FieldError::type_mismatch(field, "date", other.type_name())),
        }
    }

    /// Gets a time-of-day field value (`HH:MM` or `HH:MM:SS` when stored as text).
    pub fn get_time(&self, field: &str) -> Result<Option<NaiveTime>, FieldError> {
        match self.fields.get(field) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Time(t)) => Ok(Some(*t)),
            Some(Value::String(s)) if s.is_empty() => Ok(None),
            Some(Value::String(s)) => NaiveTime::parse_from_str(s, "%H:%M:%S")
                .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
                .map(Some)
                .map_err(|_| FieldError::invalid(field, s.as_str())),
            Some(other) => Err(FieldError::type_mismatch(field, "time", other.type_name())),
        }
    }

    /// Gets a timestamp field value (RFC 3339 when stored as text).
    pub fn get_datetime(&self, field: &str) -> Result<Option<DateTime<Utc>>, FieldError> {
        match self.fields.get(field) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::DateTime(dt)) => Ok(Some(*dt)),
            Some(Value::String(s)) if s.is_empty() => Ok(None),
            Some(Value::String(s)) => DateTime::parse_from_rfc3339(s)
                .map(|dt| Some(dt.with_timezone(&Utc)))
                .map_err(|_| FieldError::invalid(field, s.as_str())),
            Some(other) => Err(FieldError::type_mismatch(field, "datetime", other.type_name())),
        }
    }

    /// Gets a field parsed through `FromStr` (status enums and the like).
    pub fn get_parsed<T: FromStr>(&self, field: &str) -> Result<Option<T>, FieldError> {
        match self.get_string(field)? {
            None => Ok(None),
            Some(s) => parse(field, s).map(Some),
        }
    }

    // =========================================================================
    // Required getters
    // =========================================================================

    /// Gets a string field that must be present.
    pub fn require_string(&self, field: &str) -> Result<String, FieldError> {
        self.get_string(field)?
            .map(str::to_string)
            .ok_or_else(|| FieldError::missing(field))
    }

    /// Gets a UUID field that must be present.
    pub fn require_uuid(&self, field: &str) -> Result<Uuid, FieldError> {
        self.get_uuid(field)?.ok_or_else(|| FieldError::missing(field))
    }

    /// Gets a date field that must be present.
    pub fn require_date(&self, field: &str) -> Result<NaiveDate, FieldError> {
        self.get_date(field)?.ok_or_else(|| FieldError::missing(field))
    }

    /// Gets a parsed field that must be present.
    pub fn require_parsed<T: FromStr>(&self, field: &str) -> Result<T, FieldError> {
        self.get_parsed(field)?.ok_or_else(|| FieldError::missing(field))
    }
}

fn parse<T: FromStr>(field: &str, text: &str) -> Result<T, FieldError> {
    text.trim().parse().map_err(|_| FieldError::invalid(field, text))
}

impl FromIterator<(String, Value)> for Row {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_getters_parse_text() {
        let id = Uuid::new_v4();
        let row = Row::new()
            .set("id", id.to_string())
            .set("hours", "7.5")
            .set("date", "2024-05-01")
            .set("start_time", "09:30");

        assert_eq!(row.id(), Some(id));
        assert_eq!(row.get_decimal("hours").unwrap(), Some(Decimal::new(75, 1)));
        assert_eq!(row.get_date("date").unwrap(), NaiveDate::from_ymd_opt(2024, 5, 1));
        assert_eq!(row.get_time("start_time").unwrap(), NaiveTime::from_hms_opt(9, 30, 0));
    }

    #[test]
    fn test_absent_and_null_are_none() {
        let row = Row::new().set("rate", Value::Null);
        assert_eq!(row.get_decimal("rate").unwrap(), None);
        assert_eq!(row.get_decimal("hours").unwrap(), None);
        assert_eq!(row.require_uuid("client_id"), Err(FieldError::missing("client_id")));
    }

    #[test]
    fn test_type_mismatch() {
        let row = Row::new().set("company", 5i64);
        assert!(matches!(
            row.get_string("company"),
            Err(FieldError::TypeMismatch { expected: "string", actual: "int", .. })
        ));
    }

    #[test]
    fn test_merge_keeps_id() {
        let id = Uuid::new_v4();
        let mut row = Row::with_id(id).set("status", "pending");
        row.merge(&Row::with_id(Uuid::new_v4()).set("status", "confirmed"));
        assert_eq!(row.id(), Some(id));
        assert_eq!(row.get_string("status").unwrap(), Some("confirmed"));
    }
}
