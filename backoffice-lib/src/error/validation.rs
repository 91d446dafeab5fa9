//! Form validation errors and the validator that produces them.

use rust_decimal::Decimal;

use crate::model::Row;
use crate::model::Value;

/// Error information for a specific field that failed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldValidationError {
    /// The field that failed validation.
    pub field: String,
    /// Human-readable validation error message.
    pub message: String,
    /// Optional error code.
    pub code: Option<String>,
}

impl FieldValidationError {
    /// Creates a new field validation error.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            code: None,
        }
    }

    /// Creates a new field validation error with an error code.
    pub fn with_code(field: impl Into<String>, message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            code: Some(code.into()),
        }
    }
}

impl std::fmt::Display for FieldValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(code) = &self.code {
            write!(f, "{}: {} ({})", self.field, self.message, code)
        } else {
            write!(f, "{}: {}", self.field, self.message)
        }
    }
}

/// A form was rejected before submission.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Please fill in all required fields: {}", summary(.errors))]
pub struct ValidationError {
    /// Every failed field, in form order.
    pub errors: Vec<FieldValidationError>,
}

fn summary(errors: &[FieldValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationError {
    /// Returns the first failed field.
    pub fn first(&self) -> Option<&FieldValidationError> {
        self.errors.first()
    }

    /// Returns `true` if the given field failed.
    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }
}

/// Collects field checks for a form and reports them together.
///
/// # Example
///
/// ```
/// use backoffice_lib::error::Validator;
///
/// let result = Validator::new()
///     .required("name", "Acme")
///     .required("email", "")
///     .finish();
///
/// assert!(result.unwrap_err().has_field("email"));
/// ```
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<FieldValidationError>,
}

impl Validator {
    /// Creates an empty validator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails the field when the text is empty or whitespace.
    pub fn required(mut self, field: &str, value: &str) -> Self {
        if value.trim().is_empty() {
            self.errors
                .push(FieldValidationError::with_code(field, format!("{field} is required"), "required"));
        }
        self
    }

    /// Fails the field when the optional value is absent.
    pub fn present<T>(mut self, field: &str, value: Option<&T>) -> Self {
        if value.is_none() {
            self.errors
                .push(FieldValidationError::with_code(field, format!("{field} is required"), "required"));
        }
        self
    }

    /// Fails the field when the number is negative. Absent numbers pass.
    pub fn non_negative(mut self, field: &str, value: Option<Decimal>) -> Self {
        if value.is_some_and(|v| v.is_sign_negative() && !v.is_zero()) {
            self.errors.push(FieldValidationError::with_code(
                field,
                format!("{field} must not be negative"),
                "negative",
            ));
        }
        self
    }

    /// Fails every listed field of a form row that is null or blank text.
    pub fn required_fields(self, form: &Row, fields: &[&str]) -> Self {
        fields.iter().fold(self, |v, field| {
            let filled = match form.value(field) {
                Value::Null => false,
                Value::String(s) => !s.trim().is_empty(),
                _ => true,
            };
            v.check_coded(field, filled, format!("{field} is required"), "required")
        })
    }

    /// Fails a numeric form field that is negative or not a number.
    pub fn non_negative_field(self, form: &Row, field: &str) -> Self {
        match form.get_decimal(field) {
            Ok(value) => self.non_negative(field, value),
            Err(_) => self.check_coded(field, false, format!("{field} must be a number"), "number"),
        }
    }

    fn check_coded(mut self, field: &str, ok: bool, message: String, code: &str) -> Self {
        if !ok {
            self.errors.push(FieldValidationError::with_code(field, message, code));
        }
        self
    }

    /// Fails the field when `ok` is false.
    pub fn check(mut self, field: &str, ok: bool, message: impl Into<String>) -> Self {
        if !ok {
            self.errors.push(FieldValidationError::new(field, message));
        }
        self
    }

    /// Returns `Ok` when every check passed.
    pub fn finish(self) -> Result<(), ValidationError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { errors: self.errors })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_rejects_blank() {
        let err = Validator::new()
            .required("name", "  ")
            .required("company", "Acme")
            .finish()
            .unwrap_err();
        assert_eq!(err.errors.len(), 1);
        assert!(err.has_field("name"));
        assert_eq!(err.first().unwrap().code.as_deref(), Some("required"));
    }

    #[test]
    fn test_non_negative_allows_absent_and_zero() {
        assert!(Validator::new()
            .non_negative("budget", None)
            .non_negative("rate", Some(Decimal::ZERO))
            .finish()
            .is_ok());
        assert!(Validator::new()
            .non_negative("rate", Some(Decimal::new(-1, 0)))
            .finish()
            .is_err());
    }

    #[test]
    fn test_form_row_checks() {
        let form = Row::new()
            .set("name", "Acme")
            .set("email", " ")
            .set("budget", "-5")
            .set("rate", "abc");
        let err = Validator::new()
            .required_fields(&form, &["name", "email", "company"])
            .non_negative_field(&form, "budget")
            .non_negative_field(&form, "rate")
            .non_negative_field(&form, "missing")
            .finish()
            .unwrap_err();
        let fields: Vec<&str> = err.errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["email", "company", "budget", "rate"]);
        assert_eq!(err.errors[3].code.as_deref(), Some("number"));
    }

    #[test]
    fn test_display_lists_fields() {
        let err = Validator::new()
            .required("name", "")
            .required("email", "")
            .finish()
            .unwrap_err();
        let text = err.to_string();
        assert!(text.contains("name: name is required"));
        assert!(text.contains("email"));
    }
}
