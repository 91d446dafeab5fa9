//! FieldError for Row accessors

/// Error type for typed field access on a [`Row`](crate::model::Row).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FieldError {
    /// The requested field is absent or null.
    #[error("Field '{field}' is missing")]
    Missing { field: String },

    /// The field holds a value of another type.
    #[error("Field '{field}' type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        field: String,
        expected: &'static str,
        actual: &'static str,
    },

    /// The field holds text that does not parse as the expected value.
    #[error("Field '{field}' has invalid value '{value}'")]
    Invalid { field: String, value: String },
}

impl FieldError {
    /// Creates a new missing field error.
    pub fn missing(field: impl Into<String>) -> Self {
        Self::Missing {
            field: field.into(),
        }
    }

    /// Creates a new type mismatch error.
    pub fn type_mismatch(field: impl Into<String>, expected: &'static str, actual: &'static str) -> Self {
        Self::TypeMismatch {
            field: field.into(),
            expected,
            actual,
        }
    }

    /// Creates a new invalid value error.
    pub fn invalid(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Invalid {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Returns the name of the offending field.
    pub fn field(&self) -> &str {
        match self {
            Self::Missing { field } | Self::TypeMismatch { field, .. } | Self::Invalid { field, .. } => field,
        }
    }
}
