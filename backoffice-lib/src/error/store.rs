//! Remote store error types

use std::time::Duration;

use uuid::Uuid;

/// Errors reported by a [`RemoteStore`](crate::store::RemoteStore).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StoreError {
    /// The backing service rejected the call.
    #[error("Service error {status}: {message}")]
    Service {
        /// Status code reported by the service.
        status: u16,
        /// Error message.
        message: String,
    },

    /// The table does not exist.
    #[error("Unknown table: {0}")]
    UnknownTable(String),

    /// No row with the given id exists in the table.
    #[error("Row {id} not found in {table}")]
    NotFound {
        /// Table that was searched.
        table: String,
        /// Id that was requested.
        id: Uuid,
    },

    /// A row with the same id already exists.
    #[error("Row {id} already exists in {table}")]
    Conflict {
        /// Table the insert targeted.
        table: String,
        /// Conflicting id.
        id: Uuid,
    },

    /// The row is not acceptable to the store.
    #[error("Invalid row: {0}")]
    InvalidRow(String),

    /// The call did not finish in time.
    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    /// The change subscription was closed by the store.
    #[error("Subscription closed")]
    Closed,
}

impl StoreError {
    /// Creates a new service error.
    pub fn service(status: u16, message: impl Into<String>) -> Self {
        Self::Service {
            status,
            message: message.into(),
        }
    }

    /// Returns the service status code if this is a service error.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Service { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns `true` if repeating the call could succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Service { status, .. } => matches!(status, 429 | 500 | 502 | 503 | 504),
            Self::Timeout(_) => true,
            _ => false,
        }
    }
}
