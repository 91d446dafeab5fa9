//! Error types

mod field;
mod store;
mod validation;

pub use field::*;
pub use store::*;
pub use validation::*;

use crate::config::ConfigError;

/// Errors surfaced by screen controllers and table construction.
///
/// Calculator anomalies never show up here; they resolve to zero-valued
/// aggregates instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The remote store failed or timed out.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A form failed validation before any remote call was made.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A row could not be converted into its typed entity.
    #[error(transparent)]
    Field(#[from] FieldError),

    /// The dashboard configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Two column descriptors in one table share a key.
    #[error("Duplicate column key '{0}'")]
    DuplicateColumn(String),

    /// A status change that the status machine does not allow.
    #[error("Cannot move from '{from}' to '{to}'")]
    InvalidTransition {
        /// Current status.
        from: &'static str,
        /// Requested status.
        to: &'static str,
    },

    /// A row addressed by id is neither loaded nor present remotely.
    #[error("Row {0} not found")]
    RowNotFound(uuid::Uuid),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
