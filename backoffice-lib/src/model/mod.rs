//! Row model and typed entities

mod bank;
mod client;
mod notification;
mod payroll;
mod profile;
mod project;
mod roster;
mod row;
mod row_serde;
mod status;
pub mod types;
mod value;
mod working_hours;

pub use bank::*;
pub use client::*;
pub use notification::*;
pub use payroll::*;
pub use profile::*;
pub use project::*;
pub use roster::*;
pub use row::*;
pub use status::ParseEnumError;
pub use value::*;
pub use working_hours::*;

use uuid::Uuid;

use crate::error::FieldError;

/// A row type the generic table can display.
///
/// Column descriptors address fields by key; `field` resolves a key to its
/// current value, returning `Value::Null` for unknown keys and for synthetic
/// columns such as "actions".
pub trait TableRow: Clone + Send + Sync + 'static {
    /// Identifier of this row, if it has one.
    fn row_id(&self) -> Option<Uuid>;

    /// Returns the value stored under `key`.
    fn field(&self, key: &str) -> Value;
}

impl TableRow for Row {
    fn row_id(&self) -> Option<Uuid> {
        self.id()
    }

    fn field(&self, key: &str) -> Value {
        self.value(key)
    }
}

/// A typed record persisted in one remote table.
pub trait Entity: TableRow + Sized {
    /// Remote table name.
    const TABLE: &'static str;

    /// Persisted fields, in display order.
    const FIELDS: &'static [&'static str];

    /// Decodes a row returned by the store.
    fn from_row(row: &Row) -> Result<Self, FieldError>;

    /// Encodes every persisted field into a row.
    fn to_row(&self) -> Row {
        Self::FIELDS
            .iter()
            .map(|f| ((*f).to_string(), self.field(f)))
            .collect()
    }
}
