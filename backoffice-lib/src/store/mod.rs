//! Remote tabular store capability
//!
//! Screen controllers talk to persistence only through the [`RemoteStore`]
//! trait. [`InMemoryStore`] is a reference implementation for tests and
//! embedding.

mod memory;

pub use memory::*;

use std::fmt;

use async_trait::async_trait;
use futures::stream::BoxStream;
use uuid::Uuid;

use crate::error::StoreError;
use crate::model::Row;
use crate::query::Query;
use crate::query::QueryResult;

/// Kind of change pushed by a store subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

impl ChangeKind {
    /// Every change kind.
    pub const ALL: &'static [ChangeKind] = &[ChangeKind::Insert, ChangeKind::Update, ChangeKind::Delete];
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ChangeKind::Insert => "INSERT",
            ChangeKind::Update => "UPDATE",
            ChangeKind::Delete => "DELETE",
        })
    }
}

/// A change to one row of one table.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeEvent {
    pub table: String,
    pub kind: ChangeKind,
    pub id: Option<Uuid>,
    /// Row after the change; for deletes, the removed row.
    pub row: Option<Row>,
}

impl ChangeEvent {
    /// Creates an event for a row.
    pub fn new(table: impl Into<String>, kind: ChangeKind, row: Row) -> Self {
        Self {
            table: table.into(),
            kind,
            id: row.id(),
            row: Some(row),
        }
    }
}

/// Stream of change events returned by [`RemoteStore::subscribe`].
pub type ChangeStream = BoxStream<'static, ChangeEvent>;

/// A remote tabular data service.
///
/// Implementations must be safe to call concurrently; controllers issue
/// overlapping queries and never cancel in-flight calls.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Runs a query and returns the rows in its range plus the total match count.
    async fn query(&self, table: &str, query: &Query) -> Result<QueryResult, StoreError>;

    /// Inserts a row and returns it as stored, with its id assigned.
    async fn insert(&self, table: &str, row: Row) -> Result<Row, StoreError>;

    /// Merges `patch` into the row with the given id and returns the result.
    async fn update(&self, table: &str, id: Uuid, patch: Row) -> Result<Row, StoreError>;

    /// Deletes the row with the given id.
    async fn delete(&self, table: &str, id: Uuid) -> Result<(), StoreError>;

    /// Subscribes to changes of the given kinds on a table.
    ///
    /// An empty `kinds` slice subscribes to every kind.
    fn subscribe(&self, table: &str, kinds: &[ChangeKind]) -> Result<ChangeStream, StoreError>;
}
