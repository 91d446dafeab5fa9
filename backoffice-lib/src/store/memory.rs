//! In-memory store implementation using DashMap

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use log::debug;
use log::trace;
use log::warn;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use uuid::Uuid;

use super::ChangeEvent;
use super::ChangeKind;
use super::ChangeStream;
use super::RemoteStore;
use crate::error::StoreError;
use crate::model::Row;
use crate::query::Query;
use crate::query::QueryResult;
use crate::query::SortOrder;

const EVENT_CAPACITY: usize = 256;

/// A store backed by a concurrent hash map of tables.
///
/// Rows keep insertion order. Inserts assign a v4 id and a `created_at`
/// timestamp when the row has none. Every mutation is broadcast to
/// subscribers.
///
/// # Example
///
/// ```
/// use backoffice_lib::store::InMemoryStore;
///
/// let store = InMemoryStore::new().with_table("clients");
/// assert_eq!(store.len("clients"), 0);
/// ```
#[derive(Debug)]
pub struct InMemoryStore {
    tables: DashMap<String, Vec<Row>>,
    events: broadcast::Sender<ChangeEvent>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    /// Creates a store with no tables.
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            tables: DashMap::new(),
            events,
        }
    }

    /// Adds an empty table.
    pub fn with_table(self, table: impl Into<String>) -> Self {
        self.tables.entry(table.into()).or_default();
        self
    }

    /// Adds several empty tables.
    pub fn with_tables(self, tables: &[&str]) -> Self {
        tables.iter().fold(self, |store, t| store.with_table(*t))
    }

    /// Loads rows into a table, creating it if needed. No events are sent.
    pub fn seed(&self, table: &str, rows: impl IntoIterator<Item = Row>) {
        let mut entry = self.tables.entry(table.to_string()).or_default();
        for mut row in rows {
            if row.id().is_none() {
                row.set_id(Uuid::new_v4());
            }
            entry.push(row);
        }
    }

    /// Returns the number of rows in a table, zero if it does not exist.
    pub fn len(&self, table: &str) -> usize {
        self.tables.get(table).map(|t| t.len()).unwrap_or(0)
    }

    /// Returns `true` if the table is missing or holds no rows.
    pub fn is_empty(&self, table: &str) -> bool {
        self.len(table) == 0
    }

    /// Returns a copy of every row in a table.
    pub fn rows(&self, table: &str) -> Vec<Row> {
        self.tables.get(table).map(|t| t.clone()).unwrap_or_default()
    }

    /// Returns a copy of one row.
    pub fn get(&self, table: &str, id: Uuid) -> Option<Row> {
        let rows = self.tables.get(table)?;
        rows.iter().find(|r| r.id() == Some(id)).cloned()
    }

    fn publish(&self, event: ChangeEvent) {
        trace!("{} on {} ({:?})", event.kind, event.table, event.id);
        // No receivers is fine.
        let _ = self.events.send(event);
    }
}

#[async_trait]
impl RemoteStore for InMemoryStore {
    async fn query(&self, table: &str, query: &Query) -> Result<QueryResult, StoreError> {
        let rows = self
            .tables
            .get(table)
            .ok_or_else(|| StoreError::UnknownTable(table.to_string()))?;

        let condition = query.condition();
        let mut matched: Vec<Row> = rows
            .iter()
            .filter(|row| condition.as_ref().is_none_or(|c| c.matches(*row)))
            .cloned()
            .collect();
        drop(rows);

        if let Some(order) = query.order() {
            matched.sort_by(|a, b| {
                order
                    .fields()
                    .iter()
                    .map(|(field, dir)| {
                        let ord = a.value(field).sort_cmp(&b.value(field));
                        match dir {
                            SortOrder::Asc => ord,
                            SortOrder::Desc => ord.reverse(),
                        }
                    })
                    .find(|o| o.is_ne())
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
        }

        let total_count = matched.len();
        let rows = match query.row_range() {
            Some(range) if range.start >= total_count || range.start > range.end => Vec::new(),
            Some(range) => {
                let end = range.end.min(total_count - 1);
                matched.drain(range.start..=end).collect()
            }
            None => matched,
        };

        debug!("{table}: {query} -> {} of {total_count}", rows.len());
        Ok(QueryResult::new(rows, total_count))
    }

    async fn insert(&self, table: &str, mut row: Row) -> Result<Row, StoreError> {
        let mut rows = self
            .tables
            .get_mut(table)
            .ok_or_else(|| StoreError::UnknownTable(table.to_string()))?;

        let id = match row.id() {
            Some(id) if rows.iter().any(|r| r.id() == Some(id)) => {
                return Err(StoreError::Conflict {
                    table: table.to_string(),
                    id,
                });
            }
            Some(id) => id,
            None => {
                let id = Uuid::new_v4();
                row.set_id(id);
                id
            }
        };
        if row.value("created_at").is_null() {
            row.insert("created_at", Utc::now());
        }

        rows.push(row.clone());
        drop(rows);

        debug!("{table}: inserted {id}");
        self.publish(ChangeEvent::new(table, ChangeKind::Insert, row.clone()));
        Ok(row)
    }

    async fn update(&self, table: &str, id: Uuid, patch: Row) -> Result<Row, StoreError> {
        let mut rows = self
            .tables
            .get_mut(table)
            .ok_or_else(|| StoreError::UnknownTable(table.to_string()))?;

        let row = rows
            .iter_mut()
            .find(|r| r.id() == Some(id))
            .ok_or_else(|| StoreError::NotFound {
                table: table.to_string(),
                id,
            })?;
        row.merge(&patch);
        let updated = row.clone();
        drop(rows);

        debug!("{table}: updated {id}");
        self.publish(ChangeEvent::new(table, ChangeKind::Update, updated.clone()));
        Ok(updated)
    }

    async fn delete(&self, table: &str, id: Uuid) -> Result<(), StoreError> {
        let mut rows = self
            .tables
            .get_mut(table)
            .ok_or_else(|| StoreError::UnknownTable(table.to_string()))?;

        let index = rows
            .iter()
            .position(|r| r.id() == Some(id))
            .ok_or_else(|| StoreError::NotFound {
                table: table.to_string(),
                id,
            })?;
        let removed = rows.remove(index);
        drop(rows);

        debug!("{table}: deleted {id}");
        self.publish(ChangeEvent::new(table, ChangeKind::Delete, removed));
        Ok(())
    }

    fn subscribe(&self, table: &str, kinds: &[ChangeKind]) -> Result<ChangeStream, StoreError> {
        if !self.tables.contains_key(table) {
            return Err(StoreError::UnknownTable(table.to_string()));
        }

        let mut rx = self.events.subscribe();
        let table = table.to_string();
        let kinds: HashSet<ChangeKind> = kinds.iter().copied().collect();

        Ok(Box::pin(async_stream::stream! {
            loop {
                match rx.recv().await {
                    Ok(event) => {
                        if event.table == table && (kinds.is_empty() || kinds.contains(&event.kind)) {
                            yield event;
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!("Subscription on {table} lagged, {skipped} events skipped");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use futures::StreamExt;

    use super::*;
    use crate::query::Filter;
    use crate::query::OrderBy;
    use crate::query::Range;

    fn client(name: &str, company: &str) -> Row {
        Row::new().set("name", name).set("company", company)
    }

    fn store() -> InMemoryStore {
        let store = InMemoryStore::new();
        store.seed(
            "clients",
            [
                client("Alice", "Acme"),
                client("Bob", "Globex"),
                client("Carol", "Acme Labs"),
                client("Dave", "Initech"),
            ],
        );
        store
    }

    #[tokio::test]
    async fn test_inverted_range_is_empty() {
        let store = store();
        let result = store
            .query("clients", &Query::new().range(Range::new(3, 1)))
            .await
            .unwrap();
        assert!(result.rows.is_empty());
        assert_eq!(result.total_count, 4);
    }

    #[tokio::test]
    async fn test_query_search_sort_range() {
        let store = store();
        let query = Query::new()
            .search(&["name", "company"], "acme")
            .order_by(OrderBy::desc("name"))
            .page(1, 1);
        let result = store.query("clients", &query).await.unwrap();
        assert_eq!(result.total_count, 2);
        assert_eq!(result.rows.len(), 1);
        assert_eq!(result.rows[0].get_string("name").unwrap(), Some("Carol"));
    }

    #[tokio::test]
    async fn test_query_range_past_end() {
        let store = store();
        let result = store
            .query("clients", &Query::new().page(3, 10))
            .await
            .unwrap();
        assert_eq!(result.total_count, 4);
        assert!(result.rows.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_table() {
        let store = store();
        let err = store.query("nope", &Query::new()).await.unwrap_err();
        assert_eq!(err, StoreError::UnknownTable("nope".into()));
    }

    #[tokio::test]
    async fn test_insert_update_delete() {
        let store = store();
        let row = store.insert("clients", client("Eve", "Hooli")).await.unwrap();
        let id = row.id().unwrap();
        assert!(row.get_datetime("created_at").unwrap().is_some());
        assert_eq!(store.len("clients"), 5);

        let dup = store.insert("clients", row.clone()).await.unwrap_err();
        assert!(matches!(dup, StoreError::Conflict { .. }));

        let updated = store
            .update("clients", id, Row::new().set("company", "Pied Piper"))
            .await
            .unwrap();
        assert_eq!(updated.get_string("company").unwrap(), Some("Pied Piper"));
        assert_eq!(updated.get_string("name").unwrap(), Some("Eve"));

        store.delete("clients", id).await.unwrap();
        assert!(store.get("clients", id).is_none());
        let missing = store.delete("clients", id).await.unwrap_err();
        assert!(matches!(missing, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_subscribe_filters_table_and_kind() {
        let store = store().with_table("projects");
        let mut inserts = store.subscribe("clients", &[ChangeKind::Insert]).unwrap();

        store.insert("projects", Row::new().set("name", "X")).await.unwrap();
        let row = store.insert("clients", client("Eve", "Hooli")).await.unwrap();
        store
            .update("clients", row.id().unwrap(), Row::new().set("name", "Eva"))
            .await
            .unwrap();
        let second = store.insert("clients", client("Frank", "Umbrella")).await.unwrap();

        let first = inserts.next().await.unwrap();
        assert_eq!(first.kind, ChangeKind::Insert);
        assert_eq!(first.id, row.id());
        let next = inserts.next().await.unwrap();
        assert_eq!(next.id, second.id());
    }

    #[tokio::test]
    async fn test_filtered_query() {
        let store = store();
        let query = Query::new().filter(Filter::eq("company", "globex"));
        let result = store.query("clients", &query).await.unwrap();
        assert_eq!(result.total_count, 1);
    }
}
