//! Keyed tables with whole-snapshot change notification.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use duka_core::RecordKey;

use crate::backend::StorageBackend;
use crate::error::{StoreError, StoreResult};
use crate::live::{self, LivePublisher, LiveQuery};

/// A row as stored: key plus typed payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRow<R> {
    pub key: RecordKey,
    pub row: R,
}

#[derive(Debug)]
struct TableInner<R> {
    rows: BTreeMap<RecordKey, R>,
    next_key: RecordKey,
}

impl<R: Clone> TableInner<R> {
    fn snapshot(&self) -> Vec<StoredRow<R>> {
        self.rows
            .iter()
            .map(|(key, row)| StoredRow {
                key: *key,
                row: row.clone(),
            })
            .collect()
    }
}

/// One table of the record store.
///
/// Mutations run under a single write lock: persist through the backend,
/// commit to the in-memory map, publish the new snapshot. A read that starts
/// after a write's durability point therefore observes that write; a failed
/// backend write changes nothing and publishes nothing.
///
/// Snapshots are ordered by key, which is assignment (insertion) order.
#[derive(Debug)]
pub struct Table<R> {
    name: &'static str,
    backend: Arc<dyn StorageBackend>,
    inner: Mutex<TableInner<R>>,
    publisher: LivePublisher<Vec<StoredRow<R>>>,
}

impl<R> Table<R>
where
    R: Clone + Serialize + DeserializeOwned + Send + Sync + 'static,
{
    /// Open a table, loading every persisted row from the backend.
    ///
    /// A persisted row that no longer deserializes as `R` is a corrupted row
    /// or a schema bug: the open fails with `StoreError::Translation` rather
    /// than silently dropping data.
    pub async fn open(name: &'static str, backend: Arc<dyn StorageBackend>) -> StoreResult<Self> {
        let mut rows = BTreeMap::new();
        for (key, payload) in backend.load_table(name).await? {
            let row: R = serde_json::from_value(payload).map_err(|e| {
                StoreError::translation(format!("table {name}, key {key}: {e}"))
            })?;
            rows.insert(key, row);
        }

        let next_key = rows
            .keys()
            .next_back()
            .map(RecordKey::next)
            .unwrap_or_else(|| RecordKey::new(1));

        debug!(table = name, rows = rows.len(), "table opened");

        let inner = TableInner { rows, next_key };
        let (publisher, _) = live::channel(inner.snapshot());

        Ok(Self {
            name,
            backend,
            inner: Mutex::new(inner),
            publisher,
        })
    }

    /// Insert a row, assigning the next key.
    pub async fn insert(&self, row: R) -> StoreResult<RecordKey> {
        let mut inner = self.inner.lock().await;
        let key = inner.next_key;

        let payload = serde_json::to_value(&row).map_err(|e| {
            StoreError::translation(format!("table {}: {e}", self.name))
        })?;
        if let Err(err) = self.backend.persist(self.name, key, payload).await {
            warn!(table = self.name, %key, error = %err, "insert rejected by backend");
            return Err(err.into());
        }

        inner.next_key = key.next();
        inner.rows.insert(key, row);
        self.publisher.publish(inner.snapshot());
        Ok(key)
    }

    /// Replace the row stored under `key`.
    pub async fn update(&self, key: RecordKey, row: R) -> StoreResult<()> {
        let mut inner = self.inner.lock().await;
        if !inner.rows.contains_key(&key) {
            return Err(StoreError::NotFound);
        }

        let payload = serde_json::to_value(&row).map_err(|e| {
            StoreError::translation(format!("table {}: {e}", self.name))
        })?;
        if let Err(err) = self.backend.persist(self.name, key, payload).await {
            warn!(table = self.name, %key, error = %err, "update rejected by backend");
            return Err(err.into());
        }

        inner.rows.insert(key, row);
        self.publisher.publish(inner.snapshot());
        Ok(())
    }

    /// Remove the row stored under `key`.
    pub async fn delete(&self, key: RecordKey) -> StoreResult<()> {
        let mut inner = self.inner.lock().await;
        if !inner.rows.contains_key(&key) {
            return Err(StoreError::NotFound);
        }

        if let Err(err) = self.backend.remove(self.name, key).await {
            warn!(table = self.name, %key, error = %err, "delete rejected by backend");
            return Err(err.into());
        }

        inner.rows.remove(&key);
        self.publisher.publish(inner.snapshot());
        Ok(())
    }

    /// Live query over the full table.
    ///
    /// Subscribing always yields the latest committed snapshot first, then
    /// one snapshot per committed mutation, in commit order. The query
    /// executes once per mutation regardless of subscriber count.
    pub fn live(&self) -> LiveQuery<Vec<StoredRow<R>>> {
        self.publisher.query()
    }

    /// The current committed snapshot.
    pub async fn all(&self) -> Vec<StoredRow<R>> {
        self.inner.lock().await.snapshot()
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::InMemoryBackend;
    use crate::error::BackendError;
    use async_trait::async_trait;
    use serde::Deserialize;
    use serde_json::Value as JsonValue;
    use std::time::Duration;

    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    struct NoteRow {
        text: String,
    }

    fn note(text: &str) -> NoteRow {
        NoteRow {
            text: text.to_string(),
        }
    }

    /// Backend that accepts loads but rejects every write.
    #[derive(Debug)]
    struct RejectingBackend;

    #[async_trait]
    impl StorageBackend for RejectingBackend {
        async fn persist(
            &self,
            _table: &str,
            _key: RecordKey,
            _row: JsonValue,
        ) -> Result<(), BackendError> {
            Err(BackendError::new("disk full"))
        }

        async fn remove(&self, _table: &str, _key: RecordKey) -> Result<(), BackendError> {
            Err(BackendError::new("disk full"))
        }

        async fn load_table(
            &self,
            _table: &str,
        ) -> Result<Vec<(RecordKey, JsonValue)>, BackendError> {
            Ok(vec![])
        }
    }

    async fn open_notes(backend: Arc<dyn StorageBackend>) -> Table<NoteRow> {
        Table::open("notes", backend).await.unwrap()
    }

    #[tokio::test]
    async fn insert_assigns_monotonic_keys() {
        let table = open_notes(Arc::new(InMemoryBackend::new())).await;

        let first = table.insert(note("a")).await.unwrap();
        let second = table.insert(note("b")).await.unwrap();
        assert!(second > first);

        let rows = table.all().await;
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].key, first);
        assert_eq!(rows[1].key, second);
    }

    #[tokio::test]
    async fn update_and_delete_of_missing_key_fail_with_not_found() {
        let table = open_notes(Arc::new(InMemoryBackend::new())).await;
        let missing = RecordKey::new(99);

        assert!(table.update(missing, note("x")).await.unwrap_err().is_not_found());
        assert!(table.delete(missing).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn deleting_the_same_key_twice_fails_the_second_time() {
        let table = open_notes(Arc::new(InMemoryBackend::new())).await;
        let key = table.insert(note("a")).await.unwrap();

        table.delete(key).await.unwrap();
        assert!(table.delete(key).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn new_subscription_first_sees_all_committed_rows() {
        let table = open_notes(Arc::new(InMemoryBackend::new())).await;
        table.insert(note("a")).await.unwrap();
        table.insert(note("b")).await.unwrap();
        table.insert(note("c")).await.unwrap();

        // Snapshot freshness: the first emission equals the committed state
        // at subscription time, however many mutations preceded it.
        let mut sub = table.live().subscribe();
        let rows = sub.recv().await.unwrap();
        let texts: Vec<&str> = rows.iter().map(|r| r.row.text.as_str()).collect();
        assert_eq!(texts, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn subscribers_observe_emissions_in_commit_order() {
        let table = open_notes(Arc::new(InMemoryBackend::new())).await;
        let mut first = table.live().subscribe();
        let mut second = table.live().subscribe();

        first.recv().await.unwrap();
        second.recv().await.unwrap();

        let mut first_seen = Vec::new();
        let mut second_seen = Vec::new();
        for text in ["a", "b", "c"] {
            table.insert(note(text)).await.unwrap();
            first_seen.push(first.recv().await.unwrap().len());
            second_seen.push(second.recv().await.unwrap().len());
        }

        assert_eq!(first_seen, vec![1, 2, 3]);
        assert_eq!(first_seen, second_seen);
    }

    #[tokio::test]
    async fn update_replaces_row_content_under_same_key() {
        let table = open_notes(Arc::new(InMemoryBackend::new())).await;
        let key = table.insert(note("draft")).await.unwrap();

        table.update(key, note("final")).await.unwrap();

        let rows = table.all().await;
        assert_eq!(rows, vec![StoredRow { key, row: note("final") }]);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_backend_write_changes_nothing_and_emits_nothing() {
        let table = open_notes(Arc::new(RejectingBackend)).await;
        let mut sub = table.live().subscribe();
        assert_eq!(sub.recv().await.unwrap(), vec![]);

        let err = table.insert(note("a")).await.unwrap_err();
        assert!(matches!(err, StoreError::Backend(_)));

        assert!(table.all().await.is_empty());
        // No spurious emission after the rejected write.
        let quiet = tokio::time::timeout(Duration::from_millis(50), sub.recv()).await;
        assert!(quiet.is_err());
    }

    #[tokio::test]
    async fn reopened_table_sees_persisted_rows_and_continues_keys() {
        let backend = Arc::new(InMemoryBackend::new());

        let table = open_notes(backend.clone()).await;
        let first = table.insert(note("a")).await.unwrap();
        drop(table);

        let reopened = open_notes(backend).await;
        let rows = reopened.all().await;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].key, first);

        let second = reopened.insert(note("b")).await.unwrap();
        assert!(second > first);
    }

    #[tokio::test]
    async fn corrupted_persisted_row_fails_open() {
        let backend = Arc::new(InMemoryBackend::new());
        backend
            .persist("notes", RecordKey::new(1), serde_json::json!(42))
            .await
            .unwrap();

        let err = Table::<NoteRow>::open("notes", backend).await.unwrap_err();
        assert!(matches!(err, StoreError::Translation(_)));
    }
}
