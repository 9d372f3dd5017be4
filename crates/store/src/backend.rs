//! Persistent storage backend seam.
//!
//! The store requires very little from its backend: durable keyed rows per
//! table with write-then-readback consistency. Commit notification is the
//! store's own job (it publishes a snapshot after every successful write),
//! so the backend stays a plain keyed byte sink.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value as JsonValue;

use duka_core::RecordKey;

use crate::error::BackendError;

/// Durable keyed storage per table.
///
/// Rows cross this boundary as JSON payloads; typed translation lives in the
/// table layer. Implementations must be safe to share across tasks.
#[async_trait]
pub trait StorageBackend: std::fmt::Debug + Send + Sync {
    /// Persist (insert or replace) one row.
    async fn persist(&self, table: &str, key: RecordKey, row: JsonValue)
    -> Result<(), BackendError>;

    /// Remove one row. Removing an absent key is a no-op for the backend;
    /// existence checks belong to the table.
    async fn remove(&self, table: &str, key: RecordKey) -> Result<(), BackendError>;

    /// Load every persisted row of a table, ordered by key.
    async fn load_table(&self, table: &str) -> Result<Vec<(RecordKey, JsonValue)>, BackendError>;
}

/// In-memory backend for tests/dev.
///
/// "Durable" for the lifetime of the process: a table reopened against the
/// same backend instance sees every committed row.
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    rows: Mutex<HashMap<(String, RecordKey), JsonValue>>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StorageBackend for InMemoryBackend {
    async fn persist(
        &self,
        table: &str,
        key: RecordKey,
        row: JsonValue,
    ) -> Result<(), BackendError> {
        let mut rows = self
            .rows
            .lock()
            .map_err(|_| BackendError::new("lock poisoned"))?;
        rows.insert((table.to_string(), key), row);
        Ok(())
    }

    async fn remove(&self, table: &str, key: RecordKey) -> Result<(), BackendError> {
        let mut rows = self
            .rows
            .lock()
            .map_err(|_| BackendError::new("lock poisoned"))?;
        rows.remove(&(table.to_string(), key));
        Ok(())
    }

    async fn load_table(&self, table: &str) -> Result<Vec<(RecordKey, JsonValue)>, BackendError> {
        let rows = self
            .rows
            .lock()
            .map_err(|_| BackendError::new("lock poisoned"))?;

        let mut loaded: Vec<(RecordKey, JsonValue)> = rows
            .iter()
            .filter(|((t, _), _)| t == table)
            .map(|((_, k), v)| (*k, v.clone()))
            .collect();
        loaded.sort_by_key(|(k, _)| *k);
        Ok(loaded)
    }
}
