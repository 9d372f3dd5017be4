//! `duka-store` — record storage and live query streams.
//!
//! The store is the single mutable source of truth. Every committed mutation
//! to a table publishes a fresh whole-table snapshot to that table's live
//! query stream; nothing outside the store caches records for writing.

pub mod backend;
pub mod error;
pub mod live;
pub mod table;

pub use backend::{InMemoryBackend, StorageBackend};
pub use error::{BackendError, StoreError, StoreResult};
pub use live::{LivePublisher, LiveQuery, Subscription};
pub use table::{StoredRow, Table};
