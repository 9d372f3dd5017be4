//! `duka-repository` — row↔domain translation over live table streams.
//!
//! One repository per entity. Each owns its table, exposes the table's live
//! query projected into domain values, and translates domain writes back
//! into rows. Projections are pure and run once per committed mutation on a
//! background projector task, however many observers subscribe.

pub mod credit;
pub mod finance;
mod projector;
pub mod stock;

use std::sync::Arc;

use duka_core::RecordKey;
use duka_store::{StorageBackend, StoreError, StoreResult};

pub use credit::CreditRepository;
pub use finance::FinanceRepository;
pub use stock::StockRepository;

/// The three repositories opened over one storage backend.
pub struct Repositories {
    pub stock: StockRepository,
    pub credit: CreditRepository,
    pub finance: FinanceRepository,
}

impl Repositories {
    pub async fn open(backend: Arc<dyn StorageBackend>) -> StoreResult<Self> {
        Ok(Self {
            stock: StockRepository::open(backend.clone()).await?,
            credit: CreditRepository::open(backend.clone()).await?,
            finance: FinanceRepository::open(backend).await?,
        })
    }
}

/// A write against an unkeyed domain value is a programmer error, surfaced
/// as a translation failure rather than silently ignored.
pub(crate) fn stored_key(id: Option<RecordKey>) -> StoreResult<RecordKey> {
    id.ok_or_else(|| StoreError::translation("domain value has no key; was it ever stored?"))
}
