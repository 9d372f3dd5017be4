//! Stock repository: `stock_items` table plus row↔domain projection.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;

use duka_core::RecordKey;
use duka_stock::StockItem;
use duka_store::live::LiveQuery;
use duka_store::{StorageBackend, StoreResult, StoredRow, Table};

use crate::projector::project_live;
use crate::stored_key;

const TABLE: &str = "stock_items";

/// Storage row for a stock item. The key lives beside the row, not in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockRow {
    pub name: String,
    pub quantity: u32,
    pub buying_price: i64,
    pub selling_price: i64,
    pub reorder_point: u32,
}

fn to_row(item: &StockItem) -> StockRow {
    StockRow {
        name: item.name.clone(),
        quantity: item.quantity,
        buying_price: item.buying_price,
        selling_price: item.selling_price,
        reorder_point: item.reorder_point,
    }
}

fn to_domain(stored: &StoredRow<StockRow>) -> StockItem {
    StockItem {
        id: Some(stored.key),
        name: stored.row.name.clone(),
        quantity: stored.row.quantity,
        buying_price: stored.row.buying_price,
        selling_price: stored.row.selling_price,
        reorder_point: stored.row.reorder_point,
    }
}

/// Repository over the `stock_items` table.
pub struct StockRepository {
    table: Arc<Table<StockRow>>,
    items: LiveQuery<Vec<StockItem>>,
    projector: JoinHandle<()>,
}

impl StockRepository {
    pub async fn open(backend: Arc<dyn StorageBackend>) -> StoreResult<Self> {
        let table = Arc::new(Table::open(TABLE, backend).await?);
        let (items, projector) = project_live(&table, to_domain).await;
        Ok(Self {
            table,
            items,
            projector,
        })
    }

    /// Live list of all stock items, projected to domain values.
    pub fn all_items(&self) -> LiveQuery<Vec<StockItem>> {
        self.items.clone()
    }

    /// Insert a new item. The returned key is also what the emitted domain
    /// values carry as `id`.
    pub async fn add(&self, item: &StockItem) -> StoreResult<RecordKey> {
        self.table.insert(to_row(item)).await
    }

    /// Replace a stored item. Fails with `NotFound` for a stale key.
    pub async fn update(&self, item: &StockItem) -> StoreResult<()> {
        let key = stored_key(item.id)?;
        self.table.update(key, to_row(item)).await
    }

    /// Remove a stored item. Fails with `NotFound` for a stale key.
    pub async fn delete(&self, item: &StockItem) -> StoreResult<()> {
        let key = stored_key(item.id)?;
        self.table.delete(key).await
    }
}

impl Drop for StockRepository {
    fn drop(&mut self) {
        self.projector.abort();
    }
}
