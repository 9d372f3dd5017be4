//! Finance repository: `finance_records` table plus row↔domain projection.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;

use duka_core::RecordKey;
use duka_finance::FinanceRecord;
use duka_store::live::LiveQuery;
use duka_store::{StorageBackend, StoreResult, StoredRow, Table};

use crate::projector::project_live;
use crate::stored_key;

const TABLE: &str = "finance_records";

/// Storage row for a daily cash position. The derived total is never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinanceRecordRow {
    pub date: DateTime<Utc>,
    pub cash: i64,
    pub float: i64,
    pub working_amount: i64,
}

fn to_row(record: &FinanceRecord) -> FinanceRecordRow {
    FinanceRecordRow {
        date: record.date,
        cash: record.cash,
        float: record.float,
        working_amount: record.working_amount,
    }
}

fn to_domain(stored: &StoredRow<FinanceRecordRow>) -> FinanceRecord {
    FinanceRecord {
        id: Some(stored.key),
        date: stored.row.date,
        cash: stored.row.cash,
        float: stored.row.float,
        working_amount: stored.row.working_amount,
    }
}

/// Repository over the `finance_records` table.
pub struct FinanceRepository {
    table: Arc<Table<FinanceRecordRow>>,
    records: LiveQuery<Vec<FinanceRecord>>,
    projector: JoinHandle<()>,
}

impl FinanceRepository {
    pub async fn open(backend: Arc<dyn StorageBackend>) -> StoreResult<Self> {
        let table = Arc::new(Table::open(TABLE, backend).await?);
        let (records, projector) = project_live(&table, to_domain).await;
        Ok(Self {
            table,
            records,
            projector,
        })
    }

    /// Live list of all finance records, in key (insertion) order.
    pub fn all_records(&self) -> LiveQuery<Vec<FinanceRecord>> {
        self.records.clone()
    }

    pub async fn add(&self, record: &FinanceRecord) -> StoreResult<RecordKey> {
        self.table.insert(to_row(record)).await
    }

    pub async fn update(&self, record: &FinanceRecord) -> StoreResult<()> {
        let key = stored_key(record.id)?;
        self.table.update(key, to_row(record)).await
    }

    pub async fn delete(&self, record: &FinanceRecord) -> StoreResult<()> {
        let key = stored_key(record.id)?;
        self.table.delete(key).await
    }
}

impl Drop for FinanceRepository {
    fn drop(&mut self) {
        self.projector.abort();
    }
}
