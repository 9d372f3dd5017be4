//! Credit repository: `credit_customers` table plus row↔domain projection.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;

use duka_core::RecordKey;
use duka_credit::CreditCustomer;
use duka_store::live::LiveQuery;
use duka_store::{StorageBackend, StoreResult, StoredRow, Table};

use crate::projector::project_live;
use crate::stored_key;

const TABLE: &str = "credit_customers";

/// Storage row for a credit customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditCustomerRow {
    pub name: String,
    pub phone: String,
    pub credit_amount: i64,
    pub is_blacklisted: bool,
}

fn to_row(customer: &CreditCustomer) -> CreditCustomerRow {
    CreditCustomerRow {
        name: customer.name.clone(),
        phone: customer.phone.clone(),
        credit_amount: customer.credit_amount,
        is_blacklisted: customer.is_blacklisted,
    }
}

fn to_domain(stored: &StoredRow<CreditCustomerRow>) -> CreditCustomer {
    CreditCustomer {
        id: Some(stored.key),
        name: stored.row.name.clone(),
        phone: stored.row.phone.clone(),
        credit_amount: stored.row.credit_amount,
        is_blacklisted: stored.row.is_blacklisted,
    }
}

/// Repository over the `credit_customers` table.
pub struct CreditRepository {
    table: Arc<Table<CreditCustomerRow>>,
    customers: LiveQuery<Vec<CreditCustomer>>,
    projector: JoinHandle<()>,
}

impl CreditRepository {
    pub async fn open(backend: Arc<dyn StorageBackend>) -> StoreResult<Self> {
        let table = Arc::new(Table::open(TABLE, backend).await?);
        let (customers, projector) = project_live(&table, to_domain).await;
        Ok(Self {
            table,
            customers,
            projector,
        })
    }

    /// Live list of all customers, blacklisted ones included.
    pub fn all_customers(&self) -> LiveQuery<Vec<CreditCustomer>> {
        self.customers.clone()
    }

    pub async fn add(&self, customer: &CreditCustomer) -> StoreResult<RecordKey> {
        self.table.insert(to_row(customer)).await
    }

    pub async fn update(&self, customer: &CreditCustomer) -> StoreResult<()> {
        let key = stored_key(customer.id)?;
        self.table.update(key, to_row(customer)).await
    }

    pub async fn delete(&self, customer: &CreditCustomer) -> StoreResult<()> {
        let key = stored_key(customer.id)?;
        self.table.delete(key).await
    }
}

impl Drop for CreditRepository {
    fn drop(&mut self) {
        self.projector.abort();
    }
}
