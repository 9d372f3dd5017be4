//! The dashboard view model: four shared derived streams.

use std::time::Duration;

use chrono::Local;

use duka_finance::FinanceRecord;
use duka_repository::Repositories;
use duka_stock::StockItem;
use duka_store::live::LiveQuery;

use crate::aggregate;
use crate::shared::{KEEP_ALIVE, Shared, SharedSubscription};

/// Dashboard aggregates derived from the repository streams.
///
/// Each derived value is shared: N observers cost one upstream subscription
/// and one recomputation pipeline. Until a pipeline's first computation
/// lands, observers see the published initial value (`None`, `0`, empty).
pub struct Dashboard {
    latest_finance_record: Shared<Option<FinanceRecord>>,
    total_credit: Shared<i64>,
    last_three_days_records: Shared<Vec<FinanceRecord>>,
    low_stock_items: Shared<Vec<StockItem>>,
}

impl Dashboard {
    /// Build the dashboard with the standard keep-alive window.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(repositories: &Repositories) -> Self {
        Self::with_grace(repositories, KEEP_ALIVE)
    }

    /// Build the dashboard with an explicit keep-alive window.
    pub fn with_grace(repositories: &Repositories, grace: Duration) -> Self {
        Self {
            latest_finance_record: derive(
                "dashboard.latest_finance_record",
                None,
                grace,
                repositories.finance.all_records(),
                |records| aggregate::latest_record(records),
            ),
            total_credit: derive(
                "dashboard.total_credit",
                0,
                grace,
                repositories.credit.all_customers(),
                |customers| aggregate::total_credit(customers),
            ),
            last_three_days_records: derive(
                "dashboard.last_three_days_records",
                Vec::new(),
                grace,
                repositories.finance.all_records(),
                // The day boundary is read at each recomputation, so it only
                // moves when a write triggers one.
                |records| aggregate::last_three_days(records, Local::now()),
            ),
            low_stock_items: derive(
                "dashboard.low_stock_items",
                Vec::new(),
                grace,
                repositories.stock.all_items(),
                |items| aggregate::low_stock(items),
            ),
        }
    }

    /// The finance record with the maximum date, ties broken by highest key.
    pub fn latest_finance_record(&self) -> SharedSubscription<Option<FinanceRecord>> {
        self.latest_finance_record.subscribe()
    }

    /// Full-set sum of all customers' signed credit balances.
    pub fn total_credit(&self) -> SharedSubscription<i64> {
        self.total_credit.subscribe()
    }

    /// Up to three records from the last three local days, newest first.
    pub fn last_three_days_records(&self) -> SharedSubscription<Vec<FinanceRecord>> {
        self.last_three_days_records.subscribe()
    }

    /// Items at or below their reorder point.
    pub fn low_stock_items(&self) -> SharedSubscription<Vec<StockItem>> {
        self.low_stock_items.subscribe()
    }
}

/// Wire one repository stream through a pure aggregation into a shared
/// derived stream.
///
/// Each pipeline start subscribes upstream afresh, so its first delivery is
/// the current committed list and the first computation is a full
/// recomputation, not a resumption. Equal recomputations are conflated.
fn derive<U, T, F>(
    name: &'static str,
    initial: T,
    grace: Duration,
    upstream: LiveQuery<Vec<U>>,
    compute: F,
) -> Shared<T>
where
    U: Clone + Send + Sync + 'static,
    T: Clone + PartialEq + Send + Sync + 'static,
    F: Fn(&[U]) -> T + Clone + Send + Sync + 'static,
{
    Shared::new(name, initial, grace, move |publisher| {
        let mut sub = upstream.subscribe();
        let compute = compute.clone();
        tokio::spawn(async move {
            while let Some(rows) = sub.recv().await {
                publisher.publish_if_changed(compute(&rows));
            }
        })
    })
}
