//! Pure aggregate functions behind the dashboard's derived streams.
//!
//! Every function recomputes over the full input set; no incremental
//! accumulation. At shop scale, full-set correctness beats delta bookkeeping.

use chrono::{DateTime, Local, LocalResult, NaiveTime, TimeZone, Utc};

use duka_credit::CreditCustomer;
use duka_finance::FinanceRecord;
use duka_stock::StockItem;

/// The record with the maximum `date`; ties broken by highest key.
///
/// Keys are assigned monotonically, so the tie-break picks the most recently
/// inserted record and is deterministic across replays.
pub fn latest_record(records: &[FinanceRecord]) -> Option<FinanceRecord> {
    records.iter().max_by_key(|r| (r.date, r.id)).cloned()
}

/// Sum of `credit_amount` over every customer, blacklisted and negative
/// balances included.
pub fn total_credit(customers: &[CreditCustomer]) -> i64 {
    customers.iter().map(|c| c.credit_amount).sum()
}

/// Records dated within the three days before the start of `now`'s local
/// day, newest first, at most three.
///
/// The boundary is evaluated from `now` at each recomputation. Nothing
/// re-evaluates it on a day rollover alone: the window goes stale across
/// midnight until the next triggering write, which is accepted behavior.
pub fn last_three_days(records: &[FinanceRecord], now: DateTime<Local>) -> Vec<FinanceRecord> {
    let midnight = now.date_naive().and_time(NaiveTime::MIN);
    let start_of_day = match Local.from_local_datetime(&midnight) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(earliest, _) => earliest,
        // Local midnight skipped by a DST jump; fall back to `now`.
        LocalResult::None => now,
    };
    let boundary = start_of_day.with_timezone(&Utc) - chrono::Duration::days(3);

    let mut recent: Vec<FinanceRecord> = records
        .iter()
        .filter(|r| r.date >= boundary)
        .cloned()
        .collect();
    recent.sort_by(|a, b| (b.date, b.id).cmp(&(a.date, a.id)));
    recent.truncate(3);
    recent
}

/// Items at or below their reorder point, in key order.
pub fn low_stock(items: &[StockItem]) -> Vec<StockItem> {
    items.iter().filter(|i| i.is_low_stock()).cloned().collect()
}
