use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use duka_core::RecordKey;

/// Domain value: a daily cash position snapshot.
///
/// All amounts are non-negative integer minor units. The grand total is
/// always recomputed from the three components, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinanceRecord {
    pub id: Option<RecordKey>,
    pub date: DateTime<Utc>,
    pub cash: i64,
    pub float: i64,
    pub working_amount: i64,
}

impl FinanceRecord {
    /// Create a not-yet-stored record.
    pub fn new(date: DateTime<Utc>, cash: i64, float: i64, working_amount: i64) -> Self {
        Self {
            id: None,
            date,
            cash,
            float,
            working_amount,
        }
    }

    /// Derived attribute: `cash + float + working_amount`.
    pub fn total(&self) -> i64 {
        self.cash + self.float + self.working_amount
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_sums_the_three_components() {
        let record = FinanceRecord::new(Utc::now(), 25_000, 15_000, 5_000);
        assert_eq!(record.total(), 45_000);
    }

    #[test]
    fn total_is_not_serialized() {
        let record = FinanceRecord::new(Utc::now(), 1, 2, 3);
        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("total").is_none());
    }
}
