//! Strongly-typed record key used across the store and domain layers.

use serde::{Deserialize, Serialize};

/// Key of a stored record.
///
/// Assigned by the store on insert, monotonically increasing per table, and
/// immutable for the record's lifetime. Monotonicity is relied upon by the
/// dashboard's highest-key-wins tie-break, so keys must never be reused.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordKey(u64);

impl RecordKey {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }

    /// The key following this one in per-table assignment order.
    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

impl core::fmt::Display for RecordKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl From<u64> for RecordKey {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<RecordKey> for u64 {
    fn from(value: RecordKey) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_order_by_assignment() {
        let first = RecordKey::new(1);
        let second = first.next();
        assert!(second > first);
        assert_eq!(second.value(), 2);
    }
}
