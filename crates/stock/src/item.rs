use serde::{Deserialize, Serialize};

use duka_core::RecordKey;

/// Domain value: a stocked item.
///
/// `id` is `None` until the store assigns a key on insert. Prices are integer
/// minor units; `quantity` and `reorder_point` are whole units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockItem {
    pub id: Option<RecordKey>,
    pub name: String,
    pub quantity: u32,
    pub buying_price: i64,
    pub selling_price: i64,
    pub reorder_point: u32,
}

impl StockItem {
    /// Create a not-yet-stored item.
    pub fn new(
        name: impl Into<String>,
        quantity: u32,
        buying_price: i64,
        selling_price: i64,
        reorder_point: u32,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            quantity,
            buying_price,
            selling_price,
            reorder_point,
        }
    }

    /// Invariant helper: whether the item has fallen to its reorder point.
    ///
    /// Low stock is a derived predicate, never an enforced constraint; an
    /// item may be stored with any quantity.
    pub fn is_low_stock(&self) -> bool {
        self.quantity <= self.reorder_point
    }

    /// Margin per unit at current prices.
    pub fn unit_margin(&self) -> i64 {
        self.selling_price - self.buying_price
    }
}
