use serde::{Deserialize, Serialize};

use duka_core::RecordKey;

/// Domain value: a customer buying on credit.
///
/// `credit_amount` is a signed balance in integer minor units: positive means
/// the customer owes the shop, negative means the shop owes the customer
/// (overpayment). Blacklisted customers stay in the table and keep counting
/// toward credit totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditCustomer {
    pub id: Option<RecordKey>,
    pub name: String,
    pub phone: String,
    pub credit_amount: i64,
    pub is_blacklisted: bool,
}

impl CreditCustomer {
    /// Create a not-yet-stored customer.
    pub fn new(name: impl Into<String>, phone: impl Into<String>, credit_amount: i64) -> Self {
        Self {
            id: None,
            name: name.into(),
            phone: phone.into(),
            credit_amount,
            is_blacklisted: false,
        }
    }

    /// Invariant helper: whether this customer may be extended further credit.
    pub fn can_take_credit(&self) -> bool {
        !self.is_blacklisted
    }
}
