//! Daily cash-position domain module.

pub mod record;

pub use record::FinanceRecord;
