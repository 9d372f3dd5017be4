//! Stock domain module.
//!
//! This crate contains the stock-keeping domain values, implemented purely as
//! deterministic domain data (no IO, no storage).

pub mod item;

pub use item::StockItem;
