//! `duka-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod error;
pub mod key;
pub mod validate;

pub use error::{DomainError, DomainResult};
pub use key::RecordKey;
