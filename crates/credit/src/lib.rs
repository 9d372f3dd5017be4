//! Customer credit domain module.

pub mod customer;

pub use customer::CreditCustomer;
