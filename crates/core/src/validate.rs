//! Boundary input validators.
//!
//! Pure `&str -> DomainResult<()>` checks invoked by the UI layer before a
//! value reaches a repository write. The reactive core performs no
//! re-validation; anything passing these functions is assumed well-formed.

use crate::error::{DomainError, DomainResult};

/// Validate a money amount: parseable and non-negative.
pub fn validate_amount(input: &str) -> DomainResult<()> {
    if input.is_empty() {
        return Err(DomainError::validation("Amount cannot be empty"));
    }
    let amount: f64 = input
        .parse()
        .map_err(|_| DomainError::validation("Invalid amount format"))?;
    if amount < 0.0 {
        return Err(DomainError::validation("Amount cannot be negative"));
    }
    Ok(())
}

/// Validate a stock quantity: parseable integer, non-negative.
pub fn validate_quantity(input: &str) -> DomainResult<()> {
    if input.is_empty() {
        return Err(DomainError::validation("Quantity cannot be empty"));
    }
    let quantity: i64 = input
        .parse()
        .map_err(|_| DomainError::validation("Invalid quantity format"))?;
    if quantity < 0 {
        return Err(DomainError::validation("Quantity cannot be negative"));
    }
    Ok(())
}

/// Validate a display name: non-empty, at least 3 characters.
pub fn validate_name(input: &str) -> DomainResult<()> {
    if input.is_empty() {
        return Err(DomainError::validation("Name cannot be empty"));
    }
    if input.chars().count() < 3 {
        return Err(DomainError::validation("Name must be at least 3 characters"));
    }
    Ok(())
}

/// Validate a phone number: exactly 10 ASCII digits.
pub fn validate_phone(input: &str) -> DomainResult<()> {
    if input.is_empty() {
        return Err(DomainError::validation("Phone number cannot be empty"));
    }
    if input.len() != 10 || !input.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DomainError::validation(
            "Invalid phone number format (10 digits required)",
        ));
    }
    Ok(())
}

/// Validate a price: parseable and strictly positive.
pub fn validate_price(input: &str) -> DomainResult<()> {
    if input.is_empty() {
        return Err(DomainError::validation("Price cannot be empty"));
    }
    let price: f64 = input
        .parse()
        .map_err(|_| DomainError::validation("Invalid price format"))?;
    if price <= 0.0 {
        return Err(DomainError::validation("Price must be greater than 0"));
    }
    Ok(())
}
