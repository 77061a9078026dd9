//! Entry rules the frontend enforces before it talks to the server.
//!
//! These are stricter than [`validate_new`](super::validate_new): the server
//! and the store accept any non-empty name and number.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PolicyViolation {
    #[error("Name cannot contain numbers")]
    NameHasDigit,
    #[error("Number must contain only digits")]
    NumberNotDigits,
}

/// Names carry no digits; numbers are digits only.
pub fn check_entry(name: &str, number: &str) -> Result<(), PolicyViolation> {
    if name.chars().any(|c| c.is_ascii_digit()) {
        return Err(PolicyViolation::NameHasDigit);
    }
    if number.is_empty() || !number.chars().all(|c| c.is_ascii_digit()) {
        return Err(PolicyViolation::NumberNotDigits);
    }
    Ok(())
}
