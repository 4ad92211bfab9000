//! Request validation shared by the confirm-side services.

use std::collections::HashSet;

use seatgate_core::error::AppError;
use seatgate_core::result::AppResult;

/// Minimum length of a client idempotency key.
pub const MIN_IDEMPOTENCY_KEY_LEN: usize = 8;

/// Require a non-blank value.
pub fn require(field: &str, value: &str) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} is required")));
    }
    Ok(())
}

/// Require an idempotency key of at least [`MIN_IDEMPOTENCY_KEY_LEN`] characters.
pub fn idempotency_key(key: &str) -> AppResult<()> {
    if key.chars().count() < MIN_IDEMPOTENCY_KEY_LEN {
        return Err(AppError::validation(format!(
            "Idempotency-Key must be at least {MIN_IDEMPOTENCY_KEY_LEN} characters"
        )));
    }
    Ok(())
}

/// Require a non-empty list of distinct, non-blank seat ids.
pub fn seat_ids(seat_ids: &[String]) -> AppResult<()> {
    if seat_ids.is_empty() {
        return Err(AppError::validation("seatIds must not be empty"));
    }
    let mut seen = HashSet::with_capacity(seat_ids.len());
    for seat in seat_ids {
        require("seatIds[]", seat)?;
        if !seen.insert(seat.as_str()) {
            return Err(AppError::validation(format!("Duplicate seat id: {seat}")));
        }
    }
    Ok(())
}
