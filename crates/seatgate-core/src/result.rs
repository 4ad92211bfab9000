//! Convenience result type alias for SeatGate.

use crate::error::AppError;

/// A specialized `Result` type for SeatGate operations.
pub type AppResult<T> = Result<T, AppError>;
