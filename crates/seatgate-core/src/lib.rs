//! # seatgate-core
//!
//! Core crate for SeatGate. Contains the capability traits for every
//! ephemeral backing store (cache, lock store, queue), configuration
//! schemas, and the unified error system.
//!
//! This crate has **no** internal dependencies on other SeatGate crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;

pub use error::AppError;
pub use result::AppResult;
