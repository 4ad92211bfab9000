//! Commit worker for SeatGate.
//!
//! This crate provides:
//! - A poll loop that long-polls the commit queue until shutdown
//! - Per-group sequential processing with groups running concurrently
//! - Message handlers for order commits and payment updates
//! - Visibility heartbeats and exponential retry backoff

pub mod backoff;
pub mod executor;
pub mod handlers;
pub mod heartbeat;
pub mod runner;

pub use executor::{MessageExecutor, ProcessError};
pub use runner::{BatchReport, CommitWorker};
