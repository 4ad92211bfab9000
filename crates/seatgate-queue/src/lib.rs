//! # seatgate-queue
//!
//! Partitioned at-least-once queues with per-group ordering and a bounded
//! deduplication window:
//!
//! - **memory**: in-process FIFO with visibility timeouts, receive counts,
//!   and a redrive policy into an in-memory dead-letter list
//! - **sqs**: AWS SQS FIFO queue via `aws-sdk-sqs`
//!
//! [`partition`] derives the deterministic group and dedup keys.

pub mod manager;
pub mod memory;
pub mod partition;
#[cfg(feature = "sqs")]
pub mod sqs;

pub use manager::QueueManager;
pub use memory::{DeadLetter, MemoryQueue};
