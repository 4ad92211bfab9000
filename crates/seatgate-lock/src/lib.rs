//! # seatgate-lock
//!
//! Conditional lock stores for seat holds. Every mutation is a single-key
//! atomic conditional operation:
//!
//! - **memory**: map guarded by a Tokio mutex, single-node only
//! - **redis**: `SET NX PX` for inserts and Lua scripts for conditional deletes
//!
//! [`SeatLocks`] is the typed view the rest of the system uses.

pub mod keys;
pub mod manager;
pub mod memory;
#[cfg(feature = "redis-lock")]
pub mod redis;
pub mod seat;

pub use manager::LockStoreManager;
pub use memory::MemoryLockStore;
pub use seat::{HeldSeat, SeatLocks};
