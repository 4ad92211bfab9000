//! # seatgate-cache
//!
//! Ephemeral cache providers for SeatGate. Supports two modes:
//!
//! - **memory**: in-process map with per-entry deadlines on the tokio clock
//! - **redis**: Redis-backed cache using the [redis](https://crates.io/crates/redis) crate
//!
//! The provider is selected at runtime based on configuration. The
//! [`ReadThrough`] helper layers a single-flight L1 over any provider.

pub mod keys;
#[cfg(feature = "memory")]
pub mod memory;
pub mod provider;
pub mod read_through;
#[cfg(feature = "redis-backend")]
pub mod redis;

pub use provider::CacheManager;
pub use read_through::ReadThrough;
