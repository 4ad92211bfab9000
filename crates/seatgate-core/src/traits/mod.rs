//! Capability traits for the backing stores, implemented by other crates.

pub mod cache;
pub mod lock_store;
pub mod queue;

pub use cache::{CacheProvider, KeyTtl};
pub use lock_store::LockStore;
pub use queue::{MessageQueue, OutboundMessage, ReceiveOptions, ReceivedMessage};
