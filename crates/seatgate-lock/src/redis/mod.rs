//! Redis-backed lock store.

mod store;

pub use store::RedisLockStore;
