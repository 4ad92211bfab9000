//! Conditional lock store trait.

use std::time::Duration;

use async_trait::async_trait;

use crate::result::AppResult;

/// Strongly consistent key/value store with single-key conditional writes.
///
/// Every mutation is one atomic operation on one key. Implementations must
/// never emulate a conditional write with a read followed by a write.
#[async_trait]
pub trait LockStore: Send + Sync + std::fmt::Debug + 'static {
    /// Insert `value` under `key` with the given expiry, only if no live
    /// item exists. Returns `true` if the item was written.
    async fn insert_if_absent(&self, key: &str, value: &str, ttl: Duration) -> AppResult<bool>;

    /// Read the live item under `key`.
    async fn get(&self, key: &str) -> AppResult<Option<String>>;

    /// Delete the item under `key` if it exists. Returns `true` if an item
    /// was removed.
    async fn delete_if_exists(&self, key: &str) -> AppResult<bool>;

    /// Delete the item under `key` only if its current value equals
    /// `expected`. Returns `true` if an item was removed.
    async fn delete_if_equals(&self, key: &str, expected: &str) -> AppResult<bool>;

    /// Check that the lock store backend is reachable.
    async fn health_check(&self) -> AppResult<bool>;
}
