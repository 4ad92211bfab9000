//! In-memory lock store using a Tokio mutex for single-node deployments.
//!
//! Expiry is measured on the tokio clock. An expired item behaves exactly
//! like an absent one for every operation.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

use seatgate_core::result::AppResult;
use seatgate_core::traits::lock_store::LockStore;

#[derive(Debug)]
struct Item {
    value: String,
    expires_at: Instant,
}

/// Inserts between sweeps of expired items.
const PURGE_EVERY: u64 = 256;

/// In-memory conditional lock store.
#[derive(Debug, Clone, Default)]
pub struct MemoryLockStore {
    items: Arc<Mutex<HashMap<String, Item>>>,
    inserts: Arc<AtomicU64>,
}

impl MemoryLockStore {
    /// Creates an empty lock store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live items.
    pub async fn live_count(&self) -> usize {
        let now = Instant::now();
        let items = self.items.lock().await;
        items.values().filter(|i| i.expires_at > now).count()
    }
}

/// Drop every expired item, including keys nobody touches again.
fn purge_expired(items: &mut HashMap<String, Item>, now: Instant) {
    let before = items.len();
    items.retain(|_, i| i.expires_at > now);
    debug!(purged = before - items.len(), "Purged expired lock items");
}

/// Remove `key` if it is present but expired.
fn evict_expired(items: &mut HashMap<String, Item>, key: &str, now: Instant) {
    if items.get(key).is_some_and(|i| i.expires_at <= now) {
        items.remove(key);
    }
}

#[async_trait]
impl LockStore for MemoryLockStore {
    async fn insert_if_absent(&self, key: &str, value: &str, ttl: Duration) -> AppResult<bool> {
        let now = Instant::now();
        let mut items = self.items.lock().await;
        if self.inserts.fetch_add(1, Ordering::Relaxed) % PURGE_EVERY == PURGE_EVERY - 1 {
            purge_expired(&mut items, now);
        } else {
            evict_expired(&mut items, key, now);
        }
        if items.contains_key(key) {
            return Ok(false);
        }
        items.insert(
            key.to_string(),
            Item {
                value: value.to_string(),
                expires_at: now + ttl,
            },
        );
        Ok(true)
    }

    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        let now = Instant::now();
        let mut items = self.items.lock().await;
        evict_expired(&mut items, key, now);
        Ok(items.get(key).map(|i| i.value.clone()))
    }

    async fn delete_if_exists(&self, key: &str) -> AppResult<bool> {
        let now = Instant::now();
        let mut items = self.items.lock().await;
        evict_expired(&mut items, key, now);
        Ok(items.remove(key).is_some())
    }

    async fn delete_if_equals(&self, key: &str, expected: &str) -> AppResult<bool> {
        let now = Instant::now();
        let mut items = self.items.lock().await;
        evict_expired(&mut items, key, now);
        if items.get(key).is_some_and(|i| i.value == expected) {
            items.remove(key);
            return Ok(true);
        }
        Ok(false)
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}
