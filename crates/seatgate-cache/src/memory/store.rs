//! In-memory cache with per-entry expiry.
//!
//! Deadlines are measured on the tokio clock so tests can drive expiry with
//! `tokio::time::pause` and `advance`.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::time::Instant;
use tracing::debug;

use seatgate_core::config::cache::MemoryCacheConfig;
use seatgate_core::error::AppError;
use seatgate_core::result::AppResult;
use seatgate_core::traits::cache::{CacheProvider, KeyTtl};

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Instant,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at > now
    }
}

/// In-memory cache provider.
#[derive(Debug, Clone)]
pub struct MemoryCacheProvider {
    entries: Arc<DashMap<String, Entry>>,
    max_capacity: u64,
}

impl MemoryCacheProvider {
    /// Create a new in-memory cache from configuration.
    pub fn new(config: &MemoryCacheConfig) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            max_capacity: config.max_capacity,
        }
    }

    /// Look up a live entry, dropping it if it has expired.
    fn live_entry(&self, key: &str) -> Option<Entry> {
        let now = Instant::now();
        let entry = self.entries.get(key).map(|e| e.value().clone())?;
        if entry.is_live(now) {
            Some(entry)
        } else {
            self.entries.remove_if(key, |_, e| !e.is_live(now));
            None
        }
    }

    fn purge_expired(&self) {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, e| e.is_live(now));
        debug!(purged = before - self.entries.len(), "Purged expired cache entries");
    }
}

#[async_trait]
impl CacheProvider for MemoryCacheProvider {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.live_entry(key).map(|e| e.value))
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()> {
        if self.entries.len() as u64 >= self.max_capacity && !self.entries.contains_key(key) {
            self.purge_expired();
            if self.entries.len() as u64 >= self.max_capacity {
                return Err(AppError::cache("In-memory cache is at capacity"));
            }
        }
        self.entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at: Instant::now() + ttl,
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.entries.remove(key);
        Ok(())
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        Ok(self.live_entry(key).is_some())
    }

    async fn ttl(&self, key: &str) -> AppResult<KeyTtl> {
        Ok(match self.live_entry(key) {
            Some(entry) => KeyTtl::Expires(entry.expires_at - Instant::now()),
            None => KeyTtl::Missing,
        })
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_provider() -> MemoryCacheProvider {
        MemoryCacheProvider::new(&MemoryCacheConfig { max_capacity: 100 })
    }

    #[tokio::test]
    async fn test_set_get() {
        let provider = make_provider();
        provider
            .set("key1", "value1", Duration::from_secs(60))
            .await
            .unwrap();
        let val = provider.get("key1").await.unwrap();
        assert_eq!(val, Some("value1".to_string()));
    }

    #[tokio::test]
    async fn test_delete() {
        let provider = make_provider();
        provider
            .set("key2", "value2", Duration::from_secs(60))
            .await
            .unwrap();
        provider.delete("key2").await.unwrap();
        assert_eq!(provider.get("key2").await.unwrap(), None);
        assert!(!provider.exists("key2").await.unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_expires_on_deadline() {
        let provider = make_provider();
        provider
            .set("room:t", "{}", Duration::from_secs(180))
            .await
            .unwrap();

        tokio::time::advance(Duration::from_secs(100)).await;
        assert_eq!(
            provider.ttl("room:t").await.unwrap(),
            KeyTtl::Expires(Duration::from_secs(80))
        );

        tokio::time::advance(Duration::from_secs(80)).await;
        assert_eq!(provider.ttl("room:t").await.unwrap(), KeyTtl::Missing);
        assert_eq!(provider.get("room:t").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_ttl_of_unknown_key_is_missing() {
        let provider = make_provider();
        let ttl = provider.ttl("never-set").await.unwrap();
        assert!(!ttl.exists());
        assert_eq!(ttl.seconds_left(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_capacity_reclaims_expired_entries() {
        let provider = MemoryCacheProvider::new(&MemoryCacheConfig { max_capacity: 1 });
        provider.set("a", "1", Duration::from_secs(1)).await.unwrap();
        assert!(provider.set("b", "2", Duration::from_secs(1)).await.is_err());

        tokio::time::advance(Duration::from_secs(2)).await;
        provider.set("b", "2", Duration::from_secs(1)).await.unwrap();
        assert_eq!(provider.get("b").await.unwrap(), Some("2".to_string()));
    }

    #[tokio::test]
    async fn test_json_roundtrip() {
        let provider = make_provider();
        let data = serde_json::json!({"userId": "u1", "eventId": "e1"});
        provider
            .set_json("json_key", &data, Duration::from_secs(60))
            .await
            .unwrap();
        let result: Option<serde_json::Value> = provider.get_json("json_key").await.unwrap();
        assert_eq!(result, Some(data));
    }
}
