//! Cache-aside loading with single-flight.
//!
//! A short-lived moka L1 sits in front of the shared cache. Concurrent misses
//! for the same key are coalesced by `try_get_with`, so the loader runs once
//! per key per L1 lifetime no matter how many requests race.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use seatgate_core::error::AppError;
use seatgate_core::result::AppResult;
use seatgate_core::traits::cache::CacheProvider;

/// Read-through cache over a shared [`CacheProvider`].
#[derive(Debug, Clone)]
pub struct ReadThrough {
    shared: Arc<dyn CacheProvider>,
    local: Cache<String, String>,
    ttl: Duration,
}

impl ReadThrough {
    /// Create a read-through cache whose entries live for `ttl`.
    pub fn new(shared: Arc<dyn CacheProvider>, ttl: Duration, max_capacity: u64) -> Self {
        let local = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(ttl)
            .build();
        Self { shared, local, ttl }
    }

    /// Return the cached value for `key`, running `loader` on a miss.
    ///
    /// A loaded value is written back to the shared cache with the configured
    /// TTL. A failed write-back is logged and the loaded value still returned.
    pub async fn get_or_load<T, F, Fut>(&self, key: &str, loader: F) -> AppResult<T>
    where
        T: Serialize + DeserializeOwned + Send,
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = AppResult<T>> + Send,
    {
        let shared = Arc::clone(&self.shared);
        let ttl = self.ttl;
        let owned_key = key.to_string();

        let raw = self
            .local
            .try_get_with(owned_key.clone(), async move {
                if let Some(hit) = shared.get(&owned_key).await? {
                    debug!(key = %owned_key, "Shared cache hit");
                    return Ok(hit);
                }
                let value = loader().await?;
                let raw = serde_json::to_string(&value)?;
                if let Err(e) = shared.set(&owned_key, &raw, ttl).await {
                    warn!(key = %owned_key, error = %e, "Failed to write back loaded value");
                }
                Ok::<String, AppError>(raw)
            })
            .await
            .map_err(|e: Arc<AppError>| (*e).clone())?;

        Ok(serde_json::from_str(&raw)?)
    }

    /// Drop the local copy of `key`.
    pub async fn invalidate(&self, key: &str) {
        self.local.invalidate(key).await;
    }
}
