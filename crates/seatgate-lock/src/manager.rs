//! Lock store manager that dispatches to the configured backend.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::info;

use seatgate_core::config::lock::LockStoreConfig;
use seatgate_core::error::AppError;
use seatgate_core::result::AppResult;
use seatgate_core::traits::lock_store::LockStore;

/// Wraps the lock store selected by configuration.
#[derive(Debug, Clone)]
pub struct LockStoreManager {
    inner: Arc<dyn LockStore>,
}

impl LockStoreManager {
    /// Create a lock store from configuration.
    pub async fn new(config: &LockStoreConfig) -> AppResult<Self> {
        let inner: Arc<dyn LockStore> = match config.provider.as_str() {
            #[cfg(feature = "redis-lock")]
            "redis" => {
                info!("Initializing Redis lock store");
                Arc::new(crate::redis::RedisLockStore::connect(config).await?)
            }
            "memory" => {
                info!("Initializing in-memory lock store");
                Arc::new(crate::memory::MemoryLockStore::new())
            }
            other => {
                return Err(AppError::configuration(format!(
                    "Unknown lock store provider: '{other}'. Supported: memory, redis"
                )));
            }
        };
        Ok(Self { inner })
    }

    /// Wrap an existing lock store (for testing).
    pub fn from_store(store: Arc<dyn LockStore>) -> Self {
        Self { inner: store }
    }

    /// Get a shared handle to the inner store.
    pub fn store(&self) -> Arc<dyn LockStore> {
        Arc::clone(&self.inner)
    }
}

#[async_trait]
impl LockStore for LockStoreManager {
    async fn insert_if_absent(&self, key: &str, value: &str, ttl: Duration) -> AppResult<bool> {
        self.inner.insert_if_absent(key, value, ttl).await
    }

    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        self.inner.get(key).await
    }

    async fn delete_if_exists(&self, key: &str) -> AppResult<bool> {
        self.inner.delete_if_exists(key).await
    }

    async fn delete_if_equals(&self, key: &str, expected: &str) -> AppResult<bool> {
        self.inner.delete_if_equals(key, expected).await
    }

    async fn health_check(&self) -> AppResult<bool> {
        self.inner.health_check().await
    }
}
