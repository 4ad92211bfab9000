//! Backend reachability probes.

use std::sync::Arc;

use serde::Serialize;
use tracing::warn;

use seatgate_core::result::AppResult;
use seatgate_core::traits::cache::CacheProvider;
use seatgate_core::traits::lock_store::LockStore;
use seatgate_core::traits::queue::MessageQueue;
use seatgate_database::Ledger;

/// Reachability of each backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendHealth {
    /// Ephemeral cache.
    pub cache: bool,
    /// Conditional lock store.
    pub lock_store: bool,
    /// Ordered dedup queue.
    pub queue: bool,
    /// Relational store.
    pub database: bool,
}

impl BackendHealth {
    /// Whether every backend answered.
    pub fn all_healthy(&self) -> bool {
        self.cache && self.lock_store && self.queue && self.database
    }
}

/// Probes every backend concurrently.
#[derive(Debug, Clone)]
pub struct HealthService {
    cache: Arc<dyn CacheProvider>,
    locks: Arc<dyn LockStore>,
    queue: Arc<dyn MessageQueue>,
    ledger: Ledger,
}

impl HealthService {
    /// Creates a new health service.
    pub fn new(
        cache: Arc<dyn CacheProvider>,
        locks: Arc<dyn LockStore>,
        queue: Arc<dyn MessageQueue>,
        ledger: Ledger,
    ) -> Self {
        Self {
            cache,
            locks,
            queue,
            ledger,
        }
    }

    /// Probe all backends. Probe errors count as unhealthy.
    pub async fn check(&self) -> BackendHealth {
        let (cache, lock_store, queue, database) = tokio::join!(
            self.cache.health_check(),
            self.locks.health_check(),
            self.queue.health_check(),
            self.ledger.health_check(),
        );
        BackendHealth {
            cache: healthy("cache", cache),
            lock_store: healthy("lock_store", lock_store),
            queue: healthy("queue", queue),
            database: healthy("database", database),
        }
    }
}

fn healthy(backend: &str, probe: AppResult<bool>) -> bool {
    match probe {
        Ok(up) => up,
        Err(e) => {
            warn!(backend, error = %e, "Health probe failed");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use seatgate_cache::memory::MemoryCacheProvider;
    use seatgate_core::config::cache::MemoryCacheConfig;
    use seatgate_database::MemoryLedger;
    use seatgate_lock::MemoryLockStore;
    use seatgate_queue::MemoryQueue;

    #[tokio::test]
    async fn test_memory_stack_is_healthy() {
        let svc = HealthService::new(
            Arc::new(MemoryCacheProvider::new(&MemoryCacheConfig::default())),
            Arc::new(MemoryLockStore::new()),
            Arc::new(MemoryQueue::new(Duration::from_secs(300), 8)),
            Ledger::in_memory(MemoryLedger::new()),
        );
        let health = svc.check().await;
        assert!(health.all_healthy());
        let json = serde_json::to_value(health).unwrap();
        assert_eq!(json["lockStore"], true);
    }

    #[test]
    fn test_probe_error_is_unhealthy() {
        use seatgate_core::error::AppError;
        assert!(!healthy("cache", Err(AppError::cache("down"))));
        assert!(healthy("cache", Ok(true)));
    }
}
