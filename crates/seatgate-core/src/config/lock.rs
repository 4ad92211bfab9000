//! Conditional lock store configuration.

use serde::{Deserialize, Serialize};

use super::cache::default_redis_url;

/// Seat lock store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockStoreConfig {
    /// Lock store backend: `"memory"` or `"redis"`.
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Redis connection URL for the lock store.
    #[serde(default = "default_redis_url")]
    pub url: String,
    /// Key prefix for lock items.
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
}

impl Default for LockStoreConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            url: default_redis_url(),
            key_prefix: default_key_prefix(),
        }
    }
}

fn default_provider() -> String {
    "memory".to_string()
}

fn default_key_prefix() -> String {
    "ticket-seat-lock:".to_string()
}
