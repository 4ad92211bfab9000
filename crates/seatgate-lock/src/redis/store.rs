//! Redis lock store using `SET NX PX` and Lua scripts for atomicity.
//!
//! Suitable for multi-node deployments.

use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use tracing::info;

use seatgate_core::config::lock::LockStoreConfig;
use seatgate_core::error::{AppError, ErrorKind};
use seatgate_core::result::AppResult;
use seatgate_core::traits::lock_store::LockStore;

/// Lua script for atomic compare-and-delete.
///
/// KEYS[1] = lock key
/// ARGV[1] = expected value
///
/// Returns 1 if the key held the expected value and was deleted, else 0.
const DELETE_IF_EQUALS_SCRIPT: &str = r#"
    if redis.call('GET', KEYS[1]) == ARGV[1] then
        return redis.call('DEL', KEYS[1])
    end
    return 0
"#;

/// Redis-based conditional lock store.
#[derive(Clone)]
pub struct RedisLockStore {
    conn: ConnectionManager,
    key_prefix: String,
}

impl std::fmt::Debug for RedisLockStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisLockStore")
            .field("key_prefix", &self.key_prefix)
            .finish_non_exhaustive()
    }
}

impl RedisLockStore {
    /// Connect to the lock store described by `config`.
    pub async fn connect(config: &LockStoreConfig) -> AppResult<Self> {
        let client = redis::Client::open(config.url.as_str()).map_err(|e| {
            AppError::with_source(ErrorKind::LockStore, "Failed to create Redis client", e)
        })?;

        let conn = client.get_connection_manager().await.map_err(|e| {
            AppError::with_source(ErrorKind::LockStore, "Failed to connect to Redis", e)
        })?;

        info!(key_prefix = %config.key_prefix, "Redis lock store initialized");

        Ok(Self {
            conn,
            key_prefix: config.key_prefix.clone(),
        })
    }

    fn full_key(&self, key: &str) -> String {
        format!("{}{key}", self.key_prefix)
    }

    fn map_err(e: redis::RedisError) -> AppError {
        AppError::with_source(ErrorKind::LockStore, format!("Redis error: {e}"), e)
    }
}

#[async_trait]
impl LockStore for RedisLockStore {
    async fn insert_if_absent(&self, key: &str, value: &str, ttl: Duration) -> AppResult<bool> {
        let mut conn = self.conn.clone();

        // SET key value PX ttl NX
        let result: Option<String> = redis::cmd("SET")
            .arg(self.full_key(key))
            .arg(value)
            .arg("PX")
            .arg(ttl.as_millis().max(1) as u64)
            .arg("NX")
            .query_async(&mut conn)
            .await
            .map_err(Self::map_err)?;

        Ok(result.is_some())
    }

    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        let mut conn = self.conn.clone();
        let value: Option<String> = conn.get(self.full_key(key)).await.map_err(Self::map_err)?;
        Ok(value)
    }

    async fn delete_if_exists(&self, key: &str) -> AppResult<bool> {
        let mut conn = self.conn.clone();
        let removed: i64 = conn.del(self.full_key(key)).await.map_err(Self::map_err)?;
        Ok(removed > 0)
    }

    async fn delete_if_equals(&self, key: &str, expected: &str) -> AppResult<bool> {
        let mut conn = self.conn.clone();
        let removed: i64 = redis::Script::new(DELETE_IF_EQUALS_SCRIPT)
            .key(self.full_key(key))
            .arg(expected)
            .invoke_async(&mut conn)
            .await
            .map_err(Self::map_err)?;
        Ok(removed > 0)
    }

    async fn health_check(&self) -> AppResult<bool> {
        let mut conn = self.conn.clone();
        let pong: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(Self::map_err)?;
        Ok(pong == "PONG")
    }
}
