//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section.

pub mod admission;
pub mod app;
pub mod cache;
pub mod database;
pub mod lock;
pub mod logging;
pub mod queue;
pub mod worker;

use serde::{Deserialize, Serialize};

use self::admission::{AdmissionConfig, PricingConfig};
use self::app::ServerConfig;
use self::cache::CacheConfig;
use self::database::DatabaseConfig;
use self::lock::LockStoreConfig;
use self::logging::LoggingConfig;
use self::queue::QueueConfig;
use self::worker::WorkerConfig;

use crate::error::AppError;

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Relational store settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Ephemeral cache settings.
    #[serde(default)]
    pub cache: CacheConfig,
    /// Conditional lock store settings.
    #[serde(default)]
    pub lock_store: LockStoreConfig,
    /// Ordered dedup queue settings.
    #[serde(default)]
    pub queue: QueueConfig,
    /// Waiting-room and hold timing.
    #[serde(default)]
    pub admission: AdmissionConfig,
    /// Server-side pricing.
    #[serde(default)]
    pub pricing: PricingConfig,
    /// Commit worker settings.
    #[serde(default)]
    pub worker: WorkerConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges `config/default.toml` with an environment-specific overlay
    /// and environment variables prefixed with `SEATGATE__`.
    pub fn load(env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("SEATGATE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }
}
