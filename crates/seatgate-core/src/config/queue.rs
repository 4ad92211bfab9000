//! Ordered dedup queue configuration.

use serde::{Deserialize, Serialize};

/// Commit queue configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueConfig {
    /// Queue backend: `"memory"` or `"sqs"`.
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Number of ordering partitions idempotency keys are hashed into.
    #[serde(default = "default_group_shards")]
    pub group_shards: u32,
    /// Window in seconds during which a repeated dedup key is absorbed.
    #[serde(default = "default_dedup_window")]
    pub dedup_window_seconds: u64,
    /// Receive count after which the queue redrives a message to the
    /// dead-letter destination. `0` disables redrive.
    #[serde(default = "default_max_receive_count")]
    pub max_receive_count: u32,
    /// SQS settings.
    #[serde(default)]
    pub sqs: SqsQueueConfig,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            group_shards: default_group_shards(),
            dedup_window_seconds: default_dedup_window(),
            max_receive_count: default_max_receive_count(),
            sqs: SqsQueueConfig::default(),
        }
    }
}

/// Amazon SQS FIFO backend configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SqsQueueConfig {
    /// FIFO queue URL (must end in `.fifo`).
    #[serde(default)]
    pub queue_url: String,
    /// Dead-letter FIFO queue URL used for poison messages.
    #[serde(default)]
    pub dead_letter_url: Option<String>,
    /// AWS region override.
    #[serde(default)]
    pub region: Option<String>,
    /// Endpoint override (e.g. a local emulator).
    #[serde(default)]
    pub endpoint_url: Option<String>,
}

fn default_provider() -> String {
    "memory".to_string()
}

fn default_group_shards() -> u32 {
    1024
}

fn default_dedup_window() -> u64 {
    300
}

fn default_max_receive_count() -> u32 {
    8
}
