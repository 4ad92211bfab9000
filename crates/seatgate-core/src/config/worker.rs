//! Commit worker configuration.

use serde::{Deserialize, Serialize};

/// Commit worker configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Whether the worker runs inside this process.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Maximum messages per receive (the queue caps this at 10).
    #[serde(default = "default_batch_size")]
    pub batch_size: u32,
    /// Long-poll wait in seconds.
    #[serde(default = "default_wait_time")]
    pub wait_time_seconds: u64,
    /// Visibility window requested on receive, in seconds.
    #[serde(default = "default_visibility_timeout")]
    pub visibility_timeout_seconds: u64,
    /// Fraction of the visibility window after which in-flight messages
    /// are renewed.
    #[serde(default = "default_heartbeat_ratio")]
    pub heartbeat_ratio: f64,
    /// Base retry delay in seconds.
    #[serde(default = "default_backoff_base")]
    pub backoff_base_seconds: u64,
    /// Maximum retry delay in seconds.
    #[serde(default = "default_backoff_cap")]
    pub backoff_cap_seconds: u64,
    /// Receive count at which a missing seat lock becomes terminal.
    #[serde(default = "default_lock_missing_max_receives")]
    pub lock_missing_max_receives: u32,
    /// Require an `APPROVED` payment for the intent before committing.
    #[serde(default)]
    pub require_payment_approval: bool,
    /// Pause in seconds after a failed receive before polling again.
    #[serde(default = "default_receive_error_backoff")]
    pub receive_error_backoff_seconds: u64,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            batch_size: default_batch_size(),
            wait_time_seconds: default_wait_time(),
            visibility_timeout_seconds: default_visibility_timeout(),
            heartbeat_ratio: default_heartbeat_ratio(),
            backoff_base_seconds: default_backoff_base(),
            backoff_cap_seconds: default_backoff_cap(),
            lock_missing_max_receives: default_lock_missing_max_receives(),
            require_payment_approval: false,
            receive_error_backoff_seconds: default_receive_error_backoff(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_batch_size() -> u32 {
    10
}

fn default_wait_time() -> u64 {
    20
}

fn default_visibility_timeout() -> u64 {
    60
}

fn default_heartbeat_ratio() -> f64 {
    0.6
}

fn default_backoff_base() -> u64 {
    5
}

fn default_backoff_cap() -> u64 {
    300
}

fn default_lock_missing_max_receives() -> u32 {
    3
}

fn default_receive_error_backoff() -> u64 {
    1
}
