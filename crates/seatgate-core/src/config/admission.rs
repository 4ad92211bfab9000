//! Waiting-room, hold, and pricing configuration.

use serde::{Deserialize, Serialize};

/// Admission gateway timing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdmissionConfig {
    /// Waiting-room token lifetime in seconds.
    #[serde(default = "default_room_ttl")]
    pub room_ttl_seconds: u64,
    /// Seat hold lifetime in seconds.
    #[serde(default = "default_hold_ttl")]
    pub hold_ttl_seconds: u64,
    /// Lifetime of cached seat summaries in seconds.
    #[serde(default = "default_summary_ttl")]
    pub summary_ttl_seconds: u64,
    /// Seats per section reported by the seat summary.
    #[serde(default = "default_section_capacity")]
    pub section_capacity: u32,
}

impl Default for AdmissionConfig {
    fn default() -> Self {
        Self {
            room_ttl_seconds: default_room_ttl(),
            hold_ttl_seconds: default_hold_ttl(),
            summary_ttl_seconds: default_summary_ttl(),
            section_capacity: default_section_capacity(),
        }
    }
}

/// Server-side pricing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Price of one seat in minor currency units.
    #[serde(default = "default_unit_price")]
    pub unit_price: i64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            unit_price: default_unit_price(),
        }
    }
}

fn default_room_ttl() -> u64 {
    180
}

fn default_hold_ttl() -> u64 {
    120
}

fn default_summary_ttl() -> u64 {
    3
}

fn default_section_capacity() -> u32 {
    1_000
}

fn default_unit_price() -> i64 {
    10_000
}
