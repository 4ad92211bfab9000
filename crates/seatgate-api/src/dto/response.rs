//! Response DTOs.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use seatgate_entity::intent::PaymentIntent;

/// Liveness response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `true`.
    pub ok: bool,
    /// Server time in epoch milliseconds.
    pub ts: i64,
}

impl HealthResponse {
    /// A liveness response stamped now.
    pub fn now() -> Self {
        Self {
            ok: true,
            ts: Utc::now().timestamp_millis(),
        }
    }
}

/// Acknowledgement without data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OkResponse {
    /// Always `true`.
    pub ok: bool,
}

/// Result of a seat release.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseResponse {
    /// Whether a hold was removed.
    pub released: bool,
}

/// Created or replayed payment intent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentResponse {
    /// Generated intent id.
    pub intent_id: String,
    /// Amount in minor units.
    pub amount: i64,
    /// Whether the intent already existed.
    pub replay: bool,
}

impl IntentResponse {
    /// Build from a stored intent.
    pub fn new(intent: PaymentIntent, replay: bool) -> Self {
        Self {
            intent_id: intent.intent_id,
            amount: intent.amount,
            replay,
        }
    }
}
