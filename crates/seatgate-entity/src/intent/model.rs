//! Payment intent entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A payment intent, unique per idempotency key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntent {
    /// Client-supplied idempotency key.
    pub idempotency_key: String,
    /// Generated intent id (`pi_` followed by 24 hex chars).
    pub intent_id: String,
    /// Paying user.
    pub user_id: String,
    /// Event being paid for.
    pub event_id: String,
    /// Seats covered by the intent.
    pub seat_ids: Vec<String>,
    /// Amount in minor units.
    pub amount: i64,
    /// When the intent was first created.
    pub created_at: DateTime<Utc>,
}

/// Data required to create a payment intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentIntent {
    /// Client-supplied idempotency key.
    pub idempotency_key: String,
    /// Generated intent id.
    pub intent_id: String,
    /// Paying user.
    pub user_id: String,
    /// Event being paid for.
    pub event_id: String,
    /// Seats covered by the intent.
    pub seat_ids: Vec<String>,
    /// Amount in minor units.
    pub amount: i64,
}

impl CreatePaymentIntent {
    /// Prefix of every generated intent id.
    pub const INTENT_ID_PREFIX: &'static str = "pi_";

    /// Generate a fresh intent id.
    pub fn generate_intent_id() -> String {
        let bytes: [u8; 12] = rand::random();
        let hex: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
        format!("{}{hex}", Self::INTENT_ID_PREFIX)
    }

    /// Materialize the row as it would be stored at `created_at`.
    pub fn into_intent(self, created_at: DateTime<Utc>) -> PaymentIntent {
        PaymentIntent {
            idempotency_key: self.idempotency_key,
            intent_id: self.intent_id,
            user_id: self.user_id,
            event_id: self.event_id,
            seat_ids: self.seat_ids,
            amount: self.amount,
            created_at,
        }
    }
}
