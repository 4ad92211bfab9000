//! Payment entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Provider status that marks a payment as approved.
pub const STATUS_APPROVED: &str = "APPROVED";

/// Payment state for one intent, converged from provider callbacks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    /// Intent id (primary key).
    pub intent_id: String,
    /// Order idempotency key, once the order is committed.
    pub order_id: Option<String>,
    /// Latest provider status.
    pub status: String,
    /// Amount reported by the provider.
    pub amount: Option<i64>,
    /// Provider transaction id.
    pub txn_id: Option<String>,
    /// When the payment was first seen as approved.
    pub approved_at: Option<DateTime<Utc>>,
    /// Last time a callback touched this row.
    pub updated_at: DateTime<Utc>,
}

impl Payment {
    /// Check if the payment is approved.
    pub fn is_approved(&self) -> bool {
        self.status == STATUS_APPROVED
    }
}

/// A payment-provider callback, as carried on the queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentUpdate {
    /// Intent the callback refers to.
    pub intent_id: String,
    /// Provider status, e.g. `APPROVED` or `DECLINED`.
    pub status: String,
    /// Amount reported by the provider.
    #[serde(default)]
    pub amount: Option<i64>,
    /// Provider transaction id.
    #[serde(default)]
    pub txn_id: Option<String>,
    /// Event the payment is for.
    #[serde(default)]
    pub event_id: Option<String>,
}

impl PaymentUpdate {
    /// Check if this update approves the payment.
    pub fn is_approval(&self) -> bool {
        self.status == STATUS_APPROVED
    }
}
