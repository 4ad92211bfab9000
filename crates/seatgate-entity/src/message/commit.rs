//! Commit request and its queued payload.

use serde::{Deserialize, Serialize};

use crate::order::CommitOrder;

/// A client's request to finalize a purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitRequest {
    /// Commit idempotency key.
    pub idempotency_key: String,
    /// Intent the purchase is paid through.
    pub intent_id: String,
    /// Event the seats belong to.
    pub event_id: String,
    /// Seats to assign.
    pub seat_ids: Vec<String>,
    /// Buying user; must hold every seat lock.
    pub user_id: String,
}

impl CommitRequest {
    /// Split into the queued payload.
    pub fn payload(&self) -> CommitOrderPayload {
        CommitOrderPayload {
            intent_id: self.intent_id.clone(),
            event_id: self.event_id.clone(),
            seat_ids: self.seat_ids.clone(),
            user_id: self.user_id.clone(),
        }
    }
}

/// Payload of a `COMMIT_ORDER` message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitOrderPayload {
    /// Intent the purchase is paid through.
    pub intent_id: String,
    /// Event the seats belong to.
    pub event_id: String,
    /// Seats to assign.
    pub seat_ids: Vec<String>,
    /// Buying user.
    pub user_id: String,
}

impl CommitOrderPayload {
    /// Build the commit transaction for this payload.
    pub fn into_commit(self, idempotency_key: impl Into<String>, unit_price: i64) -> CommitOrder {
        CommitOrder {
            idempotency_key: idempotency_key.into(),
            intent_id: self.intent_id,
            user_id: self.user_id,
            event_id: self.event_id,
            seat_ids: self.seat_ids,
            unit_price,
        }
    }
}
