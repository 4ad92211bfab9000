//! Queue message envelope.

use serde::{Deserialize, Serialize};

use super::commit::{CommitOrderPayload, CommitRequest};
use crate::payment::PaymentUpdate;

/// Every message carried by the commit queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QueueEnvelope {
    /// Finalize an order.
    CommitOrder {
        /// Seats and parties of the order.
        payload: CommitOrderPayload,
        /// Commit idempotency key.
        idem: String,
    },
    /// Record a payment-provider callback.
    PaymentUpdate {
        /// Callback contents.
        payload: PaymentUpdate,
    },
}

impl QueueEnvelope {
    /// Envelope for a commit request.
    pub fn commit(request: &CommitRequest) -> Self {
        Self::CommitOrder {
            payload: request.payload(),
            idem: request.idempotency_key.clone(),
        }
    }

    /// Envelope for a payment callback.
    pub fn payment(update: PaymentUpdate) -> Self {
        Self::PaymentUpdate { payload: update }
    }

    /// Message type tag as it appears on the wire.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::CommitOrder { .. } => "COMMIT_ORDER",
            Self::PaymentUpdate { .. } => "PAYMENT_UPDATE",
        }
    }
}
