//! Message executor: decodes envelopes and dispatches them to handlers.

use tracing::debug;

use seatgate_core::error::AppError;
use seatgate_core::traits::queue::ReceivedMessage;
use seatgate_entity::message::QueueEnvelope;

use crate::handlers::{CommitOrderHandler, PaymentUpdateHandler};

/// Error from message processing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProcessError {
    /// Leave the message on the queue and retry after a backoff.
    #[error("Retryable failure: {0}")]
    Retryable(String),

    /// Never succeeds; move the message to the dead-letter destination.
    #[error("Poison message: {0}")]
    Poison(String),
}

impl ProcessError {
    /// Check if the message should be retried.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Retryable(_))
    }
}

impl From<AppError> for ProcessError {
    fn from(err: AppError) -> Self {
        if err.is_transient() {
            Self::Retryable(err.to_string())
        } else {
            Self::Poison(err.to_string())
        }
    }
}

/// Dispatches queue messages to the handler for their envelope type.
#[derive(Debug)]
pub struct MessageExecutor {
    commit: CommitOrderHandler,
    payment: PaymentUpdateHandler,
}

impl MessageExecutor {
    /// Create a new executor.
    pub fn new(commit: CommitOrderHandler, payment: PaymentUpdateHandler) -> Self {
        Self { commit, payment }
    }

    /// Process one received message.
    pub async fn process(&self, message: &ReceivedMessage) -> Result<(), ProcessError> {
        let envelope: QueueEnvelope = serde_json::from_str(&message.body)
            .map_err(|e| ProcessError::Poison(format!("Undecodable message body: {e}")))?;

        debug!(
            message_id = %message.message_id,
            kind = envelope.kind(),
            receive_count = message.receive_count,
            "Processing message"
        );

        match envelope {
            QueueEnvelope::CommitOrder { payload, idem } => {
                self.commit
                    .handle(&idem, payload, message.receive_count)
                    .await
            }
            QueueEnvelope::PaymentUpdate { payload } => self.payment.handle(payload).await,
        }
    }
}
