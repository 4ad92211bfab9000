//! Commit dispatch onto the ordered dedup queue.

use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use seatgate_core::result::AppResult;
use seatgate_core::traits::queue::{MessageQueue, OutboundMessage};
use seatgate_entity::message::{CommitRequest, QueueEnvelope};
use seatgate_entity::payment::PaymentUpdate;
use seatgate_queue::partition;

use crate::validation;

/// Status reported for an accepted commit.
pub const STATUS_PROCESSING: &str = "PROCESSING";

/// Acknowledgement of an enqueued commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitAccepted {
    /// Always `true`.
    pub accepted: bool,
    /// Always `PROCESSING`.
    pub status: &'static str,
    /// The commit idempotency key.
    pub idem: String,
}

/// Validates commits and payment callbacks and enqueues them with
/// deterministic group and dedup keys.
#[derive(Debug, Clone)]
pub struct CommitDispatcher {
    queue: Arc<dyn MessageQueue>,
    group_shards: u32,
}

impl CommitDispatcher {
    /// Creates a new dispatcher.
    pub fn new(queue: Arc<dyn MessageQueue>, group_shards: u32) -> Self {
        Self {
            queue,
            group_shards,
        }
    }

    /// Enqueue a commit request.
    pub async fn commit(&self, request: CommitRequest) -> AppResult<CommitAccepted> {
        validation::idempotency_key(&request.idempotency_key)?;
        validation::require("intentId", &request.intent_id)?;
        validation::require("eventId", &request.event_id)?;
        validation::require("userId", &request.user_id)?;
        validation::seat_ids(&request.seat_ids)?;

        let group_id = partition::group_id(&request.idempotency_key, self.group_shards);
        let body = serde_json::to_string(&QueueEnvelope::commit(&request))?;
        let message_id = self
            .queue
            .send(OutboundMessage {
                body,
                group_id: group_id.clone(),
                dedup_id: partition::commit_dedup_id(&request.idempotency_key),
            })
            .await?;

        info!(
            idem = %request.idempotency_key,
            group = %group_id,
            message_id = %message_id,
            seats = request.seat_ids.len(),
            "Commit enqueued"
        );

        Ok(CommitAccepted {
            accepted: true,
            status: STATUS_PROCESSING,
            idem: request.idempotency_key,
        })
    }

    /// Enqueue a payment-provider callback, grouped by intent.
    pub async fn enqueue_payment_update(&self, update: PaymentUpdate) -> AppResult<()> {
        validation::require("intentId", &update.intent_id)?;
        validation::require("status", &update.status)?;

        let group_id = partition::group_id(&update.intent_id, self.group_shards);
        let dedup_id = partition::payment_dedup_id(&update.intent_id, &update.status);
        let intent_id = update.intent_id.clone();
        let body = serde_json::to_string(&QueueEnvelope::payment(update))?;

        self.queue
            .send(OutboundMessage {
                body,
                group_id: group_id.clone(),
                dedup_id,
            })
            .await?;

        info!(intent_id = %intent_id, group = %group_id, "Payment update enqueued");
        Ok(())
    }
}
