//! Idempotent payment-intent creation.

use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, info};

use seatgate_core::error::AppError;
use seatgate_core::result::AppResult;
use seatgate_database::repositories::IntentRepository;
use seatgate_entity::intent::{CreatePaymentIntent, PaymentIntent};

use crate::validation;

/// Input for [`IntentService::create`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateIntentRequest {
    /// Client idempotency key.
    pub idempotency_key: String,
    /// Paying user.
    pub user_id: String,
    /// Event being paid for.
    pub event_id: String,
    /// Seats covered by the intent.
    pub seat_ids: Vec<String>,
}

/// Result of an intent creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntentOutcome {
    /// The stored intent, original on replay.
    pub intent: PaymentIntent,
    /// Whether an existing intent was returned.
    pub replay: bool,
}

/// Creates payment intents, exactly one per idempotency key.
#[derive(Debug, Clone)]
pub struct IntentService {
    intents: Arc<dyn IntentRepository>,
    unit_price: i64,
}

impl IntentService {
    /// Creates a new intent service.
    pub fn new(intents: Arc<dyn IntentRepository>, unit_price: i64) -> Self {
        Self {
            intents,
            unit_price,
        }
    }

    /// Create an intent, or return the one already created for this key.
    pub async fn create(&self, request: CreateIntentRequest) -> AppResult<IntentOutcome> {
        validation::idempotency_key(&request.idempotency_key)?;
        validation::require("userId", &request.user_id)?;
        validation::require("eventId", &request.event_id)?;
        validation::seat_ids(&request.seat_ids)?;

        if let Some(existing) = self.intents.find_by_key(&request.idempotency_key).await? {
            debug!(key = %request.idempotency_key, "Payment intent replayed");
            return Ok(IntentOutcome {
                intent: existing,
                replay: true,
            });
        }

        let create = CreatePaymentIntent {
            amount: self.unit_price * request.seat_ids.len() as i64,
            intent_id: CreatePaymentIntent::generate_intent_id(),
            idempotency_key: request.idempotency_key,
            user_id: request.user_id,
            event_id: request.event_id,
            seat_ids: request.seat_ids,
        };

        if self.intents.insert_if_absent(&create).await? {
            info!(
                key = %create.idempotency_key,
                intent_id = %create.intent_id,
                amount = create.amount,
                "Payment intent created"
            );
            let intent = self
                .intents
                .find_by_key(&create.idempotency_key)
                .await?
                .unwrap_or_else(|| create.clone().into_intent(chrono::Utc::now()));
            return Ok(IntentOutcome {
                intent,
                replay: false,
            });
        }

        // Lost the insert race: the winner's row is authoritative.
        let winner = self
            .intents
            .find_by_key(&create.idempotency_key)
            .await?
            .ok_or_else(|| {
                AppError::internal("Payment intent vanished after a conflicting insert")
            })?;
        debug!(key = %create.idempotency_key, "Payment intent insert lost race");
        Ok(IntentOutcome {
            intent: winner,
            replay: true,
        })
    }
}
