//! Payment intent repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use seatgate_core::error::{AppError, ErrorKind};
use seatgate_core::result::AppResult;
use seatgate_entity::intent::{CreatePaymentIntent, PaymentIntent};

use super::IntentRepository;

const SELECT_INTENT: &str = "SELECT idempotency_key, intent_id, user_id, event_id, seat_ids, \
                             amount, created_at FROM payment_intents";

/// PostgreSQL repository for payment intents.
#[derive(Debug, Clone)]
pub struct PgIntentRepository {
    pool: PgPool,
}

impl PgIntentRepository {
    /// Create a new intent repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IntentRepository for PgIntentRepository {
    async fn find_by_key(&self, idempotency_key: &str) -> AppResult<Option<PaymentIntent>> {
        sqlx::query_as::<_, PaymentIntent>(&format!("{SELECT_INTENT} WHERE idempotency_key = $1"))
            .bind(idempotency_key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find payment intent", e)
            })
    }

    async fn find_by_intent_id(&self, intent_id: &str) -> AppResult<Option<PaymentIntent>> {
        sqlx::query_as::<_, PaymentIntent>(&format!("{SELECT_INTENT} WHERE intent_id = $1"))
            .bind(intent_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find payment intent", e)
            })
    }

    async fn insert_if_absent(&self, intent: &CreatePaymentIntent) -> AppResult<bool> {
        let result = sqlx::query(
            "INSERT INTO payment_intents \
                (idempotency_key, intent_id, user_id, event_id, seat_ids, amount) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             ON CONFLICT (idempotency_key) DO NOTHING",
        )
        .bind(&intent.idempotency_key)
        .bind(&intent.intent_id)
        .bind(&intent.user_id)
        .bind(&intent.event_id)
        .bind(&intent.seat_ids)
        .bind(intent.amount)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to insert payment intent", e)
        })?;
        Ok(result.rows_affected() == 1)
    }
}
