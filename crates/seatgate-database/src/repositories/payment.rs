//! Payment repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use seatgate_core::error::{AppError, ErrorKind};
use seatgate_core::result::AppResult;
use seatgate_entity::payment::{Payment, PaymentUpdate, STATUS_APPROVED};

use super::PaymentRepository;

/// PostgreSQL repository for payments.
#[derive(Debug, Clone)]
pub struct PgPaymentRepository {
    pool: PgPool,
}

impl PgPaymentRepository {
    /// Create a new payment repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PaymentRepository for PgPaymentRepository {
    async fn upsert(&self, update: &PaymentUpdate) -> AppResult<Payment> {
        sqlx::query_as::<_, Payment>(
            "INSERT INTO payments \
                (intent_id, order_id, status, amount, txn_id, approved_at, updated_at) \
             VALUES ( \
                $1, \
                (SELECT idempotency_key FROM orders WHERE intent_id = $1 LIMIT 1), \
                $2, $3, $4, \
                CASE WHEN $2 = $5 THEN NOW() END, \
                NOW()) \
             ON CONFLICT (intent_id) DO UPDATE SET \
                status = EXCLUDED.status, \
                amount = COALESCE(EXCLUDED.amount, payments.amount), \
                txn_id = COALESCE(EXCLUDED.txn_id, payments.txn_id), \
                order_id = COALESCE(payments.order_id, EXCLUDED.order_id), \
                approved_at = COALESCE(payments.approved_at, EXCLUDED.approved_at), \
                updated_at = NOW() \
             RETURNING intent_id, order_id, status, amount, txn_id, approved_at, updated_at",
        )
        .bind(&update.intent_id)
        .bind(&update.status)
        .bind(update.amount)
        .bind(&update.txn_id)
        .bind(STATUS_APPROVED)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to upsert payment", e))
    }

    async fn find_by_intent(&self, intent_id: &str) -> AppResult<Option<Payment>> {
        sqlx::query_as::<_, Payment>(
            "SELECT intent_id, order_id, status, amount, txn_id, approved_at, updated_at \
             FROM payments WHERE intent_id = $1",
        )
        .bind(intent_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find payment", e))
    }
}
