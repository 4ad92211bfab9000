//! Order repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use seatgate_core::error::{AppError, ErrorKind};
use seatgate_core::result::AppResult;
use seatgate_entity::order::{CommitOrder, CommitOutcome, Order, OrderItem, OrderStatus};

use super::OrderRepository;

/// PostgreSQL repository for orders and order items.
#[derive(Debug, Clone)]
pub struct PgOrderRepository {
    pool: PgPool,
}

impl PgOrderRepository {
    /// Create a new order repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn db_err(message: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| AppError::with_source(ErrorKind::Database, message, e)
}

#[async_trait]
impl OrderRepository for PgOrderRepository {
    async fn find_by_key(&self, idempotency_key: &str) -> AppResult<Option<Order>> {
        sqlx::query_as::<_, Order>(
            "SELECT idempotency_key, intent_id, user_id, event_id, status, total, created_at \
             FROM orders WHERE idempotency_key = $1",
        )
        .bind(idempotency_key)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err("Failed to find order"))
    }

    async fn items(&self, idempotency_key: &str) -> AppResult<Vec<OrderItem>> {
        sqlx::query_as::<_, OrderItem>(
            "SELECT order_id, seat_id, price FROM order_items \
             WHERE order_id = $1 ORDER BY seat_id",
        )
        .bind(idempotency_key)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err("Failed to list order items"))
    }

    async fn commit(&self, order: &CommitOrder) -> AppResult<CommitOutcome> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_err("Failed to begin commit transaction"))?;

        let created = sqlx::query(
            "INSERT INTO orders \
                (idempotency_key, intent_id, user_id, event_id, status, total) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             ON CONFLICT (idempotency_key) DO NOTHING",
        )
        .bind(&order.idempotency_key)
        .bind(&order.intent_id)
        .bind(&order.user_id)
        .bind(&order.event_id)
        .bind(OrderStatus::Confirmed.as_str())
        .bind(order.total())
        .execute(&mut *tx)
        .await
        .map_err(db_err("Failed to insert order"))?
        .rows_affected();

        let mut items_inserted = 0;
        for seat_id in &order.seat_ids {
            items_inserted += sqlx::query(
                "INSERT INTO order_items (order_id, seat_id, price) VALUES ($1, $2, $3) \
                 ON CONFLICT (order_id, seat_id) DO NOTHING",
            )
            .bind(&order.idempotency_key)
            .bind(seat_id)
            .bind(order.unit_price)
            .execute(&mut *tx)
            .await
            .map_err(db_err("Failed to insert order item"))?
            .rows_affected();
        }

        sqlx::query(
            "UPDATE payments SET order_id = $1, updated_at = NOW() \
             WHERE intent_id = $2 AND order_id IS NULL",
        )
        .bind(&order.idempotency_key)
        .bind(&order.intent_id)
        .execute(&mut *tx)
        .await
        .map_err(db_err("Failed to link payment to order"))?;

        tx.commit()
            .await
            .map_err(db_err("Failed to commit order transaction"))?;

        debug!(
            idem = %order.idempotency_key,
            order_created = created == 1,
            items_inserted,
            "Order transaction committed"
        );

        Ok(CommitOutcome {
            order_created: created == 1,
            items_inserted,
        })
    }
}
