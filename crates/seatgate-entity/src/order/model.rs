//! Order and order item models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::status::OrderStatus;

/// A committed order, keyed by the commit idempotency key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Commit idempotency key (primary key).
    pub idempotency_key: String,
    /// Intent the order was paid through.
    pub intent_id: String,
    /// Buying user.
    pub user_id: String,
    /// Event the seats belong to.
    pub event_id: String,
    /// Order status (`CONFIRMED`).
    pub status: String,
    /// Total in minor units.
    pub total: i64,
    /// When the order was committed.
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Check if the order has been committed.
    pub fn is_confirmed(&self) -> bool {
        self.status == OrderStatus::Confirmed.as_str()
    }
}

/// One seat in an order. Unique on `(order_id, seat_id)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    /// Owning order's idempotency key.
    pub order_id: String,
    /// Seat identifier.
    pub seat_id: String,
    /// Price in minor units.
    pub price: i64,
}

/// Everything the worker writes in one commit transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitOrder {
    /// Commit idempotency key.
    pub idempotency_key: String,
    /// Intent the order was paid through.
    pub intent_id: String,
    /// Buying user.
    pub user_id: String,
    /// Event the seats belong to.
    pub event_id: String,
    /// Seats to assign.
    pub seat_ids: Vec<String>,
    /// Price per seat in minor units.
    pub unit_price: i64,
}

impl CommitOrder {
    /// Order total for all seats.
    pub fn total(&self) -> i64 {
        self.unit_price * self.seat_ids.len() as i64
    }
}

/// Result of a commit transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommitOutcome {
    /// Whether the order row was created by this transaction.
    pub order_created: bool,
    /// Number of order items inserted by this transaction.
    pub items_inserted: u64,
}
