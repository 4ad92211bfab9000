//! Order status lookup by commit idempotency key.

use serde::Serialize;

use seatgate_core::result::AppResult;
use seatgate_database::Ledger;
use seatgate_entity::order::{Order, OrderItem};
use seatgate_entity::payment::Payment;

use crate::validation;

/// A committed order together with its items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderView {
    /// The order row.
    #[serde(flatten)]
    pub order: Order,
    /// Seats in the order.
    pub items: Vec<OrderItem>,
}

/// Result of a status query. Absent resources are `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitStatus {
    /// The order, once committed.
    pub order: Option<OrderView>,
    /// The payment recorded for the order's intent.
    pub payment: Option<Payment>,
}

/// Reads commit outcomes from the relational store.
#[derive(Debug, Clone)]
pub struct StatusService {
    ledger: Ledger,
}

impl StatusService {
    /// Creates a new status service.
    pub fn new(ledger: Ledger) -> Self {
        Self { ledger }
    }

    /// Look up the order and payment for a commit key.
    pub async fn status(&self, idem: &str) -> AppResult<CommitStatus> {
        validation::require("idem", idem)?;

        let Some(order) = self.ledger.orders.find_by_key(idem).await? else {
            return Ok(CommitStatus {
                order: None,
                payment: None,
            });
        };

        let items = self.ledger.orders.items(idem).await?;
        let payment = self.ledger.payments.find_by_intent(&order.intent_id).await?;

        Ok(CommitStatus {
            order: Some(OrderView { order, items }),
            payment,
        })
    }
}
