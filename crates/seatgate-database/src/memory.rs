//! In-memory ledger implementing every repository trait.
//!
//! All state sits behind one Tokio mutex, so each operation (including a
//! whole commit) is atomic with respect to the others.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use seatgate_core::error::AppError;
use seatgate_core::result::AppResult;
use seatgate_entity::intent::{CreatePaymentIntent, PaymentIntent};
use seatgate_entity::order::{CommitOrder, CommitOutcome, Order, OrderItem, OrderStatus};
use seatgate_entity::payment::{Payment, PaymentUpdate};

use crate::repositories::{IntentRepository, OrderRepository, PaymentRepository};

#[derive(Debug, Default)]
struct LedgerState {
    intents: HashMap<String, PaymentIntent>,
    orders: HashMap<String, Order>,
    items: BTreeMap<(String, String), OrderItem>,
    payments: HashMap<String, Payment>,
}

/// In-memory relational store.
#[derive(Debug, Clone, Default)]
pub struct MemoryLedger {
    state: Arc<Mutex<LedgerState>>,
    unavailable: Arc<AtomicBool>,
}

impl MemoryLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent operation fail with a database error until
    /// switched back.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of order items across all orders.
    pub async fn item_count(&self) -> usize {
        self.state.lock().await.items.len()
    }

    fn check_available(&self) -> AppResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AppError::database("In-memory ledger is unavailable"));
        }
        Ok(())
    }
}

#[async_trait]
impl IntentRepository for MemoryLedger {
    async fn find_by_key(&self, idempotency_key: &str) -> AppResult<Option<PaymentIntent>> {
        self.check_available()?;
        Ok(self.state.lock().await.intents.get(idempotency_key).cloned())
    }

    async fn find_by_intent_id(&self, intent_id: &str) -> AppResult<Option<PaymentIntent>> {
        self.check_available()?;
        let state = self.state.lock().await;
        Ok(state
            .intents
            .values()
            .find(|i| i.intent_id == intent_id)
            .cloned())
    }

    async fn insert_if_absent(&self, intent: &CreatePaymentIntent) -> AppResult<bool> {
        self.check_available()?;
        let mut state = self.state.lock().await;
        if state.intents.contains_key(&intent.idempotency_key) {
            return Ok(false);
        }
        state.intents.insert(
            intent.idempotency_key.clone(),
            intent.clone().into_intent(Utc::now()),
        );
        Ok(true)
    }
}

#[async_trait]
impl OrderRepository for MemoryLedger {
    async fn find_by_key(&self, idempotency_key: &str) -> AppResult<Option<Order>> {
        self.check_available()?;
        Ok(self.state.lock().await.orders.get(idempotency_key).cloned())
    }

    async fn items(&self, idempotency_key: &str) -> AppResult<Vec<OrderItem>> {
        self.check_available()?;
        let state = self.state.lock().await;
        Ok(state
            .items
            .values()
            .filter(|item| item.order_id == idempotency_key)
            .cloned()
            .collect())
    }

    async fn commit(&self, order: &CommitOrder) -> AppResult<CommitOutcome> {
        self.check_available()?;
        let mut state = self.state.lock().await;

        let order_created = !state.orders.contains_key(&order.idempotency_key);
        if order_created {
            state.orders.insert(
                order.idempotency_key.clone(),
                Order {
                    idempotency_key: order.idempotency_key.clone(),
                    intent_id: order.intent_id.clone(),
                    user_id: order.user_id.clone(),
                    event_id: order.event_id.clone(),
                    status: OrderStatus::Confirmed.as_str().to_string(),
                    total: order.total(),
                    created_at: Utc::now(),
                },
            );
        }

        let mut items_inserted = 0;
        for seat_id in &order.seat_ids {
            let key = (order.idempotency_key.clone(), seat_id.clone());
            if !state.items.contains_key(&key) {
                state.items.insert(
                    key,
                    OrderItem {
                        order_id: order.idempotency_key.clone(),
                        seat_id: seat_id.clone(),
                        price: order.unit_price,
                    },
                );
                items_inserted += 1;
            }
        }

        if let Some(payment) = state.payments.get_mut(&order.intent_id) {
            if payment.order_id.is_none() {
                payment.order_id = Some(order.idempotency_key.clone());
                payment.updated_at = Utc::now();
            }
        }

        Ok(CommitOutcome {
            order_created,
            items_inserted,
        })
    }
}

#[async_trait]
impl PaymentRepository for MemoryLedger {
    async fn upsert(&self, update: &PaymentUpdate) -> AppResult<Payment> {
        self.check_available()?;
        let mut state = self.state.lock().await;
        let now = Utc::now();
        let order_id = state
            .orders
            .values()
            .find(|o| o.intent_id == update.intent_id)
            .map(|o| o.idempotency_key.clone());

        let payment = state
            .payments
            .entry(update.intent_id.clone())
            .or_insert_with(|| Payment {
                intent_id: update.intent_id.clone(),
                order_id: None,
                status: update.status.clone(),
                amount: None,
                txn_id: None,
                approved_at: None,
                updated_at: now,
            });

        payment.status = update.status.clone();
        payment.amount = update.amount.or(payment.amount);
        if update.txn_id.is_some() {
            payment.txn_id = update.txn_id.clone();
        }
        if payment.order_id.is_none() {
            payment.order_id = order_id;
        }
        if update.is_approval() && payment.approved_at.is_none() {
            payment.approved_at = Some(now);
        }
        payment.updated_at = now;

        Ok(payment.clone())
    }

    async fn find_by_intent(&self, intent_id: &str) -> AppResult<Option<Payment>> {
        self.check_available()?;
        Ok(self.state.lock().await.payments.get(intent_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seatgate_entity::payment::STATUS_APPROVED;

    fn commit(idem: &str, seats: &[&str]) -> CommitOrder {
        CommitOrder {
            idempotency_key: idem.to_string(),
            intent_id: "pi_1".to_string(),
            user_id: "u1".to_string(),
            event_id: "e1".to_string(),
            seat_ids: seats.iter().map(|s| s.to_string()).collect(),
            unit_price: 10000,
        }
    }

    fn intent(key: &str, intent_id: &str) -> CreatePaymentIntent {
        CreatePaymentIntent {
            idempotency_key: key.to_string(),
            intent_id: intent_id.to_string(),
            user_id: "u1".to_string(),
            event_id: "e1".to_string(),
            seat_ids: vec!["A1".to_string()],
            amount: 10000,
        }
    }

    #[tokio::test]
    async fn test_intent_insert_if_absent_keeps_first_row() {
        let ledger = MemoryLedger::new();
        assert!(ledger.insert_if_absent(&intent("key-0001", "pi_a")).await.unwrap());
        assert!(!ledger.insert_if_absent(&intent("key-0001", "pi_b")).await.unwrap());
        let stored = IntentRepository::find_by_key(&ledger, "key-0001")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.intent_id, "pi_a");
    }

    #[tokio::test]
    async fn test_commit_is_idempotent() {
        let ledger = MemoryLedger::new();
        let first = ledger.commit(&commit("idem-1", &["A1", "A2"])).await.unwrap();
        assert!(first.order_created);
        assert_eq!(first.items_inserted, 2);

        let second = ledger.commit(&commit("idem-1", &["A1", "A2"])).await.unwrap();
        assert!(!second.order_created);
        assert_eq!(second.items_inserted, 0);
        assert_eq!(ledger.item_count().await, 2);

        let order = OrderRepository::find_by_key(&ledger, "idem-1")
            .await
            .unwrap()
            .unwrap();
        assert!(order.is_confirmed());
        assert_eq!(order.total, 20000);
    }

    #[tokio::test]
    async fn test_payment_converges_and_links_order() {
        let ledger = MemoryLedger::new();
        let pending = PaymentUpdate {
            intent_id: "pi_1".into(),
            status: "PENDING".into(),
            amount: Some(10000),
            txn_id: None,
            event_id: None,
        };
        let approved = PaymentUpdate {
            status: STATUS_APPROVED.into(),
            amount: None,
            txn_id: Some("txn-9".into()),
            ..pending.clone()
        };

        ledger.upsert(&pending).await.unwrap();
        let row = ledger.upsert(&approved).await.unwrap();
        assert!(row.is_approved());
        assert_eq!(row.amount, Some(10000));
        assert_eq!(row.txn_id.as_deref(), Some("txn-9"));
        assert!(row.approved_at.is_some());
        assert_eq!(row.order_id, None);

        ledger.commit(&commit("idem-1", &["A1"])).await.unwrap();
        let linked = ledger.find_by_intent("pi_1").await.unwrap().unwrap();
        assert_eq!(linked.order_id.as_deref(), Some("idem-1"));
    }

    #[tokio::test]
    async fn test_unavailable_ledger_fails_transiently() {
        let ledger = MemoryLedger::new();
        ledger.set_unavailable(true);
        let err = ledger.commit(&commit("idem-1", &["A1"])).await.unwrap_err();
        assert!(err.is_transient());
        ledger.set_unavailable(false);
        assert!(ledger.commit(&commit("idem-1", &["A1"])).await.is_ok());
    }
}
