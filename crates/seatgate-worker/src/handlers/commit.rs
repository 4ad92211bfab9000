//! Commit handler: validates seat locks, commits the order, and releases
//! the locks it consumed.

use tracing::{debug, info, warn};

use seatgate_database::Ledger;
use seatgate_entity::message::CommitOrderPayload;
use seatgate_entity::order::CommitOrder;
use seatgate_lock::{HeldSeat, SeatLocks};

use crate::executor::ProcessError;

/// Commit policy knobs.
#[derive(Debug, Clone, Copy)]
pub struct CommitPolicy {
    /// Price of one seat in minor units.
    pub unit_price: i64,
    /// Receive count at which a missing seat lock becomes terminal.
    pub lock_missing_max_receives: u32,
    /// Require an approved payment for the intent before committing.
    pub require_payment_approval: bool,
}

/// Turns `COMMIT_ORDER` messages into orders.
#[derive(Debug, Clone)]
pub struct CommitOrderHandler {
    locks: SeatLocks,
    ledger: Ledger,
    policy: CommitPolicy,
}

impl CommitOrderHandler {
    /// Create a new handler.
    pub fn new(locks: SeatLocks, ledger: Ledger, policy: CommitPolicy) -> Self {
        Self {
            locks,
            ledger,
            policy,
        }
    }

    /// Process one commit.
    pub async fn handle(
        &self,
        idem: &str,
        payload: CommitOrderPayload,
        receive_count: u32,
    ) -> Result<(), ProcessError> {
        if idem.trim().is_empty() || payload.seat_ids.is_empty() {
            return Err(ProcessError::Poison(
                "Commit message without idem or seats".to_string(),
            ));
        }
        let order = payload.into_commit(idem, self.policy.unit_price);

        let committed = self
            .ledger
            .orders
            .find_by_key(idem)
            .await?
            .is_some_and(|o| o.is_confirmed());
        if committed {
            info!(idem, "Order already committed, resuming lock cleanup");
            let held = self.owned_locks(&order).await?;
            self.release(&order, &held).await?;
            return Ok(());
        }

        let held = self.validate_locks(&order, receive_count).await?;
        if self.policy.require_payment_approval {
            self.ensure_payment_approved(&order).await?;
        }

        let outcome = self.ledger.orders.commit(&order).await?;
        info!(
            idem,
            intent_id = %order.intent_id,
            seats = order.seat_ids.len(),
            total = order.total(),
            order_created = outcome.order_created,
            items_inserted = outcome.items_inserted,
            "Order committed"
        );

        self.release(&order, &held).await
    }

    /// Every seat must carry a live lock held by the buyer.
    async fn validate_locks(
        &self,
        order: &CommitOrder,
        receive_count: u32,
    ) -> Result<Vec<HeldSeat>, ProcessError> {
        let mut held = Vec::with_capacity(order.seat_ids.len());
        for seat_id in &order.seat_ids {
            match self.locks.current(&order.event_id, seat_id).await? {
                Some(lock) if lock.lock.is_held_by(&order.user_id) => held.push(lock),
                other => {
                    let reason = match other {
                        Some(lock) => format!(
                            "LockMissing: seat {seat_id} is held by {}",
                            lock.lock.holder_id
                        ),
                        None => format!("LockMissing: seat {seat_id} has no live hold"),
                    };
                    if receive_count >= self.policy.lock_missing_max_receives {
                        return Err(ProcessError::Poison(reason));
                    }
                    return Err(ProcessError::Retryable(reason));
                }
            }
        }
        Ok(held)
    }

    /// Locks still held by the buyer, used when resuming cleanup.
    async fn owned_locks(&self, order: &CommitOrder) -> Result<Vec<HeldSeat>, ProcessError> {
        let mut held = Vec::new();
        for seat_id in &order.seat_ids {
            if let Some(lock) = self.locks.current(&order.event_id, seat_id).await? {
                if lock.lock.is_held_by(&order.user_id) {
                    held.push(lock);
                }
            }
        }
        Ok(held)
    }

    async fn ensure_payment_approved(&self, order: &CommitOrder) -> Result<(), ProcessError> {
        let approved = self
            .ledger
            .payments
            .find_by_intent(&order.intent_id)
            .await?
            .is_some_and(|p| p.is_approved());
        if approved {
            Ok(())
        } else {
            Err(ProcessError::Retryable(format!(
                "PaymentPending: intent {} has no approved payment",
                order.intent_id
            )))
        }
    }

    async fn release(&self, order: &CommitOrder, held: &[HeldSeat]) -> Result<(), ProcessError> {
        for lock in held {
            if self.locks.release_held(lock).await? {
                debug!(idem = %order.idempotency_key, seat_id = %lock.lock.seat_id, "Seat lock released");
            } else {
                warn!(
                    idem = %order.idempotency_key,
                    seat_id = %lock.lock.seat_id,
                    "Seat lock changed before release, left in place"
                );
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use seatgate_core::traits::lock_store::LockStore;
    use seatgate_database::MemoryLedger;
    use seatgate_entity::payment::PaymentUpdate;
    use seatgate_lock::MemoryLockStore;

    const HOLD: Duration = Duration::from_secs(120);

    struct Fixture {
        store: Arc<MemoryLockStore>,
        locks: SeatLocks,
        memory: MemoryLedger,
        ledger: Ledger,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(MemoryLockStore::new());
        let memory = MemoryLedger::new();
        Fixture {
            locks: SeatLocks::new(store.clone()),
            store,
            ledger: Ledger::in_memory(memory.clone()),
            memory,
        }
    }

    fn policy(require_payment_approval: bool) -> CommitPolicy {
        CommitPolicy {
            unit_price: 10_000,
            lock_missing_max_receives: 3,
            require_payment_approval,
        }
    }

    fn payload(seats: &[&str]) -> CommitOrderPayload {
        CommitOrderPayload {
            intent_id: "pi_1".into(),
            event_id: "event-0001".into(),
            seat_ids: seats.iter().map(|s| s.to_string()).collect(),
            user_id: "user-0001".into(),
        }
    }

    #[tokio::test]
    async fn test_commits_and_releases_locks() {
        let f = fixture();
        for seat in ["R1C1", "R1C2"] {
            f.locks.hold("event-0001", seat, "user-0001", HOLD).await.unwrap();
        }
        let handler = CommitOrderHandler::new(f.locks.clone(), f.ledger.clone(), policy(false));

        handler
            .handle("idem-00000001", payload(&["R1C1", "R1C2"]), 1)
            .await
            .unwrap();

        let order = f.ledger.orders.find_by_key("idem-00000001").await.unwrap().unwrap();
        assert_eq!(order.total, 20_000);
        assert_eq!(f.memory.item_count().await, 2);
        assert_eq!(f.store.live_count().await, 0);
    }

    #[tokio::test]
    async fn test_missing_lock_retries_then_poisons() {
        let f = fixture();
        let handler = CommitOrderHandler::new(f.locks.clone(), f.ledger.clone(), policy(false));

        let err = handler.handle("idem-00000001", payload(&["R1C1"]), 1).await.unwrap_err();
        assert!(err.is_retryable());
        let err = handler.handle("idem-00000001", payload(&["R1C1"]), 3).await.unwrap_err();
        assert!(!err.is_retryable());
        assert!(f.ledger.orders.find_by_key("idem-00000001").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_foreign_holder_is_lock_missing() {
        let f = fixture();
        f.locks.hold("event-0001", "R1C1", "user-0002", HOLD).await.unwrap();
        let handler = CommitOrderHandler::new(f.locks.clone(), f.ledger.clone(), policy(false));

        let err = handler.handle("idem-00000001", payload(&["R1C1"]), 1).await.unwrap_err();
        assert!(matches!(err, ProcessError::Retryable(ref m) if m.starts_with("LockMissing")));
        assert_eq!(f.store.live_count().await, 1);
    }

    #[tokio::test]
    async fn test_redelivery_after_commit_resumes_cleanup() {
        let f = fixture();
        f.locks.hold("event-0001", "R1C1", "user-0001", HOLD).await.unwrap();
        f.ledger
            .orders
            .commit(&payload(&["R1C1"]).into_commit("idem-00000001", 10_000))
            .await
            .unwrap();
        let handler = CommitOrderHandler::new(f.locks.clone(), f.ledger.clone(), policy(false));

        handler.handle("idem-00000001", payload(&["R1C1"]), 2).await.unwrap();
        assert_eq!(f.store.live_count().await, 0);
        assert_eq!(f.memory.item_count().await, 1);
    }

    #[tokio::test]
    async fn test_cleanup_skips_foreign_rehold() {
        let f = fixture();
        f.store
            .insert_if_absent(&seatgate_lock::keys::seat("event-0001", "R1C1"), "{\"foreign\":true}", HOLD)
            .await
            .unwrap();
        f.ledger
            .orders
            .commit(&payload(&["R1C1"]).into_commit("idem-00000001", 10_000))
            .await
            .unwrap();
        let handler = CommitOrderHandler::new(f.locks.clone(), f.ledger.clone(), policy(false));

        handler.handle("idem-00000001", payload(&["R1C1"]), 2).await.unwrap();
        assert_eq!(f.store.live_count().await, 1);
    }

    #[tokio::test]
    async fn test_payment_gate() {
        let f = fixture();
        f.locks.hold("event-0001", "R1C1", "user-0001", HOLD).await.unwrap();
        let handler = CommitOrderHandler::new(f.locks.clone(), f.ledger.clone(), policy(true));

        let err = handler.handle("idem-00000001", payload(&["R1C1"]), 1).await.unwrap_err();
        assert!(matches!(err, ProcessError::Retryable(ref m) if m.starts_with("PaymentPending")));

        f.ledger
            .payments
            .upsert(&PaymentUpdate {
                intent_id: "pi_1".into(),
                status: "APPROVED".into(),
                amount: Some(10_000),
                txn_id: None,
                event_id: None,
            })
            .await
            .unwrap();
        handler.handle("idem-00000001", payload(&["R1C1"]), 2).await.unwrap();

        let payment = f.ledger.payments.find_by_intent("pi_1").await.unwrap().unwrap();
        assert_eq!(payment.order_id.as_deref(), Some("idem-00000001"));
    }

    #[tokio::test]
    async fn test_store_outage_is_retryable_and_keeps_locks() {
        let f = fixture();
        f.locks.hold("event-0001", "R1C1", "user-0001", HOLD).await.unwrap();
        f.memory.set_unavailable(true);
        let handler = CommitOrderHandler::new(f.locks.clone(), f.ledger.clone(), policy(false));

        let err = handler.handle("idem-00000001", payload(&["R1C1"]), 1).await.unwrap_err();
        assert!(err.is_retryable());
        assert_eq!(f.store.live_count().await, 1);
    }
}
