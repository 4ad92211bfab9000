//! Typed seat lock operations over a [`LockStore`].

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, warn};

use seatgate_core::error::AppError;
use seatgate_core::result::AppResult;
use seatgate_core::traits::lock_store::LockStore;
use seatgate_entity::admission::SeatLock;

use crate::keys;

/// A live seat lock together with the exact stored value it was read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeldSeat {
    /// The decoded lock.
    pub lock: SeatLock,
    raw: String,
}

/// Seat holds stored as JSON under `event#{eventId}/seat#{seatId}`.
#[derive(Debug, Clone)]
pub struct SeatLocks {
    store: Arc<dyn LockStore>,
}

impl SeatLocks {
    /// Creates seat lock operations over `store`.
    pub fn new(store: Arc<dyn LockStore>) -> Self {
        Self { store }
    }

    /// Try to hold a seat for `holder_id` until `ttl` from now.
    ///
    /// Returns `None` if a live lock already exists.
    pub async fn hold(
        &self,
        event_id: &str,
        seat_id: &str,
        holder_id: &str,
        ttl: Duration,
    ) -> AppResult<Option<SeatLock>> {
        let expires_at = Utc::now()
            + chrono::Duration::from_std(ttl)
                .map_err(|e| AppError::internal(format!("Hold TTL out of range: {e}")))?;
        let lock = SeatLock::held(event_id, seat_id, holder_id, expires_at);
        let value = serde_json::to_string(&lock)?;

        let inserted = self
            .store
            .insert_if_absent(&keys::seat(event_id, seat_id), &value, ttl)
            .await?;
        if inserted {
            debug!(event_id, seat_id, holder_id, "Seat held");
            Ok(Some(lock))
        } else {
            Ok(None)
        }
    }

    /// Release a seat regardless of holder. Returns `false` if no lock existed.
    pub async fn release(&self, event_id: &str, seat_id: &str) -> AppResult<bool> {
        self.store
            .delete_if_exists(&keys::seat(event_id, seat_id))
            .await
    }

    /// Read the live lock on a seat.
    ///
    /// An undecodable stored value is reported as no lock.
    pub async fn current(&self, event_id: &str, seat_id: &str) -> AppResult<Option<HeldSeat>> {
        let Some(raw) = self.store.get(&keys::seat(event_id, seat_id)).await? else {
            return Ok(None);
        };
        match serde_json::from_str::<SeatLock>(&raw) {
            Ok(lock) => Ok(Some(HeldSeat { lock, raw })),
            Err(e) => {
                warn!(event_id, seat_id, error = %e, "Ignoring undecodable seat lock");
                Ok(None)
            }
        }
    }

    /// Delete a lock previously read with [`Self::current`], only if it has
    /// not been replaced since.
    pub async fn release_held(&self, held: &HeldSeat) -> AppResult<bool> {
        let key = keys::seat(&held.lock.event_id, &held.lock.seat_id);
        self.store.delete_if_equals(&key, &held.raw).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryLockStore;

    fn locks() -> SeatLocks {
        SeatLocks::new(Arc::new(MemoryLockStore::new()))
    }

    #[tokio::test]
    async fn test_hold_then_conflict() {
        let locks = locks();
        let ttl = Duration::from_secs(120);
        let first = locks.hold("e1", "A1", "u1", ttl).await.unwrap().unwrap();
        assert_eq!(first.hold_id(), "e1:A1");
        assert!(locks.hold("e1", "A1", "u2", ttl).await.unwrap().is_none());

        let current = locks.current("e1", "A1").await.unwrap().unwrap();
        assert!(current.lock.is_held_by("u1"));
    }

    #[tokio::test]
    async fn test_release_held_spares_rehold() {
        let locks = locks();
        let ttl = Duration::from_secs(120);
        locks.hold("e1", "A1", "u1", ttl).await.unwrap();
        let stale = locks.current("e1", "A1").await.unwrap().unwrap();

        assert!(locks.release("e1", "A1").await.unwrap());
        locks.hold("e1", "A1", "u2", ttl).await.unwrap();

        assert!(!locks.release_held(&stale).await.unwrap());
        let current = locks.current("e1", "A1").await.unwrap().unwrap();
        assert!(current.lock.is_held_by("u2"));
    }

    #[tokio::test]
    async fn test_undecodable_value_reads_as_absent() {
        let store = Arc::new(MemoryLockStore::new());
        store
            .insert_if_absent(&keys::seat("e1", "A1"), "garbage", Duration::from_secs(5))
            .await
            .unwrap();
        let locks = SeatLocks::new(store);
        assert!(locks.current("e1", "A1").await.unwrap().is_none());
    }
}
