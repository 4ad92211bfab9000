//! Cached per-section seat availability.

use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use seatgate_cache::{ReadThrough, keys};
use seatgate_core::result::AppResult;
use seatgate_core::traits::cache::CacheProvider;

use crate::validation;

/// Local entries kept by the summary L1 cache.
const SUMMARY_L1_CAPACITY: u64 = 10_000;

/// Source of truth for how many seats a section still has.
#[async_trait]
pub trait SeatInventory: Send + Sync + Debug + 'static {
    /// Count the seats still available in a section.
    async fn seats_available(&self, event_id: &str, section: &str) -> AppResult<u32>;
}

/// Inventory reporting the same capacity for every section.
#[derive(Debug, Clone, Copy)]
pub struct FixedInventory {
    capacity: u32,
}

impl FixedInventory {
    /// Creates an inventory with `capacity` seats per section.
    pub fn new(capacity: u32) -> Self {
        Self { capacity }
    }
}

#[async_trait]
impl SeatInventory for FixedInventory {
    async fn seats_available(&self, _event_id: &str, _section: &str) -> AppResult<u32> {
        Ok(self.capacity)
    }
}

/// Availability snapshot for one section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatSummary {
    /// Event id.
    pub event: String,
    /// Section id.
    pub section: String,
    /// Seats still available.
    pub seats_available: u32,
    /// RFC 3339 time the snapshot was computed.
    pub updated_at: String,
}

/// Serves seat summaries through the read-through cache.
#[derive(Debug, Clone)]
pub struct SeatSummaryService {
    inventory: Arc<dyn SeatInventory>,
    cache: ReadThrough,
}

impl SeatSummaryService {
    /// Creates a summary service whose snapshots live for `ttl`.
    pub fn new(
        inventory: Arc<dyn SeatInventory>,
        cache: Arc<dyn CacheProvider>,
        ttl: Duration,
    ) -> Self {
        Self {
            inventory,
            cache: ReadThrough::new(cache, ttl, SUMMARY_L1_CAPACITY),
        }
    }

    /// Return the section summary, computing it at most once per TTL.
    pub async fn summary(&self, event_id: &str, section: &str) -> AppResult<SeatSummary> {
        validation::require("eventId", event_id)?;
        validation::require("section", section)?;

        let key = keys::seat_summary(event_id, section);
        let inventory = Arc::clone(&self.inventory);
        let (event, sect) = (event_id.to_string(), section.to_string());

        self.cache
            .get_or_load(&key, move || async move {
                let seats_available = inventory.seats_available(&event, &sect).await?;
                debug!(event = %event, section = %sect, seats_available, "Seat summary computed");
                Ok(SeatSummary {
                    event,
                    section: sect,
                    seats_available,
                    updated_at: rfc3339(Utc::now()),
                })
            })
            .await
    }
}

fn rfc3339(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}
