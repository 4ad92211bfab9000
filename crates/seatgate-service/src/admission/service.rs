//! Admission gateway: waiting-room tokens and seat holds.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use tracing::{info, warn};

use seatgate_cache::keys;
use seatgate_core::config::admission::AdmissionConfig;
use seatgate_core::error::AppError;
use seatgate_core::result::AppResult;
use seatgate_core::traits::cache::CacheProvider;
use seatgate_entity::admission::{RoomTicket, WaitingRoomToken};
use seatgate_lock::SeatLocks;

use crate::validation;

/// Issued waiting-room credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnterResult {
    /// Opaque room token.
    pub room_token: String,
    /// Queue position (always zero).
    pub position: u32,
    /// Estimated wait in seconds (always zero).
    pub eta_sec: u32,
}

/// Liveness of a waiting-room token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomStatus {
    /// Whether the token is still live.
    pub ready: bool,
    /// Whole seconds before the token expires.
    pub left_sec: u64,
}

/// A granted seat hold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldResult {
    /// `{eventId}:{seatId}`.
    pub hold_id: String,
    /// RFC 3339 expiry of the hold.
    pub expires_at: String,
}

/// Issues waiting-room tokens and places seat holds.
#[derive(Debug, Clone)]
pub struct AdmissionService {
    cache: Arc<dyn CacheProvider>,
    locks: SeatLocks,
    room_ttl: Duration,
    hold_ttl: Duration,
}

impl AdmissionService {
    /// Creates a new admission service.
    pub fn new(cache: Arc<dyn CacheProvider>, locks: SeatLocks, config: &AdmissionConfig) -> Self {
        Self {
            cache,
            locks,
            room_ttl: Duration::from_secs(config.room_ttl_seconds),
            hold_ttl: Duration::from_secs(config.hold_ttl_seconds),
        }
    }

    /// Issue a waiting-room token for a user and event.
    pub async fn enter(&self, user_id: &str, event_id: &str) -> AppResult<EnterResult> {
        if user_id.trim().is_empty() || event_id.trim().is_empty() {
            return Err(AppError::validation("userId and eventId are required"));
        }

        let token = WaitingRoomToken::generate(user_id, event_id);
        let ticket = serde_json::to_string(&token.ticket())?;
        self.cache
            .set(&keys::room(&token.token), &ticket, self.room_ttl)
            .await?;

        info!(user_id, event_id, "Waiting-room token issued");
        Ok(EnterResult {
            room_token: token.token,
            position: 0,
            eta_sec: 0,
        })
    }

    /// Report whether a token is live and how long it has left.
    pub async fn room_status(&self, token: &str) -> AppResult<RoomStatus> {
        if token.is_empty() {
            return Ok(RoomStatus {
                ready: false,
                left_sec: 0,
            });
        }
        let ttl = self.cache.ttl(&keys::room(token)).await?;
        Ok(RoomStatus {
            ready: ttl.exists(),
            left_sec: ttl.seconds_left(),
        })
    }

    /// Hold a seat on behalf of the user bound to `room_token`.
    pub async fn hold(
        &self,
        room_token: Option<&str>,
        event_id: &str,
        seat_id: &str,
    ) -> AppResult<HoldResult> {
        let token = room_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::validation("X-Room-Token header is required"))?;

        let ticket = self
            .live_ticket(token)
            .await?
            .ok_or_else(|| AppError::authentication("waiting room expired"))?;

        validation::require("eventId", event_id)
            .and_then(|_| validation::require("seatId", seat_id))
            .map_err(|_| AppError::validation("eventId and seatId are required"))?;

        let lock = self
            .locks
            .hold(event_id, seat_id, &ticket.user_id, self.hold_ttl)
            .await?
            .ok_or_else(|| AppError::conflict("seat is already held or sold"))?;

        info!(
            event_id,
            seat_id,
            holder = %ticket.user_id,
            "Seat held"
        );
        Ok(HoldResult {
            hold_id: lock.hold_id(),
            expires_at: rfc3339(lock.expires_at),
        })
    }

    /// Release a seat hold. Returns `false` if nothing was held.
    pub async fn release(&self, event_id: &str, seat_id: &str) -> AppResult<bool> {
        if event_id.trim().is_empty() || seat_id.trim().is_empty() {
            return Ok(false);
        }
        let released = self.locks.release(event_id, seat_id).await?;
        if released {
            info!(event_id, seat_id, "Seat released");
        }
        Ok(released)
    }

    async fn live_ticket(&self, token: &str) -> AppResult<Option<RoomTicket>> {
        let Some(raw) = self.cache.get(&keys::room(token)).await? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(ticket) => Ok(Some(ticket)),
            Err(e) => {
                warn!(error = %e, "Undecodable waiting-room ticket treated as expired");
                Ok(None)
            }
        }
    }
}

fn rfc3339(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}
