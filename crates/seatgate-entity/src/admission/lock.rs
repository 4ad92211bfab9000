//! Seat lock entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state recorded on a seat lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LockStatus {
    /// The seat is reserved for its holder until the lock expires.
    Held,
}

impl LockStatus {
    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Held => "held",
        }
    }
}

impl fmt::Display for LockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A time-bounded exclusive hold on one seat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatLock {
    /// Event the seat belongs to.
    pub event_id: String,
    /// Seat identifier within the event.
    pub seat_id: String,
    /// Lock state.
    pub status: LockStatus,
    /// When the lock passively expires.
    pub expires_at: DateTime<Utc>,
    /// User id bound to the waiting-room token used for the hold.
    pub holder_id: String,
}

impl SeatLock {
    /// Create a held lock.
    pub fn held(
        event_id: impl Into<String>,
        seat_id: impl Into<String>,
        holder_id: impl Into<String>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            event_id: event_id.into(),
            seat_id: seat_id.into(),
            status: LockStatus::Held,
            expires_at,
            holder_id: holder_id.into(),
        }
    }

    /// The hold identifier returned to clients.
    pub fn hold_id(&self) -> String {
        format!("{}:{}", self.event_id, self.seat_id)
    }

    /// Check whether the lock is held by the given user.
    pub fn is_held_by(&self, user_id: &str) -> bool {
        self.status == LockStatus::Held && self.holder_id == user_id
    }
}
