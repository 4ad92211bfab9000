//! Waiting-room token entities.

use serde::{Deserialize, Serialize};

/// The value stored in the cache under `room:{token}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomTicket {
    /// User the token was issued to.
    pub user_id: String,
    /// Event the user is queueing for.
    pub event_id: String,
}

/// A waiting-room admission credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaitingRoomToken {
    /// 128 random bits, hex encoded.
    pub token: String,
    /// User the token was issued to.
    pub user_id: String,
    /// Event the token admits to.
    pub event_id: String,
}

impl WaitingRoomToken {
    /// Length of the hex-encoded token.
    pub const TOKEN_LEN: usize = 32;

    /// Generate a fresh token for the given user and event.
    pub fn generate(user_id: impl Into<String>, event_id: impl Into<String>) -> Self {
        Self {
            token: format!("{:032x}", rand::random::<u128>()),
            user_id: user_id.into(),
            event_id: event_id.into(),
        }
    }

    /// The cached value for this token.
    pub fn ticket(&self) -> RoomTicket {
        RoomTicket {
            user_id: self.user_id.clone(),
            event_id: self.event_id.clone(),
        }
    }
}
