//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use validator::Validate;

use seatgate_entity::message::CommitRequest;
use seatgate_entity::payment::PaymentUpdate;
use seatgate_service::intent::CreateIntentRequest;

/// POST /public/enter
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct EnterRequest {
    /// User entering the waiting room.
    #[validate(length(min = 1, message = "userId is required"))]
    pub user_id: String,
    /// Event being queued for.
    #[validate(length(min = 1, message = "eventId is required"))]
    pub event_id: String,
}

/// GET /public/room-status
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RoomStatusQuery {
    /// Waiting-room token.
    pub token: String,
}

/// POST /public/hold and POST /public/release
///
/// Missing fields deserialize as empty so the admission service decides
/// how to report them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SeatRequest {
    /// Event the seat belongs to.
    pub event_id: String,
    /// Seat identifier.
    pub seat_id: String,
}

/// POST /confirm/payment-intent
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct PaymentIntentRequest {
    /// Paying user.
    #[validate(length(min = 1, message = "userId is required"))]
    pub user_id: String,
    /// Event being paid for.
    #[validate(length(min = 1, message = "eventId is required"))]
    pub event_id: String,
    /// Seats covered by the intent.
    #[validate(length(min = 1, message = "seatIds must not be empty"))]
    pub seat_ids: Vec<String>,
}

impl PaymentIntentRequest {
    /// Attach the idempotency key.
    pub fn into_create(self, idempotency_key: String) -> CreateIntentRequest {
        CreateIntentRequest {
            idempotency_key,
            user_id: self.user_id,
            event_id: self.event_id,
            seat_ids: self.seat_ids,
        }
    }
}

/// POST /confirm/payment-callback
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct PaymentCallbackRequest {
    /// Intent the callback refers to.
    #[validate(length(min = 1, message = "intentId is required"))]
    pub intent_id: String,
    /// Provider status.
    #[validate(length(min = 1, message = "status is required"))]
    pub status: String,
    /// Amount reported by the provider.
    pub amount: Option<i64>,
    /// Provider transaction id.
    pub txn_id: Option<String>,
    /// Event the payment is for.
    pub event_id: Option<String>,
}

impl From<PaymentCallbackRequest> for PaymentUpdate {
    fn from(req: PaymentCallbackRequest) -> Self {
        Self {
            intent_id: req.intent_id,
            status: req.status,
            amount: req.amount,
            txn_id: req.txn_id,
            event_id: req.event_id,
        }
    }
}

/// POST /confirm/commit
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct CommitBody {
    /// Intent the purchase is paid through.
    #[validate(length(min = 1, message = "intentId is required"))]
    pub intent_id: String,
    /// Event the seats belong to.
    #[validate(length(min = 1, message = "eventId is required"))]
    pub event_id: String,
    /// Seats to assign.
    #[validate(length(min = 1, message = "seatIds must not be empty"))]
    pub seat_ids: Vec<String>,
    /// Buying user.
    #[validate(length(min = 1, message = "userId is required"))]
    pub user_id: String,
}

impl CommitBody {
    /// Attach the idempotency key.
    pub fn into_request(self, idempotency_key: String) -> CommitRequest {
        CommitRequest {
            idempotency_key,
            intent_id: self.intent_id,
            event_id: self.event_id,
            seat_ids: self.seat_ids,
            user_id: self.user_id,
        }
    }
}

/// GET /confirm/status
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StatusQuery {
    /// Commit idempotency key.
    pub idem: String,
}
