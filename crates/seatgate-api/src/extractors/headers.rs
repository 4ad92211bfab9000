//! Header extractors for idempotency keys and waiting-room tokens.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use seatgate_core::error::AppError;

use crate::error::ApiError;

/// Client idempotency key header.
pub const IDEMPOTENCY_KEY: &str = "idempotency-key";
/// Waiting-room token header.
pub const ROOM_TOKEN: &str = "x-room-token";
/// Response header set when an intent is replayed.
pub const IDEMPOTENT_REPLAY: &str = "idempotent-replay";

/// The `Idempotency-Key` request header. Required.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdempotencyKey(pub String);

impl<S> FromRequestParts<S> for IdempotencyKey
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(IDEMPOTENCY_KEY)
            .and_then(|v| v.to_str().ok())
            .map(|v| Self(v.trim().to_string()))
            .ok_or_else(|| ApiError(AppError::validation("Idempotency-Key header is required")))
    }
}

/// The `X-Room-Token` request header, if present.
///
/// Absence is reported by the admission service so that its error
/// precedence applies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomToken(pub Option<String>);

impl RoomToken {
    /// Borrow the token.
    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

impl<S> FromRequestParts<S> for RoomToken
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(
            parts
                .headers
                .get(ROOM_TOKEN)
                .and_then(|v| v.to_str().ok())
                .map(|v| v.trim().to_string()),
        ))
    }
}
