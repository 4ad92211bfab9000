//! Public admission handlers: waiting room, holds, and seat summaries.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};

use seatgate_service::admission::{EnterResult, HoldResult, RoomStatus};
use seatgate_service::summary::SeatSummary;

use crate::dto::request::{EnterRequest, RoomStatusQuery, SeatRequest};
use crate::dto::response::ReleaseResponse;
use crate::error::ApiError;
use crate::extractors::{RoomToken, ValidatedJson};
use crate::state::AppState;

/// POST /public/enter
pub async fn enter(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<EnterRequest>,
) -> Result<Json<EnterResult>, ApiError> {
    let result = state.admission.enter(&req.user_id, &req.event_id).await?;
    Ok(Json(result))
}

/// GET /public/room-status?token=
pub async fn room_status(
    State(state): State<AppState>,
    Query(query): Query<RoomStatusQuery>,
) -> Result<Json<RoomStatus>, ApiError> {
    let status = state.admission.room_status(&query.token).await?;
    Ok(Json(status))
}

/// POST /public/hold
///
/// An unreadable body counts as missing ids, reported after the token checks.
pub async fn hold(
    State(state): State<AppState>,
    token: RoomToken,
    body: Result<Json<SeatRequest>, JsonRejection>,
) -> Result<Json<HoldResult>, ApiError> {
    let req = body.map(|Json(req)| req).unwrap_or_default();
    let result = state
        .admission
        .hold(token.as_deref(), &req.event_id, &req.seat_id)
        .await?;
    Ok(Json(result))
}

/// POST /public/release
pub async fn release(
    State(state): State<AppState>,
    body: Result<Json<SeatRequest>, JsonRejection>,
) -> Result<Json<ReleaseResponse>, ApiError> {
    let req = body.map(|Json(req)| req).unwrap_or_default();
    let released = state.admission.release(&req.event_id, &req.seat_id).await?;
    Ok(Json(ReleaseResponse { released }))
}

/// GET /public/events/{event_id}/sections/{section}/summary
pub async fn seat_summary(
    State(state): State<AppState>,
    Path((event_id, section)): Path<(String, String)>,
) -> Result<Json<SeatSummary>, ApiError> {
    let summary = state.summaries.summary(&event_id, &section).await?;
    Ok(Json(summary))
}
