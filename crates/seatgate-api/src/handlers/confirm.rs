//! Confirm handlers: payment intents, callbacks, commits, and status.

use axum::Json;
use axum::extract::{Query, State};
use axum::http::{HeaderName, HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use tracing::info;

use seatgate_service::commit::CommitAccepted;
use seatgate_service::status::CommitStatus;

use crate::dto::request::{CommitBody, PaymentCallbackRequest, PaymentIntentRequest, StatusQuery};
use crate::dto::response::{IntentResponse, OkResponse};
use crate::error::ApiError;
use crate::extractors::headers::IDEMPOTENT_REPLAY;
use crate::extractors::{IdempotencyKey, ValidatedJson};
use crate::state::AppState;

/// POST /confirm/payment-intent
///
/// 201 on creation, 200 with `Idempotent-Replay: true` on replay.
pub async fn payment_intent(
    State(state): State<AppState>,
    IdempotencyKey(key): IdempotencyKey,
    ValidatedJson(req): ValidatedJson<PaymentIntentRequest>,
) -> Result<Response, ApiError> {
    let outcome = state.intents.create(req.into_create(key)).await?;
    let body = Json(IntentResponse::new(outcome.intent, outcome.replay));

    if outcome.replay {
        Ok((
            StatusCode::OK,
            [(
                HeaderName::from_static(IDEMPOTENT_REPLAY),
                HeaderValue::from_static("true"),
            )],
            body,
        )
            .into_response())
    } else {
        Ok((StatusCode::CREATED, body).into_response())
    }
}

/// POST /confirm/payment-callback
pub async fn payment_callback(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<PaymentCallbackRequest>,
) -> Result<Json<OkResponse>, ApiError> {
    info!(intent_id = %req.intent_id, status = %req.status, "Payment callback received");
    state.commits.enqueue_payment_update(req.into()).await?;
    Ok(Json(OkResponse { ok: true }))
}

/// POST /confirm/commit
///
/// 202 with `Location: /confirm/status?idem=...`.
pub async fn commit(
    State(state): State<AppState>,
    IdempotencyKey(key): IdempotencyKey,
    ValidatedJson(req): ValidatedJson<CommitBody>,
) -> Result<(StatusCode, [(HeaderName, String); 1], Json<CommitAccepted>), ApiError> {
    let accepted = state.commits.commit(req.into_request(key)).await?;
    let location = status_location(&accepted.idem);
    Ok((
        StatusCode::ACCEPTED,
        [(header::LOCATION, location)],
        Json(accepted),
    ))
}

/// GET /confirm/status?idem=
pub async fn status(
    State(state): State<AppState>,
    Query(query): Query<StatusQuery>,
) -> Result<Json<CommitStatus>, ApiError> {
    let status = state.status.status(&query.idem).await?;
    Ok(Json(status))
}

fn status_location(idem: &str) -> String {
    format!("/confirm/status?idem={}", urlencoding::encode(idem))
}
