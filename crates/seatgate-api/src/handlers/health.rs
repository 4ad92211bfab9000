//! Health check handlers.

use axum::Json;
use axum::extract::State;

use seatgate_service::health::BackendHealth;

use crate::dto::response::HealthResponse;
use crate::state::AppState;

/// GET /public/health and GET /confirm/health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::now())
}

/// GET /health/detailed
pub async fn health_detailed(State(state): State<AppState>) -> Json<BackendHealth> {
    Json(state.health.check().await)
}
