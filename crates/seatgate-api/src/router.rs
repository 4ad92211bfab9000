//! Route definitions for the SeatGate HTTP API.
//!
//! Routes are grouped by surface: `/public` for admission, `/confirm` for
//! payment and commit, `/health` for backend probes.

use axum::{
    Router,
    routing::{get, post},
};

use crate::handlers;
use crate::state::AppState;

/// Build the router with all routes and state.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .nest("/public", public_routes())
        .nest("/confirm", confirm_routes())
        .nest("/health", health_routes())
        .with_state(state)
}

/// Waiting room, holds, and summaries
fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/enter", post(handlers::public::enter))
        .route("/room-status", get(handlers::public::room_status))
        .route("/hold", post(handlers::public::hold))
        .route("/release", post(handlers::public::release))
        .route(
            "/events/{event_id}/sections/{section}/summary",
            get(handlers::public::seat_summary),
        )
}

/// Payment intents, callbacks, commits, and status
fn confirm_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/payment-intent", post(handlers::confirm::payment_intent))
        .route("/payment-callback", post(handlers::confirm::payment_callback))
        .route("/commit", post(handlers::confirm::commit))
        .route("/status", get(handlers::confirm::status))
}

/// Backend probes
fn health_routes() -> Router<AppState> {
    Router::new().route("/detailed", get(handlers::health::health_detailed))
}
