//! Application state shared across all handlers.

use std::sync::Arc;

use seatgate_core::config::AppConfig;
use seatgate_service::{
    AdmissionService, CommitDispatcher, HealthService, IntentService, SeatSummaryService,
    StatusService,
};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Waiting room and seat holds
    pub admission: Arc<AdmissionService>,
    /// Payment intents
    pub intents: Arc<IntentService>,
    /// Commit and payment-callback enqueueing
    pub commits: Arc<CommitDispatcher>,
    /// Order status lookup
    pub status: Arc<StatusService>,
    /// Cached seat summaries
    pub summaries: Arc<SeatSummaryService>,
    /// Backend probes
    pub health: Arc<HealthService>,
}
