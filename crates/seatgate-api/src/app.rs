//! Application builder: wires backends into services, the worker, and the
//! Axum app.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::info;

use seatgate_cache::CacheManager;
use seatgate_core::config::AppConfig;
use seatgate_core::result::AppResult;
use seatgate_core::traits::cache::CacheProvider;
use seatgate_core::traits::lock_store::LockStore;
use seatgate_core::traits::queue::MessageQueue;
use seatgate_database::Ledger;
use seatgate_lock::{LockStoreManager, SeatLocks};
use seatgate_queue::QueueManager;
use seatgate_service::{
    AdmissionService, CommitDispatcher, FixedInventory, HealthService, IntentService,
    SeatSummaryService, StatusService,
};
use seatgate_worker::handlers::commit::CommitPolicy;
use seatgate_worker::handlers::{CommitOrderHandler, PaymentUpdateHandler};
use seatgate_worker::{CommitWorker, MessageExecutor};

use crate::middleware::cors::build_cors_layer;
use crate::router::build_router;
use crate::state::AppState;

/// The four backing stores, selected by configuration.
#[derive(Debug, Clone)]
pub struct Backends {
    /// Ephemeral cache.
    pub cache: Arc<dyn CacheProvider>,
    /// Conditional lock store.
    pub locks: Arc<dyn LockStore>,
    /// Ordered dedup queue.
    pub queue: Arc<dyn MessageQueue>,
    /// Relational store.
    pub ledger: Ledger,
}

impl Backends {
    /// Connect every backend named in the configuration.
    pub async fn connect(config: &AppConfig) -> AppResult<Self> {
        info!(provider = %config.cache.provider, "Initializing cache");
        let cache = CacheManager::new(&config.cache).await?.provider();

        info!(provider = %config.lock_store.provider, "Initializing lock store");
        let locks = LockStoreManager::new(&config.lock_store).await?.store();

        info!(provider = %config.queue.provider, "Initializing commit queue");
        let queue = QueueManager::new(&config.queue).await?.queue();

        info!(provider = %config.database.provider, "Initializing relational store");
        let ledger = Ledger::connect(&config.database).await?;

        Ok(Self {
            cache,
            locks,
            queue,
            ledger,
        })
    }
}

/// Build the service layer over `backends`.
pub fn build_state(config: AppConfig, backends: &Backends) -> AppState {
    let seat_locks = SeatLocks::new(Arc::clone(&backends.locks));

    let admission = AdmissionService::new(
        Arc::clone(&backends.cache),
        seat_locks,
        &config.admission,
    );
    let intents = IntentService::new(
        Arc::clone(&backends.ledger.intents),
        config.pricing.unit_price,
    );
    let commits = CommitDispatcher::new(Arc::clone(&backends.queue), config.queue.group_shards);
    let status = StatusService::new(backends.ledger.clone());
    let summaries = SeatSummaryService::new(
        Arc::new(FixedInventory::new(config.admission.section_capacity)),
        Arc::clone(&backends.cache),
        Duration::from_secs(config.admission.summary_ttl_seconds),
    );
    let health = HealthService::new(
        Arc::clone(&backends.cache),
        Arc::clone(&backends.locks),
        Arc::clone(&backends.queue),
        backends.ledger.clone(),
    );

    AppState {
        config: Arc::new(config),
        admission: Arc::new(admission),
        intents: Arc::new(intents),
        commits: Arc::new(commits),
        status: Arc::new(status),
        summaries: Arc::new(summaries),
        health: Arc::new(health),
    }
}

/// Build the commit worker over `backends`.
pub fn build_worker(config: &AppConfig, backends: &Backends) -> CommitWorker {
    let policy = CommitPolicy {
        unit_price: config.pricing.unit_price,
        lock_missing_max_receives: config.worker.lock_missing_max_receives,
        require_payment_approval: config.worker.require_payment_approval,
    };
    let executor = MessageExecutor::new(
        CommitOrderHandler::new(
            SeatLocks::new(Arc::clone(&backends.locks)),
            backends.ledger.clone(),
            policy,
        ),
        PaymentUpdateHandler::new(backends.ledger.clone()),
    );
    CommitWorker::new(
        Arc::clone(&backends.queue),
        Arc::new(executor),
        &config.worker,
    )
}

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    let cors = build_cors_layer(&state.config.server.cors);
    build_router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
