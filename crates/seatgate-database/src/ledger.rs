//! Relational store selected by configuration.

use std::sync::Arc;

use tracing::info;

use seatgate_core::config::database::DatabaseConfig;
use seatgate_core::error::AppError;
use seatgate_core::result::AppResult;

use crate::connection::DatabasePool;
use crate::memory::MemoryLedger;
use crate::repositories::{
    IntentRepository, OrderRepository, PaymentRepository, PgIntentRepository, PgOrderRepository,
    PgPaymentRepository,
};

/// The repositories backing intents, orders, and payments.
#[derive(Debug, Clone)]
pub struct Ledger {
    /// Payment intent repository.
    pub intents: Arc<dyn IntentRepository>,
    /// Order repository.
    pub orders: Arc<dyn OrderRepository>,
    /// Payment repository.
    pub payments: Arc<dyn PaymentRepository>,
    pool: Option<DatabasePool>,
}

impl Ledger {
    /// Build the ledger for the configured provider.
    pub async fn connect(config: &DatabaseConfig) -> AppResult<Self> {
        match config.provider.as_str() {
            "postgres" => {
                let pool = DatabasePool::connect(config).await?;
                Ok(Self::postgres(pool))
            }
            "memory" => {
                info!("Using in-memory relational store");
                Ok(Self::in_memory(MemoryLedger::new()))
            }
            other => Err(AppError::configuration(format!(
                "Unknown database provider: '{other}'. Supported: memory, postgres"
            ))),
        }
    }

    /// Ledger backed by PostgreSQL.
    pub fn postgres(pool: DatabasePool) -> Self {
        let pg = pool.pool().clone();
        Self {
            intents: Arc::new(PgIntentRepository::new(pg.clone())),
            orders: Arc::new(PgOrderRepository::new(pg.clone())),
            payments: Arc::new(PgPaymentRepository::new(pg)),
            pool: Some(pool),
        }
    }

    /// Ledger backed by an in-memory store.
    pub fn in_memory(ledger: MemoryLedger) -> Self {
        Self {
            intents: Arc::new(ledger.clone()),
            orders: Arc::new(ledger.clone()),
            payments: Arc::new(ledger),
            pool: None,
        }
    }

    /// Check that the relational store is reachable.
    pub async fn health_check(&self) -> AppResult<bool> {
        match &self.pool {
            Some(pool) => pool.health_check().await,
            None => Ok(true),
        }
    }

    /// Release database connections.
    pub async fn close(&self) {
        if let Some(pool) = &self.pool {
            pool.close().await;
        }
    }
}
