//! Repository traits and their PostgreSQL implementations.

pub mod intent;
pub mod order;
pub mod payment;

use async_trait::async_trait;

use seatgate_core::result::AppResult;
use seatgate_entity::intent::{CreatePaymentIntent, PaymentIntent};
use seatgate_entity::order::{CommitOrder, CommitOutcome, Order, OrderItem};
use seatgate_entity::payment::{Payment, PaymentUpdate};

pub use intent::PgIntentRepository;
pub use order::PgOrderRepository;
pub use payment::PgPaymentRepository;

/// Storage for payment intents, unique per idempotency key.
#[async_trait]
pub trait IntentRepository: Send + Sync + std::fmt::Debug + 'static {
    /// Find the intent created for an idempotency key.
    async fn find_by_key(&self, idempotency_key: &str) -> AppResult<Option<PaymentIntent>>;

    /// Find an intent by its generated id.
    async fn find_by_intent_id(&self, intent_id: &str) -> AppResult<Option<PaymentIntent>>;

    /// Insert the intent unless one exists for the same idempotency key.
    /// Returns `true` if this call inserted the row.
    async fn insert_if_absent(&self, intent: &CreatePaymentIntent) -> AppResult<bool>;
}

/// Storage for orders and their items.
#[async_trait]
pub trait OrderRepository: Send + Sync + std::fmt::Debug + 'static {
    /// Find the order committed under an idempotency key.
    async fn find_by_key(&self, idempotency_key: &str) -> AppResult<Option<Order>>;

    /// List the items of an order.
    async fn items(&self, idempotency_key: &str) -> AppResult<Vec<OrderItem>>;

    /// In one transaction: insert the order if absent, insert each item if
    /// absent, and link any payment already recorded for the intent.
    async fn commit(&self, order: &CommitOrder) -> AppResult<CommitOutcome>;
}

/// Storage for payments, keyed by intent id.
#[async_trait]
pub trait PaymentRepository: Send + Sync + std::fmt::Debug + 'static {
    /// Apply a provider callback and return the resulting row.
    async fn upsert(&self, update: &PaymentUpdate) -> AppResult<Payment>;

    /// Find the payment recorded for an intent.
    async fn find_by_intent(&self, intent_id: &str) -> AppResult<Option<Payment>>;
}
