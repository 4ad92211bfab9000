//! Handlers for each queue envelope type.

pub mod commit;
pub mod payment;

pub use commit::CommitOrderHandler;
pub use payment::PaymentUpdateHandler;
