//! Payment entities.

pub mod model;

pub use model::{Payment, PaymentUpdate, STATUS_APPROVED};
