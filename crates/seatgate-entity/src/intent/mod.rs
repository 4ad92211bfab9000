//! Payment intent entities.

pub mod model;

pub use model::{CreatePaymentIntent, PaymentIntent};
