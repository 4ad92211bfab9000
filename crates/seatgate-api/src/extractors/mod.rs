//! Custom Axum extractors.

pub mod headers;
pub mod json;

pub use headers::{IdempotencyKey, RoomToken};
pub use json::ValidatedJson;
