//! # seatgate-api
//!
//! HTTP API layer for SeatGate built on Axum.
//!
//! Provides the public admission endpoints, the confirm endpoints,
//! health probes, extractors, DTOs, and error mapping. [`app`] wires the
//! configured backends into services and the commit worker.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{Backends, build_app, build_state, build_worker};
pub use error::ApiError;
pub use state::AppState;
