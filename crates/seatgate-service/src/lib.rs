//! # seatgate-service
//!
//! Use-case services for SeatGate. Each service orchestrates the cache,
//! lock store, queue, and relational store behind the HTTP surface.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references.

pub mod admission;
pub mod commit;
pub mod health;
pub mod intent;
pub mod status;
pub mod summary;
pub mod validation;

pub use admission::AdmissionService;
pub use commit::CommitDispatcher;
pub use health::HealthService;
pub use intent::IntentService;
pub use status::StatusService;
pub use summary::{FixedInventory, SeatInventory, SeatSummaryService};
