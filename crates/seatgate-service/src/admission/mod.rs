//! Waiting room and seat holds.

pub mod service;

pub use service::{AdmissionService, EnterResult, HoldResult, RoomStatus};
