//! # seatgate-entity
//!
//! Domain entity models for SeatGate. Relational rows derive
//! `sqlx::FromRow`; everything crossing the HTTP or queue boundary is
//! serialized in camelCase.

pub mod admission;
pub mod intent;
pub mod message;
pub mod order;
pub mod payment;
