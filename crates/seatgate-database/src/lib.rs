//! # seatgate-database
//!
//! Transactional relational store for SeatGate: payment intents, orders,
//! order items, and payments. Repositories are traits with a PostgreSQL
//! implementation (via sqlx) and an in-memory implementation.

pub mod connection;
pub mod ledger;
pub mod memory;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
pub use ledger::Ledger;
pub use memory::MemoryLedger;
