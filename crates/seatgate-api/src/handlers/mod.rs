//! Route handlers organized by surface.

pub mod confirm;
pub mod health;
pub mod public;
