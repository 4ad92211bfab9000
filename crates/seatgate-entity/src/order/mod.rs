//! Order entities.

pub mod model;
pub mod status;

pub use model::{CommitOrder, CommitOutcome, Order, OrderItem};
pub use status::OrderStatus;
