//! Queue message entities.

pub mod commit;
pub mod envelope;

pub use commit::{CommitOrderPayload, CommitRequest};
pub use envelope::QueueEnvelope;
