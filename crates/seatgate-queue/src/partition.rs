//! Deterministic partition and deduplication keys.

use sha2::{Digest, Sha256};

/// Group id for `key`: `g-{n}` where `n` is the first four bytes of the
/// SHA-256 digest, big-endian, modulo `shards`.
pub fn group_id(key: &str, shards: u32) -> String {
    let digest = Sha256::digest(key.as_bytes());
    let head = u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]]);
    format!("g-{}", head % shards.max(1))
}

/// Dedup id of a commit: the idempotency key itself.
pub fn commit_dedup_id(idempotency_key: &str) -> String {
    idempotency_key.to_string()
}

/// Dedup id of a payment callback.
pub fn payment_dedup_id(intent_id: &str, status: &str) -> String {
    format!("pay:{intent_id}:{status}")
}
