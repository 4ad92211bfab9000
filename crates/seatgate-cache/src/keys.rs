//! Cache key builders for all SeatGate cache entries.

/// Cache key for a waiting-room token.
pub fn room(token: &str) -> String {
    format!("room:{token}")
}

/// Cache key for the seat summary of one event section.
pub fn seat_summary(event_id: &str, section: &str) -> String {
    format!("sum:{event_id}:{section}")
}
