//! Lock item key builders.

/// Key of the lock item for one seat.
pub fn seat(event_id: &str, seat_id: &str) -> String {
    format!("event#{event_id}/seat#{seat_id}")
}
