//! Retry delay for failed messages.

use std::time::Duration;

/// Visibility delay before a failed message is retried:
/// `min(cap, 2^(receive_count - 1) * base)`.
pub fn retry_delay(receive_count: u32, base: Duration, cap: Duration) -> Duration {
    let exponent = receive_count.saturating_sub(1).min(31);
    base.saturating_mul(1u32 << exponent).min(cap)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: Duration = Duration::from_secs(5);
    const CAP: Duration = Duration::from_secs(300);

    #[test]
    fn test_doubles_per_receive() {
        assert_eq!(retry_delay(1, BASE, CAP), Duration::from_secs(5));
        assert_eq!(retry_delay(2, BASE, CAP), Duration::from_secs(10));
        assert_eq!(retry_delay(3, BASE, CAP), Duration::from_secs(20));
        assert_eq!(retry_delay(6, BASE, CAP), Duration::from_secs(160));
    }

    #[test]
    fn test_capped() {
        assert_eq!(retry_delay(7, BASE, CAP), CAP);
        assert_eq!(retry_delay(u32::MAX, BASE, CAP), CAP);
    }

    #[test]
    fn test_zero_count_uses_base() {
        assert_eq!(retry_delay(0, BASE, CAP), BASE);
    }
}
