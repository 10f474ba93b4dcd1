//! Backoff schedule for page fetch retries.

use std::time::Duration;

/// Linear backoff: attempt 1 waits 1s, attempt 2 waits 2s, ...
///
/// The listing source is a plain static file host; a short linear ramp
/// is enough, and anything slower than a few seconds means the page is
/// gone rather than busy.
pub const fn backoff_duration(attempt: u32) -> Duration {
    Duration::from_secs(attempt as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_linear() {
        assert_eq!(backoff_duration(1), Duration::from_secs(1));
        assert_eq!(backoff_duration(2), Duration::from_secs(2));
        assert_eq!(backoff_duration(3), Duration::from_secs(3));
    }
}
