//! Reconnect backoff policy.

use std::time::Duration;

/// Linear, capped reconnect backoff.
///
/// Failed attempt `n` (counting from 1) waits `min(n × base_delay, max_delay)`
/// before the next attempt. The caller resets its attempt counter to zero on a
/// successful connect, so the first failure afterwards waits `base_delay`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    /// Delay after the first failed attempt
    pub base_delay: Duration,
    /// Upper bound for any delay
    pub max_delay: Duration,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            base_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(3),
        }
    }
}

impl ReconnectPolicy {
    /// Create a new reconnect policy.
    pub fn new(base_delay: Duration, max_delay: Duration) -> Self {
        Self {
            base_delay,
            max_delay,
        }
    }

    /// Set the maximum delay.
    #[must_use]
    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay;
        self
    }

    /// Returns the delay before retrying after failed attempt `attempt`.
    ///
    /// Attempt zero means nothing has failed yet and yields no delay.
    pub fn delay(&self, attempt: u32) -> Duration {
        self.base_delay
            .saturating_mul(attempt)
            .min(self.max_delay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = ReconnectPolicy::default();
        assert_eq!(policy.base_delay, Duration::from_millis(200));
        assert_eq!(policy.max_delay, Duration::from_secs(3));
    }

    #[test]
    fn test_linear_growth() {
        let policy = ReconnectPolicy::default();
        assert_eq!(policy.delay(1), Duration::from_millis(200));
        assert_eq!(policy.delay(2), Duration::from_millis(400));
        assert_eq!(policy.delay(5), Duration::from_millis(1000));
    }

    #[test]
    fn test_capped_at_max() {
        let policy = ReconnectPolicy::default();
        assert_eq!(policy.delay(15), Duration::from_secs(3));
        assert_eq!(policy.delay(16), Duration::from_secs(3));
        assert_eq!(policy.delay(u32::MAX), Duration::from_secs(3));
    }

    #[test]
    fn test_monotonic_non_decreasing() {
        let policy = ReconnectPolicy::new(Duration::from_millis(70), Duration::from_millis(500));
        let delays: Vec<Duration> = (1..=20).map(|attempt| policy.delay(attempt)).collect();

        assert!(delays.windows(2).all(|pair| pair[0] <= pair[1]));
        assert!(delays.iter().all(|delay| *delay <= policy.max_delay));
        assert_eq!(delays.last().copied(), Some(policy.max_delay));
    }

    #[test]
    fn test_zero_attempt_has_no_delay() {
        let policy = ReconnectPolicy::default();
        assert_eq!(policy.delay(0), Duration::ZERO);
    }

    #[test]
    fn test_builder_methods() {
        let policy = ReconnectPolicy::new(Duration::from_millis(50), Duration::from_secs(1))
            .with_max_delay(Duration::from_millis(120));

        assert_eq!(policy.delay(1), Duration::from_millis(50));
        assert_eq!(policy.delay(3), Duration::from_millis(120));
    }
}
