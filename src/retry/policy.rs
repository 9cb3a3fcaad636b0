//! Retry policy configuration

use std::time::Duration;

use super::backoff::LinearBackoff;

/// Per-call retry configuration.
///
/// `max_attempts` counts every call, the first one included. The wait after
/// the zero-based attempt `n` fails is `base_delay × (n + 1)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of calls
    pub max_attempts: u32,
    /// Delay unit between calls
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Create a new retry policy
    pub fn new() -> Self {
        Self::default()
    }

    /// Set maximum attempts
    pub const fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Set the delay unit
    pub const fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    /// Wait after the zero-based `attempt` failed.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.backoff().delay_at(attempt)
    }

    /// Fresh backoff schedule for one retry loop.
    pub fn backoff(&self) -> LinearBackoff {
        LinearBackoff::new(self.base_delay).with_max_steps(self.max_attempts.saturating_sub(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backoff::backoff::Backoff;

    #[test]
    fn defaults() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.base_delay, Duration::from_secs(1));
    }

    #[test]
    fn delay_is_linear_in_the_attempt_index() {
        let policy = RetryPolicy::new().with_base_delay(Duration::from_millis(250));
        assert_eq!(policy.delay_for(0), Duration::from_millis(250));
        assert_eq!(policy.delay_for(1), Duration::from_millis(500));
        assert_eq!(policy.delay_for(3), Duration::from_millis(1000));
    }

    #[test]
    fn backoff_yields_one_wait_between_each_pair_of_attempts() {
        let mut backoff = RetryPolicy::new().with_max_attempts(3).backoff();
        assert_eq!(backoff.next_backoff(), Some(Duration::from_secs(1)));
        assert_eq!(backoff.next_backoff(), Some(Duration::from_secs(2)));
        assert_eq!(backoff.next_backoff(), None);
    }
}
