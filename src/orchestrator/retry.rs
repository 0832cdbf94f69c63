//! Retry configuration and backoff calculation.

use std::time::Duration;

use rand::Rng;

use crate::error::ErrorKind;

/// Configuration for retry behaviour on transient errors.
///
/// Uses exponential backoff with proportional jitter:
///
/// ```rust
/// # use lst_advisor::RetryConfig;
/// # use std::time::Duration;
/// let config = RetryConfig::new()
///     .max_attempts(5)
///     .initial_delay(Duration::from_millis(200))
///     .jitter(0.1);
/// ```
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of attempts (including the initial request).
    /// 1 = no retry. Default: 3.
    pub max_attempts: u32,
    /// Delay before the second attempt. Default: 500ms.
    pub initial_delay: Duration,
    /// Maximum delay between attempts (caps exponential growth). Default: 4s.
    pub max_delay: Duration,
    /// Jitter as a fraction of the delay, applied as ±. Default: 0.2.
    pub jitter: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_millis(4_000),
            jitter: 0.2,
        }
    }
}

impl RetryConfig {
    /// Create a new config with sensible defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a config that disables retries (single attempt).
    pub fn disabled() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Set maximum attempts (including the initial request). Clamped to ≥ 1.
    pub fn max_attempts(mut self, n: u32) -> Self {
        self.max_attempts = n.max(1);
        self
    }

    /// Set the delay before the second attempt.
    pub fn initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Set the maximum delay between attempts.
    pub fn max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Set the jitter fraction. Clamped to `[0, 1]`; 0 disables jitter.
    pub fn jitter(mut self, fraction: f64) -> Self {
        self.jitter = if fraction.is_finite() {
            fraction.clamp(0.0, 1.0)
        } else {
            0.0
        };
        self
    }

    /// Un-jittered delay before attempt `attempt` (1-indexed, ≥ 2).
    ///
    /// `initial_delay * 2^(attempt - 2)`, capped at `max_delay`.
    pub fn delay_before(&self, attempt: u32) -> Duration {
        let exp = attempt.saturating_sub(2);
        let delay = self
            .initial_delay
            .saturating_mul(2u32.saturating_pow(exp));
        delay.min(self.max_delay)
    }

    /// Delay to wait before `attempt`, respecting a server `retry_after`.
    ///
    /// A server hint replaces the computed backoff and is used as given.
    pub fn effective_delay(&self, attempt: u32, retry_after: Option<Duration>) -> Duration {
        match retry_after {
            Some(hint) => hint,
            None => self.jittered(self.delay_before(attempt)),
        }
    }

    fn jittered(&self, delay: Duration) -> Duration {
        if self.jitter <= 0.0 || delay.is_zero() {
            return delay;
        }
        let factor = rand::thread_rng().gen_range(1.0 - self.jitter..=1.0 + self.jitter);
        delay.mul_f64(factor)
    }
}

/// Progress of one `answer()` call through its attempts.
///
/// Lives on the stack of a single request; never shared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RetryState {
    /// Attempts made so far.
    pub attempt: u32,
    pub last_error: Option<ErrorKind>,
    pub next_delay: Duration,
}

impl RetryState {
    pub(crate) fn failed(kind: ErrorKind) -> Self {
        Self {
            last_error: Some(kind),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = RetryConfig::default();
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.initial_delay, Duration::from_millis(500));
        assert_eq!(config.max_delay, Duration::from_millis(4_000));
        assert_eq!(config.jitter, 0.2);
    }

    #[test]
    fn exponential_backoff_is_capped() {
        let config = RetryConfig::new();
        assert_eq!(config.delay_before(2), Duration::from_millis(500));
        assert_eq!(config.delay_before(3), Duration::from_millis(1_000));
        assert_eq!(config.delay_before(4), Duration::from_millis(2_000));
        assert_eq!(config.delay_before(5), Duration::from_millis(4_000));
        assert_eq!(config.delay_before(9), Duration::from_millis(4_000));
        assert_eq!(config.delay_before(200), Duration::from_millis(4_000));
    }

    #[test]
    fn jitter_stays_within_bounds() {
        let config = RetryConfig::new().jitter(0.2);
        for _ in 0..200 {
            let d = config.effective_delay(3, None);
            assert!(d >= Duration::from_millis(800), "{d:?}");
            assert!(d <= Duration::from_millis(1_200), "{d:?}");
        }
    }

    #[test]
    fn retry_after_overrides_backoff() {
        let config = RetryConfig::new();
        assert_eq!(
            config.effective_delay(2, Some(Duration::from_secs(7))),
            Duration::from_secs(7)
        );
    }

    #[test]
    fn zero_jitter_is_exact() {
        let config = RetryConfig::new().jitter(0.0);
        assert_eq!(config.effective_delay(3, None), Duration::from_millis(1_000));
    }

    #[test]
    fn builder_clamps() {
        let config = RetryConfig::new().max_attempts(0).jitter(5.0);
        assert_eq!(config.max_attempts, 1);
        assert_eq!(config.jitter, 1.0);
    }
}
