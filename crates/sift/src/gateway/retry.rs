//! Retry/backoff policy as a pure decision function.

use std::time::Duration;

use super::provider::ProviderError;

/// Backoff policy for gateway calls.
///
/// Attempt `i` (zero-based) that fails retryably waits `base_delay * 2^i`
/// before the next attempt, so `max_attempts = 3` produces at most three
/// attempts with inter-attempt delays of `d, 2d`.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempt budget (first attempt included).
    pub max_attempts: u32,
    /// Delay before the first retry.
    pub base_delay: Duration,
    /// Add up to 25% random jitter to each delay. Off by default so the
    /// delay sequence is exact.
    pub jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(500),
            jitter: false,
        }
    }
}

impl RetryPolicy {
    /// Create a policy with the given attempt budget and base delay.
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
            jitter: false,
        }
    }

    /// Enable random jitter.
    pub fn with_jitter(mut self) -> Self {
        self.jitter = true;
        self
    }

    /// Decide whether to retry after a failed attempt.
    ///
    /// Returns the delay to wait before the next attempt, or `None` when
    /// the error is not retryable or the attempt budget is spent.
    pub fn next_delay(&self, attempt: u32, error: &ProviderError) -> Option<Duration> {
        if !error.is_retryable() || attempt + 1 >= self.max_attempts {
            return None;
        }

        let exp = self
            .base_delay
            .saturating_mul(2u32.saturating_pow(attempt));

        if self.jitter {
            let extra = fastrand::u64(0..=exp.as_millis() as u64 / 4);
            Some(exp + Duration::from_millis(extra))
        } else {
            Some(exp)
        }
    }
}
