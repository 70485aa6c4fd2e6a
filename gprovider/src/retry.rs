//! Backoff schedule for transient upstream failures.

use std::time::Duration;

use crate::ProviderError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total calls allowed, including the first. Values below one behave as one.
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(4),
        }
    }
}

impl RetryPolicy {
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Wait before the attempt following `failed_attempt` (1-based), or `None` to give up.
    pub fn next_delay(&self, failed_attempt: u32, error: &ProviderError) -> Option<Duration> {
        if !error.is_transient() || failed_attempt >= self.max_attempts.max(1) {
            return None;
        }

        let doubling = 2_u32.saturating_pow(failed_attempt.saturating_sub(1));
        let scheduled = self.base_delay.saturating_mul(doubling);
        Some(error.retry_after.unwrap_or(scheduled).min(self.max_delay))
    }
}
