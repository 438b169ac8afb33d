//! Bounded retry with exponential backoff

use crate::error::FetchError;
use std::thread;
use std::time::Duration;
use tracing::debug;

/// How often and how patiently a failed fetch is repeated
///
/// Only transient failures ([`FetchError::is_transient`]) are retried. The
/// delay before retry `n` is `base_delay * 2^(n-1)`, capped at `max_delay`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first; values below 1 behave as 1
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(8),
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Delay to wait before the given retry (1-based)
    pub fn delay_for(&self, retry: u32) -> Duration {
        let factor = 2u32.saturating_pow(retry.saturating_sub(1));
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }

    /// Run `attempt` until it succeeds, fails permanently, or attempts run out
    ///
    /// The closure receives the 1-based attempt number.
    pub fn run<T, F>(&self, mut attempt: F) -> Result<T, FetchError>
    where
        F: FnMut(u32) -> Result<T, FetchError>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut number = 1;
        loop {
            match attempt(number) {
                Err(error) if error.is_transient() && number < max_attempts => {
                    let delay = self.delay_for(number);
                    debug!(attempt = number, ?delay, %error, "retrying transient fetch failure");
                    thread::sleep(delay);
                    number += 1;
                }
                result => return result,
            }
        }
    }
}
