//! Bounded retry with exponential backoff around the model call.
//!
//! Only transient provider failures (rate limits, timeouts, network
//! errors, 5xx) are retried. Capability execution is never retried.

use ladle_core::agent::AgentConfig;
use ladle_core::error::ProviderError;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// How many times to try and how long to wait in between.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts, including the first (at least 1)
    pub max_attempts: u32,
    /// Delay before the second attempt
    pub initial_backoff: Duration,
    /// Upper bound for any single delay
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    /// A single attempt.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    pub fn from_config(config: &AgentConfig) -> Self {
        Self {
            max_attempts: config.selection_attempts.max(1),
            initial_backoff: config.selection_backoff(),
            ..Self::default()
        }
    }

    /// Delay after the given failed attempt (1-based), doubling each time.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.initial_backoff
            .saturating_mul(factor)
            .min(self.max_backoff)
    }

    /// Run `operation` until it succeeds, fails permanently, or the
    /// attempts run out. On failure returns the last error together with
    /// the number of attempts made.
    pub async fn run<F, Fut, T>(&self, mut operation: F) -> Result<T, (u32, ProviderError)>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ProviderError>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(e) if attempt < max_attempts && e.is_transient() => {
                    let delay = self.backoff(attempt);
                    warn!(
                        attempt,
                        max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Model call failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err((attempt, e)),
            }
        }
    }
}
