//! Retry with exponential backoff around a single extraction strategy.

use std::time::Duration;

use tartil_parsing::FinalRecord;

use crate::StrategyError;
use crate::strategy::ExtractionStrategy;

/// How many times to try a strategy and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Zero is treated as one.
    pub attempts: u32,
    /// Delay after the first failed attempt; doubles after each further one.
    pub backoff_base: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            backoff_base: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    pub fn new(attempts: u32, backoff_base: Duration) -> Self {
        Self {
            attempts,
            backoff_base,
        }
    }

    /// Delay after 0-based attempt `attempt` fails: `backoff_base * 2^attempt`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.backoff_base
            .saturating_mul(2u32.saturating_pow(attempt))
    }

    fn max_attempts(&self) -> u32 {
        self.attempts.max(1)
    }
}

/// A successful strategy run and the attempt that produced it (1-based).
#[derive(Debug)]
pub struct RetrySuccess {
    pub records: Vec<FinalRecord>,
    pub attempts: u32,
}

/// Run `strategy` until it yields a non-empty record list or attempts run out.
///
/// An empty list counts as a failed attempt. No delay follows the last
/// attempt. Returns the last error on exhaustion.
pub async fn extract_with_retry(
    strategy: &dyn ExtractionStrategy,
    policy: &RetryPolicy,
    raw_text: &str,
) -> Result<RetrySuccess, StrategyError> {
    let max = policy.max_attempts();
    let mut last_err = StrategyError::NoRecords;

    for attempt in 0..max {
        tracing::info!(
            strategy = strategy.name(),
            attempt = attempt + 1,
            of = max,
            "extracting schedule"
        );

        match strategy.extract(raw_text).await {
            Ok(records) if !records.is_empty() => {
                return Ok(RetrySuccess {
                    records,
                    attempts: attempt + 1,
                });
            }
            Ok(_) => last_err = StrategyError::NoRecords,
            Err(e) => last_err = e,
        }

        tracing::warn!(
            strategy = strategy.name(),
            attempt = attempt + 1,
            error = %last_err,
            "extraction attempt failed"
        );

        if attempt + 1 < max {
            let delay = policy.delay_for(attempt);
            tracing::info!(delay_ms = delay.as_millis() as u64, "backing off");
            tokio::time::sleep(delay).await;
        }
    }

    Err(last_err)
}
