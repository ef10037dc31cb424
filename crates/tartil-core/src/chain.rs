//! Try the primary strategy with retries, then fall back to the
//! deterministic parser.

use tartil_parsing::{FinalRecord, ScheduleExtractor};

use crate::retry::{RetryPolicy, extract_with_retry};
use crate::strategy::ExtractionStrategy;

/// Which path produced the schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainOutcome {
    /// The primary strategy succeeded.
    Primary {
        strategy: String,
        attempts: u32,
        records: Vec<FinalRecord>,
    },
    /// The deterministic parser produced the schedule.
    ///
    /// `primary_error` is `None` when no primary strategy was configured.
    Fallback {
        primary_error: Option<String>,
        records: Vec<FinalRecord>,
    },
    /// Neither path produced any records.
    Failed { primary_error: Option<String> },
}

impl ChainOutcome {
    pub fn records(&self) -> &[FinalRecord] {
        match self {
            ChainOutcome::Primary { records, .. } | ChainOutcome::Fallback { records, .. } => {
                records
            }
            ChainOutcome::Failed { .. } => &[],
        }
    }

    pub fn into_records(self) -> Vec<FinalRecord> {
        match self {
            ChainOutcome::Primary { records, .. } | ChainOutcome::Fallback { records, .. } => {
                records
            }
            ChainOutcome::Failed { .. } => Vec::new(),
        }
    }

    /// Short label for the path taken: the strategy name, "fallback" or "failed".
    pub fn source(&self) -> &str {
        match self {
            ChainOutcome::Primary { strategy, .. } => strategy,
            ChainOutcome::Fallback { .. } => "fallback",
            ChainOutcome::Failed { .. } => "failed",
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, ChainOutcome::Failed { .. })
    }
}

/// Run the extraction chain on raw announcement text.
///
/// 1. If a primary strategy is given, try it under `policy`; an empty result
///    counts as a failure
/// 2. Otherwise, or once it is exhausted, run the deterministic parser
/// 3. An empty fallback result is reported as [`ChainOutcome::Failed`]
///
/// Never returns an error; failures are carried in the outcome.
pub async fn run_chain(
    primary: Option<&dyn ExtractionStrategy>,
    policy: &RetryPolicy,
    fallback: &ScheduleExtractor,
    raw_text: &str,
) -> ChainOutcome {
    let primary_error = match primary {
        Some(strategy) => match extract_with_retry(strategy, policy, raw_text).await {
            Ok(ok) => {
                tracing::info!(
                    strategy = strategy.name(),
                    attempts = ok.attempts,
                    records = ok.records.len(),
                    "primary strategy succeeded"
                );
                return ChainOutcome::Primary {
                    strategy: strategy.name().to_string(),
                    attempts: ok.attempts,
                    records: ok.records,
                };
            }
            Err(e) => {
                tracing::error!(
                    strategy = strategy.name(),
                    error = %e,
                    "primary strategy failed, falling back"
                );
                Some(e.to_string())
            }
        },
        None => None,
    };

    let records = fallback.parse_schedule(raw_text);
    if records.is_empty() {
        tracing::error!("fallback parser returned an empty schedule");
        return ChainOutcome::Failed { primary_error };
    }

    tracing::info!(records = records.len(), "fallback parser succeeded");
    ChainOutcome::Fallback {
        primary_error,
        records,
    }
}
