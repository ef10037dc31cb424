pub mod chain;
pub mod config_file;
pub mod error;
pub mod retry;
pub mod strategy;

// Re-export for convenience
pub use chain::{ChainOutcome, run_chain};
pub use error::StrategyError;
pub use retry::{RetryPolicy, RetrySuccess, extract_with_retry};
pub use strategy::{ExtractionStrategy, GeminiStrategy};
