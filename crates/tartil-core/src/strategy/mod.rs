//! Extraction strategies that turn raw announcement text into records.

pub mod gemini;
pub mod mock;

use std::future::Future;
use std::pin::Pin;

use tartil_parsing::FinalRecord;

use crate::StrategyError;

pub use gemini::GeminiStrategy;

/// A way of extracting schedule records from raw text, tried before the
/// deterministic parser.
pub trait ExtractionStrategy: Send + Sync {
    /// Short name used in logs and outcomes (e.g., "gemini").
    fn name(&self) -> &str;

    /// Extract records from the full announcement text.
    fn extract<'a>(
        &'a self,
        raw_text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<FinalRecord>, StrategyError>> + Send + 'a>>;
}
