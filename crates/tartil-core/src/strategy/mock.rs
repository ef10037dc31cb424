//! Mock extraction strategy for testing.

use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use tartil_parsing::FinalRecord;

use super::ExtractionStrategy;
use crate::StrategyError;

/// A configurable mock response for [`MockStrategy`].
#[derive(Clone, Debug)]
pub enum MockResponse {
    /// Simulate a successful extraction.
    Records(Vec<FinalRecord>),
    /// Simulate a failed attempt.
    Error(String),
}

/// A hand-rolled mock implementing [`ExtractionStrategy`] for tests.
///
/// Supports:
/// - A fixed response (used for every call), **or**
/// - A sequence of responses (one per call, repeating the last if exhausted).
/// - Call counting via [`call_count()`](MockStrategy::call_count).
pub struct MockStrategy {
    name: &'static str,
    /// Remaining responses, stored reversed so `pop()` yields the next one.
    responses: Mutex<Vec<MockResponse>>,
    /// Used once the sequence is exhausted (or in single-response mode).
    fallback: MockResponse,
    call_count: AtomicUsize,
}

impl MockStrategy {
    /// Create a mock that always returns `response`.
    pub fn new(name: &'static str, response: MockResponse) -> Self {
        Self {
            name,
            responses: Mutex::new(Vec::new()),
            fallback: response,
            call_count: AtomicUsize::new(0),
        }
    }

    /// Create a mock that returns responses in order, repeating the last one.
    ///
    /// An empty sequence behaves like a strategy that always fails.
    pub fn with_sequence(name: &'static str, mut responses: Vec<MockResponse>) -> Self {
        let fallback = responses
            .last()
            .cloned()
            .unwrap_or_else(|| MockResponse::Error("empty mock sequence".into()));
        responses.reverse();
        Self {
            name,
            responses: Mutex::new(responses),
            fallback,
            call_count: AtomicUsize::new(0),
        }
    }

    /// How many times `extract()` has been called.
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    fn next_response(&self) -> MockResponse {
        let mut seq = match self.responses.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        seq.pop().unwrap_or_else(|| self.fallback.clone())
    }
}

impl ExtractionStrategy for MockStrategy {
    fn name(&self) -> &str {
        self.name
    }

    fn extract<'a>(
        &'a self,
        _raw_text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<FinalRecord>, StrategyError>> + Send + 'a>> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        let response = self.next_response();

        Box::pin(async move {
            match response {
                MockResponse::Records(records) => Ok(records),
                MockResponse::Error(msg) => Err(StrategyError::Other(msg)),
            }
        })
    }
}
