use std::sync::Arc;

use regex::Regex;

use crate::gazetteer::Gazetteer;
use crate::time::{DEFAULT_TIME_HEURISTICS, TimeHeuristic};

/// Words that open a new schedule entry when they start a line.
pub const DEFAULT_RECORD_MARKERS: &[&str] = &["الساعة", "تلاوة", "للشيخ", "للقارئ"];

/// Controls how a list of values is overridden from its defaults.
#[derive(Debug, Clone, Default)]
pub enum ListOverride<T> {
    /// Use the built-in defaults.
    #[default]
    Default,
    /// Completely replace the defaults with these values.
    Replace(Vec<T>),
    /// Append these values to the defaults.
    Extend(Vec<T>),
}

impl<T: Clone> ListOverride<T> {
    /// Resolve this override against the given defaults.
    pub fn resolve(&self, defaults: &[T]) -> Vec<T> {
        match self {
            ListOverride::Default => defaults.to_vec(),
            ListOverride::Replace(v) => v.clone(),
            ListOverride::Extend(v) => {
                let mut result = defaults.to_vec();
                result.extend(v.iter().cloned());
                result
            }
        }
    }
}

/// Configuration for the schedule parsing pipeline.
///
/// Regex fields are `Option<Regex>`; `None` means "use the built-in default".
/// Use [`ParsingConfigBuilder`] to construct with string patterns.
#[derive(Debug, Clone)]
pub struct ParsingConfig {
    // ── chunk.rs ──
    /// Leading words that start a new logical record.
    pub(crate) record_markers: ListOverride<String>,

    // ── time.rs ──
    /// Regex locating the time token. Group 1, if present, is the `H:M` token.
    pub(crate) time_token_re: Option<Regex>,
    /// Ordered digit-pair repairs run before validation.
    pub(crate) time_heuristics: Option<Vec<TimeHeuristic>>,

    // ── person.rs ──
    /// Regex for the words introducing a reciter's name.
    pub(crate) person_marker_re: Option<Regex>,

    // ── gazetteer.rs ──
    /// Known names used when the patterns find nothing.
    pub(crate) gazetteer: Option<Arc<Gazetteer>>,
}

impl Default for ParsingConfig {
    fn default() -> Self {
        Self {
            record_markers: ListOverride::Default,
            time_token_re: None,
            time_heuristics: None,
            person_marker_re: None,
            gazetteer: Some(Gazetteer::builtin()),
        }
    }
}

impl ParsingConfig {
    /// Record markers after applying any override.
    pub fn record_markers(&self) -> Vec<String> {
        let defaults: Vec<String> = DEFAULT_RECORD_MARKERS
            .iter()
            .map(|s| s.to_string())
            .collect();
        self.record_markers.resolve(&defaults)
    }

    /// Time heuristics, using the defaults if not configured.
    pub fn time_heuristics(&self) -> &[TimeHeuristic] {
        self.time_heuristics
            .as_deref()
            .unwrap_or(DEFAULT_TIME_HEURISTICS)
    }

    pub fn gazetteer(&self) -> Option<&Gazetteer> {
        self.gazetteer.as_deref()
    }
}

/// Builder for [`ParsingConfig`].
///
/// Accepts string patterns that are compiled to `Regex` in [`build()`](Self::build).
/// Fails fast with `regex::Error` if any pattern is invalid.
#[derive(Debug, Clone)]
pub struct ParsingConfigBuilder {
    record_markers: ListOverride<String>,
    time_token_re: Option<String>,
    time_heuristics: Option<Vec<TimeHeuristic>>,
    person_marker_re: Option<String>,
    gazetteer: Option<Arc<Gazetteer>>,
}

impl Default for ParsingConfigBuilder {
    fn default() -> Self {
        Self {
            record_markers: ListOverride::Default,
            time_token_re: None,
            time_heuristics: None,
            person_marker_re: None,
            gazetteer: Some(Gazetteer::builtin()),
        }
    }
}

impl ParsingConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Record markers ──

    pub fn set_record_markers(mut self, markers: Vec<String>) -> Self {
        self.record_markers = ListOverride::Replace(markers);
        self
    }

    pub fn add_record_marker(mut self, marker: String) -> Self {
        match &mut self.record_markers {
            ListOverride::Extend(v) => v.push(marker),
            _ => self.record_markers = ListOverride::Extend(vec![marker]),
        }
        self
    }

    // ── Time ──

    pub fn time_token_regex(mut self, pattern: &str) -> Self {
        self.time_token_re = Some(pattern.to_string());
        self
    }

    pub fn time_heuristics(mut self, heuristics: Vec<TimeHeuristic>) -> Self {
        self.time_heuristics = Some(heuristics);
        self
    }

    // ── Person ──

    pub fn person_marker_regex(mut self, pattern: &str) -> Self {
        self.person_marker_re = Some(pattern.to_string());
        self
    }

    // ── Gazetteer ──

    pub fn gazetteer(mut self, gazetteer: Arc<Gazetteer>) -> Self {
        self.gazetteer = Some(gazetteer);
        self
    }

    /// Disable gazetteer fallbacks entirely.
    pub fn without_gazetteer(mut self) -> Self {
        self.gazetteer = None;
        self
    }

    /// Compile all string patterns into regexes and produce a [`ParsingConfig`].
    pub fn build(self) -> Result<ParsingConfig, regex::Error> {
        let compile = |opt: Option<String>| -> Result<Option<Regex>, regex::Error> {
            opt.map(|p| Regex::new(&p)).transpose()
        };

        Ok(ParsingConfig {
            record_markers: self.record_markers,
            time_token_re: compile(self.time_token_re)?,
            time_heuristics: self.time_heuristics,
            person_marker_re: compile(self.person_marker_re)?,
            gazetteer: self.gazetteer,
        })
    }
}
