use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod chunk;
pub mod compose;
pub mod config;
pub mod content;
pub mod defaults;
pub mod extractor;
pub mod gazetteer;
pub mod header;
pub mod normalize;
pub mod person;
pub mod time;

pub use chunk::merge_lines;
pub use compose::compose;
pub use config::{ListOverride, ParsingConfig, ParsingConfigBuilder};
pub use content::{VerseMarker, VerseRange, extract_content_tokens, extract_verse_range};
pub use defaults::{UNKNOWN_CONTENT, UNKNOWN_PERSON, UNKNOWN_TIME, apply_defaults};
pub use extractor::ScheduleExtractor;
pub use gazetteer::Gazetteer;
pub use header::{ScheduleHeader, is_schedule_announcement, parse_header};
pub use person::extract_person;
pub use time::{Meridiem, TimeHeuristic, extract_time};

#[derive(Error, Debug)]
pub enum ParsingError {
    #[error("invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// One broadcast item: when, who, and what is recited.
///
/// After the pipeline no field is empty; unknown values carry the
/// placeholders from [`defaults`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalRecord {
    pub time: String,
    pub person: String,
    pub content: String,
}

/// Fields pulled from a single chunk, before composition and defaulting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedFields {
    pub time: String,
    pub person: String,
    pub content_tokens: Vec<String>,
    pub verse_range: Option<VerseRange>,
}

impl ExtractedFields {
    /// True when the chunk carried nothing recognisable.
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
            && self.person.is_empty()
            && self.content_tokens.is_empty()
            && self.verse_range.is_none()
    }
}

/// Parse raw announcement text into schedule records.
///
/// Pipeline:
/// 1. Merge physical lines into one chunk per announced item
/// 2. Read time, reciter and surah references from each chunk
/// 3. Drop chunks where nothing was found
/// 4. Compose the surah list and any verse range into one string
/// 5. Fill empty fields with placeholders
///
/// Never fails: unusable input produces an empty list.
pub fn parse_schedule(text: &str) -> Vec<FinalRecord> {
    ScheduleExtractor::new().parse_schedule(text)
}
