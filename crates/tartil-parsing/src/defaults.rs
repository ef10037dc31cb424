use once_cell::sync::Lazy;
use regex::Regex;

use crate::compose::compose;
use crate::{ExtractedFields, FinalRecord};

pub const UNKNOWN_TIME: &str = "لم يمكن تحديد الوقت";
pub const UNKNOWN_PERSON: &str = "لم يمكن التعرف علي القارئ";
pub const UNKNOWN_CONTENT: &str = "لم يمكن تحديد السورة";

/// Replace empty fields with their placeholders.
///
/// A dangling conjunction at the end of the reciter's name is dropped
/// afterwards, so the person field may still come out shorter than captured.
pub fn apply_defaults(time: &str, person: &str, content: &str) -> FinalRecord {
    static TRAILING_WAW_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+و$").unwrap());

    let or_placeholder = |value: &str, placeholder: &str| {
        let value = value.trim();
        if value.is_empty() {
            placeholder.to_string()
        } else {
            value.to_string()
        }
    };

    let person = or_placeholder(person, UNKNOWN_PERSON);
    let person = TRAILING_WAW_RE.replace(&person, "").into_owned();

    FinalRecord {
        time: or_placeholder(time, UNKNOWN_TIME),
        person,
        content: or_placeholder(content, UNKNOWN_CONTENT),
    }
}

impl FinalRecord {
    /// Compose the content field and fill in placeholders.
    pub fn from_fields(fields: &ExtractedFields) -> Self {
        let content = compose(&fields.content_tokens, fields.verse_range.as_ref());
        apply_defaults(&fields.time, &fields.person, &content)
    }

    /// Whether a field holds its placeholder rather than extracted text.
    pub fn is_placeholder(value: &str) -> bool {
        matches!(value, UNKNOWN_TIME | UNKNOWN_PERSON | UNKNOWN_CONTENT)
    }
}
