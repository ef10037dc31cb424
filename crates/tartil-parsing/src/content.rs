use std::fmt;
use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::gazetteer::Gazetteer;

/// The "short surahs" idiom, kept verbatim instead of being prefixed.
pub const SHORT_SURAHS: &str = "قصار السور";

static SHORT_SURAHS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^قصار\s+السور$").unwrap());

/// A leading surah word: سورة and its dual/plural spellings.
static SURAH_WORD_PREFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:سورة|سورتى|سورتي|سور)").unwrap());

/// One end of a verse range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerseMarker {
    /// A verse number.
    Number(String),
    /// The opening of the surah.
    Start,
    /// The close of the surah.
    End,
}

impl fmt::Display for VerseMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerseMarker::Number(n) => f.write_str(n),
            VerseMarker::Start => f.write_str("أول"),
            VerseMarker::End => f.write_str("ختام"),
        }
    }
}

/// A recitation that spans from one verse (or surah boundary) to another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerseRange {
    pub from_marker: VerseMarker,
    pub surah_1: String,
    pub to_marker: VerseMarker,
    pub surah_2: String,
}

/// Everything the content extractor found in one chunk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentReference {
    pub tokens: Vec<String>,
    pub verse_range: Option<VerseRange>,
}

impl ContentReference {
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty() && self.verse_range.is_none()
    }
}

/// Extract the surah list from a cleaned chunk.
///
/// Every `ما تيسر من …` / `من سورة …` run is captured up to the duration
/// clause, then split on ` و `, `-` and `/`.
pub fn extract_content_tokens(chunk: &str) -> Vec<String> {
    static LIST_MARKER_RE: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"(?:ما\s+تيسر\s+من|من\s+(?:سورة|سور|سورتى|سورتي))\s+").unwrap()
    });
    static LIST_STOP_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"\s*(?:(?:\bو\s*)?مدة\s+التلاوة|[0-9]+\s*ق)").unwrap());
    static SPLIT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+و\s+|[-/]").unwrap());

    let mut tokens = Vec::new();
    let mut pos = 0;

    while let Some(marker) = LIST_MARKER_RE.find_at(chunk, pos) {
        let start = marker.end();
        let Some(first) = chunk[start..].chars().next() else {
            break;
        };

        let (end, resume) = match LIST_STOP_RE.find_at(chunk, start + first.len_utf8()) {
            Some(stop) => (stop.start(), stop.end()),
            None => (chunk.len(), chunk.len()),
        };

        for piece in SPLIT_RE.split(chunk[start..end].trim_end()) {
            let piece = piece.trim();
            if piece.is_empty() {
                continue;
            }
            tokens.push(canonical_token(piece));
        }

        if resume <= pos {
            break;
        }
        pos = resume;
    }

    tokens
}

fn canonical_token(piece: &str) -> String {
    if SHORT_SURAHS_RE.is_match(piece) {
        SHORT_SURAHS.to_string()
    } else if SURAH_WORD_PREFIX_RE.is_match(piece) {
        piece.to_string()
    } else {
        format!("سورة {}", piece)
    }
}

/// Extract a verse-range qualifier, if the chunk has one.
pub fn extract_verse_range(chunk: &str) -> Option<VerseRange> {
    find_verse_range(chunk).map(|(range, _)| range)
}

/// The verse range and the byte span it was read from.
///
/// The surah-boundary form wins when both forms are present.
fn find_verse_range(chunk: &str) -> Option<(VerseRange, Range<usize>)> {
    static BOUNDARY_RE: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"من\s+(?:أول\s+)?سورة\s+(\S+)\s+و?حتى\s+(?:ختام\s+)?سورة\s+(\S+)").unwrap()
    });
    static NUMERIC_RE: Lazy<Regex> = Lazy::new(|| {
        Regex::new(concat!(
            r"من\s+ال[آأا]ي[ةه]\s*([0-9]+)\s*(?:من\s+)?سورة\s+([^.]+?)\s+",
            r"(?:و?حتى\s+ال[آأا]ي[ةه]|إلى\s+ال[آأا]ي[ةه])\s*([0-9]+)\s*(?:من\s+)?سورة\s+([^.]+?)\b",
        ))
        .unwrap()
    });

    if let Some(caps) = BOUNDARY_RE.captures(chunk) {
        let range = VerseRange {
            from_marker: VerseMarker::Start,
            surah_1: caps[1].to_string(),
            to_marker: VerseMarker::End,
            surah_2: caps[2].to_string(),
        };
        return Some((range, caps.get(0)?.range()));
    }

    let caps = NUMERIC_RE.captures(chunk)?;
    let range = VerseRange {
        from_marker: VerseMarker::Number(caps[1].to_string()),
        surah_1: caps[2].trim().to_string(),
        to_marker: VerseMarker::Number(caps[3].to_string()),
        surah_2: caps[4].trim().to_string(),
    };
    Some((range, caps.get(0)?.range()))
}

/// Full content extraction for a cleaned chunk.
///
/// The verse-range phrase is masked out before the list scan so its surah
/// names do not show up as list tokens. If neither finds anything, the
/// gazetteer is consulted for a single surah name.
pub fn extract_content(chunk: &str, gazetteer: Option<&Gazetteer>) -> ContentReference {
    let verse = find_verse_range(chunk);

    let tokens = match &verse {
        Some((_, span)) => {
            let mut masked = String::with_capacity(chunk.len());
            masked.push_str(&chunk[..span.start]);
            masked.push(' ');
            masked.push_str(&chunk[span.end..]);
            extract_content_tokens(&masked)
        }
        None => extract_content_tokens(chunk),
    };

    let mut content = ContentReference {
        tokens,
        verse_range: verse.map(|(range, _)| range),
    };

    if content.is_empty() {
        if let Some(name) = gazetteer.and_then(|g| g.find_content(chunk)) {
            tracing::trace!(name, "surah taken from gazetteer");
            content.tokens.push(canonical_token(name));
        }
    }

    content
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_surah() {
        assert_eq!(
            extract_content_tokens("تلاوة للشيخ فلان من سورة البقرة"),
            vec!["سورة البقرة"]
        );
    }

    #[test]
    fn test_ma_tayassar_list_with_separators() {
        assert_eq!(
            extract_content_tokens("ما تيسر من سورة البقرة و القمر - التحريم / الملك"),
            vec!["سورة البقرة", "سورة القمر", "سورة التحريم", "سورة الملك"]
        );
    }

    #[test]
    fn test_stops_at_duration() {
        assert_eq!(
            extract_content_tokens("من سورة يس 20 ق"),
            vec!["سورة يس"]
        );
        assert_eq!(
            extract_content_tokens("من سورة يس ومدة التلاوة ربع ساعة"),
            vec!["سورة يس"]
        );
    }

    #[test]
    fn test_stops_at_bare_duration_clause() {
        assert_eq!(
            extract_content_tokens("من سورة يس مدة التلاوة ربع ساعة"),
            vec!["سورة يس"]
        );
        assert_eq!(
            extract_content_tokens("ما تيسر من سورة الملك و مدة التلاوة عشر دقائق"),
            vec!["سورة الملك"]
        );
    }

    #[test]
    fn test_multiple_runs_in_one_chunk() {
        assert_eq!(
            extract_content_tokens("من سورة الرعد 10 ق ثم ما تيسر من الكهف"),
            vec!["سورة الرعد", "سورة الكهف"]
        );
    }

    #[test]
    fn test_short_surahs_idiom_verbatim() {
        assert_eq!(
            extract_content_tokens("ما تيسر من قصار السور و النمل"),
            vec!["قصار السور", "سورة النمل"]
        );
    }

    #[test]
    fn test_dual_surah_word_kept() {
        assert_eq!(
            extract_content_tokens("ما تيسر من سورتى الشمس و الليل"),
            vec!["سورتى الشمس", "سورة الليل"]
        );
        assert_eq!(
            extract_content_tokens("من سورتي الضحى و الشرح"),
            vec!["سورة الضحى", "سورة الشرح"]
        );
    }

    #[test]
    fn test_no_list() {
        assert!(extract_content_tokens("الساعة 06:00 نشرة").is_empty());
        assert!(extract_content_tokens("من سورة").is_empty());
        assert!(extract_content_tokens("").is_empty());
    }

    #[test]
    fn test_numeric_verse_range() {
        let range = extract_verse_range(
            "من الآية 45 من سورة ص حتى الآية 61 من سورة الزمر",
        )
        .unwrap();
        assert_eq!(range.from_marker, VerseMarker::Number("45".into()));
        assert_eq!(range.surah_1, "ص");
        assert_eq!(range.to_marker, VerseMarker::Number("61".into()));
        assert_eq!(range.surah_2, "الزمر");
    }

    #[test]
    fn test_numeric_verse_range_spelling_variants() {
        let range = extract_verse_range("من الاية 1 سورة البقرة إلى الأيه 20 سورة البقرة").unwrap();
        assert_eq!(range.from_marker, VerseMarker::Number("1".into()));
        assert_eq!(range.to_marker, VerseMarker::Number("20".into()));
    }

    #[test]
    fn test_boundary_verse_range() {
        let range = extract_verse_range("من أول سورة الأنفال حتى ختام سورة التوبة").unwrap();
        assert_eq!(range.from_marker, VerseMarker::Start);
        assert_eq!(range.surah_1, "الأنفال");
        assert_eq!(range.to_marker, VerseMarker::End);
        assert_eq!(range.surah_2, "التوبة");

        let range = extract_verse_range("من سورة الملك وحتى سورة المرسلات").unwrap();
        assert_eq!(range.surah_2, "المرسلات");
    }

    #[test]
    fn test_no_verse_range() {
        assert_eq!(extract_verse_range("من سورة البقرة"), None);
    }

    #[test]
    fn test_verse_span_masked_from_list() {
        let content = extract_content("من الآية 45 من سورة ص حتى الآية 61 من سورة الزمر", None);
        assert!(content.tokens.is_empty());
        assert!(content.verse_range.is_some());

        let content = extract_content(
            "من سورة يس 10 ق ثم من أول سورة الملك حتى ختام سورة القلم",
            None,
        );
        assert_eq!(content.tokens, vec!["سورة يس"]);
        assert_eq!(content.verse_range.unwrap().surah_1, "الملك");
    }

    #[test]
    fn test_gazetteer_fallback_only_when_empty() {
        let g = Gazetteer::builtin();
        let content = extract_content("تلاوة للشيخ فلان سورة يوسف", Some(&*g));
        assert_eq!(content.tokens, vec!["سورة يوسف"]);

        let content = extract_content("من سورة مريم ثم سورة يوسف", Some(&*g));
        assert_eq!(content.tokens, vec!["سورة مريم ثم سورة يوسف"]);

        let content = extract_content("تلاوة للشيخ فلان سورة يوسف", None);
        assert!(content.is_empty());
    }

    #[test]
    fn test_verse_marker_display() {
        assert_eq!(VerseMarker::Start.to_string(), "أول");
        assert_eq!(VerseMarker::End.to_string(), "ختام");
        assert_eq!(VerseMarker::Number("7".into()).to_string(), "7");
    }
}
