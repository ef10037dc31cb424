use once_cell::sync::Lazy;
use regex::Regex;

use crate::content::{SHORT_SURAHS, VerseRange};
use crate::normalize::collapse_whitespace;

/// Merge content tokens and an optional verse range into one display string.
///
/// `["سورة البقرة", "القمر"]` becomes `سورة البقرة و القمر`: one leading
/// سورة, later names joined with و.
pub fn compose(tokens: &[String], verse_range: Option<&VerseRange>) -> String {
    static LEADING_SURAH_WORD_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"^(?:سورة|سورتى|سورتي|سور)\s+").unwrap());
    static STRAY_SURAH_WORD_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"\b(?:سورتى|سورتي|سور)\b").unwrap());

    let mut parts = Vec::with_capacity(tokens.len());
    for (i, token) in tokens.iter().enumerate() {
        let token = token.trim();
        let is_idiom = collapse_whitespace(token) == SHORT_SURAHS;
        let name = if is_idiom {
            SHORT_SURAHS.to_string()
        } else {
            LEADING_SURAH_WORD_RE.replace(token, "").into_owned()
        };

        parts.push(match (i, is_idiom) {
            (0, true) => name,
            (0, false) => format!("سورة {}", name),
            _ => format!("و {}", name),
        });
    }

    let joined = STRAY_SURAH_WORD_RE.replace_all(&parts.join(" "), "").into_owned();
    let mut out = keep_first_surah_word(&collapse_whitespace(&joined));

    if let Some(range) = verse_range {
        out.push_str(&format!(
            " (من الآية {} سورة {} حتى الآية {} سورة {})",
            range.from_marker, range.surah_1, range.to_marker, range.surah_2
        ));
    }

    collapse_whitespace(&out)
}

/// Drop every standalone سورة after the first.
fn keep_first_surah_word(text: &str) -> String {
    let mut seen = false;
    text.split_whitespace()
        .filter(|word| {
            if *word != "سورة" {
                return true;
            }
            let keep = !seen;
            seen = true;
            keep
        })
        .collect::<Vec<_>>()
        .join(" ")
}
