use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// Emoji and pictograph ranges stripped from announcement text.
const EMOJI_RANGES: &[(u32, u32)] = &[
    (0x1F300, 0x1F5FF),
    (0x1F600, 0x1F64F),
    (0x1F900, 0x1F9FF),
    (0x1FA70, 0x1FAFF),
    (0x2600, 0x26FF),
    (0x2700, 0x27BF),
];

/// Remove `(...)`, `[...]` and `{...}` annotations, then collapse whitespace.
///
/// Matching is non-greedy and line-local: an opener without a closer on the
/// same line is left in place, and nested brackets are not tracked.
pub fn strip_bracketed(text: &str) -> String {
    static PAREN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\([^\n]*?\)").unwrap());
    static SQUARE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[[^\n]*?\]").unwrap());
    static CURLY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{[^\n]*?\}").unwrap());

    let text = PAREN_RE.replace_all(text, "");
    let text = SQUARE_RE.replace_all(&text, "");
    let text = CURLY_RE.replace_all(&text, "");
    collapse_whitespace(&text)
}

/// Remove emoji and other pictographic symbols.
pub fn strip_emoji(text: &str) -> String {
    text.chars().filter(|c| !is_emoji(*c)).collect()
}

fn is_emoji(c: char) -> bool {
    let code = c as u32;
    EMOJI_RANGES
        .iter()
        .any(|&(lo, hi)| (lo..=hi).contains(&code))
}

/// Fold Arabic letter variants for vocabulary matching.
///
/// - presentation forms are NFKC-composed back to base letters
/// - أ إ آ ٱ → ا
/// - ى → ي
/// - harakat (U+064B–U+065F) and the superscript alef (U+0670) are dropped
///
/// Output fields never go through this; it only feeds comparisons.
pub fn normalize_letters(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.nfkc() {
        match c {
            '\u{0623}' | '\u{0625}' | '\u{0622}' | '\u{0671}' => out.push('\u{0627}'),
            '\u{0649}' => out.push('\u{064A}'),
            '\u{064B}'..='\u{065F}' | '\u{0670}' => {}
            _ => out.push(c),
        }
    }
    out
}

/// Map Arabic-Indic digits to ASCII and the Arabic decimal separator to `.`.
pub fn fold_digits(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{0660}'..='\u{0669}' => char::from(b'0' + (c as u32 - 0x0660) as u8),
            '\u{06F0}'..='\u{06F9}' => char::from(b'0' + (c as u32 - 0x06F0) as u8),
            '\u{066B}' => '.',
            _ => c,
        })
        .collect()
}

/// Collapse runs of whitespace into one space and trim.
pub fn collapse_whitespace(text: &str) -> String {
    static WS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
    WS_RE.replace_all(text, " ").trim().to_string()
}

/// The form every field extractor except the time extractor reads from.
pub fn clean_chunk(chunk: &str) -> String {
    collapse_whitespace(&fold_digits(&strip_emoji(&strip_bracketed(chunk))))
}
