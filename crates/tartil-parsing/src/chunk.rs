use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::ParsingConfig;
use crate::normalize;

/// Group raw lines into logical records, one chunk per record.
///
/// Continuation lines are appended to the open chunk with a single space.
/// Blank lines are dropped.
pub fn merge_lines<'a, I>(lines: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    merge_lines_with_config(lines, &ParsingConfig::default())
}

/// Config-aware version of [`merge_lines`].
pub(crate) fn merge_lines_with_config<'a, I>(lines: I, config: &ParsingConfig) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let markers = config.record_markers();
    let mut chunks = Vec::new();
    let mut current = String::new();

    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if starts_new_chunk(line, &markers) && !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
        }

        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(line);
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}

/// Whether `line` opens a new record: it starts with a marker word or a
/// clock-like digit pair once annotations are removed.
pub fn starts_new_chunk(line: &str, markers: &[String]) -> bool {
    static LEADING_TIME_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"^\s*[0-9]{1,2}\s*[:.]\s*[0-9]{1,2}").unwrap());

    let stripped = normalize::fold_digits(&normalize::strip_bracketed(line));
    // Bullet emoji commonly lead a marker line.
    let stripped = normalize::strip_emoji(&stripped);
    let stripped = stripped.trim_start();

    markers.iter().any(|m| stripped.starts_with(m.as_str())) || LEADING_TIME_RE.is_match(stripped)
}
