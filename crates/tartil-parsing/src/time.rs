use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::ParsingConfig;
use crate::normalize;

/// An `(hour, minute)` pair as read from the announcement, before validation.
pub type ClockPair = (u32, u32);

/// One step of the digit-pair repair applied before a time is validated.
///
/// Heuristics run in the order they appear in
/// [`ParsingConfig`](crate::ParsingConfig); each is a pure function of the pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeHeuristic {
    /// `44:09` → `09:44`: an hour above 23 with a minute that could be an hour.
    SwapReversedPair,
    /// `12:03` → `03:12`: a single-digit minute is read as a transposed hour.
    ///
    /// Stored schedules were produced with this rule, so it also rewrites
    /// genuine `HH:0M` times. A zero minute is left alone (`06:00` stays).
    SwapSingleDigitMinute,
}

impl TimeHeuristic {
    pub fn apply(self, (hour, minute): ClockPair) -> ClockPair {
        match self {
            Self::SwapReversedPair if hour > 23 && minute <= 23 => (minute, hour),
            Self::SwapSingleDigitMinute if (1..10).contains(&minute) => (minute, hour),
            _ => (hour, minute),
        }
    }
}

/// Heuristics applied when the config does not override them.
pub const DEFAULT_TIME_HEURISTICS: &[TimeHeuristic] = &[
    TimeHeuristic::SwapReversedPair,
    TimeHeuristic::SwapSingleDigitMinute,
];

/// A parenthetical morning/evening annotation next to the time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Meridiem {
    Morning,
    Evening,
}

impl Meridiem {
    /// Shift a validated 12-hour reading onto the 24-hour clock.
    pub fn apply(self, (hour, minute): ClockPair) -> ClockPair {
        match self {
            Self::Morning if hour == 12 => (0, minute),
            Self::Evening if hour < 12 => (hour + 12, minute),
            _ => (hour, minute),
        }
    }
}

/// Read the meridiem annotation from the raw chunk.
///
/// Must run before bracket stripping, which removes the annotation.
pub fn detect_meridiem(raw: &str) -> Option<Meridiem> {
    static MORNING_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"\(\s*(?:ص|صباحا|صباحاً|صباحًا)\s*\)").unwrap());
    static EVENING_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"\(\s*(?:م|مساء|مساءً|مساءا)\s*\)").unwrap());

    if MORNING_RE.is_match(raw) {
        Some(Meridiem::Morning)
    } else if EVENING_RE.is_match(raw) {
        Some(Meridiem::Evening)
    } else {
        None
    }
}

/// Extract a `HH:MM` broadcast time from a chunk, or an empty string.
pub fn extract_time(chunk: &str) -> String {
    extract_time_with_config(chunk, &ParsingConfig::default())
}

/// Config-aware version of [`extract_time`].
pub(crate) fn extract_time_with_config(chunk: &str, config: &ParsingConfig) -> String {
    static TIME_RE: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"(?:الساعة[^0-9]*|\b)([0-9]{1,2}\s*[:.]\s*[0-9]{1,2})").unwrap()
    });

    let meridiem = detect_meridiem(chunk);
    let cleaned = normalize::clean_chunk(chunk);

    let time_re = config.time_token_re.as_ref().unwrap_or(&*TIME_RE);
    let Some(raw_token) = time_re
        .captures(&cleaned)
        .and_then(|caps| caps.get(1).or_else(|| caps.get(0)))
    else {
        return String::new();
    };

    match resolve_clock(raw_token.as_str(), meridiem, config.time_heuristics()) {
        Some((hour, minute)) => format!("{:02}:{:02}", hour, minute),
        None => String::new(),
    }
}

/// Turn a raw `H[H]:M[M]` token into a validated 24-hour pair.
pub fn resolve_clock(
    token: &str,
    meridiem: Option<Meridiem>,
    heuristics: &[TimeHeuristic],
) -> Option<ClockPair> {
    let token: String = token
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == '.' { ':' } else { c })
        .collect();
    let (hour, minute) = token.split_once(':')?;
    let pair = (hour.parse::<u32>().ok()?, minute.parse::<u32>().ok()?);

    let (hour, minute) = heuristics.iter().fold(pair, |p, h| h.apply(p));
    if hour > 23 || minute > 59 {
        tracing::trace!(token = %token, hour, minute, "rejected time token");
        return None;
    }

    Some(match meridiem {
        Some(m) => m.apply((hour, minute)),
        None => (hour, minute),
    })
}
