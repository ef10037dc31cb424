use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::normalize::{fold_digits, normalize_letters};

/// The date line at the top of a daily schedule:
/// `يوم الخميس : 9 رجب 1446هـ الموافق 09/01/2025م`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleHeader {
    pub weekday: String,
    pub hijri: String,
    /// Gregorian date as written, without a trailing full stop.
    pub gregorian_raw: String,
}

impl ScheduleHeader {
    /// The `DD/MM/YYYY` portion of the Gregorian date.
    pub fn gregorian_date(&self) -> Option<NaiveDate> {
        static DMY_RE: Lazy<Regex> =
            Lazy::new(|| Regex::new(r"([0-9]{2})/([0-9]{2})/([0-9]{4})").unwrap());

        let caps = DMY_RE.captures(&self.gregorian_raw)?;
        let day = caps[1].parse().ok()?;
        let month = caps[2].parse().ok()?;
        let year = caps[3].parse().ok()?;
        NaiveDate::from_ymd_opt(year, month, day)
    }
}

/// Find the schedule's date line.
pub fn parse_header(text: &str) -> Option<ScheduleHeader> {
    static HEADER_RE: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"يوم\s+(\S+)\s*:\s*(.+?هـ)\s+الموافق\s+([0-9]+/[0-9]+/[0-9]+م?\.?)").unwrap()
    });

    for line in text.lines() {
        let line = fold_digits(line.trim());
        if line.is_empty() {
            continue;
        }
        let Some(caps) = HEADER_RE.captures(&line) else {
            continue;
        };
        let whole = caps.get(0)?;
        // The date must end at a word break.
        if line[whole.end()..]
            .chars()
            .next()
            .is_some_and(|c| !c.is_whitespace())
        {
            continue;
        }

        return Some(ScheduleHeader {
            weekday: caps[1].trim().to_string(),
            hijri: caps[2].trim().to_string(),
            gregorian_raw: caps[3].trim_end_matches('.').trim().to_string(),
        });
    }
    None
}

/// Whether the text looks like one of the station's daily programme posts.
pub fn is_schedule_announcement(text: &str) -> bool {
    static NEEDLE: Lazy<String> = Lazy::new(|| normalize_letters("برنامج إذاعة القرآن"));
    normalize_letters(text).contains(NEEDLE.as_str())
}
