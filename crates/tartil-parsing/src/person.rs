use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::ParsingConfig;
use crate::gazetteer::Gazetteer;
use crate::normalize::collapse_whitespace;

static MARKER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:تلاوة\s+للقارئ|للشيخ|للقارئ)").unwrap());

/// Phrases that end the reciter's name, including the openers of a verse range.
static STOP_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"\s*(?:ما\s+تيسر|من\s+سورة|مدة\s+التلاوة|[0-9]+\s*ق|/",
        r"|من\s+ال[آأا]ي[ةه]|من\s+أول\s+سورة)",
    ))
    .unwrap()
});

/// Extract the reciter's name from a cleaned chunk, or an empty string.
///
/// Falls back to a gazetteer scan when no introducing phrase is found.
pub fn extract_person(chunk: &str, gazetteer: Option<&Gazetteer>) -> String {
    let person = capture_after_marker(chunk, &MARKER_RE)
        .map(|raw| tidy_person(&raw))
        .unwrap_or_default();
    if !person.is_empty() {
        return person;
    }
    fallback(chunk, gazetteer)
}

/// Config-aware version of [`extract_person`].
pub(crate) fn extract_person_with_config(chunk: &str, config: &ParsingConfig) -> String {
    let marker_re = config.person_marker_re.as_ref().unwrap_or(&*MARKER_RE);
    let person = capture_after_marker(chunk, marker_re)
        .map(|raw| tidy_person(&raw))
        .unwrap_or_default();
    if !person.is_empty() {
        return person;
    }
    fallback(chunk, config.gazetteer())
}

fn fallback(chunk: &str, gazetteer: Option<&Gazetteer>) -> String {
    match gazetteer.and_then(|g| g.find_person(chunk)) {
        Some(name) => {
            tracing::trace!(name, "reciter taken from gazetteer");
            name.to_string()
        }
        None => String::new(),
    }
}

/// Text between the first usable marker and the next stop phrase.
///
/// The capture is at least one character long, so a stop phrase directly
/// after the marker is swallowed into the name and dealt with by
/// [`tidy_person`].
fn capture_after_marker(text: &str, marker_re: &Regex) -> Option<String> {
    for marker in marker_re.find_iter(text) {
        let rest = text[marker.end()..].trim_start();
        let rest = rest.strip_prefix('/').unwrap_or(rest).trim_start();

        let Some((first_len, _)) = rest.char_indices().nth(1) else {
            if rest.is_empty() {
                continue;
            }
            return Some(rest.to_string());
        };

        let end = STOP_RE
            .find_at(rest, first_len)
            .map(|m| m.start())
            .unwrap_or(rest.len());
        let captured = rest[..end].trim_end();
        if !captured.is_empty() {
            return Some(captured.to_string());
        }
    }
    None
}

/// Remove clauses that leak into the captured name.
fn tidy_person(raw: &str) -> String {
    static SURAH_CLAUSE_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"(?s)(?:سورة|سورتى|سورتي)\s+.*$").unwrap());
    static DURATION_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)[0-9]+\s*ق.*$").unwrap());
    static LEADING_MIN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*من\s+").unwrap());
    static AFTER_SLASH_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)/.*$").unwrap());
    static MA_TAYASSAR_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"(?s)و?ما\s*تيسر(?:\s*من)?.*$").unwrap());

    let s = SURAH_CLAUSE_RE.replace(raw, "");
    let s = DURATION_RE.replace(&s, "");
    let s = LEADING_MIN_RE.replace(&s, "");
    let s = s.trim().trim_matches('/');
    let s = AFTER_SLASH_RE.replace(s, "");
    let s = MA_TAYASSAR_RE.replace(&s, "");
    collapse_whitespace(&s)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person(chunk: &str) -> String {
        extract_person(chunk, None)
    }

    #[test]
    fn test_name_before_ma_tayassar() {
        assert_eq!(
            person("الساعة 06:00 تلاوة للشيخ محمد رفعت ما تيسر من سورة الكهف"),
            "محمد رفعت"
        );
    }

    #[test]
    fn test_name_before_min_surah() {
        assert_eq!(
            person("تلاوة للقارئ محمود خليل الحصري من سورة يس"),
            "محمود خليل الحصري"
        );
    }

    #[test]
    fn test_slash_after_marker() {
        assert_eq!(person("للقارئ / أحمد نعينع / من سورة مريم"), "أحمد نعينع");
    }

    #[test]
    fn test_name_before_duration() {
        assert_eq!(person("للشيخ طه الفشني 20 ق"), "طه الفشني");
        assert_eq!(person("للشيخ طه الفشني مدة التلاوة 20"), "طه الفشني");
    }

    #[test]
    fn test_name_before_verse_range() {
        assert_eq!(
            person("للشيخ مصطفى إسماعيل من الآية 45 من سورة ص حتى الآية 61 من سورة الزمر"),
            "مصطفى إسماعيل"
        );
        assert_eq!(
            person("للشيخ محمد رفعت من أول سورة الملك حتى ختام سورة القلم"),
            "محمد رفعت"
        );
    }

    #[test]
    fn test_name_at_end() {
        assert_eq!(person("الساعة 07:00 للشيخ علي محمود"), "علي محمود");
    }

    #[test]
    fn test_surah_clause_without_min_is_dropped() {
        assert_eq!(person("للشيخ مصطفى إسماعيل سورة يوسف"), "مصطفى إسماعيل");
        assert_eq!(person("للشيخ مصطفى إسماعيل سورتى الشمس والليل"), "مصطفى إسماعيل");
    }

    #[test]
    fn test_leaked_ma_tayassar() {
        // No space inside ماتيسر, so the stop phrase misses and cleanup catches it.
        assert_eq!(person("للشيخ عبد الباسط ماتيسر من الكهف"), "عبد الباسط");
    }

    #[test]
    fn test_dangling_waw_left_for_defaults() {
        assert_eq!(person("للشيخ عبد الباسط وما تيسر"), "عبد الباسط و");
    }

    #[test]
    fn test_marker_without_name() {
        assert_eq!(person("تلاوة للشيخ"), "");
        assert_eq!(person("للشيخ من سورة البقرة"), "");
    }

    #[test]
    fn test_no_marker() {
        assert_eq!(person("الساعة 06:00 نشرة الأخبار"), "");
    }

    #[test]
    fn test_gazetteer_fallback() {
        let g = Gazetteer::builtin();
        assert_eq!(
            extract_person("الساعة 06:00 الشيخ محمد صديق المنشاوي سورة الفجر", Some(&*g)),
            "محمد صديق المنشاوي"
        );
        // A marker match wins over the gazetteer.
        assert_eq!(extract_person("للشيخ فلان", Some(&*g)), "فلان");
    }

    #[test]
    fn test_custom_marker_regex() {
        let config = crate::ParsingConfigBuilder::new()
            .person_marker_regex(r"بصوت")
            .without_gazetteer()
            .build()
            .unwrap();
        assert_eq!(
            extract_person_with_config("بصوت محمد رفعت من سورة يس", &config),
            "محمد رفعت"
        );
    }
}
