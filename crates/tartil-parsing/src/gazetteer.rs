use std::path::Path;
use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::ParsingError;
use crate::normalize::normalize_letters;

/// The 114 surah names, in mushaf order.
const SURAH_NAMES: &[&str] = &[
    "الفاتحة", "البقرة", "آل عمران", "النساء", "المائدة", "الأنعام", "الأعراف", "الأنفال",
    "التوبة", "يونس", "هود", "يوسف", "الرعد", "إبراهيم", "الحجر", "النحل", "الإسراء",
    "الكهف", "مريم", "طه", "الأنبياء", "الحج", "المؤمنون", "النور", "الفرقان", "الشعراء",
    "النمل", "القصص", "العنكبوت", "الروم", "لقمان", "السجدة", "الأحزاب", "سبأ", "فاطر",
    "يس", "الصافات", "ص", "الزمر", "غافر", "فصلت", "الشورى", "الزخرف", "الدخان",
    "الجاثية", "الأحقاف", "محمد", "الفتح", "الحجرات", "ق", "الذاريات", "الطور", "النجم",
    "القمر", "الرحمن", "الواقعة", "الحديد", "المجادلة", "الحشر", "الممتحنة", "الصف",
    "الجمعة", "المنافقون", "التغابن", "الطلاق", "التحريم", "الملك", "القلم", "الحاقة",
    "المعارج", "نوح", "الجن", "المزمل", "المدثر", "القيامة", "الإنسان", "المرسلات",
    "النبأ", "النازعات", "عبس", "التكوير", "الانفطار", "المطففين", "الانشقاق", "البروج",
    "الطارق", "الأعلى", "الغاشية", "الفجر", "البلد", "الشمس", "الليل", "الضحى", "الشرح",
    "التين", "العلق", "القدر", "البينة", "الزلزلة", "العاديات", "القارعة", "التكاثر",
    "العصر", "الهمزة", "الفيل", "قريش", "الماعون", "الكوثر", "الكافرون", "النصر", "المسد",
    "الإخلاص", "الفلق", "الناس",
];

/// Reciters heard regularly on the station.
const RECITER_NAMES: &[&str] = &[
    "محمد صديق المنشاوي",
    "محمود خليل الحصري",
    "عبد الباسط عبد الصمد",
    "مصطفى إسماعيل",
    "محمد رفعت",
    "محمود علي البنا",
    "محمد محمود الطبلاوي",
    "أبو العينين شعيشع",
    "كامل يوسف البهتيمي",
    "عبد الفتاح الشعشاعي",
    "طه الفشني",
    "محمود عبد الحكم",
    "عبد العظيم زاهر",
    "منصور الشامي الدمنهوري",
    "راغب مصطفى غلوش",
    "محمود الشحات أنور",
    "الشحات محمد أنور",
    "أحمد نعينع",
    "محمد أحمد شبيب",
    "شعبان الصياد",
];

/// Words that must precede a bare surah name for the content scan to accept it.
const SURAH_WORDS: &[&str] = &["سورة", "سوره", "سورتي", "سور"];

static BUILTIN: Lazy<Arc<Gazetteer>> = Lazy::new(|| {
    Arc::new(Gazetteer::new(
        RECITER_NAMES.iter().map(|s| s.to_string()),
        SURAH_NAMES.iter().map(|s| s.to_string()),
    ))
});

#[derive(Debug, Clone)]
struct Entry {
    canonical: String,
    folded: String,
}

impl Entry {
    fn new(name: String) -> Option<Self> {
        let canonical = name.trim().to_string();
        let folded = normalize_letters(&canonical);
        if folded.is_empty() {
            return None;
        }
        Some(Self { canonical, folded })
    }
}

/// Known reciter and surah names, consulted only when the patterns come up empty.
///
/// Lookups compare letter-folded forms on word boundaries and return the
/// canonical spelling. Entries are tried in insertion order.
#[derive(Debug, Clone, Default)]
pub struct Gazetteer {
    persons: Vec<Entry>,
    contents: Vec<Entry>,
}

impl Gazetteer {
    pub fn new<P, C>(persons: P, contents: C) -> Self
    where
        P: IntoIterator<Item = String>,
        C: IntoIterator<Item = String>,
    {
        Self {
            persons: persons.into_iter().filter_map(Entry::new).collect(),
            contents: contents.into_iter().filter_map(Entry::new).collect(),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// The shared built-in instance: well-known reciters and all surah names.
    pub fn builtin() -> Arc<Gazetteer> {
        Arc::clone(&BUILTIN)
    }

    /// Load name lists from files, one name per line. Blank lines and lines
    /// starting with `#` are ignored.
    pub fn from_files(persons: &Path, contents: &Path) -> Result<Self, ParsingError> {
        Ok(Self::new(load_list(persons)?, load_list(contents)?))
    }

    /// A copy of this gazetteer with extra names appended after the existing ones.
    pub fn extended<P, C>(&self, persons: P, contents: C) -> Self
    where
        P: IntoIterator<Item = String>,
        C: IntoIterator<Item = String>,
    {
        let mut out = self.clone();
        out.persons.extend(persons.into_iter().filter_map(Entry::new));
        out.contents.extend(contents.into_iter().filter_map(Entry::new));
        out
    }

    pub fn person_count(&self) -> usize {
        self.persons.len()
    }

    pub fn content_count(&self) -> usize {
        self.contents.len()
    }

    /// First known person name that appears in `text`.
    pub fn find_person(&self, text: &str) -> Option<&str> {
        let folded = normalize_letters(text);
        self.persons
            .iter()
            .find(|e| find_word(&folded, &e.folded, |_| true))
            .map(|e| e.canonical.as_str())
    }

    /// First known content name in `text` that directly follows a surah word.
    ///
    /// Bare names such as الفجر or النور are ordinary words in announcements,
    /// so they only count after سورة and its variants.
    pub fn find_content(&self, text: &str) -> Option<&str> {
        let folded = normalize_letters(text);
        self.contents
            .iter()
            .find(|e| find_word(&folded, &e.folded, follows_surah_word))
            .map(|e| e.canonical.as_str())
    }
}

/// Read a newline-separated name list.
pub fn load_list(path: &Path) -> Result<Vec<String>, ParsingError> {
    let content = std::fs::read_to_string(path)?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(str::to_string)
        .collect())
}

/// Whether `needle` occurs in `haystack` as a whole word and the text before
/// it satisfies `accept_prefix`.
fn find_word(haystack: &str, needle: &str, accept_prefix: impl Fn(&str) -> bool) -> bool {
    haystack.match_indices(needle).any(|(start, m)| {
        let before = &haystack[..start];
        let after = &haystack[start + m.len()..];
        let open = before.chars().next_back().is_none_or(|c| !c.is_alphanumeric());
        let close = after.chars().next().is_none_or(|c| !c.is_alphanumeric());
        open && close && accept_prefix(before)
    })
}

fn follows_surah_word(before: &str) -> bool {
    let before = before.trim_end();
    SURAH_WORDS.iter().any(|w| {
        before.strip_suffix(w).is_some_and(|rest| {
            rest.chars().next_back().is_none_or(|c| !c.is_alphanumeric())
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_has_all_surahs() {
        let g = Gazetteer::builtin();
        assert_eq!(g.content_count(), 114);
        assert!(g.person_count() > 10);
    }

    #[test]
    fn test_builtin_is_shared() {
        assert!(Arc::ptr_eq(&Gazetteer::builtin(), &Gazetteer::builtin()));
    }

    #[test]
    fn test_find_person_folds_letters() {
        let g = Gazetteer::builtin();
        // Alef and alef maksura variants still hit the canonical entry.
        assert_eq!(
            g.find_person("الشيخ مصطفي اسماعيل بعد النشرة"),
            Some("مصطفى إسماعيل")
        );
    }

    #[test]
    fn test_find_person_word_boundary() {
        let g = Gazetteer::new(vec!["علي".to_string()], vec![]);
        assert_eq!(g.find_person("عليم"), None);
        assert_eq!(g.find_person("الشيخ علي"), Some("علي"));
    }

    #[test]
    fn test_find_person_insertion_order() {
        let g = Gazetteer::new(vec!["ب".to_string(), "أ".to_string()], vec![]);
        assert_eq!(g.find_person("أ ب"), Some("ب"));
    }

    #[test]
    fn test_find_content_requires_surah_word() {
        let g = Gazetteer::builtin();
        assert_eq!(g.find_content("بعد أذان الفجر"), None);
        assert_eq!(g.find_content("تلاوة سورة الفجر"), Some("الفجر"));
        assert_eq!(g.find_content("سوره يوسف"), Some("يوسف"));
    }

    #[test]
    fn test_find_content_short_names() {
        let g = Gazetteer::builtin();
        assert_eq!(g.find_content("للشيخ فلان 5 ق"), None);
        assert_eq!(g.find_content("سورة ق"), Some("ق"));
    }

    #[test]
    fn test_empty_gazetteer() {
        let g = Gazetteer::empty();
        assert_eq!(g.find_person("محمد رفعت"), None);
        assert_eq!(g.find_content("سورة يس"), None);
    }

    #[test]
    fn test_extended_keeps_existing_first() {
        let g = Gazetteer::empty()
            .extended(vec!["فلان".to_string()], vec![])
            .extended(vec!["علان".to_string()], vec!["البقرة".to_string()]);
        assert_eq!(g.person_count(), 2);
        assert_eq!(g.find_person("فلان و علان"), Some("فلان"));
    }

    #[test]
    fn test_from_files() {
        let dir = tempfile::tempdir().unwrap();
        let persons = dir.path().join("persons.txt");
        let contents = dir.path().join("contents.txt");
        std::fs::write(&persons, "# قراء\nمحمد رفعت\n\n  أحمد نعينع  \n").unwrap();
        std::fs::write(&contents, "يس\n").unwrap();

        let g = Gazetteer::from_files(&persons, &contents).unwrap();
        assert_eq!(g.person_count(), 2);
        assert_eq!(g.find_person("للشيخ احمد نعينع"), Some("أحمد نعينع"));
        assert_eq!(g.content_count(), 1);
    }

    #[test]
    fn test_from_files_missing() {
        let result = Gazetteer::from_files(Path::new("/nonexistent/a"), Path::new("/nonexistent/b"));
        assert!(matches!(result, Err(ParsingError::Io(_))));
    }
}
