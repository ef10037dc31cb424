use crate::config::ParsingConfig;
use crate::{ExtractedFields, FinalRecord, chunk, content, normalize, person, time};

/// A configurable schedule parsing pipeline.
///
/// Holds a [`ParsingConfig`] and exposes each pipeline step as a method.
/// The default constructor uses built-in defaults; use
/// [`ScheduleExtractor::with_config`] to supply custom markers, heuristics
/// or a different gazetteer.
pub struct ScheduleExtractor {
    config: ParsingConfig,
}

impl Default for ScheduleExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl ScheduleExtractor {
    /// Create an extractor with default configuration.
    pub fn new() -> Self {
        Self {
            config: ParsingConfig::default(),
        }
    }

    /// Create an extractor with a custom configuration.
    pub fn with_config(config: ParsingConfig) -> Self {
        Self { config }
    }

    /// Get a reference to the current config.
    pub fn config(&self) -> &ParsingConfig {
        &self.config
    }

    /// Group the raw text into one chunk per announced item (step 1).
    pub fn merge_lines(&self, text: &str) -> Vec<String> {
        chunk::merge_lines_with_config(text.lines(), &self.config)
    }

    /// Pull the raw fields out of one chunk (step 2).
    ///
    /// The time is read from the chunk as given, since meridiem annotations
    /// live inside brackets. Everything else reads the cleaned form.
    pub fn extract_fields(&self, chunk: &str) -> ExtractedFields {
        let cleaned = normalize::clean_chunk(chunk);
        let content = content::extract_content(&cleaned, self.config.gazetteer());

        ExtractedFields {
            time: time::extract_time_with_config(chunk, &self.config),
            person: person::extract_person_with_config(&cleaned, &self.config),
            content_tokens: content.tokens,
            verse_range: content.verse_range,
        }
    }

    /// Run the full pipeline on raw announcement text.
    ///
    /// Chunks with no recognisable field are dropped; every other chunk
    /// yields exactly one record, in input order.
    pub fn parse_schedule(&self, text: &str) -> Vec<FinalRecord> {
        let chunks = self.merge_lines(text);
        tracing::debug!(chunks = chunks.len(), "merged schedule lines");

        let mut records = Vec::with_capacity(chunks.len());
        for (i, chunk) in chunks.iter().enumerate() {
            let fields = self.extract_fields(chunk);
            if fields.is_empty() {
                tracing::debug!(chunk = i, text = %chunk, "skipping chunk with no fields");
                continue;
            }
            records.push(FinalRecord::from_fields(&fields));
        }

        tracing::debug!(records = records.len(), "parsed schedule");
        records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ParsingConfigBuilder;
    use crate::defaults::{UNKNOWN_CONTENT, UNKNOWN_PERSON};

    fn plain() -> ScheduleExtractor {
        ScheduleExtractor::with_config(
            ParsingConfigBuilder::new()
                .without_gazetteer()
                .build()
                .unwrap(),
        )
    }

    #[test]
    fn test_extract_fields_full_line() {
        let fields = plain().extract_fields(
            "📻 الساعة 06:00 (ص) تلاوة للشيخ محمد رفعت ما تيسر من سورة الكهف 20 ق",
        );
        assert_eq!(fields.time, "06:00");
        assert_eq!(fields.person, "محمد رفعت");
        assert_eq!(fields.content_tokens, vec!["سورة الكهف"]);
        assert!(fields.verse_range.is_none());
    }

    #[test]
    fn test_merged_lines_make_one_record() {
        let records = plain().parse_schedule(
            "الساعة 06:00 تلاوة للشيخ محمد رفعت\nما تيسر من سورة الكهف",
        );
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].time, "06:00");
        assert_eq!(records[0].person, "محمد رفعت");
        assert_eq!(records[0].content, "سورة الكهف");
    }

    #[test]
    fn test_noise_chunk_dropped() {
        let records = plain().parse_schedule("برنامج إذاعة القرآن الكريم\nالساعة 06:00 للشيخ فلان");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].person, "فلان");
        assert_eq!(records[0].content, UNKNOWN_CONTENT);
    }

    #[test]
    fn test_partial_record_gets_placeholders() {
        let records = plain().parse_schedule("الساعة 18:45 حديث ديني");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].time, "18:45");
        assert_eq!(records[0].person, UNKNOWN_PERSON);
    }

    #[test]
    fn test_default_extractor_uses_gazetteer() {
        let records = ScheduleExtractor::new()
            .parse_schedule("الساعة 21:00 الشيخ محمود خليل الحصري سورة الإسراء");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].person, "محمود خليل الحصري");
        assert_eq!(records[0].content, "سورة الإسراء");
    }
}
