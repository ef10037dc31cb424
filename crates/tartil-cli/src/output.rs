use std::io::Write;

use owo_colors::OwoColorize;
use serde_json::{Value, json};
use tartil_core::ChainOutcome;
use tartil_parsing::{ExtractedFields, FinalRecord, ScheduleHeader};

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

/// Print the schedule's date line, or a note that none was found.
pub fn print_header(
    w: &mut dyn Write,
    header: Option<&ScheduleHeader>,
    color: ColorMode,
) -> std::io::Result<()> {
    let Some(header) = header else {
        if color.enabled() {
            writeln!(w, "{}", "(no schedule date line found)".dimmed())?;
        } else {
            writeln!(w, "(no schedule date line found)")?;
        }
        return Ok(());
    };

    let iso = header
        .gregorian_date()
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| header.gregorian_raw.clone());

    if color.enabled() {
        writeln!(
            w,
            "{} {} {} ({})",
            "Schedule:".bold().cyan(),
            header.weekday.bold(),
            header.hijri,
            iso
        )?;
    } else {
        writeln!(w, "Schedule: {} {} ({})", header.weekday, header.hijri, iso)?;
    }
    Ok(())
}

pub fn print_warning(w: &mut dyn Write, message: &str, color: ColorMode) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(w, "{} {}", "WARNING:".yellow(), message)
    } else {
        writeln!(w, "WARNING: {}", message)
    }
}

/// Print which path produced the records.
pub fn print_source(
    w: &mut dyn Write,
    outcome: &ChainOutcome,
    color: ColorMode,
) -> std::io::Result<()> {
    let line = match outcome {
        ChainOutcome::Primary {
            strategy, attempts, ..
        } => format!("Extracted by {} ({} attempt(s))", strategy, attempts),
        ChainOutcome::Fallback {
            primary_error: Some(e),
            ..
        } => format!("Extracted by the rule-based parser (LLM failed: {})", e),
        ChainOutcome::Fallback { .. } => "Extracted by the rule-based parser".to_string(),
        ChainOutcome::Failed { .. } => "No records extracted".to_string(),
    };
    if color.enabled() {
        writeln!(w, "{}", line.dimmed())?;
    } else {
        writeln!(w, "{}", line)?;
    }
    writeln!(w)?;
    Ok(())
}

/// Print records as a numbered list. Placeholder values are highlighted.
pub fn print_records(
    w: &mut dyn Write,
    records: &[FinalRecord],
    color: ColorMode,
) -> std::io::Result<()> {
    for (i, record) in records.iter().enumerate() {
        if color.enabled() {
            writeln!(
                w,
                "{} {}  {}",
                format!("[{}]", i + 1).bold(),
                field(&record.time, color).bold(),
                field(&record.person, color)
            )?;
        } else {
            writeln!(w, "[{}] {}  {}", i + 1, record.time, record.person)?;
        }
        writeln!(w, "    {}", field(&record.content, color))?;
    }
    Ok(())
}

fn field(value: &str, color: ColorMode) -> String {
    if color.enabled() && FinalRecord::is_placeholder(value) {
        value.yellow().to_string()
    } else {
        value.to_string()
    }
}

/// The JSON document written by `--format json`.
pub fn records_json(header: Option<&ScheduleHeader>, outcome: &ChainOutcome) -> Value {
    json!({
        "date": header.and_then(|h| h.gregorian_date()).map(|d| d.to_string()),
        "header": header,
        "source": outcome.source(),
        "records": outcome.records(),
    })
}

/// Print one chunk and the raw fields read from it.
pub fn print_chunk(
    w: &mut dyn Write,
    index: usize,
    chunk: &str,
    fields: &ExtractedFields,
    color: ColorMode,
) -> std::io::Result<()> {
    let verse_range = fields
        .verse_range
        .as_ref()
        .map(|r| {
            format!(
                "{} {} -> {} {}",
                r.from_marker, r.surah_1, r.to_marker, r.surah_2
            )
        })
        .unwrap_or_default();

    if color.enabled() {
        writeln!(w, "{}", format!("[{}]", index + 1).bold().yellow())?;
        writeln!(w, "  {}", chunk.dimmed())?;
    } else {
        writeln!(w, "[{}]", index + 1)?;
        writeln!(w, "  {}", chunk)?;
    }
    writeln!(w, "  Time:    {}", fields.time)?;
    writeln!(w, "  Person:  {}", fields.person)?;
    writeln!(w, "  Tokens:  {}", fields.content_tokens.join(" | "))?;
    writeln!(w, "  Verses:  {}", verse_range)?;
    if fields.is_empty() {
        if color.enabled() {
            writeln!(w, "  {}", "(dropped: nothing recognised)".red())?;
        } else {
            writeln!(w, "  (dropped: nothing recognised)")?;
        }
    }
    writeln!(w)?;
    Ok(())
}
