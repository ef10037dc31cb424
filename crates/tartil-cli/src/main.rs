use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use tartil_core::config_file::{self, ConfigFile};
use tartil_core::strategy::gemini::DEFAULT_MODEL;
use tartil_core::{ChainOutcome, ExtractionStrategy, GeminiStrategy, run_chain};
use tartil_parsing::{ScheduleExtractor, ScheduleHeader, is_schedule_announcement, parse_header};

mod output;

use output::ColorMode;

/// Tartil - Extract structured recitation schedules from Arabic radio announcements
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse an announcement into schedule records
    Parse {
        /// Announcement text file, or "-" for stdin
        #[arg(default_value = "-")]
        input: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,

        /// Try the Gemini LLM first, falling back to the rule-based parser
        #[arg(long)]
        llm: bool,

        /// Gemini model name
        #[arg(long)]
        model: Option<String>,

        /// Total LLM attempts before falling back
        #[arg(long)]
        retries: Option<u32>,

        /// Disable the built-in reciter and surah name lists
        #[arg(long)]
        no_gazetteer: bool,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,

        /// Path to output file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Dry run: print each chunk and the fields read from it
    Inspect {
        /// Announcement text file, or "-" for stdin
        #[arg(default_value = "-")]
        input: PathBuf,

        /// Disable the built-in reciter and surah name lists
        #[arg(long)]
        no_gazetteer: bool,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Parse {
            input,
            format,
            llm,
            model,
            retries,
            no_gazetteer,
            no_color,
            output,
        } => {
            parse(
                &input,
                format,
                llm,
                model,
                retries,
                no_gazetteer,
                no_color,
                output,
            )
            .await
        }
        Command::Inspect {
            input,
            no_gazetteer,
            no_color,
        } => inspect(&input, no_gazetteer, no_color),
    }
}

/// Logs go to stderr so stdout stays clean for records. `RUST_LOG` overrides
/// the default `warn` level.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn read_input(input: &Path) -> anyhow::Result<String> {
    if input.as_os_str() == "-" {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        return Ok(text);
    }
    if !input.exists() {
        anyhow::bail!("File not found: {}", input.display());
    }
    Ok(std::fs::read_to_string(input)?)
}

fn build_extractor(
    config: &mut ConfigFile,
    no_gazetteer: bool,
) -> anyhow::Result<ScheduleExtractor> {
    if no_gazetteer {
        config.parsing.get_or_insert_with(Default::default).use_gazetteer = Some(false);
    }
    let parsing = config.parsing_config()?;
    Ok(ScheduleExtractor::with_config(parsing))
}

#[allow(clippy::too_many_arguments)]
async fn parse(
    input: &Path,
    format: Format,
    llm: bool,
    model: Option<String>,
    retries: Option<u32>,
    no_gazetteer: bool,
    no_color: bool,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let mut config = config_file::load_config();

    // Resolve configuration: CLI flags > env vars > config file > defaults
    let llm_section = config.llm.clone().unwrap_or_default();
    let use_llm = llm || llm_section.enabled.unwrap_or(false);
    let api_key = std::env::var("GEMINI_API_KEY")
        .ok()
        .filter(|k| !k.trim().is_empty())
        .or(llm_section.gemini_api_key);
    let model = model
        .or_else(|| std::env::var("TARTIL_MODEL").ok())
        .or(llm_section.model)
        .unwrap_or_else(|| DEFAULT_MODEL.to_string());
    let mut policy = config.retry_policy();
    if let Some(attempts) = retries.or_else(|| {
        std::env::var("TARTIL_RETRIES")
            .ok()
            .and_then(|v| v.parse().ok())
    }) {
        policy.attempts = attempts;
    }
    tracing::debug!(
        use_llm,
        model = %model,
        attempts = policy.attempts,
        "resolved configuration"
    );

    let extractor = build_extractor(&mut config, no_gazetteer)?;
    let text = read_input(input)?;

    // Determine color mode
    let use_color = !no_color && output.is_none() && format == Format::Text;
    let color = ColorMode(use_color);

    let mut stderr = std::io::stderr();

    if !is_schedule_announcement(&text) {
        output::print_warning(
            &mut stderr,
            "input does not look like a daily schedule announcement",
            ColorMode(!no_color),
        )?;
    }
    let header = parse_header(&text);

    let gemini = match (use_llm, api_key) {
        (true, Some(key)) => {
            let mut strategy = GeminiStrategy::new(key, model);
            if let Some(secs) = llm_section.timeout_secs {
                strategy = strategy.with_timeout(Duration::from_secs(secs));
            }
            Some(strategy)
        }
        (true, None) => {
            output::print_warning(
                &mut stderr,
                "--llm given but GEMINI_API_KEY is not set; using the rule-based parser",
                ColorMode(!no_color),
            )?;
            None
        }
        (false, _) => None,
    };
    let primary = gemini.as_ref().map(|g| g as &dyn ExtractionStrategy);

    let outcome = run_chain(primary, &policy, &extractor, &text).await;
    write_outcome(&outcome, header.as_ref(), format, output.as_deref(), color)
}

/// Write the extracted schedule. Fails without touching `output` when no
/// records were produced.
fn write_outcome(
    outcome: &ChainOutcome,
    header: Option<&ScheduleHeader>,
    format: Format,
    output: Option<&Path>,
    color: ColorMode,
) -> anyhow::Result<()> {
    if let ChainOutcome::Failed { primary_error } = outcome {
        match primary_error {
            Some(e) => anyhow::bail!("No schedule records could be extracted (LLM error: {})", e),
            None => anyhow::bail!("No schedule records could be extracted"),
        }
    }

    let mut writer: Box<dyn Write> = if let Some(output_path) = output {
        Box::new(std::fs::File::create(output_path)?)
    } else {
        Box::new(std::io::stdout())
    };

    match format {
        Format::Json => {
            let doc = output::records_json(header, outcome);
            serde_json::to_writer_pretty(&mut writer, &doc)?;
            writeln!(writer)?;
        }
        Format::Text => {
            output::print_header(&mut writer, header, color)?;
            output::print_source(&mut writer, outcome, color)?;
            output::print_records(&mut writer, outcome.records(), color)?;
        }
    }
    writer.flush()?;
    Ok(())
}

fn inspect(input: &Path, no_gazetteer: bool, no_color: bool) -> anyhow::Result<()> {
    let mut config = config_file::load_config();
    let extractor = build_extractor(&mut config, no_gazetteer)?;
    let text = read_input(input)?;
    let color = ColorMode(!no_color);
    let mut stdout = std::io::stdout();

    output::print_header(&mut stdout, parse_header(&text).as_ref(), color)?;
    writeln!(stdout)?;

    let chunks = extractor.merge_lines(&text);
    for (i, chunk) in chunks.iter().enumerate() {
        let fields = extractor.extract_fields(chunk);
        output::print_chunk(&mut stdout, i, chunk, &fields, color)?;
    }
    writeln!(stdout, "{} chunk(s)", chunks.len())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tartil_parsing::FinalRecord;

    #[test]
    fn failed_outcome_leaves_no_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schedule.json");
        let outcome = ChainOutcome::Failed {
            primary_error: Some("quota exceeded".into()),
        };

        let err = write_outcome(
            &outcome,
            None,
            Format::Json,
            Some(path.as_path()),
            ColorMode(false),
        )
        .unwrap_err();
        assert!(err.to_string().contains("quota exceeded"));
        assert!(!path.exists());
    }

    #[test]
    fn records_are_written_to_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schedule.json");
        let outcome = ChainOutcome::Fallback {
            primary_error: None,
            records: vec![FinalRecord {
                time: "06:00".into(),
                person: "محمد رفعت".into(),
                content: "سورة الكهف".into(),
            }],
        };

        write_outcome(
            &outcome,
            None,
            Format::Json,
            Some(path.as_path()),
            ColorMode(false),
        )
        .unwrap();
        let doc: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(doc["source"], "fallback");
        assert_eq!(doc["records"][0]["time"], "06:00");
    }
}
