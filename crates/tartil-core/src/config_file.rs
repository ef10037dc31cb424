use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tartil_parsing::gazetteer::load_list;
use tartil_parsing::{Gazetteer, ParsingConfig, ParsingConfigBuilder, ParsingError, TimeHeuristic};

use crate::retry::RetryPolicy;

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    pub llm: Option<LlmConfig>,
    pub retry: Option<RetryConfig>,
    pub parsing: Option<ParsingSection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LlmConfig {
    pub enabled: Option<bool>,
    pub gemini_api_key: Option<String>,
    pub model: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RetryConfig {
    pub attempts: Option<u32>,
    pub backoff_secs: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParsingSection {
    pub extra_record_markers: Option<Vec<String>>,
    pub person_marker_regex: Option<String>,
    pub time_heuristics: Option<Vec<TimeHeuristic>>,
    pub use_gazetteer: Option<bool>,
    pub persons_file: Option<String>,
    pub contents_file: Option<String>,
}

/// Platform config directory path: `<config_dir>/tartil/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("tartil").join("config.toml"))
}

/// Load config by cascading CWD `.tartil.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(Path::new(".tartil.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed.
pub fn load_from_path(path: &Path) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unparseable config");
            None
        }
    }
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    let llm = |f: fn(&LlmConfig) -> Option<String>| {
        overlay
            .llm
            .as_ref()
            .and_then(f)
            .or_else(|| base.llm.as_ref().and_then(f))
    };
    let parsing = |f: fn(&ParsingSection) -> Option<String>| {
        overlay
            .parsing
            .as_ref()
            .and_then(f)
            .or_else(|| base.parsing.as_ref().and_then(f))
    };

    ConfigFile {
        llm: Some(LlmConfig {
            enabled: overlay
                .llm
                .as_ref()
                .and_then(|l| l.enabled)
                .or_else(|| base.llm.as_ref().and_then(|l| l.enabled)),
            gemini_api_key: llm(|l| l.gemini_api_key.clone()),
            model: llm(|l| l.model.clone()),
            timeout_secs: overlay
                .llm
                .as_ref()
                .and_then(|l| l.timeout_secs)
                .or_else(|| base.llm.as_ref().and_then(|l| l.timeout_secs)),
        }),
        retry: Some(RetryConfig {
            attempts: overlay
                .retry
                .as_ref()
                .and_then(|r| r.attempts)
                .or_else(|| base.retry.as_ref().and_then(|r| r.attempts)),
            backoff_secs: overlay
                .retry
                .as_ref()
                .and_then(|r| r.backoff_secs)
                .or_else(|| base.retry.as_ref().and_then(|r| r.backoff_secs)),
        }),
        parsing: Some(ParsingSection {
            extra_record_markers: overlay
                .parsing
                .as_ref()
                .and_then(|p| p.extra_record_markers.clone())
                .or_else(|| {
                    base.parsing
                        .as_ref()
                        .and_then(|p| p.extra_record_markers.clone())
                }),
            person_marker_regex: parsing(|p| p.person_marker_regex.clone()),
            time_heuristics: overlay
                .parsing
                .as_ref()
                .and_then(|p| p.time_heuristics.clone())
                .or_else(|| base.parsing.as_ref().and_then(|p| p.time_heuristics.clone())),
            use_gazetteer: overlay
                .parsing
                .as_ref()
                .and_then(|p| p.use_gazetteer)
                .or_else(|| base.parsing.as_ref().and_then(|p| p.use_gazetteer)),
            persons_file: parsing(|p| p.persons_file.clone()),
            contents_file: parsing(|p| p.contents_file.clone()),
        }),
    }
}

impl ConfigFile {
    /// Retry policy from the `[retry]` section, defaulting missing fields.
    pub fn retry_policy(&self) -> RetryPolicy {
        let defaults = RetryPolicy::default();
        let Some(retry) = &self.retry else {
            return defaults;
        };
        let backoff_base = retry
            .backoff_secs
            .filter(|s| s.is_finite() && *s >= 0.0)
            .map(Duration::from_secs_f64)
            .unwrap_or(defaults.backoff_base);
        RetryPolicy::new(retry.attempts.unwrap_or(defaults.attempts), backoff_base)
    }

    /// Build the parser configuration from the `[parsing]` section.
    ///
    /// Name lists from `persons_file`/`contents_file` extend the built-in
    /// gazetteer unless `use_gazetteer = false`.
    pub fn parsing_config(&self) -> Result<ParsingConfig, ParsingError> {
        let Some(section) = &self.parsing else {
            return Ok(ParsingConfig::default());
        };

        let mut builder = ParsingConfigBuilder::new();
        for marker in section.extra_record_markers.iter().flatten() {
            builder = builder.add_record_marker(marker.clone());
        }
        if let Some(pattern) = &section.person_marker_regex {
            builder = builder.person_marker_regex(pattern);
        }
        if let Some(heuristics) = &section.time_heuristics {
            builder = builder.time_heuristics(heuristics.clone());
        }

        builder = if section.use_gazetteer == Some(false) {
            builder.without_gazetteer()
        } else if section.persons_file.is_some() || section.contents_file.is_some() {
            let persons = match &section.persons_file {
                Some(p) => load_list(Path::new(p))?,
                None => Vec::new(),
            };
            let contents = match &section.contents_file {
                Some(p) => load_list(Path::new(p))?,
                None => Vec::new(),
            };
            tracing::debug!(
                persons = persons.len(),
                contents = contents.len(),
                "extending gazetteer from files"
            );
            builder.gazetteer(Arc::new(Gazetteer::builtin().extended(persons, contents)))
        } else {
            builder
        };

        Ok(builder.build()?)
    }
}
