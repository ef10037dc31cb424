//! Google Gemini extraction strategy.
//!
//! Calls the `generateContent` endpoint with the whole announcement and asks
//! for a JSON schedule. Auth via URL query param.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tartil_parsing::{FinalRecord, apply_defaults};

use super::ExtractionStrategy;
use crate::StrategyError;

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

const KEY_TIME: &str = "الوقت";
const KEY_PERSON: &str = "القارئ";
const KEY_CONTENT: &str = "السور";

const PROMPT_TEMPLATE: &str = r#"You extract structured data from Arabic radio schedules.

Read the schedule below and return a single JSON object of this shape:
{
  "date": "<the schedule's date as written>",
  "schedule": [
    {
      "الوقت": "<start time>",
      "القارئ": "<reciter name>",
      "السور": "<surahs recited>",
      "المدة": "<duration, if stated>"
    }
  ]
}

Return the JSON object only, with no commentary and no Markdown fences.
Keep entries in the order they appear. Formatting in the source varies; be consistent.

Schedule:
{raw_text}
"#;

/// Gemini-backed extraction.
pub struct GeminiStrategy {
    client: reqwest::Client,
    api_key: String,
    model: String,
    timeout: Duration,
}

impl GeminiStrategy {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            model,
            timeout: Duration::from_secs(60),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: String) -> Result<String, StrategyError> {
        let body = GeminiRequest {
            contents: vec![GeminiContent {
                role: Some("user".to_string()),
                parts: vec![GeminiPart { text: prompt }],
            }],
        };

        let url = format!(
            "{GEMINI_BASE_URL}/models/{}:generateContent?key={}",
            self.model, self.api_key
        );
        tracing::debug!(model = %self.model, "gemini: POST generateContent");

        let resp = self
            .client
            .post(&url)
            .json(&body)
            .timeout(self.timeout)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(StrategyError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GeminiResponse = resp.json().await?;
        response_text(&parsed).ok_or(StrategyError::EmptyResponse)
    }
}

impl ExtractionStrategy for GeminiStrategy {
    fn name(&self) -> &str {
        "gemini"
    }

    fn extract<'a>(
        &'a self,
        raw_text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<FinalRecord>, StrategyError>> + Send + 'a>> {
        Box::pin(async move {
            let text = self.generate(build_prompt(raw_text)).await?;
            let records = parse_schedule_json(&text)?;
            tracing::debug!(records = records.len(), "gemini: schedule parsed");
            Ok(records)
        })
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
}

#[derive(Serialize, Deserialize)]
struct GeminiContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<GeminiPart>,
}

#[derive(Serialize, Deserialize)]
struct GeminiPart {
    text: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    candidates: Option<Vec<GeminiCandidate>>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
}

fn response_text(resp: &GeminiResponse) -> Option<String> {
    let text: String = resp
        .candidates
        .as_ref()?
        .first()?
        .content
        .as_ref()?
        .parts
        .iter()
        .map(|p| p.text.as_str())
        .collect();
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

pub fn build_prompt(raw_text: &str) -> String {
    PROMPT_TEMPLATE.replace("{raw_text}", raw_text)
}

/// Remove a surrounding Markdown code fence (```` ```json ... ``` ````), if any.
pub fn strip_code_fences(text: &str) -> &str {
    static FENCE_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"(?s)^```(?:json)?\s*\n?(.*?)\n?```$").unwrap());

    let text = text.trim();
    match FENCE_RE.captures(text).and_then(|c| c.get(1)) {
        Some(inner) => inner.as_str().trim(),
        None => text,
    }
}

/// Validate a model reply and map its entries to records.
///
/// Every entry must carry time, reciter and surahs; duration is optional and
/// ignored. Empty values get the same placeholders as the parser's.
pub fn parse_schedule_json(text: &str) -> Result<Vec<FinalRecord>, StrategyError> {
    let value: Value = serde_json::from_str(strip_code_fences(text))?;

    let obj = value
        .as_object()
        .ok_or_else(|| StrategyError::Invalid("top level is not an object".into()))?;
    if !obj.get("date").is_some_and(Value::is_string) {
        return Err(StrategyError::Invalid("missing \"date\"".into()));
    }
    let entries = obj
        .get("schedule")
        .and_then(Value::as_array)
        .ok_or_else(|| StrategyError::Invalid("missing \"schedule\" array".into()))?;

    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let field = |key: &'static str| match entry.get(key) {
                Some(Value::String(s)) => Ok(s.as_str()),
                Some(_) => Err(StrategyError::Invalid(format!(
                    "entry {index}: \"{key}\" is not a string"
                ))),
                None => Err(StrategyError::MissingKey { index, key }),
            };
            Ok(apply_defaults(
                field(KEY_TIME)?,
                field(KEY_PERSON)?,
                field(KEY_CONTENT)?,
            ))
        })
        .collect()
}
