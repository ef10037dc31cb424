use thiserror::Error;

/// Why an extraction strategy produced no usable records.
#[derive(Error, Debug)]
pub enum StrategyError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API returned {status}: {body}")]
    Api { status: u16, body: String },
    #[error("response was empty")]
    EmptyResponse,
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("schedule entry {index} is missing \"{key}\"")]
    MissingKey { index: usize, key: &'static str },
    #[error("unexpected response shape: {0}")]
    Invalid(String),
    #[error("no schedule items extracted")]
    NoRecords,
    #[error("{0}")]
    Other(String),
}

impl From<String> for StrategyError {
    fn from(s: String) -> Self {
        StrategyError::Other(s)
    }
}
