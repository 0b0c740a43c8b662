use regex::Regex;
use std::sync::LazyLock;
use std::time::Duration;
use thiserror::Error;

pub const AI_FAILURE_PREFIX: &str = "Error: Could not get a suggestion from the AI.";

static KEY_PARAM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([?&]key=)[^&\s)]+").expect("static regex"));

/// Everything that can end a help request. `Display` is the text the user sees.
#[derive(Debug, Error)]
pub enum HelpError {
    #[error("Waiting for scraper... Please wait a few seconds and try again.")]
    NotReady,

    #[error("{0}")]
    Scrape(String),

    #[error("API key not set. Enter your key in the popup and save it.")]
    MissingCredential,

    #[error("AI API Error: Bad Request. Is your API key correct and enabled?")]
    BadCredential,

    #[error("AI API Error: {status} {reason}")]
    Endpoint { status: u16, reason: String },

    #[error("AI request timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Unexpected AI response: {0}")]
    Parse(String),

    #[error("Could not read the saved API key: {0}")]
    Storage(String),
}

impl HelpError {
    /// Failures raised by the AI call itself, as opposed to the checks that
    /// run before it.
    pub fn is_ai_failure(&self) -> bool {
        matches!(
            self,
            HelpError::BadCredential
                | HelpError::Endpoint { .. }
                | HelpError::Timeout(_)
                | HelpError::Network(_)
                | HelpError::Parse(_)
        )
    }

    pub fn user_message(&self) -> String {
        if self.is_ai_failure() {
            format!("{AI_FAILURE_PREFIX}\n\n{self}")
        } else {
            self.to_string()
        }
    }

    pub fn from_status(status: reqwest::StatusCode) -> Self {
        if status == reqwest::StatusCode::BAD_REQUEST {
            HelpError::BadCredential
        } else {
            HelpError::Endpoint {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("").to_string(),
            }
        }
    }

    pub fn from_reqwest(error: reqwest::Error, timeout: Duration) -> Self {
        if error.is_timeout() {
            HelpError::Timeout(timeout)
        } else {
            HelpError::Network(redact_key(&error.without_url().to_string()))
        }
    }
}

impl From<anyhow::Error> for HelpError {
    fn from(e: anyhow::Error) -> Self {
        HelpError::Storage(e.to_string())
    }
}

/// Hides an API key passed as a `key=` query parameter.
pub fn redact_key(input: &str) -> String {
    KEY_PARAM.replace_all(input, "${1}[REDACTED]").into_owned()
}

pub type HelpResult<T> = Result<T, HelpError>;
