use codehelper_page::ScrapePayload;
use serde::{Deserialize, Serialize};

pub const UNKNOWN_ERROR: &str = "An unknown error occurred.";

/// One-shot, unacknowledged messages passed between the scraper, the
/// coordinator and the popup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelayMessage {
    ScrapedData { data: ScrapePayload },
    GetAiSuggestion,
    AiResponse(AiResponse),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AiResponse {
    pub fn data(text: impl Into<String>) -> Self {
        Self {
            data: Some(text.into()),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            data: None,
            error: Some(message.into()),
        }
    }

    /// What the popup shows: the suggestion, else the error, else a generic
    /// fallback. Empty strings count as absent.
    pub fn display_text(&self) -> &str {
        self.data
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| self.error.as_deref().filter(|s| !s.is_empty()))
            .unwrap_or(UNKNOWN_ERROR)
    }

    pub fn is_error(&self) -> bool {
        self.data.as_deref().map_or(true, str::is_empty)
    }
}
