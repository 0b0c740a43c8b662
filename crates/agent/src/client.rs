//! Client for the Gemini `generateContent` endpoint.

use crate::error::{redact_key, HelpError, HelpResult};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.5-pro";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiSettings {
    pub base_url: String,
    pub model: String,
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
}

impl Default for GeminiSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            request_timeout_secs: 60,
            connect_timeout_secs: 10,
        }
    }
}

impl GeminiSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: [RequestContent<'a>; 1],
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: [RequestPart<'a>; 1],
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GenerateContentResponse {
    fn into_first_text(self) -> HelpResult<String> {
        self.candidates
            .into_iter()
            .next()
            .ok_or_else(|| HelpError::Parse("response has no candidates".to_string()))?
            .content
            .and_then(|content| content.parts.into_iter().next())
            .and_then(|part| part.text)
            .ok_or_else(|| HelpError::Parse("first candidate has no text part".to_string()))
    }
}

#[derive(Clone)]
pub struct GeminiClient {
    http: Client,
    settings: GeminiSettings,
}

impl GeminiClient {
    pub fn new(settings: GeminiSettings) -> Self {
        let http = Client::builder()
            .timeout(settings.request_timeout())
            .connect_timeout(Duration::from_secs(settings.connect_timeout_secs))
            .build()
            .unwrap_or_else(|_| Client::new());
        Self { http, settings }
    }

    pub fn settings(&self) -> &GeminiSettings {
        &self.settings
    }

    fn endpoint(&self, api_key: &str) -> HelpResult<Url> {
        let raw = format!(
            "{}/models/{}:generateContent",
            self.settings.base_url.trim_end_matches('/'),
            self.settings.model
        );
        let mut url = Url::parse(&raw)
            .map_err(|e| HelpError::Network(format!("invalid AI endpoint {raw}: {e}")))?;
        url.query_pairs_mut().append_pair("key", api_key);
        Ok(url)
    }

    /// Sends one prompt and returns the first candidate's first text part.
    pub async fn generate(&self, api_key: &str, prompt: &str) -> HelpResult<String> {
        let url = self.endpoint(api_key)?;
        let timeout = self.settings.request_timeout();
        let body = GenerateContentRequest {
            contents: [RequestContent {
                parts: [RequestPart { text: prompt }],
            }],
        };

        debug!(
            model = %self.settings.model,
            prompt_chars = prompt.len(),
            "Calling generateContent"
        );

        let response = self
            .http
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(|e| HelpError::from_reqwest(e, timeout))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| HelpError::from_reqwest(e, timeout))?;

        if !status.is_success() {
            warn!("AI API error response ({}): {}", status, redact_key(&text));
            return Err(HelpError::from_status(status));
        }

        let envelope: GenerateContentResponse =
            serde_json::from_str(&text).map_err(|e| HelpError::Parse(e.to_string()))?;
        let suggestion = envelope.into_first_text()?;
        info!(chars = suggestion.len(), "Received AI suggestion");
        Ok(suggestion)
    }
}
