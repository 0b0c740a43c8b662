use serde::{Deserialize, Serialize};

pub const MISSING_BOTH: &str =
    "Could not find the problem text or the code editor on this page. The page layout may have changed; update the selectors in your config.";
pub const MISSING_PROBLEM: &str =
    "Could not find the problem text on this page. Open a question page and try again.";
pub const MISSING_CODE: &str =
    "Could not find the code editor on this page. Make sure the editor is open and try again.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub problem_text: String,
    pub current_code: String,
    pub error_text: String,
}

impl Snapshot {
    pub fn new(
        problem_text: impl Into<String>,
        current_code: impl Into<String>,
        error_text: impl Into<String>,
    ) -> Self {
        Self {
            problem_text: problem_text.into(),
            current_code: current_code.into(),
            error_text: error_text.into(),
        }
    }

    pub fn has_error(&self) -> bool {
        !self.error_text.trim().is_empty()
    }
}

/// What a scrape hands to the coordinator: either the captured regions or a
/// human-readable reason the page could not be read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScrapePayload {
    Failed { error: String },
    Captured(Snapshot),
}

impl ScrapePayload {
    pub fn failed(error: impl Into<String>) -> Self {
        Self::Failed {
            error: error.into(),
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed { error } => Some(error),
            Self::Captured(_) => None,
        }
    }

    pub fn snapshot(&self) -> Option<&Snapshot> {
        match self {
            Self::Captured(snapshot) => Some(snapshot),
            Self::Failed { .. } => None,
        }
    }
}

impl From<Snapshot> for ScrapePayload {
    fn from(snapshot: Snapshot) -> Self {
        Self::Captured(snapshot)
    }
}
