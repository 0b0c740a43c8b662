use chrono::{DateTime, Local};
use std::time::Instant;

pub const BUSY_PLACEHOLDER: &str = "Scraping page and asking AI...";
pub const KEY_SAVED: &str = "API Key saved successfully!";
pub const KEY_REQUIRED: &str = "Please enter an API key.";
pub const IDLE_PLACEHOLDER: &str =
    "Open an exercise page, then press Ctrl+G to ask for the next step.";

/// The popup drives a single page, so every navigation event uses this tab.
pub const TAB_ID: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Credential,
    HelpButton,
}

impl Focus {
    pub fn toggle(self) -> Self {
        match self {
            Focus::Credential => Focus::HelpButton,
            Focus::HelpButton => Focus::Credential,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteKind {
    Success,
    Warning,
    Error,
}

/// Short message under the key field. Notes with `expires_at` disappear on
/// their own.
#[derive(Debug, Clone)]
pub struct StatusNote {
    pub text: String,
    pub kind: NoteKind,
    pub expires_at: Option<Instant>,
}

impl StatusNote {
    pub fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| now >= at)
    }
}

#[derive(Debug, Clone)]
pub struct LastAnswer {
    pub received_at: DateTime<Local>,
    pub is_error: bool,
}
