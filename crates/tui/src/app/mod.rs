use crate::input::InputState;
use crate::keybinds::Keybinds;
use crate::ui::layout::LayoutState;
use crate::ui::panel::PanelType;
use crate::Config;
use anyhow::Result;
use chrono::Local;
use codehelper_agent::{CredentialStore, RelayMessage};
use codehelper_page::NavigationEvent;
use ratatui::crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::layout::Rect;
use ratatui::Frame;
use std::time::Instant;
use tokio::sync::mpsc;

mod actions;
mod effects;
mod input;
mod render;
mod state;
mod types;

pub use state::App;
pub use types::{
    Focus, LastAnswer, NoteKind, StatusNote, BUSY_PLACEHOLDER, IDLE_PLACEHOLDER, KEY_REQUIRED,
    KEY_SAVED, TAB_ID,
};

impl App {
    pub fn report_error(&mut self, context: &str, error: impl std::fmt::Display) {
        let message = format!("{context}: {error}");
        self.last_error = Some(message.clone());
        self.set_note(message.clone(), NoteKind::Error, None);
        tracing::warn!("{message}");
    }

    pub(super) fn set_note(&mut self, text: impl Into<String>, kind: NoteKind, expires_at: Option<Instant>) {
        self.status_note = Some(StatusNote {
            text: text.into(),
            kind,
            expires_at,
        });
    }
}
