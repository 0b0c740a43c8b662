use super::*;
use codehelper_page::NavigationScope;

impl App {
    pub fn save_credential(&mut self) {
        let key = self.credential_input.buffer.trim().to_string();
        if key.is_empty() {
            self.set_note(KEY_REQUIRED, NoteKind::Warning, None);
            return;
        }

        match self.credentials.save(&key) {
            Ok(()) => {
                let expires_at = Instant::now() + self.config.ui.status_clear_delay();
                self.set_note(KEY_SAVED, NoteKind::Success, Some(expires_at));
            }
            Err(e) => self.report_error("Could not save API key", e),
        }
    }

    /// Sends exactly one help request and disables the trigger until the
    /// response arrives.
    pub fn request_help(&mut self) {
        if !self.help_enabled {
            return;
        }

        self.suggestion = BUSY_PLACEHOLDER.to_string();
        self.scroll_offset = 0;
        self.help_enabled = false;

        let sent = self
            .coordinator_tx
            .as_ref()
            .is_some_and(|tx| tx.send(RelayMessage::GetAiSuggestion).is_ok());
        if !sent {
            self.help_enabled = true;
            self.suggestion = "The background coordinator is not running.".to_string();
            self.report_error("Help request failed", "coordinator unavailable");
        }
    }

    pub fn reload_page(&mut self) {
        let Some(url) = self.config.page.url.clone() else {
            self.set_note(
                "No page URL configured. Set page.url or CODEHELPER_PAGE_URL.",
                NoteKind::Warning,
                None,
            );
            return;
        };

        if !NavigationScope::new(self.config.page.scope.as_str()).matches(&url) {
            self.set_note(
                format!(
                    "Page URL is outside page.scope ({}); it will not be scraped.",
                    self.config.page.scope
                ),
                NoteKind::Warning,
                None,
            );
            tracing::warn!("{} does not match scope {}", url, self.config.page.scope);
            return;
        }

        let sent = self
            .navigation_tx
            .as_ref()
            .is_some_and(|tx| tx.send(NavigationEvent::reload(TAB_ID, url.clone())).is_ok());
        if sent {
            tracing::info!("Reloading {}", url);
        } else {
            self.report_error("Reload failed", "coordinator unavailable");
        }
    }

    pub(super) fn scroll_up(&mut self, lines: u16) {
        self.scroll_offset = self.scroll_offset.saturating_sub(lines);
    }

    pub(super) fn scroll_down(&mut self, lines: u16) {
        let max = self.suggestion.lines().count().saturating_sub(1);
        let max = u16::try_from(max).unwrap_or(u16::MAX);
        self.scroll_offset = self.scroll_offset.saturating_add(lines).min(max);
    }
}
