use super::*;

impl App {
    /// Runs when the popup opens: fill the key field from storage and load the
    /// configured page.
    pub fn init(&mut self) {
        match self.credentials.load() {
            Ok(Some(key)) => {
                self.credential_input.set(&key);
                tracing::info!("Loaded saved API key");
            }
            Ok(None) => {
                self.focus = Focus::Credential;
            }
            Err(e) => self.report_error("Could not read saved API key", e),
        }

        if self.config.page.url.is_some() {
            self.reload_page();
        }
    }

    pub fn process_events(&mut self) {
        self.process_events_at(Instant::now());
    }

    pub fn process_events_at(&mut self, now: Instant) {
        let mut messages = Vec::new();
        if let Some(ref mut rx) = self.relay_rx {
            while let Ok(message) = rx.try_recv() {
                messages.push(message);
            }
        }

        for message in messages {
            match message {
                RelayMessage::AiResponse(response) => {
                    tracing::info!(is_error = response.is_error(), "Popup received AI response");
                    self.suggestion = response.display_text().to_string();
                    self.last_answer = Some(LastAnswer {
                        received_at: Local::now(),
                        is_error: response.is_error(),
                    });
                    self.scroll_offset = 0;
                    self.help_enabled = true;
                }
                other => tracing::debug!("Popup ignoring {:?}", other),
            }
        }

        if self
            .status_note
            .as_ref()
            .is_some_and(|note| note.is_expired(now))
        {
            self.status_note = None;
        }
    }
}
