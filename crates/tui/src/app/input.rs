use super::*;

impl App {
    pub fn handle_event(&mut self, event: Event) -> Result<bool> {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key_event(key),
            _ => Ok(false),
        }
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<bool> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        if ctrl && key.code == KeyCode::Char('q') {
            return Ok(true);
        }

        let typing = self.focus == Focus::Credential && !ctrl;
        if key.code == KeyCode::F(1) || (key.code == KeyCode::Char('?') && !typing) {
            self.show_help = !self.show_help;
            return Ok(false);
        }

        if self.show_help {
            if key.code == KeyCode::Esc {
                self.show_help = false;
            }
            return Ok(false);
        }

        if ctrl {
            match key.code {
                KeyCode::Char('g') => self.request_help(),
                KeyCode::Char('r') => self.reload_page(),
                KeyCode::Char('s') => self.save_credential(),
                KeyCode::Char('u') => self.credential_input.clear(),
                _ => {}
            }
            return Ok(false);
        }

        match key.code {
            KeyCode::Esc => return Ok(true),
            KeyCode::Tab | KeyCode::BackTab => self.focus = self.focus.toggle(),
            KeyCode::Up => self.scroll_up(1),
            KeyCode::Down => self.scroll_down(1),
            KeyCode::PageUp => self.scroll_up(self.page_size()),
            KeyCode::PageDown => self.scroll_down(self.page_size()),
            KeyCode::Enter => match self.focus {
                Focus::Credential => self.save_credential(),
                Focus::HelpButton => self.request_help(),
            },
            KeyCode::Backspace if self.focus == Focus::Credential => {
                self.credential_input.handle_backspace();
            }
            KeyCode::Char(c) if self.focus == Focus::Credential => {
                self.credential_input.handle_char(c);
            }
            _ => {}
        }

        Ok(false)
    }

    fn page_size(&self) -> u16 {
        self.layout.suggestion_height().max(1)
    }
}
