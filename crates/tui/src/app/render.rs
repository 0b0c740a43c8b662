use super::*;

impl App {
    pub fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();

        self.layout.calculate_layout(area);

        let panels = self.layout.get_panels().to_vec();

        for panel in panels {
            match panel.panel_type {
                PanelType::Topbar => self.render_topbar(frame, panel.rect),
                PanelType::Credential => self.render_credential_bar(frame, panel.rect),
                PanelType::Suggestion => self.render_suggestion(frame, panel.rect),
                PanelType::Controls => self.render_controls(frame, panel.rect),
            }
        }

        if self.show_help {
            self.render_help(frame, area);
        }
    }

    fn render_topbar(&self, frame: &mut Frame, area: Rect) {
        use ratatui::widgets::{Block, Paragraph};

        let page = self.config.page.url.as_deref().unwrap_or("no page");
        let answer = match self.last_answer {
            Some(ref answer) if answer.is_error => {
                format!("   last answer {} (error)", answer.received_at.format("%H:%M:%S"))
            }
            Some(ref answer) => format!("   last answer {}", answer.received_at.format("%H:%M:%S")),
            None => String::new(),
        };

        let text = format!(
            " ● Code Helper   {}{}{}   [Tab] focus   [?] help",
            page,
            answer,
            if self.last_error.is_some() {
                "   ⚠ error"
            } else {
                ""
            },
        );

        frame.render_widget(Paragraph::new(text).block(Block::default()), area);
    }

    fn render_credential_bar(&self, frame: &mut Frame, area: Rect) {
        use ratatui::style::{Color, Style};
        use ratatui::text::{Line, Span};
        use ratatui::widgets::{Block, Borders, Paragraph};

        let focused = self.focus == Focus::Credential;
        let mut field = format!("Gemini API key > {}", self.credential_input.masked());
        if focused {
            field.push('█');
        }

        let note = match self.status_note {
            Some(ref note) => {
                let color = match note.kind {
                    NoteKind::Success => Color::Green,
                    NoteKind::Warning => Color::Yellow,
                    NoteKind::Error => Color::Red,
                };
                Line::from(Span::styled(note.text.clone(), Style::default().fg(color)))
            }
            None => Line::from(Span::styled(
                "[Enter] save   [Ctrl+U] clear",
                Style::default().fg(Color::DarkGray),
            )),
        };

        let border_style = if focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };

        frame.render_widget(
            Paragraph::new(vec![Line::from(field), note]).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(border_style)
                    .title(" API key "),
            ),
            area,
        );
    }

    fn render_suggestion(&self, frame: &mut Frame, area: Rect) {
        use ratatui::style::{Color, Style};
        use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

        let style = match self.last_answer {
            Some(ref answer) if answer.is_error => Style::default().fg(Color::Red),
            _ if !self.help_enabled => Style::default().fg(Color::DarkGray),
            _ => Style::default(),
        };

        frame.render_widget(
            Paragraph::new(self.suggestion.as_str())
                .style(style)
                .wrap(Wrap { trim: false })
                .scroll((self.scroll_offset, 0))
                .block(Block::default().borders(Borders::ALL).title(" Suggestion ")),
            area,
        );
    }

    fn render_controls(&self, frame: &mut Frame, area: Rect) {
        use ratatui::style::{Color, Modifier, Style};
        use ratatui::text::{Line, Span};
        use ratatui::widgets::{Block, Borders, Paragraph};

        let button_style = if !self.help_enabled {
            Style::default().fg(Color::DarkGray)
        } else if self.focus == Focus::HelpButton {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().add_modifier(Modifier::BOLD)
        };

        let line = Line::from(vec![
            Span::styled(" [ Get Help ] ", button_style),
            Span::raw("   [Ctrl+G] help   [Ctrl+R] reload   [Ctrl+Q] quit"),
        ]);

        frame.render_widget(
            Paragraph::new(line).block(Block::default().borders(Borders::ALL)),
            area,
        );
    }

    fn render_help(&self, frame: &mut Frame, area: Rect) {
        use ratatui::widgets::{Block, Borders, Clear, Paragraph};
        let help_text = self.keybinds.help_text();
        let popup_area = self.centered_rect(60, 70, area);

        frame.render_widget(Clear, popup_area);
        frame.render_widget(
            Paragraph::new(help_text).block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Help - Press Esc to close "),
            ),
            popup_area,
        );
    }

    fn centered_rect(&self, percent_x: u16, percent_y: u16, r: Rect) -> Rect {
        let popup_layout = ratatui::layout::Layout::default()
            .direction(ratatui::layout::Direction::Vertical)
            .constraints([
                ratatui::layout::Constraint::Percentage((100 - percent_y) / 2),
                ratatui::layout::Constraint::Percentage(percent_y),
                ratatui::layout::Constraint::Percentage((100 - percent_y) / 2),
            ])
            .split(r);

        ratatui::layout::Layout::default()
            .direction(ratatui::layout::Direction::Horizontal)
            .constraints([
                ratatui::layout::Constraint::Percentage((100 - percent_x) / 2),
                ratatui::layout::Constraint::Percentage(percent_x),
                ratatui::layout::Constraint::Percentage((100 - percent_x) / 2),
            ])
            .split(popup_layout[1])[1]
    }
}

#[cfg(test)]
mod tests {
    use crate::app::{App, BUSY_PLACEHOLDER};
    use crate::Config;
    use codehelper_agent::CredentialStore;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn screen(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).expect("terminal");
        terminal.draw(|frame| app.render(frame)).expect("draw");
        let buffer = terminal.backend().buffer().clone();
        buffer.content.iter().map(|cell| cell.symbol()).collect()
    }

    #[test]
    fn draws_button_and_masked_key() {
        let dir = tempfile::tempdir().expect("temp dir");
        let mut app = App::new(Config::default(), CredentialStore::at(dir.path()));
        app.credential_input.set("AIzaSecret1234");

        let text = screen(&mut app);
        assert!(text.contains("[ Get Help ]"));
        assert!(text.contains("1234"));
        assert!(!text.contains("AIzaSecret"));
    }

    #[test]
    fn draws_busy_placeholder() {
        let dir = tempfile::tempdir().expect("temp dir");
        let mut app = App::new(Config::default(), CredentialStore::at(dir.path()));
        app.suggestion = BUSY_PLACEHOLDER.to_string();
        app.help_enabled = false;

        let text = screen(&mut app);
        assert!(text.contains(BUSY_PLACEHOLDER));
    }
}
