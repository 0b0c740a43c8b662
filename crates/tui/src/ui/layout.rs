use ratatui::layout::{Constraint, Direction, Layout, Rect};

use super::panel::{Panel, PanelType};

const TOPBAR_HEIGHT: u16 = 1;
const CREDENTIAL_HEIGHT: u16 = 4;
const CONTROLS_HEIGHT: u16 = 3;
const MIN_SUGGESTION_HEIGHT: u16 = 5;

#[derive(Default)]
pub struct LayoutState {
    cached_panels: Vec<Panel>,
}

impl LayoutState {
    pub fn calculate_layout(&mut self, area: Rect) -> &[Panel] {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(TOPBAR_HEIGHT),
                Constraint::Length(CREDENTIAL_HEIGHT),
                Constraint::Min(MIN_SUGGESTION_HEIGHT),
                Constraint::Length(CONTROLS_HEIGHT),
            ])
            .split(area);

        self.cached_panels = vec![
            Panel {
                panel_type: PanelType::Topbar,
                rect: rows[0],
            },
            Panel {
                panel_type: PanelType::Credential,
                rect: rows[1],
            },
            Panel {
                panel_type: PanelType::Suggestion,
                rect: rows[2],
            },
            Panel {
                panel_type: PanelType::Controls,
                rect: rows[3],
            },
        ];

        &self.cached_panels
    }

    pub fn get_panels(&self) -> &[Panel] {
        &self.cached_panels
    }

    pub fn suggestion_height(&self) -> u16 {
        self.cached_panels
            .iter()
            .find(|p| matches!(p.panel_type, PanelType::Suggestion))
            .map(|p| p.rect.height.saturating_sub(2))
            .unwrap_or(0)
    }
}
