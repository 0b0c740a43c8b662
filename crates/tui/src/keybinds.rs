pub struct Keybinds;

impl Default for Keybinds {
    fn default() -> Self {
        Self
    }
}

impl Keybinds {
    pub fn help_text(&self) -> String {
        r#"Keyboard Shortcuts:

Help:
  Ctrl + G      Get help for the current exercise
  Enter         Get help (when the button is focused)
  Ctrl + R      Reload the exercise page

API key:
  Tab           Switch between key field and button
  Enter         Save key (when the field is focused)
  Ctrl + S      Save key
  Ctrl + U      Clear the key field

Suggestion:
  ↑ / ↓         Scroll
  PgUp / PgDn   Scroll faster

General:
  F1 / ?        Toggle this help
  Esc           Close help / quit
  Ctrl + Q      Quit
"#
        .to_string()
    }
}
