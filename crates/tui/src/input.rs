const MASK: char = '•';
const VISIBLE_TAIL: usize = 4;

/// Single-line text field holding the API key being edited.
pub struct InputState {
    pub buffer: String,
    cursor_position: usize,
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

impl InputState {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            cursor_position: 0,
        }
    }

    pub fn set(&mut self, value: &str) {
        self.buffer = value.to_string();
        self.cursor_position = self.buffer.len();
    }

    pub fn handle_char(&mut self, c: char) {
        self.buffer.push(c);
        self.cursor_position = self.buffer.len();
    }

    pub fn handle_backspace(&mut self) {
        if !self.buffer.is_empty() {
            self.buffer.pop();
            self.cursor_position = self.buffer.len();
        }
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.cursor_position = 0;
    }

    pub fn cursor_position(&self) -> usize {
        self.cursor_position
    }

    /// The buffer with everything but the last few characters masked.
    pub fn masked(&self) -> String {
        let count = self.buffer.chars().count();
        let hidden = count.saturating_sub(VISIBLE_TAIL);
        self.buffer
            .chars()
            .enumerate()
            .map(|(i, c)| if i < hidden { MASK } else { c })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typing_and_backspace_edit_the_buffer() {
        let mut input = InputState::new();
        for c in "abc".chars() {
            input.handle_char(c);
        }
        input.handle_backspace();
        assert_eq!(input.buffer, "ab");
        assert_eq!(input.cursor_position(), 2);
    }

    #[test]
    fn masks_all_but_the_tail() {
        let mut input = InputState::new();
        input.set("AIzaSy1234");
        assert_eq!(input.masked(), "••••••1234");
        input.set("abc");
        assert_eq!(input.masked(), "abc");
    }
}
