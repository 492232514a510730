//! UTF-8 safe single-line text buffer with a cursor.
//!
//! The controller edits through this buffer so key events can be applied
//! without the host owning a text widget. The cursor is a byte index that
//! always sits on a character boundary.

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TextInputState {
    text: String,
    cursor: usize,
}

impl TextInputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Text before the cursor, used by views to place the caret.
    pub fn before_cursor(&self) -> &str {
        &self.text[..self.cursor]
    }

    /// Replace the whole text and park the cursor at the end.
    pub fn replace(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.cursor = self.text.len();
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    fn prev_char_len(&self) -> Option<usize> {
        self.text[..self.cursor].chars().next_back().map(char::len_utf8)
    }

    fn next_char_len(&self) -> Option<usize> {
        self.text[self.cursor..].chars().next().map(char::len_utf8)
    }

    pub fn move_left(&mut self) {
        if let Some(len) = self.prev_char_len() {
            self.cursor -= len;
        }
    }

    pub fn move_right(&mut self) {
        if let Some(len) = self.next_char_len() {
            self.cursor += len;
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.text.len();
    }

    pub fn insert_char(&mut self, c: char) {
        self.text.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    /// Delete the character before the cursor. Returns `false` when there
    /// was nothing to delete.
    pub fn backspace(&mut self) -> bool {
        let Some(len) = self.prev_char_len() else {
            return false;
        };
        let start = self.cursor - len;
        self.text.drain(start..self.cursor);
        self.cursor = start;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utf8_move_insert_backspace() {
        let mut input = TextInputState::new();
        input.replace("h🙂llo");
        input.move_home();
        input.move_right();
        input.insert_char('e');
        assert_eq!(input.text(), "he🙂llo");
        input.move_right();
        assert!(input.backspace());
        assert_eq!(input.text(), "hello");
        assert_eq!(input.before_cursor(), "he");
    }

    #[test]
    fn replace_parks_cursor_at_end() {
        let mut input = TextInputState::new();
        input.replace("Banana");
        assert_eq!(input.cursor(), 6);
        input.insert_char('s');
        assert_eq!(input.text(), "Bananas");
    }

    #[test]
    fn backspace_at_start_reports_nothing_deleted() {
        let mut input = TextInputState::new();
        assert!(!input.backspace());
        input.replace("ab");
        input.move_home();
        assert!(!input.backspace());
        assert_eq!(input.text(), "ab");
    }

    #[test]
    fn cursor_moves_stop_at_the_edges() {
        let mut input = TextInputState::new();
        input.replace("é");
        input.move_right();
        assert_eq!(input.cursor(), 2);
        input.move_left();
        input.move_left();
        assert_eq!(input.cursor(), 0);
        input.move_end();
        assert_eq!(input.cursor(), 2);
        input.clear();
        assert!(input.is_empty());
        assert_eq!(input.cursor(), 0);
    }
}
