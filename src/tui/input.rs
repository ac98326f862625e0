//! Single-line text input for prompts inside the terminal user interface.

/// A text input with a character-indexed cursor and an optional length cap.
#[derive(Clone, Debug, Default)]
pub struct InputField {
    pub value: String,
    /// Cursor position in characters, not bytes.
    pub cursor: usize,
    pub active: bool,
    max_len: Option<usize>,
}

impl InputField {
    /// Input that refuses characters past `max_len`.
    pub fn with_limit(max_len: usize) -> Self {
        Self {
            max_len: Some(max_len),
            ..Self::default()
        }
    }

    /// Start editing with an empty value.
    pub fn open(&mut self) {
        self.value.clear();
        self.cursor = 0;
        self.active = true;
    }

    /// Stop editing and hand back what was typed.
    pub fn take(&mut self) -> String {
        self.active = false;
        self.cursor = 0;
        std::mem::take(&mut self.value)
    }

    pub fn cancel(&mut self) {
        self.take();
    }

    fn byte_index(&self, chars: usize) -> usize {
        self.value
            .char_indices()
            .nth(chars)
            .map(|(i, _)| i)
            .unwrap_or(self.value.len())
    }

    fn char_len(&self) -> usize {
        self.value.chars().count()
    }

    /// Insert a character at the current cursor position.
    pub fn handle_char(&mut self, c: char) {
        if self.max_len.is_some_and(|max| self.char_len() >= max) {
            return;
        }
        let at = self.byte_index(self.cursor);
        self.value.insert(at, c);
        self.cursor += 1;
    }

    /// Delete the character before the cursor.
    pub fn handle_backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let at = self.byte_index(self.cursor);
            self.value.remove(at);
        }
    }

    /// Delete the character at the cursor position.
    pub fn handle_delete(&mut self) {
        if self.cursor < self.char_len() {
            let at = self.byte_index(self.cursor);
            self.value.remove(at);
        }
    }

    pub fn move_cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor < self.char_len() {
            self.cursor += 1;
        }
    }
}
