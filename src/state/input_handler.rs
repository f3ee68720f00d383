//! Search input editing (pure state transitions).
//!
//! All functions take the buffer by value and return the updated buffer.
//! The cursor is a character index, never a byte index.

/// Text of a search input plus the cursor position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputBuffer {
    text: String,
    cursor: usize,
}

impl InputBuffer {
    /// Buffer holding `text` with the cursor at the end.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let cursor = text.chars().count();
        Self { text, cursor }
    }

    /// Current text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Cursor position in characters.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// True when there is no text.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    fn byte_offset(&self, char_index: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_index)
            .map(|(i, _)| i)
            .unwrap_or(self.text.len())
    }

    fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Insert a character at the cursor and advance.
pub fn handle_char_input(mut buffer: InputBuffer, ch: char) -> InputBuffer {
    let at = buffer.byte_offset(buffer.cursor);
    buffer.text.insert(at, ch);
    buffer.cursor += 1;
    buffer
}

/// Delete the character before the cursor. No-op at position 0.
pub fn handle_backspace(mut buffer: InputBuffer) -> InputBuffer {
    if buffer.cursor > 0 {
        let at = buffer.byte_offset(buffer.cursor - 1);
        buffer.text.remove(at);
        buffer.cursor -= 1;
    }
    buffer
}

/// Delete the character under the cursor. No-op at the end.
pub fn handle_delete(mut buffer: InputBuffer) -> InputBuffer {
    if buffer.cursor < buffer.char_len() {
        let at = buffer.byte_offset(buffer.cursor);
        buffer.text.remove(at);
    }
    buffer
}

/// Saturates at 0.
pub fn handle_cursor_left(mut buffer: InputBuffer) -> InputBuffer {
    buffer.cursor = buffer.cursor.saturating_sub(1);
    buffer
}

/// Saturates at the text length.
pub fn handle_cursor_right(mut buffer: InputBuffer) -> InputBuffer {
    buffer.cursor = (buffer.cursor + 1).min(buffer.char_len());
    buffer
}

/// Move the cursor to the start.
pub fn handle_home(mut buffer: InputBuffer) -> InputBuffer {
    buffer.cursor = 0;
    buffer
}

/// Move the cursor past the last character.
pub fn handle_end(mut buffer: InputBuffer) -> InputBuffer {
    buffer.cursor = buffer.char_len();
    buffer
}

/// Empty buffer, cursor at 0.
pub fn clear_input(_buffer: InputBuffer) -> InputBuffer {
    InputBuffer::default()
}
