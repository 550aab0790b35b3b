//! Message input widget.

use crate::ui::theme::Styles;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

/// A single-field text input with a visible cursor.
#[derive(Debug, Clone)]
pub struct TextInput<'a> {
    /// The text content.
    content: String,
    /// Cursor position (character index).
    cursor: usize,
    /// Whether the input is focused.
    focused: bool,
    /// Placeholder text.
    placeholder: Option<&'a str>,
    /// Prompt prefix.
    prompt: &'a str,
}

impl<'a> TextInput<'a> {
    /// Create a new text input.
    pub fn new(content: impl Into<String>) -> Self {
        let content = content.into();
        let cursor = content.chars().count();
        Self {
            content,
            cursor,
            focused: true,
            placeholder: None,
            prompt: "> ",
        }
    }

    /// Set focus state.
    #[must_use]
    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    /// Set placeholder text.
    #[must_use]
    pub fn placeholder(mut self, placeholder: &'a str) -> Self {
        self.placeholder = Some(placeholder);
        self
    }
}

impl Widget for TextInput<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 1 || area.width < 1 {
            return;
        }

        // Show placeholder if empty
        if self.content.is_empty() {
            let mut spans = vec![Span::styled(self.prompt, Styles::active())];
            if self.focused {
                spans.push(Span::styled("_", Styles::active()));
            }
            if let Some(placeholder) = self.placeholder {
                spans.push(Span::styled(placeholder, Styles::dim()));
            }
            Paragraph::new(vec![Line::from(spans)]).render(area, buf);
            return;
        }

        // Render content with an inline cursor marker
        let mut line = self.prompt.to_string();
        let mut cursor_drawn = false;
        for (i, ch) in self.content.chars().enumerate() {
            if self.focused && i == self.cursor && !cursor_drawn {
                line.push('|');
                cursor_drawn = true;
            }
            line.push(ch);
        }
        if self.focused && !cursor_drawn {
            line.push('_');
        }

        Paragraph::new(vec![Line::from(line)])
            .style(Styles::default())
            .render(area, buf);
    }
}

/// State for a text input, managing content, cursor, and submit history.
#[derive(Debug, Clone, Default)]
pub struct TextInputState {
    /// The text content.
    content: String,
    /// Cursor position (character index).
    cursor: usize,
    /// Submitted drafts for up/down recall.
    history: Vec<String>,
    /// Current history index (-1 = current input).
    history_index: isize,
    /// Saved current input when navigating history.
    saved_input: String,
}

impl TextInputState {
    /// Create a new empty text input state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the current content.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Check if the content is empty.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Clear the content.
    pub fn clear(&mut self) {
        self.content.clear();
        self.cursor = 0;
    }

    /// Byte offset of the cursor within the content.
    fn byte_offset(&self) -> usize {
        self.content
            .char_indices()
            .nth(self.cursor)
            .map_or(self.content.len(), |(i, _)| i)
    }

    fn char_count(&self) -> usize {
        self.content.chars().count()
    }

    /// Insert a character at the cursor position.
    pub fn insert(&mut self, ch: char) {
        let at = self.byte_offset();
        self.content.insert(at, ch);
        self.cursor += 1;
    }

    /// Insert a string at the cursor position.
    pub fn insert_str(&mut self, s: &str) {
        let at = self.byte_offset();
        self.content.insert_str(at, s);
        self.cursor += s.chars().count();
    }

    /// Delete the character before the cursor (backspace).
    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let at = self.byte_offset();
            self.content.remove(at);
        }
    }

    /// Delete the character at the cursor (delete).
    pub fn delete(&mut self) {
        if self.cursor < self.char_count() {
            let at = self.byte_offset();
            self.content.remove(at);
        }
    }

    /// Move cursor left.
    pub fn move_left(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
        }
    }

    /// Move cursor right.
    pub fn move_right(&mut self) {
        if self.cursor < self.char_count() {
            self.cursor += 1;
        }
    }

    /// Move cursor to start.
    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    /// Move cursor to end.
    pub fn move_end(&mut self) {
        self.cursor = self.char_count();
    }

    /// Take the content, recording non-blank drafts in history.
    pub fn submit(&mut self) -> String {
        let content = std::mem::take(&mut self.content);
        self.cursor = 0;
        if !content.trim().is_empty() {
            self.history.push(content.clone());
        }
        self.history_index = -1;
        self.saved_input.clear();
        content
    }

    /// Navigate to the previous history entry.
    pub fn history_prev(&mut self) {
        if self.history.is_empty() {
            return;
        }

        // Save current input if at the bottom
        if self.history_index == -1 {
            self.saved_input = self.content.clone();
        }

        let new_index = self.history_index + 1;
        #[allow(clippy::cast_sign_loss)]
        if (new_index as usize) < self.history.len() {
            self.history_index = new_index;
            #[allow(clippy::cast_sign_loss)]
            {
                self.content = self.history[self.history.len() - 1 - new_index as usize].clone();
            }
            self.cursor = self.char_count();
        }
    }

    /// Navigate to the next history entry.
    pub fn history_next(&mut self) {
        if self.history_index <= 0 {
            // Restore saved input
            if self.history_index == 0 {
                self.content = std::mem::take(&mut self.saved_input);
                self.cursor = self.char_count();
            }
            self.history_index = -1;
            return;
        }

        self.history_index -= 1;
        #[allow(clippy::cast_sign_loss)]
        {
            self.content =
                self.history[self.history.len() - 1 - self.history_index as usize].clone();
        }
        self.cursor = self.char_count();
    }

    /// Create a widget from this state.
    pub fn widget(&self) -> TextInput<'_> {
        let mut input = TextInput::new(self.content.clone());
        input.cursor = self.cursor;
        input
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_editing() {
        let mut state = TextInputState::new();
        assert!(state.is_empty());

        state.insert('H');
        state.insert('i');
        assert_eq!(state.content(), "Hi");

        state.backspace();
        assert_eq!(state.content(), "H");

        state.clear();
        assert!(state.is_empty());
    }

    #[test]
    fn test_cursor_movement() {
        let mut state = TextInputState::new();
        state.insert_str("Hello");

        state.move_left();
        state.move_left();
        state.insert('X');
        assert_eq!(state.content(), "HelXlo");

        state.move_home();
        state.delete();
        assert_eq!(state.content(), "elXlo");

        state.move_end();
        state.backspace();
        assert_eq!(state.content(), "elXl");
    }

    #[test]
    fn test_multibyte_editing() {
        let mut state = TextInputState::new();
        state.insert_str("héllo");
        state.move_home();
        state.move_right();
        state.move_right();
        state.backspace();
        assert_eq!(state.content(), "hllo");
    }

    #[test]
    fn test_history_recall() {
        let mut state = TextInputState::new();

        state.insert_str("first");
        state.submit();
        assert!(state.is_empty());

        state.insert_str("second");
        state.submit();

        state.history_prev();
        assert_eq!(state.content(), "second");

        state.history_prev();
        assert_eq!(state.content(), "first");

        state.history_next();
        assert_eq!(state.content(), "second");
    }

    #[test]
    fn test_blank_submit_not_recorded() {
        let mut state = TextInputState::new();
        state.insert_str("   ");
        state.submit();
        state.history_prev();
        assert!(state.is_empty());
    }
}
