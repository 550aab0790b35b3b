//! Test utilities for parley-tui rendering and integration tests.
//!
//! Helpers for creating test apps, rendering screens into buffers, and
//! converting buffers to strings for assertions.

use crate::app::App;
use crate::screens::Screen as ScreenTrait;
use parley_core::{Conversation, Message};
use ratatui::{backend::TestBackend, buffer::Buffer, layout::Rect, Terminal};

/// Default terminal width for tests.
pub const TEST_WIDTH: u16 = 80;

/// Default terminal height for tests.
pub const TEST_HEIGHT: u16 = 24;

/// Create a test terminal with the default dimensions (80x24).
pub fn create_test_terminal() -> Terminal<TestBackend> {
    let backend = TestBackend::new(TEST_WIDTH, TEST_HEIGHT);
    Terminal::new(backend).expect("Failed to create test terminal")
}

/// Create a test app with an empty store.
pub fn create_test_app() -> App {
    App::new()
}

/// Create a test app with a short transcript in progress.
pub fn create_test_app_with_messages() -> App {
    let mut app = App::new();
    app.store.add_message(Message::user("Hello there".to_string()));
    app.store
        .add_message(Message::assistant("Hi! How can I help?".to_string()));
    app.store.set_conversation_id(Some(7));
    app
}

/// Create a test app with a cached conversation list and open sidebar.
pub fn create_test_app_with_sidebar() -> App {
    let mut app = create_test_app_with_messages();
    app.store.set_conversations(vec![
        Conversation {
            id: 7,
            title: Some("Trip planning".to_string()),
            created_at: None,
        },
        Conversation {
            id: 8,
            title: None,
            created_at: None,
        },
    ]);
    app.sidebar_open = true;
    app
}

/// Convert a buffer to a string representation for assertions.
pub fn buffer_to_string(buffer: &Buffer) -> String {
    let area = buffer.area;
    let mut result = String::new();

    for y in area.y..area.y + area.height {
        for x in area.x..area.x + area.width {
            let cell = buffer.cell((x, y)).unwrap();
            result.push_str(cell.symbol());
        }
        // Trim trailing whitespace from each line
        while result.ends_with(' ') {
            result.pop();
        }
        result.push('\n');
    }

    // Remove trailing newline
    if result.ends_with('\n') {
        result.pop();
    }

    result
}

/// Render a screen to a buffer and return it as a string.
pub fn render_screen_to_string<S: ScreenTrait>(screen: &S, app: &App) -> String {
    let area = Rect::new(0, 0, TEST_WIDTH, TEST_HEIGHT);
    let mut buffer = Buffer::empty(area);
    screen.render(app, area, &mut buffer);
    buffer_to_string(&buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_test_terminal() {
        let terminal = create_test_terminal();
        let size = terminal.size().unwrap();
        assert_eq!(size.width, TEST_WIDTH);
        assert_eq!(size.height, TEST_HEIGHT);
    }

    #[test]
    fn test_buffer_to_string() {
        let area = Rect::new(0, 0, 10, 3);
        let mut buffer = Buffer::empty(area);
        buffer.set_string(0, 0, "Hello", ratatui::style::Style::default());
        buffer.set_string(0, 1, "World", ratatui::style::Style::default());

        let result = buffer_to_string(&buffer);
        assert!(result.contains("Hello"));
        assert!(result.contains("World"));
    }
}
