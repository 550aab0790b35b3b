//! Layout helpers for the parley TUI.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Create a centered rect with fixed dimensions.
pub fn centered_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

/// Create the main layout with status bar at bottom.
pub fn main_layout(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(area);
    (chunks[0], chunks[1])
}

/// Split the content area into sidebar (left) and chat (right).
pub fn sidebar_layout(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(28), Constraint::Min(20)])
        .split(area);
    (chunks[0], chunks[1])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_fixed_clamps_to_area() {
        let area = Rect::new(0, 0, 20, 10);
        let rect = centered_fixed(40, 40, area);
        assert!(rect.width <= area.width);
        assert!(rect.height <= area.height);
    }

    #[test]
    fn test_main_layout_reserves_status_row() {
        let (content, status) = main_layout(Rect::new(0, 0, 80, 24));
        assert_eq!(content.height, 23);
        assert_eq!(status.height, 1);
        assert_eq!(status.y, 23);
    }

    #[test]
    fn test_sidebar_layout_widths() {
        let (sidebar, chat) = sidebar_layout(Rect::new(0, 0, 80, 23));
        assert_eq!(sidebar.width, 28);
        assert_eq!(chat.width, 52);
    }
}
