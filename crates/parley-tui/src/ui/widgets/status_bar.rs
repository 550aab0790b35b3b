//! Bottom status line for the chat screen.

use crate::ui::theme::{Palette, Styles};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::Widget,
};
use unicode_width::UnicodeWidthStr;

/// A key binding advertised in the status line.
#[derive(Debug, Clone, Copy)]
pub struct KeyHint {
    pub key: &'static str,
    pub label: &'static str,
}

impl KeyHint {
    pub const fn new(key: &'static str, label: &'static str) -> Self {
        Self { key, label }
    }
}

/// One-row status line: app chip and key bindings on the left, session
/// state on the right.
///
/// The right side shows, in priority order: an active notification, the
/// sending indicator, or the conversation label.
#[derive(Debug, Clone)]
pub struct StatusLine<'a> {
    hints: &'a [KeyHint],
    notice: Option<&'a str>,
    conversation_id: Option<i64>,
    spinner: Option<&'static str>,
}

impl<'a> StatusLine<'a> {
    pub fn new(hints: &'a [KeyHint]) -> Self {
        Self {
            hints,
            notice: None,
            conversation_id: None,
            spinner: None,
        }
    }

    /// Show a transient notification instead of the session state.
    #[must_use]
    pub fn notice(mut self, notice: Option<&'a str>) -> Self {
        self.notice = notice;
        self
    }

    /// Label the active conversation (None reads "new conversation").
    #[must_use]
    pub fn conversation(mut self, id: Option<i64>) -> Self {
        self.conversation_id = id;
        self
    }

    /// Show a sending indicator with the given spinner frame.
    #[must_use]
    pub fn sending(mut self, frame: Option<&'static str>) -> Self {
        self.spinner = frame;
        self
    }

    fn session_state(&self) -> String {
        if let Some(notice) = self.notice {
            return notice.to_string();
        }
        if let Some(frame) = self.spinner {
            return format!("{frame} sending");
        }
        match self.conversation_id {
            Some(id) => format!("conversation #{id}"),
            None => "new conversation".to_string(),
        }
    }
}

impl Widget for StatusLine<'_> {
    #[allow(clippy::cast_possible_truncation)]
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 1 {
            return;
        }

        for x in area.x..area.x.saturating_add(area.width) {
            buf[(x, area.y)].set_char(' ').set_bg(Palette::STATUS_BG);
        }

        let mut spans = vec![Span::styled(
            " parley ",
            Styles::default().bg(Palette::ACCENT).fg(Palette::BG),
        )];
        for hint in self.hints {
            spans.push(Span::styled(format!("  {}", hint.key), Styles::key_hint()));
            spans.push(Span::styled(format!(" {}", hint.label), Styles::key_label()));
        }
        buf.set_line(area.x, area.y, &Line::from(spans), area.width);

        let state = self.session_state();
        let state_width = state.width() as u16;
        if state_width < area.width {
            let x = area.x + area.width - state_width - 1;
            buf.set_string(x, area.y, &state, Styles::status_bar());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::buffer_to_string;

    fn render_line(line: StatusLine<'_>) -> String {
        let area = Rect::new(0, 0, 60, 1);
        let mut buf = Buffer::empty(area);
        line.render(area, &mut buf);
        buffer_to_string(&buf)
    }

    #[test]
    fn test_hints_and_chip_render() {
        let hints = [KeyHint::new("Enter", "Send"), KeyHint::new("Tab", "List")];
        let rendered = render_line(StatusLine::new(&hints));
        assert!(rendered.contains("parley"));
        assert!(rendered.contains("Enter"));
        assert!(rendered.contains("Send"));
        assert!(rendered.contains("new conversation"));
    }

    #[test]
    fn test_conversation_label() {
        let rendered = render_line(StatusLine::new(&[]).conversation(Some(7)));
        assert!(rendered.contains("conversation #7"));
    }

    #[test]
    fn test_sending_indicator_hides_conversation_label() {
        let rendered = render_line(
            StatusLine::new(&[])
                .conversation(Some(7))
                .sending(Some("|")),
        );
        assert!(rendered.contains("| sending"));
        assert!(!rendered.contains("conversation #7"));
    }

    #[test]
    fn test_notice_takes_priority() {
        let rendered = render_line(
            StatusLine::new(&[])
                .conversation(Some(7))
                .sending(Some("|"))
                .notice(Some("saved")),
        );
        assert!(rendered.contains("saved"));
        assert!(!rendered.contains("sending"));
        assert!(!rendered.contains("conversation #7"));
    }
}
