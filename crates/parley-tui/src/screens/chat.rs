//! Chat screen - transcript, message input, and conversation sidebar.

use crate::app::App;
use crate::screens::Screen;
use crate::ui::theme::Styles;
use crate::ui::widgets::{KeyHint, StatusLine};
use crate::ui::{main_layout, sidebar_layout};
use parley_core::Role;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

/// The main chat screen.
pub struct ChatScreen;

impl Screen for ChatScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        let (main_area, status_area) = main_layout(area);

        // Sidebar takes a fixed column on the left when open
        let chat_area = if app.sidebar_open {
            let (sidebar_area, chat_area) = sidebar_layout(main_area);
            render_sidebar(app, sidebar_area, buf);
            chat_area
        } else {
            main_area
        };

        // Split chat column into transcript and input
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(5), Constraint::Length(3)])
            .split(chat_area);

        render_transcript(app, chunks[0], buf);
        render_input(app, chunks[1], buf);

        // Status line
        let hints = [
            KeyHint::new("Enter", "Send"),
            KeyHint::new("Tab", "Conversations"),
            KeyHint::new("Ctrl+N", "New"),
            KeyHint::new("Esc", "Quit"),
        ];
        StatusLine::new(&hints)
            .notice(app.notification.as_deref())
            .conversation(app.store.conversation_id)
            .sending(app.store.loading.then(|| app.spinner()))
            .render(status_area, buf);
    }
}

fn render_sidebar(app: &App, area: Rect, buf: &mut Buffer) {
    let block = Block::default()
        .title(" Conversations ")
        .title_style(Styles::title())
        .borders(Borders::ALL)
        .border_style(Styles::border_active())
        .style(Styles::default());

    let inner = block.inner(area);
    block.render(area, buf);

    if app.store.conversations.is_empty() {
        let hint = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(" No conversations yet.", Styles::dim())),
        ])
        .style(Styles::default());
        hint.render(inner, buf);
        return;
    }

    let mut lines = Vec::new();
    for (i, conversation) in app.store.conversations.iter().enumerate() {
        let selected = i == app.sidebar_selected;
        let marker = if selected { "> " } else { "  " };
        let style = if selected {
            Styles::highlight()
        } else {
            Styles::default()
        };
        lines.push(Line::from(Span::styled(
            format!("{marker}{}", conversation.display_title()),
            style,
        )));
        if let Some(created) = conversation.created_at {
            lines.push(Line::from(Span::styled(
                format!("    {}", created.format("%Y-%m-%d %H:%M")),
                Styles::dim(),
            )));
        }
    }

    // Keep the selection visible
    let visible = usize::from(inner.height);
    let skip = lines.len().saturating_sub(visible).min(
        app.sidebar_selected
            .saturating_sub(visible.saturating_sub(1) / 2),
    );
    let visible_lines: Vec<Line<'_>> = lines.into_iter().skip(skip).collect();

    Paragraph::new(visible_lines)
        .style(Styles::default())
        .render(inner, buf);
}

fn render_transcript(app: &App, area: Rect, buf: &mut Buffer) {
    let block = Block::default()
        .title(" Conversation ")
        .title_style(Styles::title())
        .borders(Borders::ALL)
        .border_style(Styles::border())
        .style(Styles::default());

    let inner = block.inner(area);
    block.render(area, buf);

    if app.store.messages.is_empty() && !app.store.loading {
        let hint = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "  Start chatting with the assistant!",
                Styles::highlight(),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "  Type a message below and press Enter.",
                Styles::dim(),
            )),
        ])
        .style(Styles::default());
        hint.render(inner, buf);
        return;
    }

    let mut lines = Vec::new();
    for msg in &app.store.messages {
        let (speaker, style) = match msg.role {
            Role::User => ("You", Styles::user()),
            Role::Assistant => ("Assistant", Styles::active()),
        };

        let stamp = msg
            .timestamp
            .map(|t| format!(" {}", t.format("%H:%M")))
            .unwrap_or_default();

        let content_lines: Vec<&str> = msg.content.lines().collect();
        if let Some(first) = content_lines.first() {
            lines.push(Line::from(vec![
                Span::styled(format!("{speaker}{stamp}: "), style),
                Span::styled(*first, Styles::default()),
            ]));
        }
        for line in content_lines.iter().skip(1) {
            lines.push(Line::from(Span::styled(
                format!("  {line}"),
                Styles::default(),
            )));
        }
        lines.push(Line::from("")); // Blank line between messages
    }

    // Typing indicator while a send is in flight
    if app.store.loading {
        lines.push(Line::from(Span::styled(
            format!("  {} Assistant is typing...", app.spinner()),
            Styles::dim(),
        )));
    }

    // Apply scroll offset, clamped so the last page stays full
    let max_scroll = lines.len().saturating_sub(usize::from(inner.height));
    let visible_lines: Vec<Line<'_>> = lines
        .into_iter()
        .skip(app.transcript_scroll.min(max_scroll))
        .collect();

    Paragraph::new(visible_lines)
        .style(Styles::default())
        .wrap(Wrap { trim: false })
        .render(inner, buf);
}

fn render_input(app: &App, area: Rect, buf: &mut Buffer) {
    let block = Block::default()
        .title(" Message ")
        .title_style(Styles::title())
        .borders(Borders::ALL)
        .border_style(if app.store.loading || app.sidebar_open {
            Styles::dim()
        } else {
            Styles::border_active()
        })
        .style(Styles::default());

    let inner = block.inner(area);
    block.render(area, buf);

    let input = app
        .input_state
        .widget()
        .focused(!app.store.loading && !app.sidebar_open)
        .placeholder("Type your message...");

    input.render(inner, buf);
}

/// Confirmation overlay shown before discarding the current transcript.
pub struct NewChatConfirmScreen;

impl Screen for NewChatConfirmScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        // Render the chat screen behind the overlay
        ChatScreen.render(app, area, buf);
        render_new_chat_overlay(app, area, buf);
    }
}

fn render_new_chat_overlay(app: &App, area: Rect, buf: &mut Buffer) {
    use crate::ui::centered_fixed;
    use ratatui::widgets::Clear;

    let width = 52.min(area.width.saturating_sub(4));
    let height = 9.min(area.height.saturating_sub(4));
    let overlay_area = centered_fixed(width, height, area);

    Clear.render(overlay_area, buf);

    let block = Block::default()
        .title(" New Conversation ")
        .title_style(Styles::title())
        .borders(Borders::ALL)
        .border_style(Styles::border_active())
        .style(Styles::default());

    let inner = block.inner(overlay_area);
    block.render(overlay_area, buf);

    let count = app.store.messages.len();
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("  The current transcript ({count} messages) will"),
            Styles::default(),
        )),
        Line::from(Span::styled(
            "  be cleared from this session.",
            Styles::default(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("  ", Styles::default()),
            Span::styled("[Enter]", Styles::key_hint()),
            Span::styled(" Start new   ", Styles::default()),
            Span::styled("[Esc]", Styles::key_hint()),
            Span::styled(" Cancel", Styles::default()),
        ]),
    ];

    Paragraph::new(lines).style(Styles::default()).render(inner, buf);
}
