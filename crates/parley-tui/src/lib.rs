//! parley-tui: Terminal UI for the parley chat client
//!
//! This crate provides the TUI layer for parley, including:
//! - The chat screen with transcript, input, and conversation sidebar
//! - The event loop that drives sends and history fetches
//! - Shared widgets (text input, status bar)

mod app;
mod event;
mod screens;
#[cfg(test)]
pub mod test_utils;
mod ui;

use screens::Screen as ScreenTrait;

pub use app::{App, Screen};
pub use event::{Action, Event, EventHandler};
pub use parley_core;

use crossterm::{
    cursor::Show as ShowCursor,
    event::{
        DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use parley_core::{
    finish_send, ApiError, ChatBackend, ChatReply, ClientConfig, Conversation, HttpApiClient,
    Message,
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, stdout};
use tokio::task::JoinHandle;

/// RAII guard for terminal state restoration.
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(
            stdout(),
            DisableMouseCapture,
            DisableBracketedPaste,
            LeaveAlternateScreen,
            ShowCursor
        );
    }
}

/// Run the TUI application.
///
/// This is the main entry point for the TUI. It sets up the terminal,
/// runs the event loop, and restores the terminal on exit.
pub async fn run_tui(config: ClientConfig) -> Result<(), Box<dyn std::error::Error>> {
    // Build the API client before touching the terminal so a bad config
    // fails with a readable error
    let client = HttpApiClient::new(&config)?;

    // Setup terminal with RAII guard for cleanup
    enable_raw_mode()?;
    let _guard = TerminalGuard;

    let mut stdout = stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableBracketedPaste
    )?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new();

    // Create event handler (4 Hz tick rate = 250ms)
    let mut events = EventHandler::new(250);

    // Main loop
    let result = run_loop(&mut terminal, &mut app, &mut events, client).await;

    // Restore cursor before guard drops
    terminal.show_cursor()?;

    result
}

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &mut EventHandler,
    client: HttpApiClient,
) -> Result<(), Box<dyn std::error::Error>> {
    // At most one of each request kind is in flight at a time
    let mut send_handle: Option<JoinHandle<Result<ChatReply, ApiError>>> = None;
    let mut list_handle: Option<JoinHandle<Result<Vec<Conversation>, ApiError>>> = None;
    let mut load_handle: Option<JoinHandle<(i64, Result<Vec<Message>, ApiError>)>> = None;

    loop {
        // Draw
        terminal.draw(|frame| {
            let area = frame.area();
            let buf = frame.buffer_mut();

            match app.screen {
                app::Screen::Chat => {
                    screens::chat::ChatScreen.render(app, area, buf);
                }
                app::Screen::NewChatConfirm => {
                    screens::chat::NewChatConfirmScreen.render(app, area, buf);
                }
            }

            // Render help overlay if visible
            if app.show_help {
                screens::render_help_overlay(area, buf);
            }
        })?;

        // Check for a completed send (non-blocking)
        if send_handle.as_ref().is_some_and(JoinHandle::is_finished) {
            if let Some(handle) = send_handle.take() {
                match handle.await {
                    Ok(result) => {
                        finish_send(&mut app.store, result);
                        app.scroll_transcript_to_bottom();
                    }
                    Err(_) => app.store.set_loading(false),
                }
            }
        }

        // Check for a completed conversation-list fetch
        if list_handle.as_ref().is_some_and(JoinHandle::is_finished) {
            if let Some(handle) = list_handle.take() {
                if let Ok(result) = handle.await {
                    app.apply_conversations(result);
                }
            }
        }

        // Check for a completed history fetch
        if load_handle.as_ref().is_some_and(JoinHandle::is_finished) {
            if let Some(handle) = load_handle.take() {
                if let Ok((id, result)) = handle.await {
                    app.apply_loaded_history(id, result);
                }
            }
        }

        // Spawn work the handlers queued up
        if let Some(message) = app.pending_send.take() {
            let client = client.clone();
            let conversation_id = app.store.conversation_id;
            send_handle = Some(tokio::spawn(async move {
                client.send_message(&message, conversation_id).await
            }));
        }
        if app.want_conversations && list_handle.is_none() {
            app.want_conversations = false;
            let client = client.clone();
            list_handle = Some(tokio::spawn(
                async move { client.list_conversations().await },
            ));
        }
        if load_handle.is_none() {
            if let Some(id) = app.pending_load.take() {
                let client = client.clone();
                load_handle = Some(tokio::spawn(async move {
                    (id, client.fetch_conversation(id).await)
                }));
            }
        }

        // Handle events
        if let Some(event) = events.next().await {
            match event {
                Event::Key(key) => {
                    // The message input captures printable keys on the chat
                    // screen while the sidebar is closed
                    if app.screen == app::Screen::Chat
                        && !app.sidebar_open
                        && handle_chat_key(app, key)
                    {
                        continue;
                    }
                    let action = event::key_to_action(key);
                    app.handle_action(action);
                }
                Event::Mouse(mouse) => {
                    use crossterm::event::MouseEventKind;
                    match mouse.kind {
                        MouseEventKind::ScrollUp => {
                            app.handle_action(Action::Up);
                        }
                        MouseEventKind::ScrollDown => {
                            app.handle_action(Action::Down);
                        }
                        _ => {}
                    }
                }
                Event::Paste(text) => {
                    if app.screen == app::Screen::Chat && !app.sidebar_open && !app.store.loading {
                        app.input_state.insert_str(&text);
                        app.store.set_input(app.input_state.content().to_string());
                    }
                }
                Event::Tick => {
                    app.tick();
                }
                Event::Resize(_, _) => {
                    // Terminal will handle resize automatically
                }
            }
        }

        if app.should_quit {
            // Abort any remaining tasks
            if let Some(handle) = send_handle {
                handle.abort();
            }
            if let Some(handle) = list_handle {
                handle.abort();
            }
            if let Some(handle) = load_handle {
                handle.abort();
            }
            break;
        }
    }

    Ok(())
}

/// Handle key input for the chat message input.
/// Returns true if the key was handled (should not be processed as action).
fn handle_chat_key(app: &mut App, key: crossterm::event::KeyEvent) -> bool {
    use crossterm::event::{KeyCode, KeyModifiers};

    // Let the action mapping deal with Ctrl+C, Ctrl+N, etc.
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return false;
    }

    // While a send is in flight the input is read-only. Typed-ahead
    // characters are swallowed so they cannot leak into the key
    // bindings; navigation keys still fall through.
    if app.store.loading {
        return matches!(key.code, KeyCode::Char(_));
    }

    let consumed = match key.code {
        // Special keys that should be handled as actions
        KeyCode::Esc | KeyCode::Tab => false,

        // Enter submits the draft through the send flow
        KeyCode::Enter => {
            let draft = app.input_state.content().to_string();
            if let Some(message) = parley_core::begin_send(&mut app.store, &draft) {
                let _ = app.input_state.submit();
                app.pending_send = Some(message);
                app.scroll_transcript_to_bottom();
            }
            true
        }

        // Text editing
        KeyCode::Char(c) => {
            app.input_state.insert(c);
            true
        }
        KeyCode::Backspace => {
            app.input_state.backspace();
            true
        }
        KeyCode::Delete => {
            app.input_state.delete();
            true
        }
        KeyCode::Left => {
            app.input_state.move_left();
            true
        }
        KeyCode::Right => {
            app.input_state.move_right();
            true
        }
        KeyCode::Home => {
            app.input_state.move_home();
            true
        }
        KeyCode::End => {
            app.input_state.move_end();
            true
        }
        KeyCode::Up => {
            // History recall when the input is empty
            if app.input_state.is_empty() {
                app.input_state.history_prev();
                true
            } else {
                false // Let the action handler scroll the transcript
            }
        }
        KeyCode::Down => {
            if app.input_state.is_empty() {
                app.input_state.history_next();
                true
            } else {
                false
            }
        }

        _ => false,
    };

    if consumed {
        // Keep the store's draft in sync with the widget
        app.store.set_input(app.input_state.content().to_string());
    }
    consumed
}

/// Get the TUI version.
pub fn tui_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}


#[cfg(test)]
mod render_tests {
    use super::*;
    use crate::test_utils::*;

    #[test]
    fn test_empty_chat_shows_welcome_hint() {
        let app = create_test_app();
        let result = render_screen_to_string(&screens::chat::ChatScreen, &app);
        assert!(result.contains("Start chatting with the assistant!"));
        assert!(result.contains(" Conversation "));
        assert!(result.contains(" Message "));
        assert!(result.contains("new conversation"));
    }

    #[test]
    fn test_transcript_shows_both_speakers() {
        let app = create_test_app_with_messages();
        let result = render_screen_to_string(&screens::chat::ChatScreen, &app);
        assert!(result.contains("Hello there"));
        assert!(result.contains("Hi! How can I help?"));
        assert!(result.contains("You"));
        assert!(result.contains("Assistant"));
        assert!(result.contains("conversation #7"));
    }

    #[test]
    fn test_loading_shows_typing_indicator() {
        let mut app = create_test_app_with_messages();
        app.store.set_loading(true);
        let result = render_screen_to_string(&screens::chat::ChatScreen, &app);
        assert!(result.contains("Assistant is typing..."));
        assert!(result.contains("sending"));
        assert!(!result.contains("conversation #7"));
    }

    #[test]
    fn test_overscrolled_transcript_keeps_last_line_visible() {
        let mut app = create_test_app_with_messages();
        app.transcript_scroll = 999;
        let result = render_screen_to_string(&screens::chat::ChatScreen, &app);
        assert!(result.contains("Hi! How can I help?"));
    }

    #[test]
    fn test_sidebar_lists_conversations() {
        let app = create_test_app_with_sidebar();
        let result = render_screen_to_string(&screens::chat::ChatScreen, &app);
        assert!(result.contains(" Conversations "));
        assert!(result.contains("Trip planning"));
        // Untitled conversations get the placeholder title
        assert!(result.contains("New conversation"));
    }

    #[test]
    fn test_sidebar_marks_selection() {
        let mut app = create_test_app_with_sidebar();
        app.sidebar_selected = 0;
        let result = render_screen_to_string(&screens::chat::ChatScreen, &app);
        assert!(result.contains("> Trip planning"));
    }

    #[test]
    fn test_new_chat_confirm_overlay() {
        let mut app = create_test_app_with_messages();
        app.screen = Screen::NewChatConfirm;
        let result = render_screen_to_string(&screens::chat::NewChatConfirmScreen, &app);
        assert!(result.contains(" New Conversation "));
        assert!(result.contains("[Enter]"));
        assert!(result.contains("[Esc]"));
    }

    #[test]
    fn test_notification_replaces_status_text() {
        let mut app = create_test_app_with_messages();
        app.set_notification("Could not load conversations".to_string());
        let result = render_screen_to_string(&screens::chat::ChatScreen, &app);
        assert!(result.contains("Could not load conversations"));
        assert!(!result.contains("conversation #7"));
    }

    #[test]
    fn test_help_overlay_renders() {
        use ratatui::{buffer::Buffer, layout::Rect};

        let area = Rect::new(0, 0, TEST_WIDTH, TEST_HEIGHT);
        let mut buffer = Buffer::empty(area);
        screens::render_help_overlay(area, &mut buffer);
        let result = buffer_to_string(&buffer);
        assert!(result.contains(" Help "));
        assert!(result.contains("Toggle this help"));
    }
}
