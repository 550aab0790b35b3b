//! Application state and update logic for the parley TUI.

use crate::event::Action;
use crate::ui::widgets::TextInputState;
use parley_core::{ApiError, ChatStore, Conversation, Message};

/// The current screen being displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    Chat,
    NewChatConfirm,
}

/// Application state.
#[derive(Debug, Default)]
pub struct App {
    /// Whether the app should quit.
    pub should_quit: bool,

    /// Whether the help overlay is visible.
    pub show_help: bool,

    /// Current screen.
    pub screen: Screen,

    /// Conversation state shared with the core send flow.
    pub store: ChatStore,

    /// Text input state for the message input.
    pub input_state: TextInputState,

    /// Whether the conversation sidebar is visible.
    pub sidebar_open: bool,

    /// Index of the selected conversation in the sidebar.
    pub sidebar_selected: usize,

    /// Scroll offset for the transcript pane.
    pub transcript_scroll: usize,

    /// Tick counter for animations.
    pub tick: usize,

    /// Notification message (displayed temporarily, cleared after some ticks).
    pub notification: Option<String>,

    /// Ticks remaining until notification is cleared.
    notification_ttl: usize,

    /// Message accepted by `begin_send`, waiting for the event loop to
    /// spawn the request task.
    pub pending_send: Option<String>,

    /// Conversation id the user selected, waiting for a history fetch.
    pub pending_load: Option<i64>,

    /// Whether the event loop should refresh the conversation list.
    pub want_conversations: bool,
}

impl App {
    /// Create a new app instance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle an action.
    pub fn handle_action(&mut self, action: Action) {
        // Global actions
        match action {
            Action::Quit => {
                if self.show_help {
                    self.show_help = false;
                } else {
                    self.should_quit = true;
                }
                return;
            }
            Action::Help => {
                self.show_help = !self.show_help;
                return;
            }
            _ => {}
        }

        // If help is showing, any key closes it
        if self.show_help {
            self.show_help = false;
            return;
        }

        match self.screen {
            Screen::Chat => self.handle_chat_action(action),
            Screen::NewChatConfirm => self.handle_new_chat_confirm_action(action),
        }
    }

    fn handle_chat_action(&mut self, action: Action) {
        match action {
            Action::ToggleSidebar => {
                self.sidebar_open = !self.sidebar_open;
                if self.sidebar_open {
                    // Refresh the list every time the sidebar opens
                    self.want_conversations = true;
                }
            }
            Action::NewChat => {
                self.request_new_chat();
            }
            Action::Up => {
                if self.sidebar_open {
                    self.sidebar_selected = self.sidebar_selected.saturating_sub(1);
                } else {
                    self.transcript_scroll = self.transcript_scroll.saturating_sub(1);
                }
            }
            Action::Down => {
                if self.sidebar_open {
                    if self.sidebar_selected + 1 < self.store.conversations.len() {
                        self.sidebar_selected += 1;
                    }
                } else {
                    self.transcript_scroll =
                        (self.transcript_scroll + 1).min(self.transcript_line_count());
                }
            }
            Action::Select => {
                if self.sidebar_open {
                    if let Some(conversation) =
                        self.store.conversations.get(self.sidebar_selected)
                    {
                        self.pending_load = Some(conversation.id);
                        self.sidebar_open = false;
                    }
                }
            }
            Action::Back => {
                if self.sidebar_open {
                    self.sidebar_open = false;
                } else {
                    self.should_quit = true;
                }
            }
            _ => {}
        }
    }

    fn handle_new_chat_confirm_action(&mut self, action: Action) {
        match action {
            Action::Select => {
                self.start_new_chat();
                self.screen = Screen::Chat;
            }
            Action::Back => {
                self.screen = Screen::Chat;
            }
            _ => {}
        }
    }

    /// Start a new conversation, asking for confirmation when the current
    /// transcript would be discarded.
    pub fn request_new_chat(&mut self) {
        if self.store.messages.is_empty() {
            self.start_new_chat();
        } else {
            self.screen = Screen::NewChatConfirm;
        }
    }

    fn start_new_chat(&mut self) {
        self.store.clear_messages();
        self.input_state.clear();
        self.store.set_input(String::new());
        self.transcript_scroll = 0;
        self.set_notification("Started a new conversation".to_string());
    }

    /// Apply the result of a conversation-list fetch.
    pub fn apply_conversations(&mut self, result: Result<Vec<Conversation>, ApiError>) {
        match result {
            Ok(conversations) => {
                self.store.set_conversations(conversations);
                // Keep the selection inside the new list
                if self.sidebar_selected >= self.store.conversations.len() {
                    self.sidebar_selected = self.store.conversations.len().saturating_sub(1);
                }
            }
            Err(e) => {
                self.set_notification(format!("Could not load conversations: {e}"));
            }
        }
    }

    /// Apply the result of a conversation-history fetch.
    pub fn apply_loaded_history(&mut self, id: i64, result: Result<Vec<Message>, ApiError>) {
        match result {
            Ok(messages) => {
                self.store.apply_history(id, messages);
                self.scroll_transcript_to_bottom();
            }
            Err(e) => {
                self.set_notification(format!("Could not load conversation: {e}"));
            }
        }
    }

    /// Scroll transcript to show the latest messages. Rendering clamps
    /// the offset so the last page stays full.
    pub fn scroll_transcript_to_bottom(&mut self) {
        self.transcript_scroll = self.transcript_line_count();
    }

    /// Number of lines the transcript renders: content lines plus a
    /// blank separator per message, plus the typing indicator.
    pub fn transcript_line_count(&self) -> usize {
        let mut count = 0;
        for msg in &self.store.messages {
            count += msg.content.lines().count().max(1) + 1;
        }
        if self.store.loading {
            count += 1;
        }
        count
    }

    /// Set a temporary notification message.
    pub fn set_notification(&mut self, msg: String) {
        self.notification = Some(msg);
        // Display for ~3 seconds at 4 Hz tick rate (250ms) = 12 ticks
        self.notification_ttl = 12;
    }

    /// Increment tick counter and update time-based state.
    pub fn tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);

        // Clear notification after TTL expires
        if self.notification_ttl > 0 {
            self.notification_ttl -= 1;
            if self.notification_ttl == 0 {
                self.notification = None;
            }
        }
    }

    /// Current spinner frame for the loading indicator.
    pub fn spinner(&self) -> &'static str {
        use crate::ui::theme::Symbols;
        Symbols::SPINNER[self.tick % Symbols::SPINNER.len()]
    }
}
