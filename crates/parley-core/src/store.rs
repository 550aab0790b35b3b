//! Conversation store: the single source of truth for client chat state.
//!
//! The store is a plain struct owned by whoever drives the session (the
//! TUI event loop or a one-shot CLI command) and lives for the process.
//! Nothing is persisted across restarts. All reads go straight to the
//! fields; all writes go through the operations below.

use crate::chat::{Conversation, Message};

/// Client-side chat state.
#[derive(Debug, Clone, Default)]
pub struct ChatStore {
    /// Message log for the active conversation, in insertion order.
    pub messages: Vec<Message>,

    /// Current draft text, not yet sent.
    pub input: String,

    /// True while exactly one outbound send is in flight.
    pub loading: bool,

    /// Active conversation id; None until the backend assigns one.
    pub conversation_id: Option<i64>,

    /// Cached list of known conversations, backend-owned.
    pub conversations: Vec<Conversation>,
}

impl ChatStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the draft text.
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Append a message to the log. Existing entries are never reordered
    /// or mutated; the sequence only grows.
    pub fn add_message(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Toggle the loading flag.
    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    /// Set or clear the active conversation id.
    pub fn set_conversation_id(&mut self, id: Option<i64>) {
        self.conversation_id = id;
    }

    /// Start a new conversation: empty the log and clear the active id.
    pub fn clear_messages(&mut self) {
        self.messages.clear();
        self.conversation_id = None;
    }

    /// Replace the cached conversation list wholesale.
    pub fn set_conversations(&mut self, conversations: Vec<Conversation>) {
        self.conversations = conversations;
    }

    /// Replace the message log with a fetched history and activate the
    /// conversation it belongs to. Callers only invoke this after a
    /// successful fetch; on fetch failure the store stays untouched.
    pub fn apply_history(&mut self, id: i64, messages: Vec<Message>) {
        self.messages = messages;
        self.conversation_id = Some(id);
    }
}
