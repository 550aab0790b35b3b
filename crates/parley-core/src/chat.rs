//! Chat data model.
//!
//! Messages and conversation summaries exchanged with the chat API.
//! Conversations are owned by the backend; the client only caches
//! read-only copies of their summaries and histories.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Role of a message author.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Message typed by the person using the client.
    User,
    /// Response produced by the backend. The backend stores this role
    /// as `"ai"`, so that spelling is accepted on the wire too.
    #[serde(alias = "ai")]
    Assistant,
}

/// A single message in a conversation.
///
/// Immutable once appended to the store; ordering is insertion order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Role of the message author.
    pub role: Role,
    /// Message content.
    pub content: String,
    /// Creation time. The history endpoint calls this `created_at`.
    #[serde(default, alias = "created_at", skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl Message {
    /// Create a new user message stamped with the current time.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            timestamp: Some(Utc::now()),
        }
    }

    /// Create a new assistant message stamped with the current time.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            timestamp: Some(Utc::now()),
        }
    }
}

/// Summary of a backend-owned conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    /// Backend identifier.
    pub id: i64,
    /// Optional title; absent until the backend assigns one.
    #[serde(default)]
    pub title: Option<String>,
    /// Creation time, if the backend reports one.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Conversation {
    /// Title to display, substituting a placeholder when none is set.
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or("New conversation")
    }
}
