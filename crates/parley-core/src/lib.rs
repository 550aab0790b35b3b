//! parley-core: Headless client engine for the parley chat application
//!
//! This crate provides the core logic shared by the TUI and CLI, including:
//! - The conversation store (messages, draft input, loading flag)
//! - The send flow with its optimistic append and fallback reply
//! - A typed HTTP client for the chat API
//! - Configuration loading and saving

pub mod api;
pub mod chat;
pub mod config;
pub mod send;
pub mod store;

// Re-export commonly used types
pub use api::{ApiError, ChatBackend, ChatReply, ChatRequest, HttpApiClient};
pub use chat::{Conversation, Message, Role};
pub use config::{ClientConfig, ConfigError};
pub use send::{begin_send, finish_send, send_flow, FALLBACK_REPLY};
pub use store::ChatStore;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_version() {
        let version = core_version();
        assert!(!version.is_empty());
        assert!(version.starts_with("0."));
    }
}
