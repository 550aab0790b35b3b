//! The Send Flow: from a submitted draft to a settled store.
//!
//! The flow is split into two synchronous reducer steps around the single
//! network call, so the state transitions can be tested without I/O:
//!
//! 1. [`begin_send`] guards the draft and appends the user message,
//! 2. the caller issues exactly one request,
//! 3. [`finish_send`] appends the reply (or the fallback) and clears
//!    `loading` no matter what.
//!
//! [`send_flow`] composes all three for one-shot callers.

use crate::api::{ApiError, ChatBackend, ChatReply};
use crate::chat::Message;
use crate::store::ChatStore;

/// Fixed assistant message shown when a send fails for any reason.
pub const FALLBACK_REPLY: &str = "The assistant is not responding. Please try again.";

/// Start a send. Returns the text to transmit, or None when the guard
/// rejects the draft (empty after trimming, or a send already in flight)
/// in which case the store is not mutated.
pub fn begin_send(store: &mut ChatStore, draft: &str) -> Option<String> {
    let text = draft.trim();
    if text.is_empty() || store.loading {
        return None;
    }

    let text = text.to_string();
    store.add_message(Message::user(text.clone()));
    store.set_input("");
    store.set_loading(true);
    Some(text)
}

/// Settle a send. On success, adopts the returned conversation id and
/// appends the assistant reply; on any failure, appends the fixed
/// fallback message and leaves the conversation id alone. Always clears
/// `loading` - this is the guaranteed-cleanup path.
pub fn finish_send(store: &mut ChatStore, result: Result<ChatReply, ApiError>) {
    match result {
        Ok(reply) => {
            store.set_conversation_id(Some(reply.conversation_id));
            store.add_message(Message::assistant(reply.ai_response));
        }
        Err(err) => {
            tracing::warn!(error = %err, "send failed");
            store.add_message(Message::assistant(FALLBACK_REPLY));
        }
    }
    store.set_loading(false);
}

/// Run the whole Send Flow against a backend. Issues at most one request;
/// a rejected draft is a no-op.
pub async fn send_flow(store: &mut ChatStore, backend: &impl ChatBackend, draft: &str) {
    let Some(text) = begin_send(store, draft) else {
        return;
    };
    let result = backend.send_message(&text, store.conversation_id).await;
    finish_send(store, result);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::Role;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Backend that returns a scripted reply and counts calls.
    struct ScriptedBackend {
        reply: Result<ChatReply, ()>,
        calls: AtomicUsize,
    }

    impl ScriptedBackend {
        fn success(conversation_id: i64, text: &str) -> Self {
            Self {
                reply: Ok(ChatReply {
                    conversation_id,
                    ai_response: text.to_string(),
                }),
                calls: AtomicUsize::new(0),
            }
        }

        fn failure() -> Self {
            Self {
                reply: Err(()),
                calls: AtomicUsize::new(0),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ChatBackend for ScriptedBackend {
        async fn send_message(
            &self,
            _message: &str,
            _conversation_id: Option<i64>,
        ) -> Result<ChatReply, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.reply {
                Ok(reply) => Ok(reply.clone()),
                Err(()) => Err(ApiError::Status(reqwest::StatusCode::INTERNAL_SERVER_ERROR)),
            }
        }
    }

    #[tokio::test]
    async fn test_send_flow_success() {
        let mut store = ChatStore::new();
        let backend = ScriptedBackend::success(7, "Hi there");

        send_flow(&mut store, &backend, "Hello").await;

        assert_eq!(store.messages.len(), 2);
        assert_eq!(store.messages[0].role, Role::User);
        assert_eq!(store.messages[0].content, "Hello");
        assert_eq!(store.messages[1].role, Role::Assistant);
        assert_eq!(store.messages[1].content, "Hi there");
        assert_eq!(store.conversation_id, Some(7));
        assert!(!store.loading);
        assert_eq!(backend.call_count(), 1);
    }

    #[tokio::test]
    async fn test_send_flow_failure_appends_fallback() {
        let mut store = ChatStore::new();
        store.set_conversation_id(Some(3));
        let backend = ScriptedBackend::failure();

        send_flow(&mut store, &backend, "Hello").await;

        assert_eq!(store.messages.len(), 2);
        assert_eq!(store.messages[0].content, "Hello");
        assert_eq!(store.messages[1].role, Role::Assistant);
        assert_eq!(store.messages[1].content, FALLBACK_REPLY);
        // A failed send never moves the active conversation.
        assert_eq!(store.conversation_id, Some(3));
        assert!(!store.loading);
    }

    #[tokio::test]
    async fn test_empty_or_whitespace_draft_is_a_no_op() {
        let mut store = ChatStore::new();
        let backend = ScriptedBackend::success(1, "unused");

        send_flow(&mut store, &backend, "").await;
        send_flow(&mut store, &backend, "   \n\t").await;

        assert!(store.messages.is_empty());
        assert!(!store.loading);
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn test_guard_blocks_send_while_loading() {
        let mut store = ChatStore::new();
        store.set_loading(true);
        let backend = ScriptedBackend::success(1, "unused");

        send_flow(&mut store, &backend, "Hello").await;

        assert!(store.messages.is_empty());
        assert_eq!(backend.call_count(), 0);
        // The in-flight send still owns the flag.
        assert!(store.loading);
    }

    #[test]
    fn test_begin_send_trims_and_clears_input() {
        let mut store = ChatStore::new();
        store.set_input("  Hello  ");

        let text = begin_send(&mut store, "  Hello  ").unwrap();
        assert_eq!(text, "Hello");
        assert_eq!(store.messages[0].content, "Hello");
        assert!(store.input.is_empty());
        assert!(store.loading);
    }

    #[test]
    fn test_finish_send_always_clears_loading() {
        let mut store = ChatStore::new();
        store.set_loading(true);
        finish_send(
            &mut store,
            Err(ApiError::Status(reqwest::StatusCode::BAD_GATEWAY)),
        );
        assert!(!store.loading);

        store.set_loading(true);
        finish_send(
            &mut store,
            Ok(ChatReply {
                conversation_id: 1,
                ai_response: "ok".into(),
            }),
        );
        assert!(!store.loading);
    }
}
