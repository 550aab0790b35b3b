//! HTTP client for the external chat API.
//!
//! The backend owns all business logic; this module only shapes requests
//! and decodes responses. Three endpoints exist:
//!
//! - `POST /api/chat` sends one message and returns the reply,
//! - `GET /api/conversations?user_id=<id>` lists conversation summaries,
//! - `GET /api/conversations/<id>` returns a conversation's history.

use crate::chat::{Conversation, Message};
use crate::config::ClientConfig;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Body of a `POST /api/chat` request.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    /// Identifier of the user on whose behalf the message is sent.
    pub user_id: i64,
    /// Message text.
    pub message: String,
    /// Conversation to continue, or None to start a new one.
    pub conversation_id: Option<i64>,
}

/// Body of a `POST /api/chat` response.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatReply {
    /// Conversation the message was recorded under. The backend creates
    /// a conversation when the request carried none.
    pub conversation_id: i64,
    /// Assistant response text.
    pub ai_response: String,
}

/// Body of a `GET /api/conversations/<id>` response.
#[derive(Debug, Deserialize)]
struct ConversationHistory {
    messages: Vec<Message>,
}

/// Errors from talking to the chat API.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Failed to construct the HTTP client.
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// Network/transport failure before a response arrived.
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("server returned {0}")]
    Status(StatusCode),

    /// The response body could not be decoded.
    #[error("malformed response: {0}")]
    Decode(#[source] reqwest::Error),
}

/// Seam over the send operation, so the Send Flow can be exercised
/// against a scripted backend in tests.
#[async_trait]
pub trait ChatBackend {
    /// Send one message; returns the reply and the conversation it was
    /// recorded under.
    async fn send_message(
        &self,
        message: &str,
        conversation_id: Option<i64>,
    ) -> Result<ChatReply, ApiError>;
}

/// Client for the chat API over HTTP.
#[derive(Debug, Clone)]
pub struct HttpApiClient {
    http: reqwest::Client,
    base_url: String,
    user_id: i64,
}

impl HttpApiClient {
    /// Build a client from configuration.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(ApiError::Client)?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            user_id: config.user_id,
        })
    }

    /// List conversation summaries for the configured user.
    pub async fn list_conversations(&self) -> Result<Vec<Conversation>, ApiError> {
        let url = format!(
            "{}/api/conversations?user_id={}",
            self.base_url, self.user_id
        );
        tracing::debug!(%url, "listing conversations");

        let result = self.get_json::<Vec<Conversation>>(&url).await;
        if let Err(err) = &result {
            tracing::warn!(error = %err, "conversation list fetch failed");
        }
        result
    }

    /// Fetch the full message history of one conversation.
    pub async fn fetch_conversation(&self, id: i64) -> Result<Vec<Message>, ApiError> {
        let url = format!("{}/api/conversations/{id}", self.base_url);
        tracing::debug!(%url, "fetching conversation history");

        let result = self.get_json::<ConversationHistory>(&url).await;
        if let Err(err) = &result {
            tracing::warn!(error = %err, "conversation history fetch failed");
        }
        Ok(result?.messages)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(ApiError::Transport)?;
        if !resp.status().is_success() {
            return Err(ApiError::Status(resp.status()));
        }
        resp.json::<T>().await.map_err(ApiError::Decode)
    }
}

#[async_trait]
impl ChatBackend for HttpApiClient {
    async fn send_message(
        &self,
        message: &str,
        conversation_id: Option<i64>,
    ) -> Result<ChatReply, ApiError> {
        let url = format!("{}/api/chat", self.base_url);
        let request = ChatRequest {
            user_id: self.user_id,
            message: message.to_string(),
            conversation_id,
        };
        tracing::debug!(%url, conversation_id, "sending chat message");

        let resp = self
            .http
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(ApiError::Transport)?;
        if !resp.status().is_success() {
            return Err(ApiError::Status(resp.status()));
        }
        resp.json::<ChatReply>().await.map_err(ApiError::Decode)
    }
}
