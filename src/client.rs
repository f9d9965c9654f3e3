use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const CHAT_PATH: &str = "/api/chat";

#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    pub message: &'a str,
}

/// Body returned by the chat endpoint.
///
/// The server is expected to send one of the two fields, but both (or
/// neither) are accepted. `null` deserializes as absent.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ChatResponse {
    /// Texts worth rendering, `response` before `error`. Empty strings are
    /// skipped the same way a falsy field would be.
    pub fn replies(&self) -> impl Iterator<Item = &str> {
        [self.response.as_deref(), self.error.as_deref()]
            .into_iter()
            .flatten()
            .filter(|text| !text.is_empty())
    }
}

/// Failures that never reach the transcript.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("could not reach chat server: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("chat server sent a body that is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Clone)]
pub struct ChatClient {
    client: Client,
    base_url: String,
}

impl ChatClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ChatError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, CHAT_PATH)
    }

    /// Posts one message and parses whatever JSON comes back.
    ///
    /// Non-2xx statuses are not errors here: the server reports its own
    /// failures through the `error` field, usually alongside a 4xx status.
    pub async fn send(&self, message: &str) -> Result<ChatResponse, ChatError> {
        let url = self.endpoint();

        let response = self
            .client
            .post(&url)
            .json(&ChatRequest { message })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%status, %url, "chat server returned non-success status");
        }

        let body = response.bytes().await?;
        let chat_response: ChatResponse = serde_json::from_slice(&body)?;
        Ok(chat_response)
    }
}
