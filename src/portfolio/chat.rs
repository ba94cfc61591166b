use serde::{Deserialize, Serialize};

use crate::errors::{Result, ViewerError};

pub const THINKING_MESSAGE: &str = "PortugaGPT is thinking...";
pub const NETWORK_ERROR_MESSAGE: &str = "Network error. Try again?";
const REQUEST_FAILED_MESSAGE: &str = "Request failed";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatSource {
    /// Typed into the input box.
    Typed,
    /// Sent by a menu button.
    Button,
}

/// Body of a chat question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub name: String,
    pub source: ChatSource,
}

impl ChatRequest {
    /// Trims both fields. `None` for a blank question.
    #[must_use]
    pub fn new(message: &str, name: &str, source: ChatSource) -> Option<Self> {
        let message = message.trim();
        if message.is_empty() {
            return None;
        }
        Some(Self {
            message: message.to_string(),
            name: name.trim().to_string(),
            source,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    #[serde(default)]
    pub reply: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Analytics pings sent to the chat endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackEvent {
    PageView,
    QuickButton(String),
}

impl TrackEvent {
    #[must_use]
    pub fn body(&self) -> serde_json::Value {
        match self {
            TrackEvent::PageView => serde_json::json!({ "track_page_view": true }),
            TrackEvent::QuickButton(label) => serde_json::json!({ "track_quick_btn": label }),
        }
    }
}

/// What the answer box should show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatAnswer {
    pub text: String,
    pub is_error: bool,
}

/// Interprets a chat response body.
///
/// A failed status yields [`ViewerError::Backend`] carrying `reply`, else
/// `error`, else a generic message.
pub fn parse_chat_response(ok: bool, body: &[u8]) -> Result<String> {
    let parsed = serde_json::from_slice::<ChatReply>(body);
    if !ok {
        let message = parsed
            .ok()
            .and_then(|r| r.reply.or(r.error))
            .unwrap_or_else(|| REQUEST_FAILED_MESSAGE.to_string());
        return Err(ViewerError::Backend(message));
    }
    Ok(parsed?.reply.unwrap_or_default())
}

/// Maps a chat result onto answer-box text.
#[must_use]
pub fn answer_from(result: Result<String>) -> ChatAnswer {
    match result {
        Ok(text) => ChatAnswer { text, is_error: false },
        Err(ViewerError::Backend(text)) => ChatAnswer { text, is_error: true },
        Err(e) => {
            log::warn!("Chat request failed: {e}");
            ChatAnswer {
                text: NETWORK_ERROR_MESSAGE.to_string(),
                is_error: true,
            }
        }
    }
}

#[cfg(feature = "http")]
#[derive(Debug, Clone)]
pub struct ChatClient {
    endpoint: String,
}

#[cfg(feature = "http")]
impl ChatClient {
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        let endpoint = endpoint.into();
        url::Url::parse(&endpoint)?;
        Ok(Self { endpoint })
    }

    #[inline]
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub async fn send(&self, request: &ChatRequest) -> Result<String> {
        let response = super::post_json(&self.endpoint, &serde_json::to_value(request)?).await?;
        parse_chat_response(response.ok, &response.bytes)
    }

    /// [`send`](Self::send), mapped for display.
    pub async fn ask(&self, request: &ChatRequest) -> ChatAnswer {
        answer_from(self.send(request).await)
    }

    /// Fire-and-forget; failures are only logged.
    pub async fn track(&self, event: &TrackEvent) {
        if let Err(e) = super::post_json(&self.endpoint, &event.body()).await {
            log::debug!("Tracking ping failed: {e}");
        }
    }
}
