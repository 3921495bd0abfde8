//! Chat proxy payloads
//!
//! Wire types for the AI chat proxy. A request names the provider that
//! should answer it and carries an ordered message list; the buffered
//! response comes back already normalized by the proxy into one shape
//! regardless of provider.

use serde::{Deserialize, Serialize};

pub mod chat;
pub mod error;
pub mod stream;

pub use chat::ChatClient;
pub use error::ChatError;

/// Speaker of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
    System,
}

impl ChatRole {
    pub fn as_str(self) -> &'static str {
        match self {
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
            ChatRole::System => "system",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(ChatRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(ChatRole::Assistant, content)
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(ChatRole::System, content)
    }
}

/// A chat request addressed to one provider behind the proxy.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub provider: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    /// Provider API key supplied by guest callers. Travels in the body only;
    /// request headers always carry the session-or-anon bearer.
    #[serde(rename = "apiKey", skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream: Option<bool>,
}

impl ChatRequest {
    pub fn new(provider: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self {
            provider: provider.into(),
            model: None,
            messages,
            temperature: None,
            max_tokens: None,
            api_key: None,
            stream: None,
        }
    }
}

/// Token accounting reported by the provider, when available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Provider-agnostic buffered response produced by the proxy.
#[derive(Debug, Clone, Deserialize)]
pub struct NormalizedResponse {
    pub content: String,
    pub usage: Option<Usage>,
    pub model: String,
    pub provider: String,
}
