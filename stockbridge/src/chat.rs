//! Chat completion types and the provider trait.
//!
//! - [`ChatRequest`]: model, messages and sampling parameters
//! - [`ChatResponse`]: the generated message
//! - [`ChatProvider`]: the text-generation capability the pipeline consumes
//!
//! # Example
//!
//! ```rust,ignore
//! let request = ChatRequest::new("gpt-4o-mini")
//!     .user(prompt)
//!     .temperature(0.0);
//!
//! let response = provider.chat(&request).await?;
//! let text = response.text();
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::message::Message;

/// A chat completion request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Model identifier. Empty means the provider default.
    #[serde(default)]
    pub model: String,

    /// Conversation messages.
    #[serde(default)]
    pub messages: Vec<Message>,

    /// Maximum tokens to generate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Sampling temperature (0.0 to 2.0).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

impl ChatRequest {
    /// Creates a new request with the specified model.
    #[must_use]
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Default::default()
        }
    }

    /// Adds a system message.
    #[must_use]
    pub fn system(mut self, content: impl Into<String>) -> Self {
        self.messages.push(Message::system(content));
        self
    }

    /// Adds a user message.
    #[must_use]
    pub fn user(mut self, content: impl Into<String>) -> Self {
        self.messages.push(Message::user(content));
        self
    }

    /// Sets max tokens.
    #[must_use]
    pub const fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Sets temperature.
    #[must_use]
    pub const fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

/// A chat completion response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    /// The generated message.
    pub message: Message,

    /// Model identifier used for this response.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Unique completion ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl ChatResponse {
    /// Creates a response from assistant text.
    #[must_use]
    pub fn from_text(content: impl Into<String>) -> Self {
        Self {
            message: Message::assistant(content),
            model: None,
            id: None,
        }
    }

    /// Sets the model identifier.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// The generated text.
    #[must_use]
    pub fn text(&self) -> &str {
        self.message.text()
    }
}

/// A text-generation backend.
///
/// Implementations make exactly one request per [`chat`](Self::chat) call;
/// retries, if any, belong to the caller.
#[async_trait]
pub trait ChatProvider: Send + Sync + std::fmt::Debug {
    /// Send a chat completion request and receive the complete response.
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse>;

    /// Name of this provider, used in logs and errors.
    fn provider_name(&self) -> &'static str;

    /// Model used when a request leaves `model` empty.
    fn default_model(&self) -> &str;
}

/// Convenience methods on any [`ChatProvider`].
#[async_trait]
pub trait ChatProviderExt: ChatProvider {
    /// Send a single user prompt and return the response text.
    async fn complete(&self, prompt: &str) -> Result<String> {
        let request = ChatRequest::new(self.default_model()).user(prompt);
        let response = self.chat(&request).await?;
        Ok(response.message.content)
    }
}

impl<T: ChatProvider + ?Sized> ChatProviderExt for T {}

/// Type alias for an Arc-wrapped ChatProvider.
pub type SharedChatProvider = Arc<dyn ChatProvider>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Role;

    #[test]
    fn request_builder() {
        let request = ChatRequest::new("gpt-4o-mini")
            .system("You extract trades.")
            .user("Buy 5 ACME")
            .temperature(0.0)
            .max_tokens(256);

        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[1].role, Role::User);
        assert_eq!(request.temperature, Some(0.0));
        assert_eq!(request.max_tokens, Some(256));
    }

    #[test]
    fn optional_fields_are_omitted() {
        let json = serde_json::to_value(ChatRequest::new("m").user("x")).expect("serializes");
        assert!(json.get("temperature").is_none());
        assert!(json.get("max_tokens").is_none());
    }
}
