//! OpenAI API client and wire types.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::chat::ChatRequest;
use crate::error::Result;
use crate::llms::LlmError;

use super::config::OpenAIConfig;

/// Chat completion request body.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct OpenAIChatRequest {
    pub model: String,
    pub messages: Vec<OpenAIMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    pub stream: bool,
}

/// Message on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct OpenAIMessage {
    pub role: String,
    #[serde(default)]
    pub content: Option<String>,
}

/// Chat completion response body.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct OpenAIChatResponse {
    pub id: String,
    pub model: String,
    pub choices: Vec<OpenAIChoice>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct OpenAIChoice {
    pub message: OpenAIMessage,
}

#[derive(Debug, Clone, Deserialize)]
struct OpenAIErrorResponse {
    error: OpenAIError,
}

#[derive(Debug, Clone, Deserialize)]
struct OpenAIError {
    message: String,
    #[serde(rename = "type", default)]
    error_type: Option<String>,
    #[serde(default)]
    code: Option<String>,
}

/// OpenAI API client.
#[derive(Debug, Clone)]
pub struct OpenAI {
    pub(crate) config: Arc<OpenAIConfig>,
    pub(crate) client: Client,
}

impl OpenAI {
    /// Create a new client.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is empty or the HTTP client cannot
    /// be built.
    pub fn new(config: OpenAIConfig) -> Result<Self> {
        if config.api_key.is_empty() {
            return Err(LlmError::auth("openai", "API key is required").into());
        }

        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(timeout));
        }

        let client = builder
            .build()
            .map_err(|e| LlmError::Client(e.to_string()))?;

        Ok(Self {
            config: Arc::new(config),
            client,
        })
    }

    /// Get the base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Get the default model.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.config.model
    }

    pub(crate) fn chat_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url)
    }

    pub(crate) fn build_request(&self, url: &str) -> reqwest::RequestBuilder {
        self.client
            .post(url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
    }

    pub(crate) fn build_body(&self, request: &ChatRequest) -> OpenAIChatRequest {
        let messages = request
            .messages
            .iter()
            .map(|m| OpenAIMessage {
                role: m.role.as_str().to_owned(),
                content: Some(m.content.clone()),
            })
            .collect();

        let model = if request.model.is_empty() {
            self.config.model.clone()
        } else {
            request.model.clone()
        };

        OpenAIChatRequest {
            model,
            messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            stream: false,
        }
    }

    pub(crate) fn parse_error(status: u16, body: &str) -> LlmError {
        if let Ok(error_response) = serde_json::from_str::<OpenAIErrorResponse>(body) {
            let error = error_response.error;
            let code = error
                .code
                .or(error.error_type)
                .unwrap_or_else(|| status.to_string());

            return match status {
                401 | 403 => LlmError::auth("openai", error.message),
                429 => LlmError::RateLimited { provider: "openai" },
                _ => LlmError::api("openai", code, error.message),
            };
        }

        LlmError::HttpStatus {
            status,
            body: body.to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> OpenAI {
        OpenAI::new(OpenAIConfig::new("sk-test").with_base_url("http://localhost:1/v1"))
            .expect("client builds")
    }

    #[test]
    fn empty_key_is_rejected() {
        assert!(OpenAI::new(OpenAIConfig::default()).is_err());
    }

    #[test]
    fn body_falls_back_to_default_model() {
        let client = client();
        let body = client.build_body(&ChatRequest::default().user("hello"));

        assert_eq!(body.model, OpenAIConfig::DEFAULT_MODEL);
        assert_eq!(body.messages[0].role, "user");
        assert_eq!(body.messages[0].content.as_deref(), Some("hello"));
        assert!(!body.stream);
        assert_eq!(client.chat_url(), "http://localhost:1/v1/chat/completions");
    }

    #[test]
    fn error_bodies_are_classified() {
        let body = r#"{"error":{"message":"bad key","type":"invalid_request_error"}}"#;
        assert!(matches!(OpenAI::parse_error(401, body), LlmError::Auth { .. }));
        assert!(matches!(
            OpenAI::parse_error(429, body),
            LlmError::RateLimited { .. }
        ));
        assert!(matches!(
            OpenAI::parse_error(500, "upstream down"),
            LlmError::HttpStatus { status: 500, .. }
        ));
    }
}
