//! Scripted chat provider for testing.
//!
//! [`MockProvider`] returns predefined responses in order, cycling when it
//! runs out, and counts how many times it was invoked.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::chat::{ChatProvider, ChatRequest, ChatResponse};
use crate::error::Result;
use crate::llms::LlmError;

/// A chat provider that replays canned responses.
///
/// # Example
///
/// ```rust,ignore
/// let model = MockProvider::new([
///     "<response><stockSym>ACME</stockSym><stockNum>5</stockNum></response>",
/// ]);
/// ```
#[derive(Debug)]
pub struct MockProvider {
    model: String,
    responses: Vec<String>,
    calls: AtomicUsize,
    requests: Mutex<Vec<ChatRequest>>,
    failure: Option<LlmError>,
}

impl MockProvider {
    /// Create a provider replaying `responses` in order.
    #[must_use]
    pub fn new<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            model: "mock-model".to_string(),
            responses: responses.into_iter().map(Into::into).collect(),
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
            failure: None,
        }
    }

    /// Create a provider whose every call fails with `error`.
    #[must_use]
    pub fn failing(error: LlmError) -> Self {
        Self {
            failure: Some(error),
            ..Self::new(Vec::<String>::new())
        }
    }

    /// Use a custom model identifier.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Number of `chat` invocations so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Requests received so far, in order.
    #[must_use]
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ChatProvider for MockProvider {
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse> {
        let index = self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }

        if let Some(error) = &self.failure {
            return Err(error.clone().into());
        }

        let text = match self.responses.len() {
            0 => String::new(),
            len => self.responses[index % len].clone(),
        };
        Ok(ChatResponse::from_text(text).with_model(&self.model))
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }

    fn default_model(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::ChatProviderExt;

    #[tokio::test]
    async fn cycles_responses_and_counts_calls() {
        let model = MockProvider::new(["first", "second"]);

        assert_eq!(model.complete("a").await.expect("ok"), "first");
        assert_eq!(model.complete("b").await.expect("ok"), "second");
        assert_eq!(model.complete("c").await.expect("ok"), "first");
        assert_eq!(model.calls(), 3);
        assert_eq!(model.requests()[1].messages[0].content, "b");
    }

    #[tokio::test]
    async fn failing_provider_still_counts() {
        let model = MockProvider::failing(LlmError::transport("offline"));
        assert!(model.complete("x").await.is_err());
        assert_eq!(model.calls(), 1);
    }
}
