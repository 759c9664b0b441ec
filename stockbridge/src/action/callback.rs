//! Completion callback contract.

use serde::Serialize;
use serde_json::Value;

/// What the host's conversation surface receives.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CallbackPayload {
    /// Human-readable result or failure message.
    pub text: String,
    /// Structured result, present on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<Value>,
}

impl CallbackPayload {
    /// A text-only payload.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            content: None,
        }
    }
}

/// Completion callback. `FnOnce` so it cannot fire twice.
pub type Callback = Box<dyn FnOnce(CallbackPayload) + Send>;
