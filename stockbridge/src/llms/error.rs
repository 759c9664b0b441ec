//! Model call failures.
//!
//! Any of these aborts intent extraction before a transaction is built;
//! the action reports it as an initialization failure.

/// Why a model call returned no text.
#[derive(Debug, Clone, thiserror::Error)]
#[non_exhaustive]
pub enum LlmError {
    /// Credentials missing or refused.
    #[error("{provider}: unauthorized: {message}")]
    Auth {
        /// Provider name.
        provider: &'static str,
        /// Reason.
        message: String,
    },

    /// The provider throttled the request.
    #[error("{provider}: rate limited")]
    RateLimited {
        /// Provider name.
        provider: &'static str,
    },

    /// Error object returned by the provider.
    #[error("{provider}: {message} ({code})")]
    Api {
        /// Provider name.
        provider: &'static str,
        /// Provider error code or type.
        code: String,
        /// Reason.
        message: String,
    },

    /// Non-success status with an unstructured body.
    #[error("HTTP {status}: {body}")]
    HttpStatus {
        /// Status code.
        status: u16,
        /// Raw body.
        body: String,
    },

    /// The body is not a chat completion.
    #[error("malformed completion: {0}")]
    Malformed(String),

    /// Connection failure or timeout.
    #[error("transport: {0}")]
    Transport(String),

    /// The HTTP client could not be set up.
    #[error("client setup: {0}")]
    Client(String),
}

impl LlmError {
    /// Credentials missing or refused.
    #[must_use]
    pub fn auth(provider: &'static str, message: impl Into<String>) -> Self {
        Self::Auth {
            provider,
            message: message.into(),
        }
    }

    /// Error object returned by the provider.
    #[must_use]
    pub fn api(provider: &'static str, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Api {
            provider,
            code: code.into(),
            message: message.into(),
        }
    }

    /// Malformed completion body.
    #[must_use]
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed(message.into())
    }

    /// Transport failure.
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        match (err.is_timeout(), err.is_connect()) {
            (true, _) => Self::transport("request timed out"),
            (_, true) => Self::transport(format!("connect: {err}")),
            _ => Self::transport(err.to_string()),
        }
    }
}
