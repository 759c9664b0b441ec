//! Unified error types for stockbridge.
//!
//! Each concern owns its own error enum ([`LlmError`], [`WalletError`],
//! [`ContractError`]); [`Error`] ties them together so pipeline code can use
//! `?` across layers. Nothing here escapes an action handler: the outermost
//! boundary turns every [`Error`] into an
//! [`ActionOutcome`](crate::action::ActionOutcome).

pub use crate::contracts::ContractError;
pub use crate::llms::LlmError;
pub use crate::wallet::WalletError;

/// Result type alias for stockbridge operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for stockbridge.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// LLM provider error.
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    /// Wallet, chain client or signing error.
    #[error("{0}")]
    Wallet(#[from] WalletError),

    /// ABI encoding or amount conversion error.
    #[error("{0}")]
    Contract(#[from] ContractError),

    /// Prompt template rendering error.
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// Invalid configuration.
    #[error("Config error: {0}")]
    Config(String),

    /// The quote source had no price for a symbol.
    #[error("Could not retrieve price for stock symbol \"{symbol}\": {message}")]
    Price {
        /// Symbol that was looked up.
        symbol: String,
        /// Reason reported by the source.
        message: String,
    },

    /// No registered action has this name or simile.
    #[error("Unknown action: {0}")]
    UnknownAction(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl Error {
    /// Create a prompt rendering error.
    #[must_use]
    pub fn prompt(msg: impl Into<String>) -> Self {
        Self::Prompt(msg.into())
    }

    /// Create a configuration error.
    #[must_use]
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

impl From<minijinja::Error> for Error {
    fn from(e: minijinja::Error) -> Self {
        Self::Prompt(e.to_string())
    }
}
