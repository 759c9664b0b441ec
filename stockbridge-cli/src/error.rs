//! CLI error type.

use stockbridge::wallet::WalletError;

use crate::config::ConfigError;

/// Errors surfaced to the terminal.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Config file problem.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Pipeline error.
    #[error(transparent)]
    Stockbridge(#[from] stockbridge::Error),

    /// Wallet or chain client error.
    #[error(transparent)]
    Wallet(#[from] WalletError),

    /// An action ran and failed.
    #[error("{0}")]
    ActionFailed(String),

    /// The config file has error-level issues.
    #[error("configuration has {0} error(s)")]
    Invalid(usize),
}

/// Result type for CLI commands.
pub type Result<T> = std::result::Result<T, CliError>;
