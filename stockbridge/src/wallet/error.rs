//! Wallet and chain client failures.

/// Why a wallet, client or transaction step failed.
#[derive(Debug, Clone, thiserror::Error)]
#[non_exhaustive]
pub enum WalletError {
    /// Signing credential missing or malformed.
    #[error("wallet config: {0}")]
    Config(String),

    /// A network was requested by name but is not in the registry.
    #[error("network '{0}' is not configured")]
    UnknownNetwork(String),

    /// The registry is empty.
    #[error("no EVM networks configured")]
    NoNetworks,

    /// An RPC call failed before reaching the transaction itself:
    /// connection, gas price, nonce, reads.
    #[error("rpc: {0}")]
    Provider(String),

    /// The signer refused or the transaction could not be built.
    #[error("signing: {0}")]
    Signing(String),

    /// Simulation reverted, the node rejected the transaction or its
    /// receipt reports failure.
    #[error("transaction: {0}")]
    Transaction(String),
}

impl WalletError {
    /// Signing credential problem.
    #[must_use]
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Network missing from the registry.
    #[must_use]
    pub fn unknown_network(name: impl Into<String>) -> Self {
        Self::UnknownNetwork(name.into())
    }

    /// RPC failure.
    #[must_use]
    pub fn provider(msg: impl Into<String>) -> Self {
        Self::Provider(msg.into())
    }

    /// Signing failure.
    #[must_use]
    pub fn signing(msg: impl Into<String>) -> Self {
        Self::Signing(msg.into())
    }

    /// Transaction failure.
    #[must_use]
    pub fn transaction(msg: impl Into<String>) -> Self {
        Self::Transaction(msg.into())
    }
}
