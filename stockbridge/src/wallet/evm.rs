//! The account-owning wallet: one signing credential plus the chain
//! registry, handing out per-network clients on demand.

use std::fmt;
use std::sync::Arc;

use alloy::network::{EthereumWallet, TxSigner};
use alloy::primitives::{Address, Signature};
use alloy::signers::local::PrivateKeySigner;
use tracing::info;

use super::client::{Connector, ReadClient};
use super::signing::SigningClient;
use super::WalletError;
use crate::chain::ChainRegistry;
use crate::settings::{PRIVATE_KEY, Settings};

/// An EVM wallet spanning every configured network.
///
/// Constructing one performs no network I/O. Clients are built fresh on
/// every [`read_client`](Self::read_client) /
/// [`signing_client`](Self::signing_client) call.
#[derive(Clone)]
pub struct EvmWallet {
    signer: EthereumWallet,
    address: Address,
    registry: ChainRegistry,
    connector: Arc<dyn Connector>,
}

impl fmt::Debug for EvmWallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EvmWallet")
            .field("address", &self.address)
            .field("networks", &self.registry.names())
            .finish_non_exhaustive()
    }
}

impl EvmWallet {
    /// Create a wallet from the `EVM_PRIVATE_KEY` setting.
    ///
    /// # Errors
    ///
    /// Returns a config error if the key is absent or malformed.
    pub fn from_settings(
        settings: &dyn Settings,
        registry: ChainRegistry,
        connector: Arc<dyn Connector>,
    ) -> Result<Self, WalletError> {
        let key = settings
            .get(PRIVATE_KEY)
            .ok_or_else(|| WalletError::config(format!("{PRIVATE_KEY} is missing")))?;
        Self::from_private_key(&key, registry, connector)
    }

    /// Create a wallet from a raw private key hex string (with or without `0x` prefix).
    ///
    /// # Errors
    ///
    /// Returns a config error if the private key is invalid.
    pub fn from_private_key(
        key: &str,
        registry: ChainRegistry,
        connector: Arc<dyn Connector>,
    ) -> Result<Self, WalletError> {
        let key = key.trim();
        let key = key.strip_prefix("0x").unwrap_or(key);
        let signer: PrivateKeySigner = key
            .parse()
            .map_err(|e| WalletError::config(format!("invalid private key: {e}")))?;
        Ok(Self::from_signer(signer, registry, connector))
    }

    /// Create a wallet around an externally supplied signer.
    #[must_use]
    pub fn from_signer<S>(signer: S, registry: ChainRegistry, connector: Arc<dyn Connector>) -> Self
    where
        S: TxSigner<Signature> + Send + Sync + 'static,
    {
        let address = signer.address();
        info!(
            address = %address,
            networks = ?registry.names(),
            "EVM wallet initialized",
        );
        Self {
            signer: EthereumWallet::new(signer),
            address,
            registry,
            connector,
        }
    }

    /// The account address. Pure, no I/O.
    #[must_use]
    pub const fn address(&self) -> Address {
        self.address
    }

    /// The configured networks.
    #[must_use]
    pub const fn registry(&self) -> &ChainRegistry {
        &self.registry
    }

    /// A read-only client bound to `network`.
    ///
    /// # Errors
    ///
    /// Returns an error if the network is not configured or its endpoint
    /// is malformed.
    pub fn read_client(&self, network: &str) -> Result<Arc<dyn ReadClient>, WalletError> {
        let descriptor = self.registry.require(network)?;
        self.connector.connect(descriptor)
    }

    /// A signing client for this account on `network`.
    ///
    /// # Errors
    ///
    /// Returns an error if the network is not configured.
    pub fn signing_client(&self, network: &str) -> Result<SigningClient, WalletError> {
        let descriptor = self.registry.require(network)?;
        Ok(SigningClient::new(
            self.signer.clone(),
            self.address,
            descriptor.clone(),
        ))
    }
}
