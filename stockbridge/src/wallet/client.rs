//! Read-only chain clients.
//!
//! [`ReadClient`] is the slice of JSON-RPC the pipeline needs: fee and gas
//! estimation, pending nonce, raw submission, contract reads. A
//! [`Connector`] builds one per network on demand; [`HttpConnector`] does
//! it with an alloy HTTP provider.

use std::fmt;
use std::sync::Arc;

use alloy::network::Ethereum;
use alloy::primitives::{Address, B256, Bytes, U256};
use alloy::providers::{DynProvider, PendingTransactionBuilder, Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use async_trait::async_trait;
use tracing::debug;

use super::WalletError;
use crate::chain::NetworkDescriptor;

/// Read-side access to one network.
#[async_trait]
pub trait ReadClient: Send + Sync + fmt::Debug {
    /// Name of the network this client is bound to.
    fn network(&self) -> &str;

    /// Current gas price in wei.
    async fn gas_price(&self) -> Result<u128, WalletError>;

    /// Simulate `tx` and return its gas limit.
    ///
    /// Fails when the call would revert.
    async fn estimate_gas(&self, tx: &TransactionRequest) -> Result<u64, WalletError>;

    /// Transaction count of `address`, including pending transactions.
    async fn pending_transaction_count(&self, address: Address) -> Result<u64, WalletError>;

    /// Submit a signed, encoded transaction. Returns as soon as the node
    /// accepts it.
    async fn send_raw_transaction(&self, raw: &[u8]) -> Result<B256, WalletError>;

    /// Execute a read-only contract call (`eth_call`).
    async fn call(&self, tx: &TransactionRequest) -> Result<Bytes, WalletError>;

    /// Native token balance in wei.
    async fn balance(&self, address: Address) -> Result<U256, WalletError>;

    /// Wait until `hash` is included and report whether it succeeded.
    async fn wait_for_receipt(&self, hash: B256) -> Result<bool, WalletError>;
}

/// Builds read clients for configured networks.
pub trait Connector: Send + Sync + fmt::Debug {
    /// Construct a client bound to `network`.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint is malformed.
    fn connect(&self, network: &NetworkDescriptor) -> Result<Arc<dyn ReadClient>, WalletError>;
}

/// Connector producing JSON-RPC clients over HTTP.
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpConnector;

impl Connector for HttpConnector {
    fn connect(&self, network: &NetworkDescriptor) -> Result<Arc<dyn ReadClient>, WalletError> {
        Ok(Arc::new(RpcClient::connect(network)?))
    }
}

/// [`ReadClient`] over an alloy HTTP provider.
#[derive(Clone)]
pub struct RpcClient {
    network: &'static str,
    provider: DynProvider<Ethereum>,
}

impl fmt::Debug for RpcClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RpcClient")
            .field("network", &self.network)
            .finish_non_exhaustive()
    }
}

impl RpcClient {
    /// Create a client for `network`. No request is made until first use.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint URL does not parse.
    pub fn connect(network: &NetworkDescriptor) -> Result<Self, WalletError> {
        let rpc_url = network.rpc_url();
        let url = rpc_url
            .parse()
            .map_err(|e| WalletError::config(format!("invalid RPC URL '{rpc_url}': {e}")))?;
        let provider = ProviderBuilder::new()
            .disable_recommended_fillers()
            .connect_http(url)
            .erased();

        debug!(network = network.name(), rpc_url, "read client constructed");

        Ok(Self {
            network: network.name(),
            provider,
        })
    }

    /// Reference to the underlying provider.
    #[must_use]
    pub const fn provider(&self) -> &DynProvider<Ethereum> {
        &self.provider
    }
}

#[async_trait]
impl ReadClient for RpcClient {
    fn network(&self) -> &str {
        self.network
    }

    async fn gas_price(&self) -> Result<u128, WalletError> {
        self.provider
            .get_gas_price()
            .await
            .map_err(|e| WalletError::provider(format!("get_gas_price failed: {e}")))
    }

    async fn estimate_gas(&self, tx: &TransactionRequest) -> Result<u64, WalletError> {
        self.provider
            .estimate_gas(tx.clone())
            .await
            .map_err(|e| WalletError::transaction(format!("estimate_gas failed: {e}")))
    }

    async fn pending_transaction_count(&self, address: Address) -> Result<u64, WalletError> {
        self.provider
            .get_transaction_count(address)
            .pending()
            .await
            .map_err(|e| WalletError::provider(format!("get_transaction_count failed: {e}")))
    }

    async fn send_raw_transaction(&self, raw: &[u8]) -> Result<B256, WalletError> {
        let pending = self
            .provider
            .send_raw_transaction(raw)
            .await
            .map_err(|e| WalletError::transaction(format!("send_raw_transaction failed: {e}")))?;
        Ok(*pending.tx_hash())
    }

    async fn call(&self, tx: &TransactionRequest) -> Result<Bytes, WalletError> {
        self.provider
            .call(tx.clone())
            .await
            .map_err(|e| WalletError::provider(format!("eth_call failed: {e}")))
    }

    async fn balance(&self, address: Address) -> Result<U256, WalletError> {
        self.provider
            .get_balance(address)
            .await
            .map_err(|e| WalletError::provider(format!("get_balance failed: {e}")))
    }

    async fn wait_for_receipt(&self, hash: B256) -> Result<bool, WalletError> {
        let receipt = PendingTransactionBuilder::new(self.provider.root().clone(), hash)
            .get_receipt()
            .await
            .map_err(|e| WalletError::transaction(format!("get_receipt failed: {e}")))?;
        Ok(receipt.status())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::EvmNetwork;

    #[test]
    fn connect_is_lazy() {
        let network = NetworkDescriptor::new(
            EvmNetwork::Sepolia,
            Some("http://127.0.0.1:1".to_string()),
        );
        let client = HttpConnector.connect(&network).expect("valid url");
        assert_eq!(client.network(), "sepolia");
    }

    #[test]
    fn malformed_endpoint_is_a_config_error() {
        let network = NetworkDescriptor::new(EvmNetwork::Sepolia, Some("not a url".to_string()));
        assert!(matches!(
            HttpConnector.connect(&network),
            Err(WalletError::Config(_))
        ));
    }
}
