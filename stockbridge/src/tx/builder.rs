//! The linear price → sequence → sign → broadcast pipeline.

use std::sync::Arc;

use alloy::primitives::B256;
use tracing::{debug, info};

use super::locks::AccountLocks;
use super::pending::PendingTransaction;
use crate::contracts::ContractCall;
use crate::wallet::{EvmWallet, ReadClient, SigningClient, WalletError};

/// What the network accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Submission {
    /// Transaction hash returned by the node.
    pub tx_hash: B256,
    /// Nonce the transaction was signed with.
    pub nonce: u64,
    /// Gas limit from simulation.
    pub gas_limit: u64,
    /// Gas price in wei.
    pub gas_price: u128,
}

/// Builds, signs and broadcasts transactions for one account on one network.
#[derive(Debug, Clone)]
pub struct TransactionBuilder {
    client: Arc<dyn ReadClient>,
    signer: SigningClient,
    locks: AccountLocks,
}

impl TransactionBuilder {
    /// Assemble a builder from already-resolved clients.
    #[must_use]
    pub const fn new(client: Arc<dyn ReadClient>, signer: SigningClient, locks: AccountLocks) -> Self {
        Self {
            client,
            signer,
            locks,
        }
    }

    /// Resolve the read and signing clients for `network`.
    ///
    /// # Errors
    ///
    /// Returns an error if the network is not configured or its client
    /// cannot be built.
    pub fn for_network(
        wallet: &EvmWallet,
        network: &str,
        locks: AccountLocks,
    ) -> Result<Self, WalletError> {
        let client = wallet.read_client(network)?;
        let signer = wallet.signing_client(network)?;
        debug!(network, address = %signer.address(), "clients resolved");
        Ok(Self::new(client, signer, locks))
    }

    /// Network name.
    #[must_use]
    pub fn network(&self) -> &str {
        self.signer.network().name()
    }

    /// The read client.
    #[must_use]
    pub fn client(&self) -> &Arc<dyn ReadClient> {
        &self.client
    }

    /// Price, simulate, sequence, sign and broadcast `call`.
    ///
    /// Returns as soon as the node accepts the transaction; inclusion is
    /// not awaited.
    ///
    /// # Errors
    ///
    /// Returns the first failing step's error. Nothing is signed if gas
    /// pricing or simulation fails.
    pub async fn submit(&self, call: &ContractCall) -> Result<Submission, WalletError> {
        let network = self.network();
        let from = self.signer.address();
        let mut tx = PendingTransaction::new(call, self.signer.chain_id());
        debug!(
            network,
            function = call.function,
            to = %call.to,
            value = %call.value,
            "call encoded",
        );

        let gas_price = self.client.gas_price().await?;
        tx.gas_price = Some(gas_price);
        debug!(network, gas_price, "gas price resolved");

        let gas_limit = self.client.estimate_gas(&tx.simulation(from)).await?;
        tx.gas_limit = Some(gas_limit);
        debug!(network, gas_limit, "gas limit resolved");

        let _guard = self.locks.acquire(from).await;

        let nonce = self.client.pending_transaction_count(from).await?;
        tx.nonce = Some(nonce);
        debug!(network, nonce, "nonce resolved");

        let signed = self.signer.sign(tx.into_unsigned()?).await?;
        debug!(network, tx_hash = %signed.hash, "transaction signed");

        let tx_hash = self.client.send_raw_transaction(&signed.raw).await?;
        info!(
            network,
            function = call.function,
            nonce,
            tx_hash = %tx_hash,
            "transaction broadcast",
        );

        Ok(Submission {
            tx_hash,
            nonce,
            gas_limit,
            gas_price,
        })
    }

    /// Wait for `tx_hash` to be included.
    ///
    /// # Errors
    ///
    /// Returns an error if the receipt cannot be fetched or the
    /// transaction reverted.
    pub async fn confirm(&self, tx_hash: B256) -> Result<(), WalletError> {
        debug!(network = self.network(), %tx_hash, "awaiting receipt");
        if self.client.wait_for_receipt(tx_hash).await? {
            Ok(())
        } else {
            Err(WalletError::transaction(format!(
                "transaction {tx_hash} reverted"
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use alloy::primitives::U256;

    use super::*;
    use crate::chain::ChainRegistry;
    use crate::config::ContractsConfig;
    use crate::settings::MapSettings;
    use crate::wallet::mock::{MockChain, RpcMethod, TEST_PRIVATE_KEY};

    fn builder(chain: &MockChain) -> TransactionBuilder {
        let registry = ChainRegistry::from_settings(&["avalancheFuji".to_string()], &MapSettings::new());
        let wallet =
            EvmWallet::from_private_key(TEST_PRIVATE_KEY, registry, Arc::new(chain.connector()))
                .expect("valid key");
        TransactionBuilder::for_network(&wallet, "avalancheFuji", AccountLocks::new())
            .expect("configured")
    }

    fn mint() -> ContractCall {
        ContractsConfig::default()
            .resolve()
            .expect("defaults parse")
            .mint_request(U256::from(5u64), "ACME", U256::from(2u64))
    }

    #[tokio::test]
    async fn steps_run_in_order() {
        let chain = MockChain::new().with_nonce(11).with_gas_limit(90_000);
        let submission = builder(&chain).submit(&mint()).await.expect("broadcast");

        assert_eq!(
            chain.methods(),
            [
                RpcMethod::GasPrice,
                RpcMethod::EstimateGas,
                RpcMethod::TransactionCount,
                RpcMethod::SendRawTransaction,
            ]
        );
        assert_eq!(submission.nonce, 11);
        assert_eq!(submission.gas_limit, 90_000);

        let sent = chain.sent_transactions();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].nonce, 11);
        assert_eq!(sent[0].gas_limit, 90_000);
        assert_eq!(sent[0].chain_id, Some(43_113));
        assert_eq!(sent[0].value, U256::from(2u64));
    }

    #[tokio::test]
    async fn simulation_failure_signs_nothing() {
        let chain = MockChain::new();
        chain.fail(RpcMethod::EstimateGas, "execution reverted");

        let err = builder(&chain).submit(&mint()).await.expect_err("reverts");
        assert!(err.to_string().contains("execution reverted"));
        assert!(!chain.methods().contains(&RpcMethod::TransactionCount));
        assert!(chain.sent_transactions().is_empty());
    }

    #[tokio::test]
    async fn simulation_targets_the_contract() {
        let chain = MockChain::new();
        let call = mint();
        builder(&chain).submit(&call).await.expect("broadcast");

        let journal = chain.journal();
        let estimate = journal
            .iter()
            .find(|c| c.method == RpcMethod::EstimateGas)
            .expect("simulated");
        assert_eq!(estimate.to, Some(call.to));
        assert_eq!(estimate.data, call.data);
        assert!(journal.iter().all(|c| c.network == "avalancheFuji"));
    }

    #[tokio::test]
    async fn concurrent_submissions_get_distinct_nonces() {
        let chain = MockChain::new().with_nonce(4);
        let builder = builder(&chain);
        let call = mint();

        let (a, b) = tokio::join!(builder.submit(&call), builder.submit(&call));
        let mut nonces = [a.expect("first").nonce, b.expect("second").nonce];
        nonces.sort_unstable();
        assert_eq!(nonces, [4, 5]);
    }

    #[tokio::test]
    async fn reverted_receipt_is_an_error() {
        let chain = MockChain::new().with_receipt_status(false);
        let builder = builder(&chain);
        assert!(builder.confirm(B256::repeat_byte(1)).await.is_err());
    }
}
