//! Approve-then-route purchase as a recorded two-step saga.
//!
//! ```text
//! Started ─▶ ApprovalSubmitted ─▶ ApprovalConfirmed ─▶ RoutingSubmitted
//! ```
//!
//! There is no rollback. If routing fails after the approval landed, the
//! allowance stays granted and the saga's state names the approval hash
//! so it can be reconciled later.

use std::fmt;

use alloy::primitives::{B256, U256};
use tracing::{info, warn};

use super::builder::{Submission, TransactionBuilder};
use crate::contracts::Deployments;
use crate::wallet::WalletError;

/// Progress of a cross-chain purchase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SagaState {
    /// Nothing submitted yet.
    Started,
    /// Approval broadcast, receipt pending.
    ApprovalSubmitted {
        /// Approval transaction hash.
        approval_tx: B256,
    },
    /// Approval included successfully; routing not yet broadcast.
    ApprovalConfirmed {
        /// Approval transaction hash.
        approval_tx: B256,
    },
    /// Routing call broadcast.
    RoutingSubmitted {
        /// Approval transaction hash.
        approval_tx: B256,
        /// Routing transaction hash.
        routing_tx: B256,
    },
}

impl SagaState {
    /// The approval hash, once one exists.
    #[must_use]
    pub const fn approval_tx(&self) -> Option<B256> {
        match self {
            Self::Started => None,
            Self::ApprovalSubmitted { approval_tx }
            | Self::ApprovalConfirmed { approval_tx }
            | Self::RoutingSubmitted { approval_tx, .. } => Some(*approval_tx),
        }
    }
}

impl fmt::Display for SagaState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Started => f.write_str("started"),
            Self::ApprovalSubmitted { approval_tx } => {
                write!(f, "approval submitted ({approval_tx})")
            }
            Self::ApprovalConfirmed { approval_tx } => {
                write!(f, "approval confirmed ({approval_tx})")
            }
            Self::RoutingSubmitted {
                approval_tx,
                routing_tx,
            } => write!(f, "routing submitted ({approval_tx} → {routing_tx})"),
        }
    }
}

/// A stablecoin purchase routed to another network.
#[derive(Debug, Clone)]
pub struct CrossChainSaga {
    symbol: String,
    quantity: U256,
    amount: U256,
    state: SagaState,
}

impl CrossChainSaga {
    /// Start a saga spending `amount` stablecoin base units on `quantity`
    /// shares of `symbol`.
    #[must_use]
    pub fn new(symbol: impl Into<String>, quantity: U256, amount: U256) -> Self {
        Self {
            symbol: symbol.into(),
            quantity,
            amount,
            state: SagaState::Started,
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> SagaState {
        self.state
    }

    /// Amount approved and routed, in base units.
    #[must_use]
    pub const fn amount(&self) -> U256 {
        self.amount
    }

    fn advance(&mut self, next: SagaState) {
        info!(
            symbol = %self.symbol,
            from = %self.state,
            to = %next,
            "cross-chain saga transition",
        );
        self.state = next;
    }

    /// Approve the router, await the approval's receipt, then submit the
    /// routing call. Both calls use the same amount.
    ///
    /// # Errors
    ///
    /// Returns the failing step's error; [`state`](Self::state) tells how
    /// far the saga got.
    pub async fn run(
        &mut self,
        builder: &TransactionBuilder,
        deployments: &Deployments,
    ) -> Result<Submission, WalletError> {
        let result = self.execute(builder, deployments).await;
        if let Err(e) = &result {
            if let Some(approval_tx) = self.state.approval_tx() {
                warn!(
                    symbol = %self.symbol,
                    %approval_tx,
                    state = %self.state,
                    error = %e,
                    "cross-chain saga stopped after approval",
                );
            }
        }
        result
    }

    async fn execute(
        &mut self,
        builder: &TransactionBuilder,
        deployments: &Deployments,
    ) -> Result<Submission, WalletError> {
        let approval = builder.submit(&deployments.approve_router(self.amount)).await?;
        let approval_tx = approval.tx_hash;
        self.advance(SagaState::ApprovalSubmitted { approval_tx });

        builder.confirm(approval_tx).await?;
        self.advance(SagaState::ApprovalConfirmed { approval_tx });

        let route = deployments.route_mint(self.amount, self.quantity, &self.symbol);
        let routing = builder.submit(&route).await?;
        self.advance(SagaState::RoutingSubmitted {
            approval_tx,
            routing_tx: routing.tx_hash,
        });

        Ok(routing)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use alloy::sol_types::SolCall;

    use super::*;
    use crate::chain::ChainRegistry;
    use crate::config::ContractsConfig;
    use crate::contracts::{CrossChainMinterV1, Erc20};
    use crate::settings::MapSettings;
    use crate::tx::AccountLocks;
    use crate::wallet::EvmWallet;
    use crate::wallet::mock::{MockChain, RpcMethod, TEST_PRIVATE_KEY};

    fn setup(chain: &MockChain) -> (TransactionBuilder, Deployments) {
        let registry = ChainRegistry::from_settings(&["sepolia".to_string()], &MapSettings::new());
        let wallet =
            EvmWallet::from_private_key(TEST_PRIVATE_KEY, registry, Arc::new(chain.connector()))
                .expect("valid key");
        let builder = TransactionBuilder::for_network(&wallet, "sepolia", AccountLocks::new())
            .expect("configured");
        let deployments = ContractsConfig::default().resolve().expect("defaults parse");
        (builder, deployments)
    }

    #[tokio::test]
    async fn approval_precedes_routing_with_the_same_amount() {
        let chain = MockChain::new().with_nonce(2);
        let (builder, deployments) = setup(&chain);
        let amount = U256::from(25_000_000u64);

        let mut saga = CrossChainSaga::new("ACME", U256::from(3u64), amount);
        let routing = saga.run(&builder, &deployments).await.expect("both submitted");

        let sent = chain.sent_transactions();
        assert_eq!(sent.len(), 2);

        let approve = Erc20::approveCall::abi_decode(&sent[0].input).expect("approval first");
        assert_eq!(approve.spender, deployments.cross_chain_minter);
        assert_eq!(approve.amount, amount);
        assert_eq!(sent[0].nonce, 2);

        let route = CrossChainMinterV1::sendMessagePayLINKCall::abi_decode(&sent[1].input)
            .expect("routing second");
        assert_eq!(route.amount, approve.amount);
        assert_eq!(route.numOfStocks, U256::from(3u64));
        assert_eq!(sent[1].nonce, 3);

        assert!(matches!(
            saga.state(),
            SagaState::RoutingSubmitted { routing_tx, .. } if routing_tx == routing.tx_hash
        ));

        let methods = chain.methods();
        let receipt = methods
            .iter()
            .position(|m| *m == RpcMethod::Receipt)
            .expect("approval awaited");
        let sends: Vec<_> = methods
            .iter()
            .enumerate()
            .filter(|(_, m)| **m == RpcMethod::SendRawTransaction)
            .map(|(i, _)| i)
            .collect();
        assert!(sends[0] < receipt && receipt < sends[1]);
    }

    #[tokio::test]
    async fn failed_approval_never_routes() {
        let chain = MockChain::new();
        chain.fail(RpcMethod::EstimateGas, "ERC20: insufficient balance");
        let (builder, deployments) = setup(&chain);

        let mut saga = CrossChainSaga::new("ACME", U256::from(1u64), U256::from(1u64));
        assert!(saga.run(&builder, &deployments).await.is_err());
        assert_eq!(saga.state(), SagaState::Started);
        assert!(chain.sent_transactions().is_empty());
    }

    #[tokio::test]
    async fn reverted_approval_stops_the_saga() {
        let chain = MockChain::new().with_receipt_status(false);
        let (builder, deployments) = setup(&chain);

        let mut saga = CrossChainSaga::new("ACME", U256::from(1u64), U256::from(1u64));
        assert!(saga.run(&builder, &deployments).await.is_err());
        assert!(matches!(saga.state(), SagaState::ApprovalSubmitted { .. }));
        assert_eq!(chain.sent_transactions().len(), 1);
    }

    #[tokio::test]
    async fn routing_failure_keeps_the_approval_on_record() {
        let chain = MockChain::new();
        chain.fail_nth(RpcMethod::EstimateGas, 2, "execution reverted");
        let (builder, deployments) = setup(&chain);

        let mut saga = CrossChainSaga::new("ACME", U256::from(1u64), U256::from(1u64));
        assert!(saga.run(&builder, &deployments).await.is_err());
        assert!(matches!(saga.state(), SagaState::ApprovalConfirmed { .. }));
        assert!(saga.state().approval_tx().is_some());
    }
}
