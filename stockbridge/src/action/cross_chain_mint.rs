//! Buy shares paying the stablecoin from another network.

use async_trait::async_trait;

use super::{Action, BroadcastResult, Failure, spend_of};
use crate::config::NetworkRole;
use crate::contracts::Deployments;
use crate::intent::{IntentSchema, TradeIntent};
use crate::prompts::templates;
use crate::tx::{CrossChainSaga, TransactionBuilder};

/// Approve the router for the stablecoin amount, then route the purchase
/// to the destination network.
#[derive(Debug, Clone, Copy, Default)]
pub struct CrossChainMintAction;

#[async_trait]
impl Action for CrossChainMintAction {
    fn name(&self) -> &'static str {
        "SEND_CROSS_CHAIN_MINT_REQUEST"
    }

    fn similes(&self) -> &'static [&'static str] {
        &["CROSS_CHAIN_MINT_REQUEST", "MINT_WITH_USDC"]
    }

    fn description(&self) -> &'static str {
        "Buy tokenized shares with the stablecoin, routed cross-chain"
    }

    fn template(&self) -> &'static str {
        templates::MINT_WITH_STABLECOIN
    }

    fn schema(&self) -> IntentSchema {
        IntentSchema::MINT_WITH_STABLECOIN
    }

    fn role(&self) -> NetworkRole {
        NetworkRole::StablecoinSettlement
    }

    async fn execute(
        &self,
        builder: &TransactionBuilder,
        deployments: &Deployments,
        intent: &TradeIntent,
    ) -> Result<BroadcastResult, Failure> {
        let amount = deployments.stablecoin_amount(&spend_of(intent)?.amount)?;
        let mut saga = CrossChainSaga::new(&intent.symbol, intent.quantity, amount);

        match saga.run(builder, deployments).await {
            Ok(routing) => Ok(BroadcastResult::new(
                "sendMessagePayLINK",
                builder.network(),
                &routing,
                intent,
            )
            .with_approval(saga.state().approval_tx())),
            Err(e) => Err(Failure::execution(e).with_approval(saga.state().approval_tx())),
        }
    }
}

#[cfg(test)]
mod tests {
    use alloy::primitives::U256;
    use alloy::sol_types::SolCall;

    use super::*;
    use crate::action::ActionOutcome;
    use crate::action::testing::context;
    use crate::contracts::{CrossChainMinterV1, Erc20};
    use crate::wallet::mock::{MockChain, RpcMethod};

    const ACME_FOR_USDC: &str = "<response><stockSym>ACME</stockSym><stockNum>2</stockNum><spendAmount>10.5</spendAmount></response>";

    #[tokio::test]
    async fn approves_then_routes_the_same_amount() {
        let chain = MockChain::new().with_nonce(7);
        let ctx = context([ACME_FOR_USDC], &chain);

        let outcome = CrossChainMintAction
            .handle(&ctx, "buy 2 ACME with 10.5 USDC", None)
            .await;

        let ActionOutcome::Completed(result) = &outcome else {
            panic!("expected completion, got {outcome:?}");
        };
        assert_eq!(result.network, "sepolia");
        assert_eq!(result.function, "sendMessagePayLINK");
        assert!(result.approval_tx.is_some());

        let sent = chain.sent_transactions();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].nonce, 7);
        assert_eq!(sent[1].nonce, 8);

        let approve = Erc20::approveCall::abi_decode(&sent[0].input).expect("approve");
        let route =
            CrossChainMinterV1::sendMessagePayLINKCall::abi_decode(&sent[1].input).expect("route");
        assert_eq!(approve.amount, U256::from(10_500_000u64));
        assert_eq!(approve.amount, route.amount);
        assert_eq!(approve.spender, ctx.deployments().cross_chain_minter);
        assert_eq!(route.numOfStocks, U256::from(2u64));
    }

    #[tokio::test]
    async fn routing_failure_reports_the_approval() {
        let chain = MockChain::new();
        chain.fail_nth(RpcMethod::SendRawTransaction, 2, "replacement underpriced");
        let ctx = context([ACME_FOR_USDC], &chain);

        let outcome = CrossChainMintAction
            .handle(&ctx, "buy 2 ACME with 10.5 USDC", None)
            .await;

        let ActionOutcome::Failed(failure) = outcome else {
            panic!("expected failure");
        };
        assert!(failure.approval_tx.is_some());
        assert_eq!(chain.sent_transactions().len(), 1);
    }
}
