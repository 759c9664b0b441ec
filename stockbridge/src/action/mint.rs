//! Buy shares paying the native token.

use async_trait::async_trait;

use super::{Action, BroadcastResult, Failure, spend_of};
use crate::config::NetworkRole;
use crate::contracts::{Deployments, native_amount};
use crate::intent::{IntentSchema, TradeIntent};
use crate::prompts::templates;
use crate::tx::TransactionBuilder;

/// `sendMintRequest` on the native settlement network, paying the
/// extracted amount as the transaction value.
#[derive(Debug, Clone, Copy, Default)]
pub struct MintAction;

#[async_trait]
impl Action for MintAction {
    fn name(&self) -> &'static str {
        "SEND_MINT_REQUEST"
    }

    fn similes(&self) -> &'static [&'static str] {
        &["MINT_REQUEST", "SEND_STOCK_REQUEST"]
    }

    fn description(&self) -> &'static str {
        "Buy tokenized shares, paying with the native token"
    }

    fn template(&self) -> &'static str {
        templates::MINT_WITH_NATIVE
    }

    fn schema(&self) -> IntentSchema {
        IntentSchema::MINT_WITH_NATIVE
    }

    fn role(&self) -> NetworkRole {
        NetworkRole::NativeSettlement
    }

    async fn execute(
        &self,
        builder: &TransactionBuilder,
        deployments: &Deployments,
        intent: &TradeIntent,
    ) -> Result<BroadcastResult, Failure> {
        let value = native_amount(&spend_of(intent)?.amount)?;
        let call = deployments.mint_request(intent.quantity, &intent.symbol, value);
        let submission = builder.submit(&call).await?;
        Ok(BroadcastResult::new(
            call.function,
            builder.network(),
            &submission,
            intent,
        ))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use alloy::primitives::U256;
    use alloy::sol_types::SolCall;

    use super::*;
    use crate::action::testing::context;
    use crate::action::{ActionOutcome, CallbackPayload, FailureStage};
    use crate::contracts::StockMinterV1;
    use crate::wallet::mock::{MockChain, RpcMethod};

    const ACME_FOR_TWO: &str =
        "<response><stockSym>acme</stockSym><stockNum>5</stockNum><spendAmount>2</spendAmount></response>";

    #[tokio::test]
    async fn mints_with_native_value() {
        let chain = MockChain::new().with_nonce(3);
        let ctx = context([ACME_FOR_TWO], &chain);

        let seen = Arc::new(Mutex::new(Vec::<CallbackPayload>::new()));
        let sink = Arc::clone(&seen);
        let outcome = MintAction
            .handle(
                &ctx,
                "buy 5 ACME for 2 AVAX",
                Some(Box::new(move |p| sink.lock().expect("lock").push(p))),
            )
            .await;

        let ActionOutcome::Completed(result) = &outcome else {
            panic!("expected completion, got {outcome:?}");
        };
        assert_eq!(result.symbol, "ACME");
        assert_eq!(result.network, "avalancheFuji");
        assert_eq!(result.nonce, 3);

        let sent = chain.sent_transactions();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].value, U256::from(2_000_000_000_000_000_000u128));
        let call = StockMinterV1::sendMintRequestCall::abi_decode(&sent[0].input).expect("decodes");
        assert_eq!(call.numOfStocks, U256::from(5u64));
        assert_eq!(call.stock, "ACME");

        let seen = seen.lock().expect("lock");
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0], outcome.callback_payload());
    }

    #[tokio::test]
    async fn missing_amount_is_no_intent() {
        let chain = MockChain::new();
        let ctx = context(
            ["<response><stockSym>ACME</stockSym><stockNum>5</stockNum></response>"],
            &chain,
        );

        let outcome = MintAction.handle(&ctx, "buy some ACME", None).await;

        assert_eq!(outcome, ActionOutcome::NoIntent);
        assert!(chain.journal().is_empty());
    }

    #[tokio::test]
    async fn gas_price_failure_reaches_callback() {
        let chain = MockChain::new();
        chain.fail(RpcMethod::GasPrice, "node unavailable");
        let ctx = context([ACME_FOR_TWO], &chain);

        let seen = Arc::new(Mutex::new(None));
        let sink = Arc::clone(&seen);
        let outcome = MintAction
            .handle(
                &ctx,
                "buy 5 ACME for 2 AVAX",
                Some(Box::new(move |p| *sink.lock().expect("lock") = Some(p))),
            )
            .await;

        let ActionOutcome::Failed(failure) = outcome else {
            panic!("expected failure");
        };
        assert_eq!(failure.stage, FailureStage::Execution);
        assert!(chain.sent_transactions().is_empty());

        let payload = seen.lock().expect("lock").clone().expect("callback fired");
        assert!(payload.text.starts_with("Transaction failed: "));
        assert!(payload.text.contains("node unavailable"));
        assert!(payload.content.is_none());
    }
}
