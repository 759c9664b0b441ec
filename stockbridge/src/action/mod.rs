//! Trading actions and their single error boundary.
//!
//! Every action follows the same path:
//!
//! ```text
//! text ─▶ extract intent ──none──▶ NoIntent
//!              │
//!              ▼
//!        resolve wallet + clients ──err──▶ Failed(Initialization)
//!              │
//!              ▼
//!           execute ──err──▶ Failed(Execution) + callback
//!              │
//!              ▼
//!        Completed + callback
//! ```

mod callback;
mod context;
mod cross_chain_mint;
mod mint;
mod outcome;
mod redeem;

use async_trait::async_trait;
use tracing::{error, info};

pub use callback::{Callback, CallbackPayload};
pub use context::ActionContext;
pub use cross_chain_mint::CrossChainMintAction;
pub use mint::MintAction;
pub use outcome::{ActionOutcome, BroadcastResult, Failure, FailureStage};
pub use redeem::RedeemAction;

use crate::config::NetworkRole;
use crate::contracts::Deployments;
use crate::intent::{IntentSchema, SpendAmount, TradeIntent};
use crate::tx::TransactionBuilder;

/// A trading action the runtime can dispatch to.
#[async_trait]
pub trait Action: Send + Sync + std::fmt::Debug {
    /// Canonical name, e.g. `SEND_MINT_REQUEST`.
    fn name(&self) -> &'static str;

    /// Alternative names the runtime also matches.
    fn similes(&self) -> &'static [&'static str];

    /// One-line description.
    fn description(&self) -> &'static str;

    /// Extraction template.
    fn template(&self) -> &'static str;

    /// Fields the intent must carry.
    fn schema(&self) -> IntentSchema;

    /// Network the action transacts on.
    fn role(&self) -> NetworkRole;

    /// Carry out a validated intent.
    async fn execute(
        &self,
        builder: &TransactionBuilder,
        deployments: &Deployments,
        intent: &TradeIntent,
    ) -> Result<BroadcastResult, Failure>;

    /// Whether `name` refers to this action.
    fn matches(&self, name: &str) -> bool {
        self.name().eq_ignore_ascii_case(name)
            || self.similes().iter().any(|s| s.eq_ignore_ascii_case(name))
    }

    /// Run the whole pipeline for `text`. Never returns an error; every
    /// failure becomes an [`ActionOutcome`].
    async fn handle(
        &self,
        ctx: &ActionContext,
        text: &str,
        callback: Option<Callback>,
    ) -> ActionOutcome {
        let action = self.name();

        let intent = match ctx
            .extractor()
            .extract(self.template(), &ctx.template_context(text), &self.schema())
            .await
        {
            Ok(Some(intent)) => intent,
            Ok(None) => {
                info!(action, "no trade intent found");
                return ActionOutcome::NoIntent;
            }
            Err(e) => {
                error!(action, error = %e, "intent extraction failed");
                return ActionOutcome::Failed(Failure::initialization(e));
            }
        };

        let builder = match ctx.builder(self.role()) {
            Ok(builder) => builder,
            Err(e) => {
                error!(action, role = %self.role(), error = %e, "failed to initialize wallet");
                return ActionOutcome::Failed(Failure::initialization(e));
            }
        };

        let outcome = match self.execute(&builder, ctx.deployments(), &intent).await {
            Ok(result) => ActionOutcome::Completed(result),
            Err(failure) => {
                error!(
                    action,
                    network = builder.network(),
                    error = %failure,
                    approval_tx = ?failure.approval_tx,
                    "action failed",
                );
                ActionOutcome::Failed(failure)
            }
        };

        if let Some(callback) = callback {
            callback(outcome.callback_payload());
        }
        outcome
    }
}

fn spend_of(intent: &TradeIntent) -> Result<&SpendAmount, Failure> {
    intent
        .spend
        .as_ref()
        .ok_or_else(|| Failure::execution("intent carries no spend amount"))
}


#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    use super::testing::context;
    use super::*;
    use crate::config::StockbridgeConfig;
    use crate::intent::IntentExtractor;
    use crate::llms::MockProvider;
    use crate::prompts::PromptEngine;
    use crate::settings::MapSettings;
    use crate::tx::AccountLocks;
    use crate::wallet::mock::MockChain;

    #[tokio::test]
    async fn missing_key_fails_initialization_without_callback() {
        let chain = MockChain::new();
        let ctx = ActionContext::new(
            Arc::new(MapSettings::new()),
            Arc::new(StockbridgeConfig::default()),
            Arc::new(IntentExtractor::new(Arc::new(MockProvider::new([
                "<stockSym>ACME</stockSym><stockNum>1</stockNum>",
            ])))),
            Arc::new(chain.connector()),
            AccountLocks::new(),
        )
        .expect("default deployments parse");

        let fired = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&fired);
        let outcome = RedeemAction
            .handle(
                &ctx,
                "sell 1 ACME",
                Some(Box::new(move |_| flag.store(true, Ordering::SeqCst))),
            )
            .await;

        let ActionOutcome::Failed(failure) = outcome else {
            panic!("expected failure");
        };
        assert_eq!(failure.stage, FailureStage::Initialization);
        assert!(!fired.load(Ordering::SeqCst));
        assert!(chain.journal().is_empty());
    }

    #[tokio::test]
    async fn error_sentinel_is_no_intent() {
        let chain = MockChain::new();
        let ctx = context(
            ["<response><error>Not a stock sell request</error></response>"],
            &chain,
        );

        let outcome = RedeemAction.handle(&ctx, "what's the weather", None).await;

        assert_eq!(outcome, ActionOutcome::NoIntent);
        assert!(chain.journal().is_empty());
    }

    #[test]
    fn native_symbol_follows_settlement_network() {
        let ctx = context(Vec::<String>::new(), &MockChain::new());
        let rendered = PromptEngine::new()
            .render(MintAction.template(), &ctx.template_context("buy"))
            .expect("renders");
        assert!(rendered.contains("amount_AVAX"));
    }
}
