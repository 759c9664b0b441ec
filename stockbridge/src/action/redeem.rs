//! Sell shares back.

use async_trait::async_trait;

use super::{Action, BroadcastResult, Failure};
use crate::config::NetworkRole;
use crate::contracts::Deployments;
use crate::intent::{IntentSchema, TradeIntent};
use crate::prompts::templates;
use crate::tx::TransactionBuilder;

/// `sendRedeemRequest` on the native settlement network.
#[derive(Debug, Clone, Copy, Default)]
pub struct RedeemAction;

#[async_trait]
impl Action for RedeemAction {
    fn name(&self) -> &'static str {
        "SEND_REDEEM_REQUEST"
    }

    fn similes(&self) -> &'static [&'static str] {
        &["REDEEM_REQUEST"]
    }

    fn description(&self) -> &'static str {
        "Sell tokenized shares back for the native token"
    }

    fn template(&self) -> &'static str {
        templates::REDEEM
    }

    fn schema(&self) -> IntentSchema {
        IntentSchema::REDEEM
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
        let call = deployments.redeem_request(intent.quantity, &intent.symbol);
        let submission = builder.submit(&call).await?;
        Ok(BroadcastResult::new(
            call.function,
            builder.network(),
            &submission,
            intent,
        ))
    }
}
