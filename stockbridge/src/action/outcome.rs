//! Tagged action results.

use std::fmt;

use alloy::primitives::{B256, U256};
use serde_json::{Value, json};

use super::callback::CallbackPayload;
use crate::contracts::ContractError;
use crate::error::Error;
use crate::intent::TradeIntent;
use crate::tx::Submission;
use crate::wallet::WalletError;

/// A broadcast transaction and the intent it carried out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BroadcastResult {
    /// Contract function invoked.
    pub function: &'static str,
    /// Network the transaction was sent on.
    pub network: String,
    /// Transaction hash.
    pub tx_hash: B256,
    /// Nonce it was signed with.
    pub nonce: u64,
    /// Upper-cased symbol.
    pub symbol: String,
    /// Whole shares.
    pub quantity: U256,
    /// Preceding approval, for cross-chain purchases.
    pub approval_tx: Option<B256>,
}

impl BroadcastResult {
    /// Combine a submission with the intent it carried out.
    #[must_use]
    pub fn new(
        function: &'static str,
        network: impl Into<String>,
        submission: &Submission,
        intent: &TradeIntent,
    ) -> Self {
        Self {
            function,
            network: network.into(),
            tx_hash: submission.tx_hash,
            nonce: submission.nonce,
            symbol: intent.symbol.clone(),
            quantity: intent.quantity,
            approval_tx: None,
        }
    }

    /// Record the approval that preceded this transaction.
    #[must_use]
    pub const fn with_approval(mut self, approval_tx: Option<B256>) -> Self {
        self.approval_tx = approval_tx;
        self
    }

    /// Summary line shown to the user.
    #[must_use]
    pub fn text(&self) -> String {
        format!(
            "Sent {} for {} x{}. Transaction hash: {}",
            self.function, self.symbol, self.quantity, self.tx_hash
        )
    }

    /// Structured content: `txHash`, `stock`, `numOfStocks`.
    #[must_use]
    pub fn content(&self) -> Value {
        let mut content = json!({
            "txHash": self.tx_hash.to_string(),
            "stock": self.symbol,
            "numOfStocks": self.quantity.to_string(),
        });
        if let (Some(approval), Some(map)) = (self.approval_tx, content.as_object_mut()) {
            map.insert("approvalTxHash".into(), Value::String(approval.to_string()));
        }
        content
    }
}

/// Where in the pipeline a failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureStage {
    /// Before any transaction work: model call, wallet or client setup.
    /// The callback is not invoked.
    Initialization,
    /// Pricing, simulation, signing, broadcast or approval confirmation.
    /// The callback receives the failure message.
    Execution,
}

/// Why an action produced no transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    /// Pipeline stage that failed.
    pub stage: FailureStage,
    /// Error message.
    pub message: String,
    /// Approval already broadcast when a cross-chain purchase stopped.
    pub approval_tx: Option<B256>,
}

impl Failure {
    /// An initialization failure.
    #[must_use]
    pub fn initialization(error: impl fmt::Display) -> Self {
        Self {
            stage: FailureStage::Initialization,
            message: error.to_string(),
            approval_tx: None,
        }
    }

    /// An execution failure.
    #[must_use]
    pub fn execution(error: impl fmt::Display) -> Self {
        Self {
            stage: FailureStage::Execution,
            message: error.to_string(),
            approval_tx: None,
        }
    }

    /// Record a dangling approval.
    #[must_use]
    pub const fn with_approval(mut self, approval_tx: Option<B256>) -> Self {
        self.approval_tx = approval_tx;
        self
    }

    /// `Transaction failed: <message>`.
    #[must_use]
    pub fn text(&self) -> String {
        format!("Transaction failed: {}", self.message)
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl From<WalletError> for Failure {
    fn from(e: WalletError) -> Self {
        Self::execution(e)
    }
}

impl From<ContractError> for Failure {
    fn from(e: ContractError) -> Self {
        Self::execution(e)
    }
}

impl From<Error> for Failure {
    fn from(e: Error) -> Self {
        Self::execution(e)
    }
}

/// Result of handling one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// A transaction was broadcast.
    Completed(BroadcastResult),
    /// The message carried no usable intent. Nothing was attempted.
    NoIntent,
    /// Something broke.
    Failed(Failure),
}

impl ActionOutcome {
    /// Whether a transaction was broadcast.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }

    /// The broadcast hash, if any.
    #[must_use]
    pub const fn tx_hash(&self) -> Option<B256> {
        match self {
            Self::Completed(result) => Some(result.tx_hash),
            Self::NoIntent | Self::Failed(_) => None,
        }
    }

    /// Payload delivered through the callback.
    #[must_use]
    pub fn callback_payload(&self) -> CallbackPayload {
        match self {
            Self::Completed(result) => CallbackPayload {
                text: result.text(),
                content: Some(result.content()),
            },
            Self::NoIntent => CallbackPayload::text(""),
            Self::Failed(failure) => CallbackPayload::text(failure.text()),
        }
    }

    /// Result returned to the host.
    ///
    /// - `Completed`: `{text, content: {txHash, stock, numOfStocks}}`
    /// - `NoIntent`: `{text: "", data: {}, values: {}}`
    /// - `Failed`: `{text: "Transaction failed: <message>"}`
    #[must_use]
    pub fn to_payload(&self) -> Value {
        match self {
            Self::Completed(result) => json!({
                "text": result.text(),
                "content": result.content(),
            }),
            Self::NoIntent => json!({ "text": "", "data": {}, "values": {} }),
            Self::Failed(failure) => json!({ "text": failure.text() }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn completed() -> ActionOutcome {
        ActionOutcome::Completed(BroadcastResult {
            function: "sendMintRequest",
            network: "avalancheFuji".to_string(),
            tx_hash: B256::repeat_byte(0xab),
            nonce: 0,
            symbol: "ACME".to_string(),
            quantity: U256::from(5u64),
            approval_tx: None,
        })
    }

    #[test]
    fn completed_payload_shape() {
        let payload = completed().to_payload();
        let hash = format!("0x{}", "ab".repeat(32));

        assert_eq!(
            payload["text"],
            format!("Sent sendMintRequest for ACME x5. Transaction hash: {hash}")
        );
        assert_eq!(
            payload["content"],
            json!({ "txHash": hash, "stock": "ACME", "numOfStocks": "5" })
        );
    }

    #[test]
    fn no_intent_payload_is_empty() {
        assert_eq!(
            ActionOutcome::NoIntent.to_payload(),
            json!({ "text": "", "data": {}, "values": {} })
        );
        assert_eq!(ActionOutcome::NoIntent.tx_hash(), None);
    }

    #[test]
    fn failure_payload_has_no_hash() {
        let outcome = ActionOutcome::Failed(Failure::execution("execution reverted"));
        assert_eq!(
            outcome.to_payload(),
            json!({ "text": "Transaction failed: execution reverted" })
        );
        assert!(outcome.callback_payload().content.is_none());
        assert!(!outcome.is_completed());
    }

    #[test]
    fn approval_hash_is_reported_for_cross_chain() {
        let ActionOutcome::Completed(result) = completed() else {
            unreachable!()
        };
        let result = result.with_approval(Some(B256::repeat_byte(0x01)));
        assert!(result.content().get("approvalTxHash").is_some());
    }
}
