//! A transaction being resolved field by field.

use alloy::consensus::TxLegacy;
use alloy::network::TransactionBuilder as _;
use alloy::primitives::{Address, Bytes, TxKind, U256};
use alloy::rpc::types::TransactionRequest;

use crate::contracts::ContractCall;
use crate::wallet::WalletError;

/// Fields are filled in order: call data and value at creation, then gas
/// price, gas limit and nonce. Signing needs all of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTransaction {
    /// Target contract.
    pub to: Address,
    /// ABI-encoded call data.
    pub input: Bytes,
    /// Native value in wei.
    pub value: U256,
    /// Chain the signature is bound to.
    pub chain_id: u64,
    /// Gas price in wei.
    pub gas_price: Option<u128>,
    /// Gas limit from simulation.
    pub gas_limit: Option<u64>,
    /// Pending-inclusive account nonce.
    pub nonce: Option<u64>,
}

impl PendingTransaction {
    /// Start from an encoded call.
    #[must_use]
    pub fn new(call: &ContractCall, chain_id: u64) -> Self {
        Self {
            to: call.to,
            input: call.data.clone(),
            value: call.value,
            chain_id,
            gas_price: None,
            gas_limit: None,
            nonce: None,
        }
    }

    /// The simulation request (sender, target, data, value).
    #[must_use]
    pub fn simulation(&self, from: Address) -> TransactionRequest {
        TransactionRequest::default()
            .with_from(from)
            .with_to(self.to)
            .with_input(self.input.clone())
            .with_value(self.value)
    }

    /// Whether every field is resolved.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.gas_price.is_some() && self.gas_limit.is_some() && self.nonce.is_some()
    }

    /// Convert into an unsigned legacy transaction.
    ///
    /// # Errors
    ///
    /// Returns a transaction error naming the first unresolved field.
    pub fn into_unsigned(self) -> Result<TxLegacy, WalletError> {
        let missing = |field: &str| WalletError::transaction(format!("{field} not resolved before signing"));
        Ok(TxLegacy {
            chain_id: Some(self.chain_id),
            nonce: self.nonce.ok_or_else(|| missing("nonce"))?,
            gas_price: self.gas_price.ok_or_else(|| missing("gas price"))?,
            gas_limit: self.gas_limit.ok_or_else(|| missing("gas limit"))?,
            to: TxKind::Call(self.to),
            value: self.value,
            input: self.input,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call() -> ContractCall {
        ContractCall {
            function: "sendMintRequest",
            to: Address::repeat_byte(0xaa),
            data: Bytes::from_static(&[1, 2, 3, 4]),
            value: U256::from(9u64),
        }
    }

    #[test]
    fn incomplete_transactions_are_refused() {
        let mut tx = PendingTransaction::new(&call(), 43_113);
        tx.gas_price = Some(1);
        tx.gas_limit = Some(21_000);
        assert!(!tx.is_complete());

        let err = tx.into_unsigned().expect_err("nonce missing");
        assert!(err.to_string().contains("nonce"));
    }

    #[test]
    fn complete_transaction_converts() {
        let mut tx = PendingTransaction::new(&call(), 43_113);
        tx.gas_price = Some(25);
        tx.gas_limit = Some(100_000);
        tx.nonce = Some(3);
        assert!(tx.is_complete());

        let legacy = tx.into_unsigned().expect("complete");
        assert_eq!(legacy.chain_id, Some(43_113));
        assert_eq!(legacy.nonce, 3);
        assert_eq!(legacy.value, U256::from(9u64));
        assert_eq!(legacy.to, TxKind::Call(Address::repeat_byte(0xaa)));
    }

    #[test]
    fn simulation_carries_sender_and_value() {
        let from = Address::repeat_byte(0x01);
        let request = PendingTransaction::new(&call(), 1).simulation(from);
        assert_eq!(request.from, Some(from));
        assert_eq!(request.value, Some(U256::from(9u64)));
        assert_eq!(request.to, Some(TxKind::Call(Address::repeat_byte(0xaa))));
    }
}
