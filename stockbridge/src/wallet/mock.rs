//! Scripted chain clients for testing.
//!
//! [`MockChain`] plays every configured network at once: it answers RPC
//! calls from fixed values, journals each call in order, and can be told
//! to fail the n-th occurrence of a given method.
//!
//! # Example
//!
//! ```rust,ignore
//! let chain = MockChain::new().with_gas_limit(90_000);
//! chain.fail(RpcMethod::EstimateGas, "execution reverted");
//! let connector = Arc::new(chain.connector());
//! ```

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use alloy::consensus::{TxEnvelope, TxLegacy};
use alloy::eips::eip2718::Decodable2718;
use alloy::primitives::{Address, B256, Bytes, U256, address, keccak256};
use alloy::rpc::types::TransactionRequest;
use async_trait::async_trait;

use super::WalletError;
use super::client::{Connector, ReadClient};
use crate::chain::NetworkDescriptor;

/// Well-known development key (first account of the standard test mnemonic).
pub const TEST_PRIVATE_KEY: &str =
    "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

/// Address of [`TEST_PRIVATE_KEY`].
pub const TEST_ADDRESS: Address = address!("f39fd6e51aad88f6f4ce6ab8827279cfffb92266");

/// RPC methods that can be scripted to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RpcMethod {
    /// `eth_gasPrice`.
    GasPrice,
    /// `eth_estimateGas`.
    EstimateGas,
    /// `eth_getTransactionCount` at the pending tag.
    TransactionCount,
    /// `eth_sendRawTransaction`.
    SendRawTransaction,
    /// `eth_call`.
    Call,
    /// `eth_getBalance`.
    Balance,
    /// Receipt polling.
    Receipt,
}

/// One journaled RPC call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpcCall {
    /// Network the call was made on.
    pub network: String,
    /// Method invoked.
    pub method: RpcMethod,
    /// Target contract, for simulation and reads.
    pub to: Option<Address>,
    /// Call data or raw transaction bytes.
    pub data: Bytes,
}

#[derive(Debug)]
struct MockState {
    gas_price: u128,
    gas_limit: u64,
    base_nonce: u64,
    balance: U256,
    receipt_status: bool,
    accepted: Vec<Bytes>,
    call_responses: VecDeque<Bytes>,
    failures: HashMap<RpcMethod, Vec<(usize, String)>>,
    seen: HashMap<RpcMethod, usize>,
    journal: Vec<RpcCall>,
}

impl Default for MockState {
    fn default() -> Self {
        Self {
            gas_price: 25_000_000_000,
            gas_limit: 150_000,
            base_nonce: 0,
            balance: U256::ZERO,
            receipt_status: true,
            accepted: Vec::new(),
            call_responses: VecDeque::new(),
            failures: HashMap::new(),
            seen: HashMap::new(),
            journal: Vec::new(),
        }
    }
}

/// Shared, scripted chain state.
#[derive(Debug, Clone, Default)]
pub struct MockChain {
    state: Arc<Mutex<MockState>>,
}

impl MockChain {
    /// Create a chain with default gas price, gas limit and nonce.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Set the gas price answered by `eth_gasPrice`.
    #[must_use]
    pub fn with_gas_price(self, gas_price: u128) -> Self {
        self.lock().gas_price = gas_price;
        self
    }

    /// Set the gas limit answered by `eth_estimateGas`.
    #[must_use]
    pub fn with_gas_limit(self, gas_limit: u64) -> Self {
        self.lock().gas_limit = gas_limit;
        self
    }

    /// Set the nonce before any transaction is sent.
    #[must_use]
    pub fn with_nonce(self, nonce: u64) -> Self {
        self.lock().base_nonce = nonce;
        self
    }

    /// Set the balance answered by `eth_getBalance`.
    #[must_use]
    pub fn with_balance(self, balance: U256) -> Self {
        self.lock().balance = balance;
        self
    }

    /// Set whether awaited receipts report success.
    #[must_use]
    pub fn with_receipt_status(self, success: bool) -> Self {
        self.lock().receipt_status = success;
        self
    }

    /// Queue a response for the next `eth_call`.
    pub fn push_call_response(&self, data: impl Into<Bytes>) {
        self.lock().call_responses.push_back(data.into());
    }

    /// Fail every call to `method`.
    pub fn fail(&self, method: RpcMethod, message: impl Into<String>) {
        self.fail_nth(method, 0, message);
    }

    /// Fail the `occurrence`-th call (1-based) to `method`; 0 fails all.
    pub fn fail_nth(&self, method: RpcMethod, occurrence: usize, message: impl Into<String>) {
        self.lock()
            .failures
            .entry(method)
            .or_default()
            .push((occurrence, message.into()));
    }

    /// A connector handing out clients backed by this chain.
    #[must_use]
    pub fn connector(&self) -> MockConnector {
        MockConnector {
            chain: self.clone(),
        }
    }

    /// Every call made so far, in order.
    #[must_use]
    pub fn journal(&self) -> Vec<RpcCall> {
        self.lock().journal.clone()
    }

    /// Methods called so far, in order.
    #[must_use]
    pub fn methods(&self) -> Vec<RpcMethod> {
        self.lock().journal.iter().map(|c| c.method).collect()
    }

    /// Decoded transactions accepted by `eth_sendRawTransaction`, in order.
    #[must_use]
    pub fn sent_transactions(&self) -> Vec<TxLegacy> {
        self.lock()
            .accepted
            .iter()
            .filter_map(|raw| TxEnvelope::decode_2718(&mut &raw[..]).ok())
            .filter_map(|envelope| envelope.as_legacy().map(|signed| signed.tx().clone()))
            .collect()
    }

    fn record(
        &self,
        network: &str,
        method: RpcMethod,
        to: Option<Address>,
        data: Bytes,
    ) -> Result<MutexGuard<'_, MockState>, WalletError> {
        let mut state = self.lock();
        state.journal.push(RpcCall {
            network: network.to_string(),
            method,
            to,
            data,
        });
        let seen = {
            let count = state.seen.entry(method).or_default();
            *count += 1;
            *count
        };
        let failure = state.failures.get(&method).and_then(|plans| {
            plans
                .iter()
                .find(|(occurrence, _)| *occurrence == 0 || *occurrence == seen)
                .map(|(_, message)| message.clone())
        });
        match failure {
            Some(message) => Err(match method {
                RpcMethod::EstimateGas
                | RpcMethod::SendRawTransaction
                | RpcMethod::Receipt => WalletError::transaction(message),
                _ => WalletError::provider(message),
            }),
            None => Ok(state),
        }
    }
}

/// [`Connector`] over a [`MockChain`].
#[derive(Debug, Clone)]
pub struct MockConnector {
    chain: MockChain,
}

impl Connector for MockConnector {
    fn connect(&self, network: &NetworkDescriptor) -> Result<Arc<dyn ReadClient>, WalletError> {
        Ok(Arc::new(MockClient {
            network: network.name().to_string(),
            chain: self.chain.clone(),
        }))
    }
}

/// [`ReadClient`] answering from a [`MockChain`].
#[derive(Debug, Clone)]
pub struct MockClient {
    network: String,
    chain: MockChain,
}

#[async_trait]
impl ReadClient for MockClient {
    fn network(&self) -> &str {
        &self.network
    }

    async fn gas_price(&self) -> Result<u128, WalletError> {
        let state = self
            .chain
            .record(&self.network, RpcMethod::GasPrice, None, Bytes::new())?;
        Ok(state.gas_price)
    }

    async fn estimate_gas(&self, tx: &TransactionRequest) -> Result<u64, WalletError> {
        let to = tx.to.and_then(|kind| kind.to().copied());
        let data = tx.input.input().cloned().unwrap_or_default();
        let state = self
            .chain
            .record(&self.network, RpcMethod::EstimateGas, to, data)?;
        Ok(state.gas_limit)
    }

    async fn pending_transaction_count(&self, _address: Address) -> Result<u64, WalletError> {
        let state =
            self.chain
                .record(&self.network, RpcMethod::TransactionCount, None, Bytes::new())?;
        Ok(state.base_nonce + state.accepted.len() as u64)
    }

    async fn send_raw_transaction(&self, raw: &[u8]) -> Result<B256, WalletError> {
        let mut state = self.chain.record(
            &self.network,
            RpcMethod::SendRawTransaction,
            None,
            Bytes::copy_from_slice(raw),
        )?;
        state.accepted.push(Bytes::copy_from_slice(raw));
        Ok(keccak256(raw))
    }

    async fn call(&self, tx: &TransactionRequest) -> Result<Bytes, WalletError> {
        let to = tx.to.and_then(|kind| kind.to().copied());
        let data = tx.input.input().cloned().unwrap_or_default();
        let mut state = self.chain.record(&self.network, RpcMethod::Call, to, data)?;
        state
            .call_responses
            .pop_front()
            .ok_or_else(|| WalletError::provider("eth_call failed: no scripted response"))
    }

    async fn balance(&self, address: Address) -> Result<U256, WalletError> {
        let state = self.chain.record(
            &self.network,
            RpcMethod::Balance,
            Some(address),
            Bytes::new(),
        )?;
        Ok(state.balance)
    }

    async fn wait_for_receipt(&self, hash: B256) -> Result<bool, WalletError> {
        let state = self.chain.record(
            &self.network,
            RpcMethod::Receipt,
            None,
            Bytes::copy_from_slice(hash.as_slice()),
        )?;
        Ok(state.receipt_status)
    }
}
