//! Transaction construction and broadcast.
//!
//! ```text
//! ContractCall ─▶ gas price ─▶ gas limit ─▶ [account lock] nonce ─▶ sign ─▶ broadcast
//! ```
//!
//! [`TransactionBuilder`] runs the linear pipeline for one network;
//! [`CrossChainSaga`] chains an approval and a routing call through it.
//! Nothing is retried: every RPC call is attempted once.

mod builder;
mod crosschain;
mod locks;
mod pending;

pub use builder::{Submission, TransactionBuilder};
pub use crosschain::{CrossChainSaga, SagaState};
pub use locks::AccountLocks;
pub use pending::PendingTransaction;
