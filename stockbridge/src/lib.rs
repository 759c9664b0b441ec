//! Stockbridge - turn natural-language trading requests into signed EVM
//! transactions.
//!
//! A request flows through one action:
//!
//! ```text
//! text ─▶ IntentExtractor ─▶ TradeIntent ─▶ ContractCall ─▶ TransactionBuilder ─▶ ActionOutcome
//! ```
//!
//! [`AgentRuntime`](runtime::AgentRuntime) registers the actions and the
//! services they share; [`QueryService`](query::QueryService) answers
//! read-only questions about the account.

pub mod action;
pub mod chain;
pub mod chat;
pub mod config;
pub mod contracts;
pub mod error;
pub mod intent;
pub mod llms;
pub mod message;
pub mod prelude;
pub mod price;
pub mod prompts;
pub mod query;
pub mod runtime;
pub mod settings;
pub mod tx;
pub mod wallet;

pub use error::{Error, Result};
