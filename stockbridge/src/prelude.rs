//! Prelude module for convenient imports.
//!
//! # Usage
//!
//! ```rust,ignore
//! use stockbridge::prelude::*;
//! ```

#[cfg(feature = "openai")]
pub use crate::llms::{OpenAI, OpenAIConfig};

pub use crate::action::{
    Action, ActionContext, ActionOutcome, BroadcastResult, Callback, CallbackPayload,
    CrossChainMintAction, Failure, FailureStage, MintAction, RedeemAction,
};
pub use crate::chain::{ChainRegistry, EvmNetwork, NetworkDescriptor};
pub use crate::chat::{ChatProvider, ChatProviderExt, ChatRequest, ChatResponse, SharedChatProvider};
pub use crate::config::{ConfigIssue, IssueLevel, NetworkRole, NetworkRoles, StockbridgeConfig};
pub use crate::contracts::{ContractCall, ContractError, Deployments};
pub use crate::error::{Error, LlmError, Result, WalletError};
pub use crate::intent::{IntentExtractor, IntentSchema, TradeIntent};
pub use crate::llms::MockProvider;
pub use crate::message::{Message, Role};
pub use crate::price::{PriceFeed, StockPrice, TwelveData, TwelveDataConfig};
pub use crate::query::{ExchangeRate, Holdings, NativeBalance, QueryService, StablecoinBalance};
pub use crate::runtime::AgentRuntime;
pub use crate::settings::{EnvSettings, LayeredSettings, MapSettings, Settings};
pub use crate::tx::{AccountLocks, CrossChainSaga, SagaState, Submission, TransactionBuilder};
pub use crate::wallet::{Connector, EvmWallet, HttpConnector, ReadClient};
