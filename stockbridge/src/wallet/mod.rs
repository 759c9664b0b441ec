//! Wallet abstraction for the trading pipeline.
//!
//! One signing credential, many networks. The wallet owns the account and
//! the [`ChainRegistry`](crate::chain::ChainRegistry) and builds clients on
//! demand:
//!
//! ```text
//! Settings (EVM_PRIVATE_KEY, *_PROVIDER_<NAME>)
//!   → ChainRegistry (name → NetworkDescriptor)
//!     → EvmWallet::read_client(name)    → Arc<dyn ReadClient>
//!     → EvmWallet::signing_client(name) → SigningClient
//! ```

mod client;
mod error;
mod evm;
pub mod mock;
mod signing;

pub use client::{Connector, HttpConnector, ReadClient, RpcClient};
pub use error::WalletError;
pub use evm::EvmWallet;
pub use signing::{SignedTransaction, SigningClient};
