//! Versioned contract interfaces and deployment addresses.
//!
//! Every ABI fragment the pipeline encodes lives here. A contract upgrade
//! means adding a `V2` interface and pointing [`Deployments`] at it; call
//! sites only see [`ContractCall`].

use std::fmt;

use alloy::primitives::utils::parse_units;
use alloy::primitives::{Address, Bytes, U256};
use alloy::sol_types::SolCall;

use crate::config::ContractsConfig;

#[allow(missing_docs)]
mod abi {
    alloy::sol! {
        /// Stock minting and redemption, first release.
        interface StockMinterV1 {
            function sendMintRequest(uint256 numOfStocks, string stock) external payable returns (bytes32 requestId);
            function sendRedeemRequest(uint256 numOfStocks, string stock) external returns (bytes32 requestId);
            function getStockHoldings(address user) external view returns (string[] stocks);
            function totalHoldings(address user, string stock) external view returns (uint256 amount);
            function getCollateralRatioAdjustedTotalBalance(uint256 balance) external view returns (uint256 adjusted);
        }

        /// Cross-chain purchase router, first release.
        interface CrossChainMinterV1 {
            function sendMessagePayLINK(uint64 destinationChainSelector, uint256 amount, uint256 numOfStocks, string stock) external returns (bytes32 messageId);
        }

        /// The slice of ERC-20 the pipeline uses.
        interface Erc20 {
            function approve(address spender, uint256 amount) external returns (bool);
            function balanceOf(address owner) external view returns (uint256);
        }
    }
}

pub use abi::{CrossChainMinterV1, Erc20, StockMinterV1};

/// Error type for contract encoding and amount conversion.
#[derive(Debug, Clone, thiserror::Error)]
#[non_exhaustive]
pub enum ContractError {
    /// A configured address does not parse.
    #[error("Invalid address for {field}: {value}")]
    InvalidAddress {
        /// Config field name.
        field: &'static str,
        /// Offending value.
        value: String,
    },

    /// The destination-chain selector is not a `uint64`.
    #[error("Invalid destination chain selector: {0}")]
    InvalidSelector(String),

    /// A human-readable amount cannot be converted to base units.
    #[error("Invalid amount '{amount}': {reason}")]
    InvalidAmount {
        /// Amount as given.
        amount: String,
        /// Conversion failure.
        reason: String,
    },

    /// Return data does not match the interface.
    #[error("Decode error: {0}")]
    Decode(String),
}

impl ContractError {
    /// Create an amount conversion error.
    #[must_use]
    pub fn invalid_amount(amount: impl Into<String>, reason: impl fmt::Display) -> Self {
        Self::InvalidAmount {
            amount: amount.into(),
            reason: reason.to_string(),
        }
    }

    /// Create a decode error.
    #[must_use]
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }
}

/// An encoded call against one contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractCall {
    /// Function name, for logs.
    pub function: &'static str,
    /// Target contract.
    pub to: Address,
    /// ABI-encoded call data.
    pub data: Bytes,
    /// Native token attached, in wei.
    pub value: U256,
}

impl ContractCall {
    fn new<C: SolCall>(to: Address, call: &C) -> Self {
        Self {
            function: C::SIGNATURE
                .split('(')
                .next()
                .unwrap_or(C::SIGNATURE),
            to,
            data: Bytes::from(call.abi_encode()),
            value: U256::ZERO,
        }
    }

    /// Attach native value.
    #[must_use]
    pub const fn with_value(mut self, value: U256) -> Self {
        self.value = value;
        self
    }
}

/// Typed contract deployments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deployments {
    /// [`StockMinterV1`] accepting native-token purchases.
    pub stock_minter: Address,
    /// [`StockMinterV1`] accepting redemptions and serving holdings.
    pub stock_registry: Address,
    /// [`CrossChainMinterV1`] router.
    pub cross_chain_minter: Address,
    /// [`Erc20`] stablecoin spent by cross-chain purchases.
    pub stablecoin: Address,
    /// Decimals of `stablecoin`.
    pub stablecoin_decimals: u8,
    /// Fixed selector of the destination network.
    pub destination_chain_selector: u64,
}

impl Deployments {
    /// Parse configured strings.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first field that does not parse.
    pub fn parse(config: &ContractsConfig) -> Result<Self, ContractError> {
        let address = |field: &'static str, value: &str| {
            value
                .trim()
                .parse::<Address>()
                .map_err(|_| ContractError::InvalidAddress {
                    field,
                    value: value.to_string(),
                })
        };

        let destination_chain_selector = config
            .destination_chain_selector
            .trim()
            .parse::<u64>()
            .map_err(|_| ContractError::InvalidSelector(config.destination_chain_selector.clone()))?;

        Ok(Self {
            stock_minter: address("stock_minter", &config.stock_minter)?,
            stock_registry: address("stock_registry", &config.stock_registry)?,
            cross_chain_minter: address("cross_chain_minter", &config.cross_chain_minter)?,
            stablecoin: address("stablecoin", &config.stablecoin)?,
            stablecoin_decimals: config.stablecoin_decimals,
            destination_chain_selector,
        })
    }

    /// `sendMintRequest(quantity, symbol)` paying `value` wei.
    #[must_use]
    pub fn mint_request(&self, quantity: U256, symbol: &str, value: U256) -> ContractCall {
        let call = StockMinterV1::sendMintRequestCall {
            numOfStocks: quantity,
            stock: symbol.to_string(),
        };
        ContractCall::new(self.stock_minter, &call).with_value(value)
    }

    /// `sendRedeemRequest(quantity, symbol)`.
    #[must_use]
    pub fn redeem_request(&self, quantity: U256, symbol: &str) -> ContractCall {
        let call = StockMinterV1::sendRedeemRequestCall {
            numOfStocks: quantity,
            stock: symbol.to_string(),
        };
        ContractCall::new(self.stock_registry, &call)
    }

    /// `approve(router, amount)` on the stablecoin.
    #[must_use]
    pub fn approve_router(&self, amount: U256) -> ContractCall {
        let call = Erc20::approveCall {
            spender: self.cross_chain_minter,
            amount,
        };
        ContractCall::new(self.stablecoin, &call)
    }

    /// `sendMessagePayLINK(selector, amount, quantity, symbol)` on the router.
    #[must_use]
    pub fn route_mint(&self, amount: U256, quantity: U256, symbol: &str) -> ContractCall {
        let call = CrossChainMinterV1::sendMessagePayLINKCall {
            destinationChainSelector: self.destination_chain_selector,
            amount,
            numOfStocks: quantity,
            stock: symbol.to_string(),
        };
        ContractCall::new(self.cross_chain_minter, &call)
    }

    /// Convert a stablecoin amount to base units.
    ///
    /// # Errors
    ///
    /// Returns an error if the amount is not a decimal within range.
    pub fn stablecoin_amount(&self, amount: &str) -> Result<U256, ContractError> {
        to_base_units(amount, self.stablecoin_decimals)
    }
}

/// Convert a native-token amount (18 decimals) to wei.
///
/// # Errors
///
/// Returns an error if the amount is not a decimal within range.
pub fn native_amount(amount: &str) -> Result<U256, ContractError> {
    to_base_units(amount, NATIVE_DECIMALS)
}

const NATIVE_DECIMALS: u8 = 18;

/// Scale `amount` by `decimals`. A fraction longer than `decimals` is
/// rejected rather than truncated.
fn to_base_units(amount: &str, decimals: u8) -> Result<U256, ContractError> {
    let fraction = amount.split_once('.').map_or(0, |(_, f)| f.len());
    if fraction > usize::from(decimals) {
        return Err(ContractError::invalid_amount(
            amount,
            format!("more than {decimals} decimal places"),
        ));
    }
    parse_units(amount, decimals)
        .map(|units| units.get_absolute())
        .map_err(|e| ContractError::invalid_amount(amount, e))
}
