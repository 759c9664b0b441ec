//! Read-only lookups on one configured network: native and stablecoin
//! balances, share holdings and the collateral-adjusted rate.
//!
//! Nothing here signs or broadcasts.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use alloy::network::TransactionBuilder as _;
use alloy::primitives::utils::{format_ether, format_units};
use alloy::primitives::{Address, U256};
use alloy::rpc::types::TransactionRequest;
use alloy::sol_types::SolCall;
use serde::Serialize;
use tracing::debug;

use crate::action::ActionContext;
use crate::config::NetworkRole;
use crate::contracts::{ContractError, Deployments, Erc20, StockMinterV1};
use crate::error::Result;
use crate::wallet::{ReadClient, WalletError};

/// Native token balance of the account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NativeBalance {
    /// Balance in wei.
    pub wei: U256,
    /// Balance in whole units, e.g. `"1.5"`.
    pub formatted: String,
    /// Token symbol.
    pub symbol: String,
}

impl fmt::Display for NativeBalance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.formatted, self.symbol)
    }
}

/// Stablecoin balance of the account on one network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StablecoinBalance {
    /// Network the balance was read on.
    pub network: String,
    /// Balance in base units.
    pub raw: U256,
    /// Balance in whole units, e.g. `"12.500000"`.
    pub formatted: String,
}

impl fmt::Display for StablecoinBalance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} USDC", self.network, self.formatted)
    }
}

/// Collateral-adjusted USD value of one native token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExchangeRate {
    /// Native token symbol.
    pub symbol: String,
    /// USD per native token as reported by the registry.
    pub usd: U256,
}

impl fmt::Display for ExchangeRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "The current exchange rate for {0} to USD is {1} USD per {0}.",
            self.symbol, self.usd
        )
    }
}

/// Shares held per symbol, sorted by symbol.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Holdings {
    /// Symbol to share count.
    pub stocks: BTreeMap<String, U256>,
}

impl Holdings {
    /// Number of distinct symbols held.
    #[must_use]
    pub fn count(&self) -> usize {
        self.stocks.len()
    }
}

impl fmt::Display for Holdings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "You hold {} stock(s)", self.count())?;
        for (i, (symbol, amount)) in self.stocks.iter().enumerate() {
            f.write_str(if i == 0 { ": " } else { ", " })?;
            write!(f, "{symbol} ({amount})")?;
        }
        Ok(())
    }
}

/// Contract and balance reads for one account.
#[derive(Debug, Clone)]
pub struct QueryService {
    client: Arc<dyn ReadClient>,
    account: Address,
    deployments: Deployments,
    native_symbol: String,
}

impl QueryService {
    /// Query through `client` on behalf of `account`.
    #[must_use]
    pub fn new(client: Arc<dyn ReadClient>, account: Address, deployments: Deployments) -> Self {
        Self {
            client,
            account,
            deployments,
            native_symbol: "ETH".to_string(),
        }
    }

    /// Symbol used when reporting the native balance.
    #[must_use]
    pub fn with_native_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.native_symbol = symbol.into();
        self
    }

    /// Bind to the native settlement network of `ctx`.
    ///
    /// # Errors
    ///
    /// Returns an error if the wallet cannot be built or the network is not
    /// configured.
    pub fn from_context(ctx: &ActionContext) -> std::result::Result<Self, WalletError> {
        Self::for_role(ctx, NetworkRole::NativeSettlement)
    }

    /// Bind to the network `ctx` configures for `role`.
    ///
    /// # Errors
    ///
    /// Returns an error if the wallet cannot be built or the network is not
    /// configured.
    pub fn for_role(
        ctx: &ActionContext,
        role: NetworkRole,
    ) -> std::result::Result<Self, WalletError> {
        let wallet = ctx.wallet()?;
        let network = ctx.network_for(role);
        let client = wallet.read_client(network)?;
        let symbol = wallet
            .registry()
            .get(network)
            .map_or("ETH", |descriptor| descriptor.network().native_symbol());
        Ok(Self::new(client, wallet.address(), *ctx.deployments()).with_native_symbol(symbol))
    }

    /// Account being queried.
    #[must_use]
    pub const fn account(&self) -> Address {
        self.account
    }

    /// Network the service reads from.
    #[must_use]
    pub fn network(&self) -> &str {
        self.client.network()
    }

    /// Native token balance.
    ///
    /// # Errors
    ///
    /// Returns an error if the balance cannot be fetched.
    pub async fn native_balance(&self) -> Result<NativeBalance> {
        let wei = self.client.balance(self.account).await?;
        Ok(NativeBalance {
            wei,
            formatted: format_ether(wei),
            symbol: self.native_symbol.clone(),
        })
    }

    /// Balance of the configured stablecoin on this network.
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails or returns malformed data.
    pub async fn stablecoin_balance(&self) -> Result<StablecoinBalance> {
        let raw = self
            .read(
                self.deployments.stablecoin,
                &Erc20::balanceOfCall {
                    owner: self.account,
                },
            )
            .await?;
        let formatted = format_units(raw, self.deployments.stablecoin_decimals)
            .map_err(|e| ContractError::decode(format!("stablecoin balance {raw}: {e}")))?;
        debug!(account = %self.account, network = self.network(), %raw, "stablecoin balance fetched");
        Ok(StablecoinBalance {
            network: self.network().to_string(),
            raw,
            formatted,
        })
    }

    /// Every symbol the account holds, with its share count.
    ///
    /// # Errors
    ///
    /// Returns an error if any read fails or returns malformed data.
    pub async fn holdings(&self) -> Result<Holdings> {
        let symbols = self
            .read(
                self.deployments.stock_registry,
                &StockMinterV1::getStockHoldingsCall { user: self.account },
            )
            .await?;

        let mut holdings = Holdings::default();
        for symbol in symbols {
            if holdings.stocks.contains_key(&symbol) {
                continue;
            }
            let amount = self.holding(&symbol).await?;
            holdings.stocks.insert(symbol, amount);
        }
        debug!(account = %self.account, count = holdings.count(), "holdings fetched");
        Ok(holdings)
    }

    /// Shares of `symbol` held by the account.
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails or returns malformed data.
    pub async fn holding(&self, symbol: &str) -> Result<U256> {
        self.read(
            self.deployments.stock_registry,
            &StockMinterV1::totalHoldingsCall {
                user: self.account,
                stock: symbol.to_string(),
            },
        )
        .await
    }

    /// `balance` adjusted by the current collateral ratio.
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails or returns malformed data.
    pub async fn collateral_adjusted_rate(&self, balance: U256) -> Result<U256> {
        self.read(
            self.deployments.stock_registry,
            &StockMinterV1::getCollateralRatioAdjustedTotalBalanceCall { balance },
        )
        .await
    }

    /// USD value of one native token after the collateral adjustment.
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails or returns malformed data.
    pub async fn native_usd_rate(&self) -> Result<ExchangeRate> {
        let usd = self.collateral_adjusted_rate(U256::from(1u64)).await?;
        Ok(ExchangeRate {
            symbol: self.native_symbol.clone(),
            usd,
        })
    }

    async fn read<C: SolCall>(&self, to: Address, call: &C) -> Result<C::Return> {
        let request = TransactionRequest::default()
            .with_from(self.account)
            .with_to(to)
            .with_input(call.abi_encode());
        let output = self.client.call(&request).await?;
        C::abi_decode_returns(&output)
            .map_err(|e| ContractError::decode(format!("{}: {e}", C::SIGNATURE)).into())
    }
}
