//! Natural-language intent extraction.
//!
//! ```text
//! user text ─▶ template ─▶ model (one call) ─▶ parse_key_value_tags
//!                                                 │
//!                              IntentSchema::accept ─▶ Some(TradeIntent) | None
//! ```
//!
//! An intent is either fully populated or absent; there is no partially
//! valid intent. Absence is a normal outcome, not an error.

mod extractor;
mod parser;

use std::collections::HashMap;
use std::fmt;

use alloy::primitives::U256;
use serde::Serialize;

pub use extractor::IntentExtractor;
pub use parser::parse_key_value_tags;

/// Tag carrying the stock symbol.
pub const SYMBOL_FIELD: &str = "stockSym";
/// Tag carrying the whole-share quantity.
pub const QUANTITY_FIELD: &str = "stockNum";
/// Tag carrying the spend amount.
pub const SPEND_FIELD: &str = "spendAmount";
/// Sentinel tag returned when the message is not a matching request.
pub const ERROR_FIELD: &str = "error";

/// Unit a spend amount is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Denomination {
    /// The settlement network's native token, 18 decimals.
    Native,
    /// The configured stablecoin.
    Stablecoin,
}

/// A validated, human-readable spend amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpendAmount {
    /// Unit of `amount`.
    pub denomination: Denomination,
    /// Non-negative decimal string as extracted, e.g. `"2"` or `"0.5"`.
    pub amount: String,
}

/// The structured interpretation of a trading request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TradeIntent {
    /// Upper-cased stock symbol.
    pub symbol: String,
    /// Whole shares.
    pub quantity: U256,
    /// Present exactly when the action spends a token.
    pub spend: Option<SpendAmount>,
}

impl fmt::Display for TradeIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} x{}", self.symbol, self.quantity)?;
        if let Some(spend) = &self.spend {
            write!(f, " for {} ({:?})", spend.amount, spend.denomination)?;
        }
        Ok(())
    }
}

/// Fields an action requires from the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntentSchema {
    spend: Option<Denomination>,
}

impl IntentSchema {
    /// Symbol, quantity and a native-token spend amount.
    pub const MINT_WITH_NATIVE: Self = Self {
        spend: Some(Denomination::Native),
    };

    /// Symbol and quantity.
    pub const REDEEM: Self = Self { spend: None };

    /// Symbol, quantity and a stablecoin spend amount.
    pub const MINT_WITH_STABLECOIN: Self = Self {
        spend: Some(Denomination::Stablecoin),
    };

    /// Denomination of the spend amount, if one is required.
    #[must_use]
    pub const fn spend(&self) -> Option<Denomination> {
        self.spend
    }

    /// Tag names that must be present and non-empty.
    #[must_use]
    pub fn required_fields(&self) -> Vec<&'static str> {
        let mut fields = vec![SYMBOL_FIELD, QUANTITY_FIELD];
        if self.spend.is_some() {
            fields.push(SPEND_FIELD);
        }
        fields
    }

    /// Turn parsed tags into an intent, or `None` if anything is missing
    /// or malformed or the error sentinel is present.
    #[must_use]
    pub fn accept(&self, fields: &HashMap<String, String>) -> Option<TradeIntent> {
        if fields.contains_key(ERROR_FIELD) {
            return None;
        }
        let field = |name: &str| fields.get(name).map(|v| v.trim()).filter(|v| !v.is_empty());

        let symbol = normalize_symbol(field(SYMBOL_FIELD)?);
        let quantity = parse_whole(field(QUANTITY_FIELD)?)?;
        let spend = match self.spend {
            Some(denomination) => {
                let amount = field(SPEND_FIELD).filter(|a| is_decimal(a))?;
                Some(SpendAmount {
                    denomination,
                    amount: amount.to_string(),
                })
            }
            None => None,
        };

        Some(TradeIntent {
            symbol,
            quantity,
            spend,
        })
    }
}

/// Upper-case a symbol. Idempotent.
#[must_use]
pub fn normalize_symbol(symbol: &str) -> String {
    symbol.trim().to_uppercase()
}

fn parse_whole(value: &str) -> Option<U256> {
    if !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    U256::from_str_radix(value, 10).ok()
}

fn is_decimal(value: &str) -> bool {
    let mut parts = value.splitn(2, '.');
    let whole = parts.next().unwrap_or_default();
    let frac = parts.next();
    let digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());

    match frac {
        None => !whole.is_empty() && digits(whole),
        Some(frac) => (!whole.is_empty() || !frac.is_empty()) && digits(whole) && digits(frac),
    }
}
