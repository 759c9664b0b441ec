//! USD quotes for stock symbols.
//!
//! [`PriceFeed`] is the seam; [`TwelveData`] is the HTTP implementation
//! backed by the Twelve Data `/price` endpoint.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::settings::Settings;

/// Latest USD price of one stock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StockPrice {
    /// Upper-case ticker.
    pub symbol: String,
    /// Price as quoted, e.g. `"189.4100"`.
    pub usd: String,
}

impl fmt::Display for StockPrice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "The current USD price for stock {} is ${}.",
            self.symbol, self.usd
        )
    }
}

/// Source of stock quotes.
#[async_trait]
pub trait PriceFeed: Send + Sync + fmt::Debug {
    /// Latest USD price of `symbol`.
    async fn usd_price(&self, symbol: &str) -> Result<StockPrice>;
}

/// Configuration for [`TwelveData`].
#[derive(Clone)]
pub struct TwelveDataConfig {
    /// API key sent as the `apikey` query parameter.
    pub api_key: String,
    /// Base URL for the API.
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: Option<u64>,
}

impl fmt::Debug for TwelveDataConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TwelveDataConfig")
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish_non_exhaustive()
    }
}

impl TwelveDataConfig {
    /// Default API base URL.
    pub const DEFAULT_BASE_URL: &'static str = "https://api.twelvedata.com";

    /// Creates configuration from a settings source.
    ///
    /// Reads `TWELVE_DATA_API_KEY` (required) and `TWELVE_DATA_BASE_URL`.
    ///
    /// # Errors
    ///
    /// Returns a config error if no API key is set.
    pub fn from_settings(settings: &dyn Settings) -> Result<Self> {
        let api_key = settings
            .get("TWELVE_DATA_API_KEY")
            .ok_or_else(|| Error::config("TWELVE_DATA_API_KEY is not set"))?;
        let base_url = settings
            .get("TWELVE_DATA_BASE_URL")
            .unwrap_or_else(|| Self::DEFAULT_BASE_URL.to_owned());
        Ok(Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_owned(),
            timeout_secs: Some(30),
        })
    }
}

#[derive(Debug, Deserialize)]
struct PriceResponse {
    #[serde(default)]
    price: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Twelve Data quote client.
#[derive(Debug, Clone)]
pub struct TwelveData {
    config: TwelveDataConfig,
    client: Client,
}

impl TwelveData {
    /// Create a new client.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is empty or the HTTP client cannot
    /// be built.
    pub fn new(config: TwelveDataConfig) -> Result<Self> {
        if config.api_key.is_empty() {
            return Err(Error::config("Twelve Data API key is required"));
        }
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(timeout));
        }
        Ok(Self {
            config,
            client: builder.build()?,
        })
    }

    fn price_url(&self, symbol: &str) -> Result<Url> {
        Url::parse_with_params(
            &format!("{}/price", self.config.base_url),
            [("symbol", symbol), ("apikey", self.config.api_key.as_str())],
        )
        .map_err(|e| Error::config(format!("invalid Twelve Data URL: {e}")))
    }
}

#[async_trait]
impl PriceFeed for TwelveData {
    async fn usd_price(&self, symbol: &str) -> Result<StockPrice> {
        let symbol = symbol.to_uppercase();
        debug!(%symbol, "fetching quote");
        let body = self
            .client
            .get(self.price_url(&symbol)?)
            .send()
            .await?
            .text()
            .await?;
        parse_price(&symbol, &body)
    }
}

/// Interpret a `/price` response body.
///
/// The endpoint answers errors with HTTP 200 and a `message`, so a missing
/// `price` is the failure signal.
fn parse_price(symbol: &str, body: &str) -> Result<StockPrice> {
    let response: PriceResponse = serde_json::from_str(body)?;
    match response.price {
        Some(usd) => Ok(StockPrice {
            symbol: symbol.to_string(),
            usd,
        }),
        None => Err(Error::Price {
            symbol: symbol.to_string(),
            message: response
                .message
                .unwrap_or_else(|| "unknown error".to_string()),
        }),
    }
}
