//! The host-facing entry point: registered actions plus the services they
//! share.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::action::{
    Action, ActionContext, ActionOutcome, Callback, CrossChainMintAction, MintAction, RedeemAction,
};
use crate::chat::SharedChatProvider;
use crate::config::{IssueLevel, StockbridgeConfig};
use crate::error::{Error, Result};
use crate::intent::IntentExtractor;
use crate::price::{PriceFeed, StockPrice};
use crate::query::QueryService;
use crate::settings::Settings;
use crate::tx::AccountLocks;
use crate::wallet::{Connector, HttpConnector, WalletError};

/// Dispatches trading requests to actions.
///
/// One runtime per process: its [`AccountLocks`] serialize nonce use for
/// every action it runs.
#[derive(Debug, Clone)]
pub struct AgentRuntime {
    context: ActionContext,
    actions: Vec<Arc<dyn Action>>,
}

impl AgentRuntime {
    /// Create a runtime connecting to networks over HTTP.
    ///
    /// # Errors
    ///
    /// Returns a config error if `config` has error-level issues.
    pub fn new(
        settings: Arc<dyn Settings>,
        config: StockbridgeConfig,
        provider: SharedChatProvider,
    ) -> Result<Self> {
        Self::with_connector(settings, config, provider, Arc::new(HttpConnector))
    }

    /// Create a runtime with a custom chain connector.
    ///
    /// # Errors
    ///
    /// Returns a config error if `config` has error-level issues.
    pub fn with_connector(
        settings: Arc<dyn Settings>,
        config: StockbridgeConfig,
        provider: SharedChatProvider,
        connector: Arc<dyn Connector>,
    ) -> Result<Self> {
        let issues = config.validate();
        for issue in &issues {
            match issue.level {
                IssueLevel::Warning => warn!(%issue, "configuration warning"),
                IssueLevel::Error => error!(%issue, "configuration error"),
            }
        }
        if let Some(issue) = issues.iter().find(|i| i.level == IssueLevel::Error) {
            return Err(Error::config(issue.to_string()));
        }

        let extractor = IntentExtractor::new(provider).with_model_config(&config.model);
        let context = ActionContext::new(
            settings,
            Arc::new(config),
            Arc::new(extractor),
            connector,
            AccountLocks::new(),
        )?;

        let actions: Vec<Arc<dyn Action>> = vec![
            Arc::new(MintAction),
            Arc::new(RedeemAction),
            Arc::new(CrossChainMintAction),
        ];
        info!(
            actions = ?actions.iter().map(|a| a.name()).collect::<Vec<_>>(),
            "runtime ready",
        );
        Ok(Self { context, actions })
    }

    /// Registered actions.
    #[must_use]
    pub fn actions(&self) -> &[Arc<dyn Action>] {
        &self.actions
    }

    /// Find an action by name or simile.
    #[must_use]
    pub fn action(&self, name: &str) -> Option<&Arc<dyn Action>> {
        self.actions.iter().find(|a| a.matches(name))
    }

    /// Shared action context.
    #[must_use]
    pub const fn context(&self) -> &ActionContext {
        &self.context
    }

    /// Run the action called `name` on `text`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownAction`] if no action matches. Everything
    /// that happens inside the action is reported through the outcome.
    pub async fn dispatch(
        &self,
        name: &str,
        text: &str,
        callback: Option<Callback>,
    ) -> Result<ActionOutcome> {
        let action = self
            .action(name)
            .ok_or_else(|| Error::UnknownAction(name.to_string()))?;
        debug!(action = action.name(), "dispatching");
        Ok(action.handle(&self.context, text, callback).await)
    }

    /// Extract a stock symbol from `text`.
    ///
    /// # Errors
    ///
    /// Returns an error if the model call fails.
    pub async fn lookup_symbol(&self, text: &str) -> Result<Option<String>> {
        self.context
            .extractor()
            .extract_symbol(&self.context.template_context(text))
            .await
    }

    /// Read-only queries on the native settlement network.
    ///
    /// # Errors
    ///
    /// Returns an error if the wallet cannot be built.
    pub fn query(&self) -> std::result::Result<QueryService, WalletError> {
        QueryService::from_context(&self.context)
    }

    /// Quote the stock named in `text` through `feed`.
    ///
    /// Returns `None` when no symbol is recognized.
    ///
    /// # Errors
    ///
    /// Returns an error if the model call or the quote fails.
    pub async fn stock_price(
        &self,
        feed: &dyn PriceFeed,
        text: &str,
    ) -> Result<Option<StockPrice>> {
        match self.lookup_symbol(text).await? {
            Some(symbol) => feed.usd_price(&symbol).await.map(Some),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::llms::MockProvider;
    use crate::settings::MapSettings;
    use crate::wallet::mock::MockChain;

    #[derive(Debug, Default)]
    struct FixedFeed {
        asked: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl PriceFeed for FixedFeed {
        async fn usd_price(&self, symbol: &str) -> Result<StockPrice> {
            self.asked.lock().expect("lock").push(symbol.to_string());
            Ok(StockPrice {
                symbol: symbol.to_string(),
                usd: "12.50".to_string(),
            })
        }
    }

    fn runtime(config: StockbridgeConfig) -> Result<AgentRuntime> {
        AgentRuntime::with_connector(
            Arc::new(MapSettings::new()),
            config,
            Arc::new(MockProvider::new(["<stockSym>acme</stockSym>"])),
            Arc::new(MockChain::new().connector()),
        )
    }

    #[test]
    fn finds_actions_by_name_or_simile() {
        let runtime = runtime(StockbridgeConfig::default()).expect("valid config");

        assert_eq!(runtime.actions().len(), 3);
        assert_eq!(
            runtime.action("MINT_REQUEST").map(|a| a.name()),
            Some("SEND_MINT_REQUEST")
        );
        assert_eq!(
            runtime.action("SEND_CROSS_CHAIN_MINT_REQUEST").map(|a| a.name()),
            Some("SEND_CROSS_CHAIN_MINT_REQUEST")
        );
        assert!(runtime.action("TRANSFER").is_none());
    }

    #[tokio::test]
    async fn unknown_action_is_an_error() {
        let runtime = runtime(StockbridgeConfig::default()).expect("valid config");
        let err = runtime
            .dispatch("TRANSFER", "send 1 ETH", None)
            .await
            .expect_err("not registered");
        assert!(matches!(err, Error::UnknownAction(_)));
    }

    #[test]
    fn role_outside_network_list_is_rejected() {
        let mut config = StockbridgeConfig::default();
        config.networks.roles.stablecoin_settlement = "base".to_string();
        let err = runtime(config).expect_err("base is not configured");
        assert!(matches!(err, Error::Config(_)));
    }

    #[tokio::test]
    async fn symbol_lookup_is_upper_cased() {
        let runtime = runtime(StockbridgeConfig::default()).expect("valid config");
        let symbol = runtime.lookup_symbol("how is acme doing").await.expect("model ok");
        assert_eq!(symbol.as_deref(), Some("ACME"));
    }

    #[tokio::test]
    async fn price_is_quoted_for_the_recognized_symbol() {
        let runtime = runtime(StockbridgeConfig::default()).expect("valid config");
        let feed = FixedFeed::default();

        let price = runtime
            .stock_price(&feed, "what does acme trade at")
            .await
            .expect("quoted")
            .expect("symbol found");

        assert_eq!(price.to_string(), "The current USD price for stock ACME is $12.50.");
        assert_eq!(*feed.asked.lock().expect("lock"), ["ACME"]);
    }

    #[tokio::test]
    async fn no_symbol_skips_the_quote() {
        let runtime = AgentRuntime::with_connector(
            Arc::new(MapSettings::new()),
            StockbridgeConfig::default(),
            Arc::new(MockProvider::new(["I could not find a ticker."])),
            Arc::new(MockChain::new().connector()),
        )
        .expect("valid config");
        let feed = FixedFeed::default();

        let price = runtime.stock_price(&feed, "hello").await.expect("model ok");

        assert!(price.is_none());
        assert!(feed.asked.lock().expect("lock").is_empty());
    }
}
