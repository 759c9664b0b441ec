//! Everything an action needs to handle one request.

use std::sync::Arc;

use crate::chain::{ChainRegistry, EvmNetwork};
use crate::config::{NetworkRole, StockbridgeConfig};
use crate::contracts::{ContractError, Deployments};
use crate::intent::IntentExtractor;
use crate::prompts::TemplateContext;
use crate::settings::Settings;
use crate::tx::{AccountLocks, TransactionBuilder};
use crate::wallet::{Connector, EvmWallet, WalletError};

/// Shared services handed to every action.
///
/// The wallet is not part of it: [`wallet`](Self::wallet) builds a fresh
/// one per request from the current settings.
#[derive(Debug, Clone)]
pub struct ActionContext {
    settings: Arc<dyn Settings>,
    config: Arc<StockbridgeConfig>,
    deployments: Deployments,
    extractor: Arc<IntentExtractor>,
    connector: Arc<dyn Connector>,
    locks: AccountLocks,
}

impl ActionContext {
    /// Assemble a context, parsing the configured deployments.
    ///
    /// # Errors
    ///
    /// Returns an error if a configured contract address or the chain
    /// selector is malformed.
    pub fn new(
        settings: Arc<dyn Settings>,
        config: Arc<StockbridgeConfig>,
        extractor: Arc<IntentExtractor>,
        connector: Arc<dyn Connector>,
        locks: AccountLocks,
    ) -> Result<Self, ContractError> {
        let deployments = config.contracts.resolve()?;
        Ok(Self {
            settings,
            config,
            deployments,
            extractor,
            connector,
            locks,
        })
    }

    /// Loaded configuration.
    #[must_use]
    pub fn config(&self) -> &StockbridgeConfig {
        &self.config
    }

    /// Parsed contract deployments.
    #[must_use]
    pub const fn deployments(&self) -> &Deployments {
        &self.deployments
    }

    /// The intent extractor.
    #[must_use]
    pub fn extractor(&self) -> &IntentExtractor {
        &self.extractor
    }

    /// Network name configured for `role`.
    #[must_use]
    pub fn network_for(&self, role: NetworkRole) -> &str {
        self.config.networks.roles.network(role)
    }

    /// Template variables for `text`.
    #[must_use]
    pub fn template_context(&self, text: &str) -> TemplateContext {
        let mut context = TemplateContext::new(text).with_agent_name(&self.config.agent.name);
        if let Some(network) = EvmNetwork::from_name(self.network_for(NetworkRole::NativeSettlement)) {
            context = context.with_native_symbol(network.native_symbol());
        }
        context
    }

    /// Build the wallet for this request.
    ///
    /// # Errors
    ///
    /// Returns a config error if the signing credential is missing.
    pub fn wallet(&self) -> Result<EvmWallet, WalletError> {
        let registry = ChainRegistry::from_settings(&self.config.networks.evm, self.settings.as_ref());
        EvmWallet::from_settings(self.settings.as_ref(), registry, Arc::clone(&self.connector))
    }

    /// Build the wallet and resolve a builder for the network playing `role`.
    ///
    /// # Errors
    ///
    /// Returns an error if the wallet cannot be built or the role's network
    /// is not configured.
    pub fn builder(&self, role: NetworkRole) -> Result<TransactionBuilder, WalletError> {
        let wallet = self.wallet()?;
        TransactionBuilder::for_network(&wallet, self.network_for(role), self.locks.clone())
    }
}
