//! Ordered name → [`NetworkDescriptor`] map built from configuration.

use tracing::{info, warn};

use super::{EvmNetwork, NetworkDescriptor};
use crate::settings::Settings;
use crate::wallet::WalletError;

/// Networks used when none are configured.
pub const DEFAULT_NETWORKS: [&str; 2] = ["mainnet", "base"];

/// The configured networks, in configuration order.
///
/// Unknown names are skipped with a warning rather than failing the
/// whole registry.
#[derive(Debug, Clone, Default)]
pub struct ChainRegistry {
    networks: Vec<NetworkDescriptor>,
}

impl ChainRegistry {
    /// Build the registry from configured names and endpoint overrides.
    ///
    /// An empty `names` list falls back to [`DEFAULT_NETWORKS`].
    #[must_use]
    pub fn from_settings(names: &[String], settings: &dyn Settings) -> Self {
        let defaulted: Vec<String>;
        let names = if names.is_empty() {
            warn!("No EVM networks configured, defaulting to mainnet and base");
            defaulted = DEFAULT_NETWORKS.iter().map(ToString::to_string).collect();
            defaulted.as_slice()
        } else {
            names
        };

        let mut registry = Self::default();
        for name in names {
            let Some(network) = EvmNetwork::from_name(name) else {
                warn!(network = %name, "unknown network, skipping");
                continue;
            };
            if registry.get(name).is_some() {
                warn!(network = %name, "network listed twice, keeping the first entry");
                continue;
            }

            let descriptor = NetworkDescriptor::new(network, settings.rpc_override(name));
            info!(
                network = %name,
                chain_id = descriptor.chain_id(),
                custom_rpc = descriptor.is_custom_rpc(),
                "configured network",
            );
            registry.networks.push(descriptor);
        }
        registry
    }

    /// Build a registry from explicit descriptors.
    #[must_use]
    pub fn from_descriptors(descriptors: impl IntoIterator<Item = NetworkDescriptor>) -> Self {
        let mut registry = Self::default();
        for descriptor in descriptors {
            if registry.get(descriptor.name()).is_none() {
                registry.networks.push(descriptor);
            }
        }
        registry
    }

    /// Look up a network by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&NetworkDescriptor> {
        self.networks.iter().find(|n| n.name() == name)
    }

    /// Look up a network by name, failing if it is not configured.
    ///
    /// # Errors
    ///
    /// Returns [`WalletError::UnknownNetwork`] if `name` is not in the registry,
    /// or [`WalletError::NoNetworks`] if the registry is empty.
    pub fn require(&self, name: &str) -> Result<&NetworkDescriptor, WalletError> {
        if self.networks.is_empty() {
            return Err(WalletError::NoNetworks);
        }
        self.get(name)
            .ok_or_else(|| WalletError::unknown_network(name))
    }

    /// Network at a configuration position.
    #[must_use]
    pub fn nth(&self, index: usize) -> Option<&NetworkDescriptor> {
        self.networks.get(index)
    }

    /// First configured network.
    #[must_use]
    pub fn first(&self) -> Option<&NetworkDescriptor> {
        self.nth(0)
    }

    /// Configured names, in order.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.networks.iter().map(NetworkDescriptor::name).collect()
    }

    /// Iterate over descriptors, in order.
    pub fn iter(&self) -> impl Iterator<Item = &NetworkDescriptor> {
        self.networks.iter()
    }

    /// Number of configured networks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.networks.len()
    }

    /// Whether no network survived configuration.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.networks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::MapSettings;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn empty_list_uses_defaults() {
        let registry = ChainRegistry::from_settings(&[], &MapSettings::new());
        assert_eq!(registry.names(), vec!["mainnet", "base"]);
    }

    #[test]
    fn preserves_order_and_skips_unknown() {
        let registry = ChainRegistry::from_settings(
            &names(&["sepolia", "atlantis", "avalancheFuji"]),
            &MapSettings::new(),
        );
        assert_eq!(registry.names(), vec!["sepolia", "avalancheFuji"]);
        assert_eq!(registry.first().map(NetworkDescriptor::name), Some("sepolia"));
        assert_eq!(registry.nth(1).map(NetworkDescriptor::chain_id), Some(43_113));
    }

    #[test]
    fn duplicates_keep_first() {
        let registry =
            ChainRegistry::from_settings(&names(&["base", "base"]), &MapSettings::new());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn applies_endpoint_overrides() {
        let settings = MapSettings::new().with("EVM_PROVIDER_SEPOLIA", "http://localhost:8545");
        let registry =
            ChainRegistry::from_settings(&names(&["sepolia", "base"]), &settings);

        let sepolia = registry.require("sepolia").expect("configured");
        assert_eq!(sepolia.rpc_url(), "http://localhost:8545");
        assert!(sepolia.is_custom_rpc());

        let base = registry.require("base").expect("configured");
        assert!(!base.is_custom_rpc());
    }

    #[test]
    fn all_unknown_yields_empty_registry() {
        let registry = ChainRegistry::from_settings(&names(&["atlantis"]), &MapSettings::new());
        assert!(registry.is_empty());
        assert!(matches!(
            registry.require("atlantis"),
            Err(WalletError::NoNetworks)
        ));
    }

    #[test]
    fn require_unknown_name() {
        let registry = ChainRegistry::from_settings(&names(&["base"]), &MapSettings::new());
        assert!(matches!(
            registry.require("sepolia"),
            Err(WalletError::UnknownNetwork(name)) if name == "sepolia"
        ));
    }
}
