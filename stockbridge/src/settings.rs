//! Settings lookup keyed by name.
//!
//! The hosting runtime owns secrets and endpoint overrides; the pipeline
//! only ever asks for a value by key. [`Settings`] is that seam.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Key holding the hex-encoded signing credential.
pub const PRIVATE_KEY: &str = "EVM_PRIVATE_KEY";

/// Key prefixes consulted, in order, for a per-network RPC override.
pub const PROVIDER_PREFIXES: [&str; 2] = ["ETHEREUM_PROVIDER_", "EVM_PROVIDER_"];

/// A read-only settings source.
pub trait Settings: Send + Sync + fmt::Debug {
    /// Look up a setting. Empty values are reported as absent.
    fn get(&self, key: &str) -> Option<String>;

    /// Look up the RPC endpoint override for a network.
    ///
    /// Tries `ETHEREUM_PROVIDER_<NAME>` first, then `EVM_PROVIDER_<NAME>`,
    /// where `<NAME>` is the upper-cased network name.
    fn rpc_override(&self, network: &str) -> Option<String> {
        let suffix = network.to_uppercase();
        PROVIDER_PREFIXES
            .iter()
            .find_map(|prefix| self.get(&format!("{prefix}{suffix}")))
    }
}

impl<T: Settings + ?Sized> Settings for Arc<T> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }
}

/// Settings backed by the process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvSettings;

impl Settings for EnvSettings {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok().filter(|v| !v.is_empty())
    }
}

/// In-memory settings, used for file-backed values and tests.
#[derive(Clone, Default)]
pub struct MapSettings {
    values: HashMap<String, String>,
}

impl fmt::Debug for MapSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Values may hold secrets.
        let mut keys: Vec<&String> = self.values.keys().collect();
        keys.sort();
        f.debug_struct("MapSettings").field("keys", &keys).finish()
    }
}

impl MapSettings {
    /// Create an empty settings map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a value.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Insert a value in place.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapSettings {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl Settings for MapSettings {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).filter(|v| !v.is_empty()).cloned()
    }
}

/// Several sources consulted in order; the first hit wins.
#[derive(Debug, Default)]
pub struct LayeredSettings {
    layers: Vec<Box<dyn Settings>>,
}

impl LayeredSettings {
    /// Create an empty stack.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a lower-priority layer.
    #[must_use]
    pub fn layer(mut self, settings: impl Settings + 'static) -> Self {
        self.layers.push(Box::new(settings));
        self
    }
}

impl Settings for LayeredSettings {
    fn get(&self, key: &str) -> Option<String> {
        self.layers.iter().find_map(|layer| layer.get(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rpc_override_prefers_ethereum_prefix() {
        let settings = MapSettings::new()
            .with("EVM_PROVIDER_SEPOLIA", "https://evm.example")
            .with("ETHEREUM_PROVIDER_SEPOLIA", "https://eth.example");
        assert_eq!(
            settings.rpc_override("sepolia").as_deref(),
            Some("https://eth.example")
        );
    }

    #[test]
    fn rpc_override_falls_back_to_evm_prefix() {
        let settings = MapSettings::new().with("EVM_PROVIDER_AVALANCHEFUJI", "https://fuji.example");
        assert_eq!(
            settings.rpc_override("avalancheFuji").as_deref(),
            Some("https://fuji.example")
        );
        assert_eq!(settings.rpc_override("base"), None);
    }

    #[test]
    fn empty_values_are_absent() {
        let settings = MapSettings::new().with(PRIVATE_KEY, "");
        assert_eq!(settings.get(PRIVATE_KEY), None);
    }

    #[test]
    fn layered_first_hit_wins() {
        let settings = LayeredSettings::new()
            .layer(MapSettings::new().with("A", "top"))
            .layer(MapSettings::new().with("A", "bottom").with("B", "only"));
        assert_eq!(settings.get("A").as_deref(), Some("top"));
        assert_eq!(settings.get("B").as_deref(), Some("only"));
        assert_eq!(settings.get("C"), None);
    }

    #[test]
    fn debug_hides_values() {
        let settings = MapSettings::new().with(PRIVATE_KEY, "0xsecret");
        let rendered = format!("{settings:?}");
        assert!(rendered.contains(PRIVATE_KEY));
        assert!(!rendered.contains("0xsecret"));
    }
}
