//! Configuration schema for the trading pipeline.
//!
//! Secrets never live here; they come from [`Settings`](crate::settings::Settings).
//! This schema covers what is safe to keep in a config file: which networks
//! to connect, which network plays which settlement role, and where the
//! contracts are deployed.

use serde::{Deserialize, Serialize};

use crate::chain::known_network;
use crate::contracts::{ContractError, Deployments};

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StockbridgeConfig {
    /// Agent identity.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Network selection and roles.
    #[serde(default)]
    pub networks: NetworksConfig,

    /// Contract deployments.
    #[serde(default)]
    pub contracts: ContractsConfig,

    /// Model parameters for intent extraction.
    #[serde(default)]
    pub model: ModelConfig,
}

/// Agent identity configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Display name used in prompts and replies.
    #[serde(default = "default_agent_name")]
    pub name: String,
}

fn default_agent_name() -> String {
    "Stockbridge".to_string()
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
        }
    }
}

/// Network selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworksConfig {
    /// EVM networks to connect, in order. Empty falls back to mainnet + base.
    #[serde(default = "default_evm_networks")]
    pub evm: Vec<String>,

    /// Which configured network settles which kind of purchase.
    #[serde(default)]
    pub roles: NetworkRoles,
}

fn default_evm_networks() -> Vec<String> {
    vec!["avalancheFuji".to_string(), "sepolia".to_string()]
}

impl Default for NetworksConfig {
    fn default() -> Self {
        Self {
            evm: default_evm_networks(),
            roles: NetworkRoles::default(),
        }
    }
}

/// Named settlement roles, resolved against the registry by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkRoles {
    /// Network where purchases paid in the native token (and redemptions) settle.
    #[serde(default = "default_native_settlement")]
    pub native_settlement: String,

    /// Network where purchases paid in the stablecoin originate.
    #[serde(default = "default_stablecoin_settlement")]
    pub stablecoin_settlement: String,
}

fn default_native_settlement() -> String {
    "avalancheFuji".to_string()
}

fn default_stablecoin_settlement() -> String {
    "sepolia".to_string()
}

impl Default for NetworkRoles {
    fn default() -> Self {
        Self {
            native_settlement: default_native_settlement(),
            stablecoin_settlement: default_stablecoin_settlement(),
        }
    }
}

impl NetworkRoles {
    /// Network name configured for `role`.
    #[must_use]
    pub fn network(&self, role: NetworkRole) -> &str {
        match role {
            NetworkRole::NativeSettlement => &self.native_settlement,
            NetworkRole::StablecoinSettlement => &self.stablecoin_settlement,
        }
    }
}

/// A settlement role an action runs under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NetworkRole {
    /// Purchases paid in the native token, redemptions and holdings.
    NativeSettlement,
    /// Purchases paid in the stablecoin.
    StablecoinSettlement,
}

impl std::fmt::Display for NetworkRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::NativeSettlement => "native_settlement",
            Self::StablecoinSettlement => "stablecoin_settlement",
        })
    }
}

/// Contract addresses as written in the config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractsConfig {
    /// Contract accepting `sendMintRequest` paid in the native token.
    #[serde(default = "default_stock_minter")]
    pub stock_minter: String,

    /// Contract accepting `sendRedeemRequest` and serving holdings queries.
    #[serde(default = "default_stock_registry")]
    pub stock_registry: String,

    /// Cross-chain sender accepting `sendMessagePayLINK`.
    #[serde(default = "default_cross_chain_minter")]
    pub cross_chain_minter: String,

    /// Stablecoin spent by cross-chain purchases.
    #[serde(default = "default_stablecoin")]
    pub stablecoin: String,

    /// Decimals of the stablecoin.
    #[serde(default = "default_stablecoin_decimals")]
    pub stablecoin_decimals: u8,

    /// Destination-chain selector for the routing call.
    ///
    /// Kept as a string: selectors exceed the TOML integer range.
    #[serde(default = "default_destination_selector")]
    pub destination_chain_selector: String,
}

fn default_stock_minter() -> String {
    "0xfbf1aec18fb3b8cca16bb7369723375fe7925e88".to_string()
}

fn default_stock_registry() -> String {
    "0xacbf2d367407b0cd5e9a70420750c29992c3db25".to_string()
}

fn default_cross_chain_minter() -> String {
    "0x377a2dd0c48d5023def44c9a0e1c982fca89f397".to_string()
}

fn default_stablecoin() -> String {
    "0x1c7d4b196cb0c7b01d743fbc6116a902379c7238".to_string()
}

const fn default_stablecoin_decimals() -> u8 {
    6
}

fn default_destination_selector() -> String {
    "14767482510784806043".to_string()
}

impl Default for ContractsConfig {
    fn default() -> Self {
        Self {
            stock_minter: default_stock_minter(),
            stock_registry: default_stock_registry(),
            cross_chain_minter: default_cross_chain_minter(),
            stablecoin: default_stablecoin(),
            stablecoin_decimals: default_stablecoin_decimals(),
            destination_chain_selector: default_destination_selector(),
        }
    }
}

impl ContractsConfig {
    /// Parse the configured strings into typed deployments.
    ///
    /// # Errors
    ///
    /// Returns an error if an address or the selector does not parse.
    pub fn resolve(&self) -> Result<Deployments, ContractError> {
        Deployments::parse(self)
    }
}

/// Model parameters for intent extraction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Model identifier; empty uses the provider default.
    #[serde(default)]
    pub model: Option<String>,

    /// Sampling temperature.
    #[serde(default)]
    pub temperature: Option<f32>,
}

impl StockbridgeConfig {
    /// Validate the configuration and return any issues found.
    #[must_use]
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        if self.networks.evm.is_empty() {
            issues.push(ConfigIssue::warning(
                "networks.evm",
                "No EVM networks configured, mainnet and base will be used",
            ));
        }

        for name in &self.networks.evm {
            if known_network(name).is_none() {
                issues.push(ConfigIssue::warning(
                    "networks.evm",
                    format!("Unknown network '{name}' will be skipped"),
                ));
            }
        }

        let roles = [
            (
                "networks.roles.native_settlement",
                &self.networks.roles.native_settlement,
            ),
            (
                "networks.roles.stablecoin_settlement",
                &self.networks.roles.stablecoin_settlement,
            ),
        ];
        for (path, name) in roles {
            if !self.networks.evm.iter().any(|n| n == name) {
                issues.push(ConfigIssue::error(
                    path,
                    format!("Network '{name}' is not listed in networks.evm"),
                ));
            }
        }

        if let Err(e) = self.contracts.resolve() {
            issues.push(ConfigIssue::error("contracts", e.to_string()));
        }

        issues
    }

    /// Check if the configuration is valid (no errors).
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.validate()
            .iter()
            .all(|issue| issue.level != IssueLevel::Error)
    }
}

/// Severity of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueLevel {
    /// The pipeline cannot run.
    Error,
    /// The pipeline runs with degraded behavior.
    Warning,
}

/// A configuration validation issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigIssue {
    /// Issue severity level.
    pub level: IssueLevel,
    /// Configuration path (e.g., "networks.roles.native_settlement").
    pub path: String,
    /// Human-readable message.
    pub message: String,
}

impl ConfigIssue {
    /// Create an error-level issue.
    #[must_use]
    pub fn error(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: IssueLevel::Error,
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a warning-level issue.
    #[must_use]
    pub fn warning(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: IssueLevel::Warning,
            path: path.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let prefix = match self.level {
            IssueLevel::Error => "ERROR",
            IssueLevel::Warning => "WARN",
        };
        write!(f, "[{}] {}: {}", prefix, self.path, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = StockbridgeConfig::default();
        assert!(config.is_valid(), "{:?}", config.validate());
    }

    #[test]
    fn role_outside_network_list_is_an_error() {
        let mut config = StockbridgeConfig::default();
        config.networks.roles.stablecoin_settlement = "base".to_string();

        let issues = config.validate();
        assert!(issues.iter().any(|i| i.level == IssueLevel::Error
            && i.path == "networks.roles.stablecoin_settlement"));
        assert!(!config.is_valid());
    }

    #[test]
    fn unknown_network_is_a_warning() {
        let mut config = StockbridgeConfig::default();
        config.networks.evm.push("atlantis".to_string());

        let issues = config.validate();
        assert!(issues.iter().any(|i| i.level == IssueLevel::Warning));
        assert!(config.is_valid());
    }

    #[test]
    fn partial_config_fills_defaults() {
        let config: StockbridgeConfig = from_json(
            r#"{"networks": {"evm": ["sepolia", "avalancheFuji"]}}"#,
        );
        assert_eq!(config.networks.roles, NetworkRoles::default());
        assert_eq!(config.contracts.stablecoin_decimals, 6);
        assert_eq!(config.agent.name, "Stockbridge");
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result: Result<StockbridgeConfig, _> = serde_json::from_str(r#"{"channels": {}}"#);
        assert!(result.is_err());
    }

    fn from_json(json: &str) -> StockbridgeConfig {
        serde_json::from_str(json).expect("valid config")
    }

    #[test]
    fn networks_section_without_evm_list_keeps_default_networks() {
        let config = from_json(r#"{ "networks": { "roles": { "native_settlement": "avalancheFuji" } } }"#);
        assert_eq!(config.networks.evm, ["avalancheFuji", "sepolia"]);
        assert!(config.is_valid(), "{:?}", config.validate());
    }

    #[test]
    fn roles_resolve_by_name() {
        let roles = NetworkRoles::default();
        assert_eq!(roles.network(NetworkRole::NativeSettlement), "avalancheFuji");
        assert_eq!(roles.network(NetworkRole::StablecoinSettlement), "sepolia");
        assert_eq!(NetworkRole::StablecoinSettlement.to_string(), "stablecoin_settlement");
    }

    #[test]
    fn issue_display() {
        let issue = ConfigIssue::error("contracts", "bad address");
        assert_eq!(issue.to_string(), "[ERROR] contracts: bad address");
    }
}
