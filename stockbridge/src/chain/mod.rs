//! Network metadata and the chain registry.
//!
//! [`EvmNetwork`] is the built-in table of networks the pipeline knows by
//! name. [`NetworkDescriptor`] is the immutable, fully resolved form (chain
//! id plus the endpoint actually used), and [`ChainRegistry`] builds the
//! ordered name → descriptor map from configuration.

use std::fmt;

mod registry;

pub use registry::{ChainRegistry, DEFAULT_NETWORKS};

/// EVM networks known by their conventional camelCase names.
///
/// # Examples
///
/// ```rust
/// use stockbridge::chain::EvmNetwork;
///
/// let fuji = EvmNetwork::from_name("avalancheFuji").unwrap();
/// assert_eq!(fuji.id(), 43_113);
/// assert_eq!(fuji.native_symbol(), "AVAX");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EvmNetwork {
    /// Ethereum Mainnet (chain ID: 1).
    Mainnet,
    /// Sepolia Testnet (chain ID: 11155111).
    Sepolia,
    /// Base (chain ID: 8453).
    Base,
    /// Base Sepolia (chain ID: 84532).
    BaseSepolia,
    /// Avalanche C-Chain (chain ID: 43114).
    Avalanche,
    /// Avalanche Fuji C-Chain (chain ID: 43113).
    AvalancheFuji,
    /// Arbitrum One (chain ID: 42161).
    Arbitrum,
    /// Arbitrum Sepolia (chain ID: 421614).
    ArbitrumSepolia,
    /// Optimism (chain ID: 10).
    Optimism,
    /// Optimism Sepolia (chain ID: 11155420).
    OptimismSepolia,
    /// Polygon `PoS` (chain ID: 137).
    Polygon,
    /// Polygon Amoy (chain ID: 80002).
    PolygonAmoy,
    /// BNB Smart Chain (chain ID: 56).
    Bsc,
    /// Gnosis Chain (chain ID: 100).
    Gnosis,
    /// Linea (chain ID: 59144).
    Linea,
    /// Scroll (chain ID: 534352).
    Scroll,
}

impl EvmNetwork {
    /// Every known network.
    pub const ALL: [Self; 16] = [
        Self::Mainnet,
        Self::Sepolia,
        Self::Base,
        Self::BaseSepolia,
        Self::Avalanche,
        Self::AvalancheFuji,
        Self::Arbitrum,
        Self::ArbitrumSepolia,
        Self::Optimism,
        Self::OptimismSepolia,
        Self::Polygon,
        Self::PolygonAmoy,
        Self::Bsc,
        Self::Gnosis,
        Self::Linea,
        Self::Scroll,
    ];

    /// Get the numeric chain ID.
    #[must_use]
    pub const fn id(self) -> u64 {
        match self {
            Self::Mainnet => 1,
            Self::Sepolia => 11_155_111,
            Self::Base => 8453,
            Self::BaseSepolia => 84_532,
            Self::Avalanche => 43_114,
            Self::AvalancheFuji => 43_113,
            Self::Arbitrum => 42_161,
            Self::ArbitrumSepolia => 421_614,
            Self::Optimism => 10,
            Self::OptimismSepolia => 11_155_420,
            Self::Polygon => 137,
            Self::PolygonAmoy => 80_002,
            Self::Bsc => 56,
            Self::Gnosis => 100,
            Self::Linea => 59_144,
            Self::Scroll => 534_352,
        }
    }

    /// Get the configuration name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Mainnet => "mainnet",
            Self::Sepolia => "sepolia",
            Self::Base => "base",
            Self::BaseSepolia => "baseSepolia",
            Self::Avalanche => "avalanche",
            Self::AvalancheFuji => "avalancheFuji",
            Self::Arbitrum => "arbitrum",
            Self::ArbitrumSepolia => "arbitrumSepolia",
            Self::Optimism => "optimism",
            Self::OptimismSepolia => "optimismSepolia",
            Self::Polygon => "polygon",
            Self::PolygonAmoy => "polygonAmoy",
            Self::Bsc => "bsc",
            Self::Gnosis => "gnosis",
            Self::Linea => "linea",
            Self::Scroll => "scroll",
        }
    }

    /// Public RPC endpoint used when no override is configured.
    #[must_use]
    pub const fn default_rpc_url(self) -> &'static str {
        match self {
            Self::Mainnet => "https://eth.merkle.io",
            Self::Sepolia => "https://sepolia.drpc.org",
            Self::Base => "https://mainnet.base.org",
            Self::BaseSepolia => "https://sepolia.base.org",
            Self::Avalanche => "https://api.avax.network/ext/bc/C/rpc",
            Self::AvalancheFuji => "https://api.avax-test.network/ext/bc/C/rpc",
            Self::Arbitrum => "https://arb1.arbitrum.io/rpc",
            Self::ArbitrumSepolia => "https://sepolia-rollup.arbitrum.io/rpc",
            Self::Optimism => "https://mainnet.optimism.io",
            Self::OptimismSepolia => "https://sepolia.optimism.io",
            Self::Polygon => "https://polygon-rpc.com",
            Self::PolygonAmoy => "https://rpc-amoy.polygon.technology",
            Self::Bsc => "https://bsc-dataseed1.binance.org",
            Self::Gnosis => "https://rpc.gnosischain.com",
            Self::Linea => "https://rpc.linea.build",
            Self::Scroll => "https://rpc.scroll.io",
        }
    }

    /// Symbol of the native gas token.
    #[must_use]
    pub const fn native_symbol(self) -> &'static str {
        match self {
            Self::Avalanche | Self::AvalancheFuji => "AVAX",
            Self::Polygon | Self::PolygonAmoy => "POL",
            Self::Bsc => "BNB",
            Self::Gnosis => "xDAI",
            _ => "ETH",
        }
    }

    /// Look up a network by its configuration name (exact match).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|n| n.name() == name)
    }

    /// Look up a network by chain ID.
    #[must_use]
    pub fn from_id(id: u64) -> Option<Self> {
        Self::ALL.into_iter().find(|n| n.id() == id)
    }
}

impl fmt::Display for EvmNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.id())
    }
}

/// Look up a known network by name.
#[must_use]
pub fn known_network(name: &str) -> Option<EvmNetwork> {
    EvmNetwork::from_name(name)
}

/// A fully resolved network: identity plus the endpoint in use.
///
/// Created once when the registry is built and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkDescriptor {
    network: EvmNetwork,
    rpc_url: String,
    custom_rpc: bool,
}

impl NetworkDescriptor {
    /// Describe `network`, optionally overriding its endpoint.
    #[must_use]
    pub fn new(network: EvmNetwork, custom_rpc: Option<String>) -> Self {
        match custom_rpc {
            Some(rpc_url) => Self {
                network,
                rpc_url,
                custom_rpc: true,
            },
            None => Self {
                network,
                rpc_url: network.default_rpc_url().to_string(),
                custom_rpc: false,
            },
        }
    }

    /// Configuration name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.network.name()
    }

    /// Numeric chain ID.
    #[must_use]
    pub const fn chain_id(&self) -> u64 {
        self.network.id()
    }

    /// Endpoint in use.
    #[must_use]
    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }

    /// Whether the endpoint came from a configuration override.
    #[must_use]
    pub const fn is_custom_rpc(&self) -> bool {
        self.custom_rpc
    }

    /// The underlying known network.
    #[must_use]
    pub const fn network(&self) -> EvmNetwork {
        self.network
    }
}

impl fmt::Display for NetworkDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} via {}", self.network, self.rpc_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_and_ids_round_trip() {
        for network in EvmNetwork::ALL {
            assert_eq!(EvmNetwork::from_name(network.name()), Some(network));
            assert_eq!(EvmNetwork::from_id(network.id()), Some(network));
        }
    }

    #[test]
    fn lookup_is_case_sensitive() {
        assert_eq!(EvmNetwork::from_name("avalanchefuji"), None);
        assert_eq!(EvmNetwork::from_name("ethereum"), None);
    }

    #[test]
    fn descriptor_uses_override_when_given() {
        let custom = NetworkDescriptor::new(
            EvmNetwork::Sepolia,
            Some("https://rpc.example/sepolia".to_string()),
        );
        assert!(custom.is_custom_rpc());
        assert_eq!(custom.rpc_url(), "https://rpc.example/sepolia");
        assert_eq!(custom.chain_id(), 11_155_111);

        let default = NetworkDescriptor::new(EvmNetwork::Sepolia, None);
        assert!(!default.is_custom_rpc());
        assert_eq!(default.rpc_url(), EvmNetwork::Sepolia.default_rpc_url());
    }
}
