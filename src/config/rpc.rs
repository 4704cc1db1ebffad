//! RPC endpoint configuration
//!
//! Supports multiple configuration methods following Ethereum ecosystem conventions:
//! 1. Per-chain env vars (ETH_RPC_URL, SEPOLIA_RPC_URL, etc.) - highest priority
//! 2. Provider API keys (ALCHEMY_API_KEY, INFURA_API_KEY) - builds URLs automatically
//! 3. Public RPC fallbacks - for testing only
//!
//! # Examples
//!
//! ```bash
//! # Option 1: Per-chain URLs (recommended for production)
//! export ETH_RPC_URL="https://eth-mainnet.g.alchemy.com/v2/YOUR_KEY"
//! export SEPOLIA_RPC_URL="https://eth-sepolia.g.alchemy.com/v2/YOUR_KEY"
//!
//! # Option 2: Single provider API key
//! export ALCHEMY_API_KEY="YOUR_KEY"
//!
//! # Option 3: No env vars - uses public RPCs (rate limited, for testing only)
//! ```

use super::Network;
use std::collections::HashMap;

/// RPC configuration for multiple chains
#[derive(Debug, Clone)]
pub struct RpcConfig {
    /// RPC URLs indexed by chain ID
    urls: HashMap<u64, String>,
}

/// Chain ID constants
pub mod chains {
    pub const ETHEREUM: u64 = 1;
    pub const SEPOLIA: u64 = 11155111;
    pub const HOLESKY: u64 = 17000;
    pub const ARBITRUM: u64 = 42161;
    pub const OPTIMISM: u64 = 10;
    pub const BASE: u64 = 8453;
    pub const POLYGON: u64 = 137;
    pub const LOCALHOST: u64 = 31337;
}

/// Environment variable names
mod env_vars {
    // Per-chain URLs (highest priority)
    pub const ETH_RPC_URL: &str = "ETH_RPC_URL";
    pub const SEPOLIA_RPC_URL: &str = "SEPOLIA_RPC_URL";
    pub const HOLESKY_RPC_URL: &str = "HOLESKY_RPC_URL";
    pub const ARBITRUM_RPC_URL: &str = "ARBITRUM_RPC_URL";
    pub const OPTIMISM_RPC_URL: &str = "OPTIMISM_RPC_URL";
    pub const BASE_RPC_URL: &str = "BASE_RPC_URL";
    pub const POLYGON_RPC_URL: &str = "POLYGON_RPC_URL";
    pub const LOCAL_RPC_URL: &str = "LOCAL_RPC_URL";

    // Provider API keys
    pub const ALCHEMY_API_KEY: &str = "ALCHEMY_API_KEY";
    pub const INFURA_API_KEY: &str = "INFURA_API_KEY";
}

/// Public RPC endpoints (rate limited, for testing only)
mod public_rpcs {
    pub const ETHEREUM: &str = "https://eth.llamarpc.com";
    pub const SEPOLIA: &str = "https://ethereum-sepolia-rpc.publicnode.com";
    pub const HOLESKY: &str = "https://ethereum-holesky-rpc.publicnode.com";
    pub const ARBITRUM: &str = "https://arb1.arbitrum.io/rpc";
    pub const OPTIMISM: &str = "https://mainnet.optimism.io";
    pub const BASE: &str = "https://mainnet.base.org";
    pub const POLYGON: &str = "https://polygon-rpc.com";
    pub const LOCALHOST: &str = "http://127.0.0.1:8545";
}

const PER_CHAIN_VARS: [(&str, u64); 8] = [
    (env_vars::ETH_RPC_URL, chains::ETHEREUM),
    (env_vars::SEPOLIA_RPC_URL, chains::SEPOLIA),
    (env_vars::HOLESKY_RPC_URL, chains::HOLESKY),
    (env_vars::ARBITRUM_RPC_URL, chains::ARBITRUM),
    (env_vars::OPTIMISM_RPC_URL, chains::OPTIMISM),
    (env_vars::BASE_RPC_URL, chains::BASE),
    (env_vars::POLYGON_RPC_URL, chains::POLYGON),
    (env_vars::LOCAL_RPC_URL, chains::LOCALHOST),
];

impl RpcConfig {
    /// Create RPC config from environment variables
    ///
    /// Priority:
    /// 1. Per-chain env vars (ETH_RPC_URL, SEPOLIA_RPC_URL, etc.)
    /// 2. ALCHEMY_API_KEY - builds URLs for all hosted chains
    /// 3. INFURA_API_KEY - builds URLs for supported chains
    /// 4. Public RPC fallbacks (for testing only)
    pub fn from_env() -> Self {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Build the config from an arbitrary variable lookup
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut urls = HashMap::new();

        // Priority 1: Check per-chain env vars
        for (var, chain_id) in PER_CHAIN_VARS {
            if let Some(url) = lookup(var) {
                tracing::debug!(chain_id, "Using {} for chain", var);
                urls.insert(chain_id, url);
            }
        }

        // Priority 2: If no per-chain vars, try ALCHEMY_API_KEY
        if urls.is_empty() {
            if let Some(key) = lookup(env_vars::ALCHEMY_API_KEY) {
                tracing::info!("Building RPC URLs from ALCHEMY_API_KEY");
                for (chain_id, host) in [
                    (chains::ETHEREUM, "eth-mainnet"),
                    (chains::SEPOLIA, "eth-sepolia"),
                    (chains::HOLESKY, "eth-holesky"),
                    (chains::ARBITRUM, "arb-mainnet"),
                    (chains::OPTIMISM, "opt-mainnet"),
                    (chains::BASE, "base-mainnet"),
                    (chains::POLYGON, "polygon-mainnet"),
                ] {
                    urls.insert(
                        chain_id,
                        format!("https://{}.g.alchemy.com/v2/{}", host, key),
                    );
                }
            }
        }

        // Priority 3: If no Alchemy, try INFURA_API_KEY
        if urls.is_empty() {
            if let Some(key) = lookup(env_vars::INFURA_API_KEY) {
                tracing::info!("Building RPC URLs from INFURA_API_KEY");
                for (chain_id, host) in [
                    (chains::ETHEREUM, "mainnet"),
                    (chains::SEPOLIA, "sepolia"),
                    (chains::HOLESKY, "holesky"),
                    (chains::ARBITRUM, "arbitrum-mainnet"),
                    (chains::OPTIMISM, "optimism-mainnet"),
                    (chains::POLYGON, "polygon-mainnet"),
                ] {
                    urls.insert(chain_id, format!("https://{}.infura.io/v3/{}", host, key));
                }
                // Note: Infura doesn't support Base
            }
        }

        // Priority 4: Fall back to public RPCs for any missing chains
        if !urls.contains_key(&chains::ETHEREUM) {
            tracing::debug!("No RPC configured for Ethereum, using public RPC (rate limited)");
        }
        for (chain_id, url) in [
            (chains::ETHEREUM, public_rpcs::ETHEREUM),
            (chains::SEPOLIA, public_rpcs::SEPOLIA),
            (chains::HOLESKY, public_rpcs::HOLESKY),
            (chains::ARBITRUM, public_rpcs::ARBITRUM),
            (chains::OPTIMISM, public_rpcs::OPTIMISM),
            (chains::BASE, public_rpcs::BASE),
            (chains::POLYGON, public_rpcs::POLYGON),
            (chains::LOCALHOST, public_rpcs::LOCALHOST),
        ] {
            urls.entry(chain_id).or_insert_with(|| url.to_string());
        }

        Self { urls }
    }

    /// Create with explicit RPC URLs
    pub fn with_urls(urls: HashMap<u64, String>) -> Self {
        Self { urls }
    }

    /// Get RPC URL for a chain
    pub fn get(&self, chain_id: u64) -> Option<&str> {
        self.urls.get(&chain_id).map(|s| s.as_str())
    }

    /// Get RPC URL for a named network
    pub fn for_network(&self, network: Network) -> Option<&str> {
        self.get(network.chain_id())
    }

    /// Check if a chain is configured
    pub fn has_chain(&self, chain_id: u64) -> bool {
        self.urls.contains_key(&chain_id)
    }
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_default_has_all_chains() {
        let config = RpcConfig::from_vars(vars(&[]));

        for network in Network::ALL {
            assert!(config.has_chain(network.chain_id()), "{network} missing");
        }
    }

    #[test]
    fn test_get_returns_url() {
        let mut urls = HashMap::new();
        urls.insert(1, "https://custom.rpc".to_string());
        let config = RpcConfig::with_urls(urls);

        assert_eq!(config.get(1), Some("https://custom.rpc"));
        assert_eq!(config.get(999), None);
        assert_eq!(config.for_network(Network::Mainnet), Some("https://custom.rpc"));
    }

    #[test]
    fn test_public_rpc_fallbacks() {
        let config = RpcConfig::from_vars(vars(&[]));

        assert_eq!(config.get(chains::ETHEREUM), Some(public_rpcs::ETHEREUM));
        assert_eq!(config.get(chains::SEPOLIA), Some(public_rpcs::SEPOLIA));
        assert_eq!(config.get(chains::LOCALHOST), Some(public_rpcs::LOCALHOST));
    }

    #[test]
    fn test_per_chain_var_wins() {
        let config = RpcConfig::from_vars(vars(&[
            ("SEPOLIA_RPC_URL", "https://my.sepolia"),
            ("ALCHEMY_API_KEY", "ignored"),
        ]));

        assert_eq!(config.get(chains::SEPOLIA), Some("https://my.sepolia"));
        // Alchemy is skipped once any per-chain URL is set
        assert_eq!(config.get(chains::ETHEREUM), Some(public_rpcs::ETHEREUM));
    }

    #[test]
    fn test_alchemy_key_builds_urls() {
        let config = RpcConfig::from_vars(vars(&[("ALCHEMY_API_KEY", "k")]));

        assert_eq!(
            config.get(chains::SEPOLIA),
            Some("https://eth-sepolia.g.alchemy.com/v2/k")
        );
        assert_eq!(config.get(chains::LOCALHOST), Some(public_rpcs::LOCALHOST));
    }
}
