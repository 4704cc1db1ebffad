//! Configuration for the wallet workflow

pub mod rpc;

use crate::WalletError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

// Re-export RPC config
pub use rpc::RpcConfig;

/// Supported EVM networks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Mainnet,
    Sepolia,
    Holesky,
    Arbitrum,
    Optimism,
    Base,
    Polygon,
    Localhost,
}

impl Network {
    pub const ALL: [Network; 8] = [
        Network::Mainnet,
        Network::Sepolia,
        Network::Holesky,
        Network::Arbitrum,
        Network::Optimism,
        Network::Base,
        Network::Polygon,
        Network::Localhost,
    ];

    pub fn chain_id(&self) -> u64 {
        match self {
            Network::Mainnet => rpc::chains::ETHEREUM,
            Network::Sepolia => rpc::chains::SEPOLIA,
            Network::Holesky => rpc::chains::HOLESKY,
            Network::Arbitrum => rpc::chains::ARBITRUM,
            Network::Optimism => rpc::chains::OPTIMISM,
            Network::Base => rpc::chains::BASE,
            Network::Polygon => rpc::chains::POLYGON,
            Network::Localhost => rpc::chains::LOCALHOST,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Network::Mainnet => "mainnet",
            Network::Sepolia => "sepolia",
            Network::Holesky => "holesky",
            Network::Arbitrum => "arbitrum",
            Network::Optimism => "optimism",
            Network::Base => "base",
            Network::Polygon => "polygon",
            Network::Localhost => "localhost",
        }
    }
}

impl std::fmt::Display for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Network {
    type Err = WalletError;

    /// Unknown names are unreachable networks: there is no endpoint to dial.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mainnet" | "ethereum" | "homestead" => Ok(Network::Mainnet),
            "sepolia" => Ok(Network::Sepolia),
            "holesky" => Ok(Network::Holesky),
            "arbitrum" => Ok(Network::Arbitrum),
            "optimism" => Ok(Network::Optimism),
            "base" => Ok(Network::Base),
            "polygon" | "matic" => Ok(Network::Polygon),
            "localhost" | "local" | "anvil" => Ok(Network::Localhost),
            "ropsten" | "rinkeby" | "kovan" | "goerli" => Err(WalletError::NetworkUnreachable(
                format!("{} has been shut down; use sepolia or holesky", s),
            )),
            _ => Err(WalletError::NetworkUnreachable(format!(
                "Unknown network: {}",
                s
            ))),
        }
    }
}

fn default_network() -> Network {
    Network::Sepolia
}

fn default_keystore_dir() -> PathBuf {
    PathBuf::from("keystore")
}

fn default_confirmations() -> u64 {
    1
}

fn default_connect_timeout_secs() -> u64 {
    10
}

/// Main configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Network used when a command does not name one
    #[serde(default = "default_network")]
    pub default_network: Network,
    /// Directory encrypted keystores are written to
    #[serde(default = "default_keystore_dir")]
    pub keystore_dir: PathBuf,
    /// Blocks to wait for before a transfer counts as confirmed
    #[serde(default = "default_confirmations")]
    pub confirmations: u64,
    /// Timeout for the chain id check performed on connect
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    /// Give up waiting for a receipt after this many seconds (None waits forever)
    #[serde(default)]
    pub confirmation_timeout_secs: Option<u64>,
    /// BIP-44 account index used for mnemonic import
    #[serde(default)]
    pub derivation_index: u32,
}

impl Config {
    /// Load configuration from a JSON file
    pub fn from_file(path: &std::path::Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| WalletError::Config(format!("{}: {}", path.display(), e)))?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn confirmation_timeout(&self) -> Option<Duration> {
        self.confirmation_timeout_secs.map(Duration::from_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_network: default_network(),
            keystore_dir: default_keystore_dir(),
            confirmations: default_confirmations(),
            connect_timeout_secs: default_connect_timeout_secs(),
            confirmation_timeout_secs: None,
            derivation_index: 0,
        }
    }
}
