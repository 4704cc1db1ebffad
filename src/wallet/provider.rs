//! Provider binding: balances and transfers
//!
//! A [`ConnectedWallet`] is the only handle that can touch the network, so a
//! wallet must be connected before it can query a balance or send value.

use super::Wallet;
use crate::config::{Config, Network, RpcConfig};
use crate::units::{format_ether, parse_amount};
use crate::{Result, WalletError};
use alloy::primitives::{Address, TxHash, U256};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::rpc::types::{TransactionReceipt, TransactionRequest};
use serde::Serialize;
use std::str::FromStr;
use std::time::Duration;

/// Balance of an account
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Balance {
    pub wei: U256,
    pub ether: String,
}

impl Balance {
    pub fn from_wei(wei: U256) -> Self {
        Self {
            wei,
            ether: format_ether(wei),
        }
    }
}

impl std::fmt::Display for Balance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ETH", self.ether)
    }
}

/// Outcome of a mined transfer
#[derive(Debug, Clone, Serialize)]
pub struct TransferReceipt {
    pub tx_hash: TxHash,
    pub block_number: Option<u64>,
    pub gas_used: u64,
    pub success: bool,
}

/// A submitted transfer awaiting confirmation
pub struct PendingTransfer {
    tx_hash: TxHash,
    provider: DynProvider,
    confirmations: u64,
    timeout: Option<Duration>,
}

impl PendingTransfer {
    /// Hash of the submitted transaction
    pub fn tx_hash(&self) -> TxHash {
        self.tx_hash
    }

    /// Wait until the transaction is mined with the configured confirmations
    pub async fn wait(self) -> Result<TransferReceipt> {
        let receipt = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.watch())
                .await
                .map_err(|_| {
                    WalletError::Network(format!(
                        "{} not confirmed within {}s",
                        self.tx_hash,
                        limit.as_secs()
                    ))
                })??,
            None => self.watch().await?,
        };

        let result = TransferReceipt {
            tx_hash: receipt.transaction_hash,
            block_number: receipt.block_number,
            gas_used: receipt.gas_used,
            success: receipt.status(),
        };

        if result.success {
            tracing::info!(
                tx_hash = %result.tx_hash,
                block = ?result.block_number,
                gas_used = result.gas_used,
                "Transaction confirmed"
            );
        } else {
            tracing::warn!(tx_hash = %result.tx_hash, "Transaction mined but reverted");
        }

        Ok(result)
    }

    /// Poll for the receipt, then for enough blocks on top of it
    async fn watch(&self) -> Result<TransactionReceipt> {
        let poll_interval = self.provider.client().poll_interval();

        loop {
            let receipt = self
                .provider
                .get_transaction_receipt(self.tx_hash)
                .await
                .map_err(WalletError::from_rpc)?;

            if let Some(receipt) = receipt {
                if self.confirmations <= 1 {
                    return Ok(receipt);
                }
                if let Some(mined) = receipt.block_number {
                    let head = self
                        .provider
                        .get_block_number()
                        .await
                        .map_err(WalletError::from_rpc)?;
                    if head.saturating_sub(mined) + 1 >= self.confirmations {
                        return Ok(receipt);
                    }
                }
            }

            tracing::debug!(tx_hash = %self.tx_hash, "Waiting for confirmation");
            tokio::time::sleep(poll_interval).await;
        }
    }
}

/// Parse a recipient address
///
/// Mixed-case input must carry a valid EIP-55 checksum; all-lowercase or
/// all-uppercase hex is taken as is.
pub fn parse_recipient(input: &str) -> Result<Address> {
    let trimmed = input.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    let mixed_case = digits.chars().any(|c| c.is_ascii_lowercase())
        && digits.chars().any(|c| c.is_ascii_uppercase());

    if mixed_case {
        Address::parse_checksummed(trimmed, None)
            .map_err(|e| WalletError::InvalidRecipient(format!("{}: {}", input, e)))
    } else {
        Address::from_str(trimmed)
            .map_err(|e| WalletError::InvalidRecipient(format!("{}: {}", input, e)))
    }
}

/// A wallet bound to a network provider
#[derive(Clone)]
pub struct ConnectedWallet {
    wallet: Wallet,
    network: Network,
    provider: DynProvider,
    confirmations: u64,
    confirmation_timeout: Option<Duration>,
}

impl ConnectedWallet {
    /// Bind a wallet to a network by name
    ///
    /// The endpoint is queried for `eth_chainId` so an unreachable network
    /// fails here instead of on the first balance query.
    pub async fn connect(
        wallet: &Wallet,
        network_name: &str,
        rpc_config: &RpcConfig,
        config: &Config,
    ) -> Result<Self> {
        let network = Network::from_str(network_name)?;

        let rpc_url = rpc_config.for_network(network).ok_or_else(|| {
            WalletError::NetworkUnreachable(format!("No RPC URL configured for {}", network))
        })?;

        let url: url::Url = rpc_url
            .parse()
            .map_err(|e| WalletError::NetworkUnreachable(format!("Invalid RPC URL: {}", e)))?;

        let provider = ProviderBuilder::new()
            .wallet(wallet.ethereum_wallet())
            .connect_http(url)
            .erased();

        let chain_id = tokio::time::timeout(config.connect_timeout(), provider.get_chain_id())
            .await
            .map_err(|_| {
                WalletError::NetworkUnreachable(format!(
                    "{} did not answer within {}s",
                    network, config.connect_timeout_secs
                ))
            })?
            .map_err(|e| WalletError::NetworkUnreachable(format!("{}: {}", network, e)))?;

        if chain_id != network.chain_id() {
            tracing::warn!(
                expected = network.chain_id(),
                actual = chain_id,
                network = %network,
                "RPC endpoint reports an unexpected chain id"
            );
        }

        tracing::info!(
            address = %wallet.address_string(),
            network = %network,
            chain_id,
            "Connected wallet to provider"
        );

        Ok(Self::with_provider(wallet.clone(), network, provider, config))
    }

    /// Bind a wallet to an already constructed provider
    ///
    /// The provider must carry the wallet's signer for transfers to work.
    pub fn with_provider(
        wallet: Wallet,
        network: Network,
        provider: DynProvider,
        config: &Config,
    ) -> Self {
        Self {
            wallet,
            network,
            provider,
            confirmations: config.confirmations,
            confirmation_timeout: config.confirmation_timeout(),
        }
    }

    pub fn wallet(&self) -> &Wallet {
        &self.wallet
    }

    pub fn address(&self) -> Address {
        self.wallet.address()
    }

    pub fn network(&self) -> Network {
        self.network
    }

    pub fn provider(&self) -> &DynProvider {
        &self.provider
    }

    /// Query the native balance of this wallet
    pub async fn balance(&self) -> Result<Balance> {
        let wei = self
            .provider
            .get_balance(self.address())
            .await
            .map_err(WalletError::from_rpc)?;

        let balance = Balance::from_wei(wei);
        tracing::info!(
            address = %self.wallet.address_string(),
            balance = %balance.ether,
            "Balance"
        );
        Ok(balance)
    }

    /// Send `amount` ether to `to`
    ///
    /// Nothing is submitted when the recipient or amount is malformed, or
    /// when the amount exceeds the current balance.
    pub async fn send(&self, to: &str, amount: &str) -> Result<PendingTransfer> {
        let recipient = parse_recipient(to)?;
        let value = parse_amount(amount)?;

        let balance = self
            .provider
            .get_balance(self.address())
            .await
            .map_err(WalletError::from_rpc)?;

        if value > balance {
            return Err(WalletError::InsufficientFunds {
                balance: balance.to_string(),
                requested: value.to_string(),
            });
        }

        let tx = TransactionRequest::default()
            .from(self.address())
            .to(recipient)
            .value(value);

        let pending = self
            .provider
            .send_transaction(tx)
            .await
            .map_err(WalletError::from_rpc)?;

        let tx_hash = *pending.tx_hash();
        tracing::info!(
            tx_hash = %tx_hash,
            to = %recipient,
            amount = %format_ether(value),
            "Transaction submitted"
        );

        Ok(PendingTransfer {
            tx_hash,
            provider: self.provider.clone(),
            confirmations: self.confirmations,
            timeout: self.confirmation_timeout,
        })
    }
}

impl std::fmt::Debug for ConnectedWallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectedWallet")
            .field("wallet", &self.wallet)
            .field("network", &self.network)
            .finish()
    }
}
