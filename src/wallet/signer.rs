//! Key pair management
//!
//! SECURITY:
//! - Keys are held in alloy's PrivateKeySigner which handles crypto securely
//! - The mnemonic is kept in a SecretString and never logged
//! - Debug output redacts both

use crate::{Result, WalletError};
use alloy::hex;
use alloy::network::EthereumWallet;
use alloy::primitives::{Address, B256};
use alloy::signers::local::coins_bip39::English;
use alloy::signers::local::{MnemonicBuilder, PrivateKeySigner};
use rand::RngCore;
use secrecy::{ExposeSecret, SecretString};

/// Word count of freshly generated mnemonics
pub const DEFAULT_WORD_COUNT: usize = 12;

/// An EVM key pair with its derived address
///
/// The private key is:
/// - Stored in alloy's PrivateKeySigner
/// - Never serialized (no Serialize impl)
/// - Only exported on explicit request (`private_key_hex`, keystore encryption)
pub struct Wallet {
    signer: PrivateKeySigner,
    address: Address,
    mnemonic: Option<SecretString>,
}

impl Wallet {
    /// Generate a new random wallet with a 12-word mnemonic
    pub fn create() -> Result<Self> {
        Self::create_with_words(DEFAULT_WORD_COUNT)
    }

    /// Generate a new random wallet with a mnemonic of `word_count` words
    ///
    /// BIP-39 allows 12, 15, 18, 21 or 24 words.
    pub fn create_with_words(word_count: usize) -> Result<Self> {
        if !(12..=24).contains(&word_count) || word_count % 3 != 0 {
            return Err(WalletError::InvalidMnemonic(format!(
                "unsupported word count {}",
                word_count
            )));
        }

        // 32 bits of entropy per 3 words
        let mut entropy = vec![0u8; word_count / 3 * 4];
        rand::thread_rng().fill_bytes(&mut entropy);

        let mnemonic = bip39::Mnemonic::from_entropy(&entropy)
            .map_err(|e| WalletError::InvalidMnemonic(e.to_string()))?;

        let wallet = Self::derive(&mnemonic.to_string(), 0)?;
        tracing::info!(address = %wallet.address_string(), "Created new wallet");
        Ok(wallet)
    }

    /// Import a wallet from a hex-encoded private key (with or without 0x)
    pub fn from_private_key(key_hex: &str) -> Result<Self> {
        let key_hex = key_hex.trim();
        let key_hex = key_hex.strip_prefix("0x").unwrap_or(key_hex);

        let signer: PrivateKeySigner = key_hex
            .parse()
            .map_err(|e| WalletError::InvalidKey(format!("{}", e)))?;

        let wallet = Self::from_signer(signer);
        tracing::info!(address = %wallet.address_string(), "Imported wallet from private key");
        Ok(wallet)
    }

    /// Import the first account (m/44'/60'/0'/0/0) of a mnemonic phrase
    pub fn from_mnemonic(phrase: &str) -> Result<Self> {
        Self::from_mnemonic_at(phrase, 0)
    }

    /// Import account `index` (m/44'/60'/0'/0/index) of a mnemonic phrase
    pub fn from_mnemonic_at(phrase: &str, index: u32) -> Result<Self> {
        let normalized = phrase.split_whitespace().collect::<Vec<_>>().join(" ");

        let mnemonic = bip39::Mnemonic::parse(&normalized)
            .map_err(|e| WalletError::InvalidMnemonic(e.to_string()))?;

        let wallet = Self::derive(&mnemonic.to_string(), index)?;
        tracing::info!(
            address = %wallet.address_string(),
            index,
            "Imported wallet from mnemonic"
        );
        Ok(wallet)
    }

    /// Wrap an existing signer
    pub fn from_signer(signer: PrivateKeySigner) -> Self {
        Self {
            address: signer.address(),
            signer,
            mnemonic: None,
        }
    }

    fn derive(phrase: &str, index: u32) -> Result<Self> {
        let signer = MnemonicBuilder::<English>::default()
            .phrase(phrase)
            .index(index)
            .map_err(|e| WalletError::InvalidMnemonic(e.to_string()))?
            .build()
            .map_err(|e| WalletError::InvalidMnemonic(e.to_string()))?;

        Ok(Self {
            address: signer.address(),
            signer,
            mnemonic: Some(SecretString::from(phrase.to_string())),
        })
    }

    /// Get the public address (safe to share)
    pub fn address(&self) -> Address {
        self.address
    }

    /// Get the address as a checksummed string
    pub fn address_string(&self) -> String {
        self.address.to_checksum(None)
    }

    /// The mnemonic phrase, if this wallet was generated or imported from one
    pub fn mnemonic(&self) -> Option<&SecretString> {
        self.mnemonic.as_ref()
    }

    /// Number of words in the mnemonic, if any
    pub fn mnemonic_word_count(&self) -> Option<usize> {
        self.mnemonic
            .as_ref()
            .map(|m| m.expose_secret().split_whitespace().count())
    }

    /// Raw private key bytes
    pub fn private_key(&self) -> B256 {
        self.signer.to_bytes()
    }

    /// Private key as 0x-prefixed hex
    pub fn private_key_hex(&self) -> SecretString {
        SecretString::from(hex::encode_prefixed(self.private_key()))
    }

    /// Get a reference to the signer
    pub fn signer(&self) -> &PrivateKeySigner {
        &self.signer
    }

    /// Build an EthereumWallet for use with alloy providers
    pub fn ethereum_wallet(&self) -> EthereumWallet {
        EthereumWallet::from(self.signer.clone())
    }
}

impl Clone for Wallet {
    fn clone(&self) -> Self {
        Self {
            signer: self.signer.clone(),
            address: self.address,
            mnemonic: self
                .mnemonic
                .as_ref()
                .map(|m| SecretString::from(m.expose_secret().to_string())),
        }
    }
}

// Implement Debug manually to avoid exposing the signer
impl std::fmt::Debug for Wallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wallet")
            .field("address", &self.address)
            .field("signer", &"[REDACTED]")
            .field("has_mnemonic", &self.mnemonic.is_some())
            .finish()
    }
}
