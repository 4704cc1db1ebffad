//! Wallet management
//!
//! Key pairs, provider binding, transfers and keystore files. Private keys
//! stay inside [`Wallet`] unless explicitly exported.

pub mod keystore;
mod provider;
mod signer;

#[cfg(test)]
pub(crate) mod testing;

pub use keystore::EncryptedKeystore;
pub use provider::{parse_recipient, Balance, ConnectedWallet, PendingTransfer, TransferReceipt};
pub use signer::{Wallet, DEFAULT_WORD_COUNT};
