//! EVM Wallet Workflow
//!
//! A small toolkit over alloy for everyday wallet chores:
//! - Create wallets or import them from a private key or mnemonic
//! - Connect to a network and check balances
//! - Send ether and wait for confirmation
//! - Encrypt and decrypt keystore files
//! - Call contract methods from a JSON ABI
//!
//! # Security Model
//!
//! - Private keys and mnemonics never appear in Debug output or logs
//! - Balance, transfer and contract operations require a [`ConnectedWallet`]
//! - Keystores use the standard Web3 Secret Storage format

pub mod config;
pub mod contract;
pub mod runner;
pub mod units;
pub mod wallet;

mod error;

// Re-export commonly used types
pub use config::{Config, Network, RpcConfig};
pub use error::{Result, WalletError};
pub use runner::{DemoPlan, WorkflowReport, WorkflowRunner};
pub use wallet::{ConnectedWallet, Wallet};
