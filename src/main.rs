//! Wallet workflow CLI
//!
//! Command-line interface for the individual wallet operations and the
//! end-to-end demo workflow.

use clap::{Parser, Subcommand};
use secrecy::{ExposeSecret, SecretString};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use wallet_workflow::contract;
use wallet_workflow::runner::{ContractCallPlan, DemoPlan};
use wallet_workflow::wallet::keystore;
use wallet_workflow::{
    Config, ConnectedWallet, Result, RpcConfig, Wallet, WalletError, WorkflowRunner,
};

const PRIVATE_KEY_ENV: &str = "PRIVATE_KEY";
const MNEMONIC_ENV: &str = "MNEMONIC";
const KEYSTORE_PASSWORD_ENV: &str = "KEYSTORE_PASSWORD";

#[derive(Parser)]
#[command(name = "wallet-cli")]
#[command(about = "EVM wallet workflow: keys, balances, transfers, keystores and contract calls")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new random wallet
    Create {
        /// Mnemonic length (12, 15, 18, 21 or 24)
        #[arg(short, long, default_value_t = 12)]
        words: usize,
    },

    /// Import a wallet from a private key (falls back to PRIVATE_KEY)
    ImportKey {
        #[arg(long)]
        key: Option<String>,
    },

    /// Import a wallet from a mnemonic phrase (falls back to MNEMONIC)
    ImportMnemonic {
        #[arg(long)]
        phrase: Option<String>,

        /// Account index in m/44'/60'/0'/0/<index>
        #[arg(long)]
        index: Option<u32>,
    },

    /// Show the balance of the PRIVATE_KEY / MNEMONIC wallet
    Balance {
        /// Network (mainnet, sepolia, holesky, arbitrum, optimism, base, polygon, localhost)
        #[arg(short, long)]
        network: Option<String>,
    },

    /// Send ether from the PRIVATE_KEY / MNEMONIC wallet
    Send {
        /// Recipient address
        #[arg(long)]
        to: String,

        /// Amount in ether (e.g. 0.01)
        #[arg(long)]
        amount: String,

        #[arg(short, long)]
        network: Option<String>,

        /// Print the hash and exit without waiting for confirmation
        #[arg(long)]
        no_wait: bool,
    },

    /// Encrypt the PRIVATE_KEY / MNEMONIC wallet into the keystore directory
    Encrypt {
        /// Keystore password (falls back to KEYSTORE_PASSWORD)
        #[arg(long)]
        password: Option<String>,
    },

    /// Decrypt a keystore file
    Decrypt {
        /// Keystore file
        #[arg(long)]
        file: PathBuf,

        /// Keystore password (falls back to KEYSTORE_PASSWORD)
        #[arg(long)]
        password: Option<String>,
    },

    /// Call a contract method
    Call {
        /// Contract address
        #[arg(long)]
        contract: String,

        /// Path to the contract ABI (JSON array)
        #[arg(long)]
        abi: PathBuf,

        /// Method name
        #[arg(short, long)]
        method: String,

        #[arg(short, long)]
        network: Option<String>,

        /// Method arguments, in order
        args: Vec<String>,
    },

    /// Run the full workflow: create, import, connect, balance, send, keystore, contract
    Demo {
        #[arg(short, long)]
        network: Option<String>,

        /// Recipient of the demo transfer (no transfer without it)
        #[arg(long)]
        to: Option<String>,

        /// Amount in ether for the demo transfer
        #[arg(long, default_value = "0.01")]
        amount: String,

        /// Keystore password (falls back to KEYSTORE_PASSWORD)
        #[arg(long)]
        password: Option<String>,

        /// Contract address for the final step
        #[arg(long, requires_all = ["abi", "method"])]
        contract: Option<String>,

        #[arg(long)]
        abi: Option<PathBuf>,

        #[arg(long)]
        method: Option<String>,

        /// Contract method arguments
        #[arg(long = "arg")]
        args: Vec<String>,
    },

    /// Show current configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (ignore if not found)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    // Load config
    let config = match cli.config {
        Some(path) => Config::from_file(&path)?,
        None => Config::default(),
    };

    match cli.command {
        Commands::Create { words } => {
            let wallet = Wallet::create_with_words(words)?;
            println!("New Wallet Address: {}", wallet.address_string());
            if let Some(phrase) = wallet.mnemonic() {
                println!("Mnemonic: {}", phrase.expose_secret());
            }
            println!("Private Key: {}", wallet.private_key_hex().expose_secret());
        }
        Commands::ImportKey { key } => {
            let key = secret_arg(key, PRIVATE_KEY_ENV)?;
            let wallet = Wallet::from_private_key(key.expose_secret())?;
            println!("Imported Wallet Address: {}", wallet.address_string());
        }
        Commands::ImportMnemonic { phrase, index } => {
            let phrase = secret_arg(phrase, MNEMONIC_ENV)?;
            let index = index.unwrap_or(config.derivation_index);
            let wallet = Wallet::from_mnemonic_at(phrase.expose_secret(), index)?;
            println!("Imported Wallet Address: {}", wallet.address_string());
        }
        Commands::Balance { network } => {
            let connected = connect(&config, network).await?;
            let balance = connected.balance().await?;
            println!("Balance: {}", balance);
        }
        Commands::Send {
            to,
            amount,
            network,
            no_wait,
        } => {
            let connected = connect(&config, network).await?;
            let pending = connected.send(&to, &amount).await?;
            println!("Transaction Hash: {}", pending.tx_hash());
            if !no_wait {
                let receipt = pending.wait().await?;
                if receipt.success {
                    println!("Transaction Confirmed");
                } else {
                    println!("Transaction Reverted");
                }
            }
        }
        Commands::Encrypt { password } => {
            let wallet = wallet_from_env(&config)?;
            let password = secret_arg(password, KEYSTORE_PASSWORD_ENV)?;
            let encrypted =
                keystore::encrypt(&wallet, password.expose_secret(), &config.keystore_dir)?;
            println!("Keystore: {}", encrypted.path.display());
            println!("Encrypted JSON: {}", encrypted.json);
        }
        Commands::Decrypt { file, password } => {
            let password = secret_arg(password, KEYSTORE_PASSWORD_ENV)?;
            let wallet = keystore::decrypt_file(&file, password.expose_secret())?;
            println!("Decrypted Wallet Address: {}", wallet.address_string());
        }
        Commands::Call {
            contract: address,
            abi,
            method,
            network,
            args,
        } => {
            let abi = load_abi(&abi)?;
            let connected = connect(&config, network).await?;
            let outcome = contract::invoke(&connected, &address, &abi, &method, &args).await?;
            println!("Contract Interaction Result: {}", outcome);
        }
        Commands::Demo {
            network,
            to,
            amount,
            password,
            contract: address,
            abi,
            method,
            args,
        } => {
            let network = network.unwrap_or_else(|| config.default_network.to_string());
            let password = secret_arg(password, KEYSTORE_PASSWORD_ENV)?;

            let mut plan = DemoPlan::new(network, password);
            plan.private_key = env_secret(PRIVATE_KEY_ENV);
            plan.mnemonic = env_secret(MNEMONIC_ENV);
            plan.recipient = to;
            plan.amount = amount;
            plan.contract = match (address, abi, method) {
                (Some(address), Some(abi), Some(method)) => Some(ContractCallPlan {
                    address,
                    abi: load_abi(&abi)?,
                    method,
                    args,
                }),
                _ => None,
            };

            let runner = WorkflowRunner::new(config, RpcConfig::from_env());
            let report = runner.run(&plan).await;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Config => {
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }

    Ok(())
}

fn env_secret(var: &str) -> Option<SecretString> {
    std::env::var(var).ok().map(SecretString::from)
}

/// Take a secret from its flag, falling back to an environment variable
fn secret_arg(value: Option<String>, var: &str) -> Result<SecretString> {
    value
        .map(SecretString::from)
        .or_else(|| env_secret(var))
        .ok_or_else(|| WalletError::Config(format!("Pass the value as a flag or set {}", var)))
}

/// Load the wallet named by PRIVATE_KEY or, failing that, MNEMONIC
fn wallet_from_env(config: &Config) -> Result<Wallet> {
    if let Some(key) = env_secret(PRIVATE_KEY_ENV) {
        return Wallet::from_private_key(key.expose_secret());
    }
    if let Some(phrase) = env_secret(MNEMONIC_ENV) {
        return Wallet::from_mnemonic_at(phrase.expose_secret(), config.derivation_index);
    }
    Err(WalletError::Config(format!(
        "Set {} or {} to select a wallet",
        PRIVATE_KEY_ENV, MNEMONIC_ENV
    )))
}

async fn connect(config: &Config, network: Option<String>) -> Result<ConnectedWallet> {
    let wallet = wallet_from_env(config)?;
    let network = network.unwrap_or_else(|| config.default_network.to_string());
    ConnectedWallet::connect(&wallet, &network, &RpcConfig::from_env(), config).await
}

fn load_abi(path: &std::path::Path) -> Result<alloy::json_abi::JsonAbi> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| WalletError::Config(format!("{}: {}", path.display(), e)))?;
    contract::parse_abi(&content)
}
