//! Error types for the wallet workflow

use thiserror::Error;

#[derive(Error, Debug)]
pub enum WalletError {
    #[error("Invalid private key: {0}")]
    InvalidKey(String),

    #[error("Invalid mnemonic: {0}")]
    InvalidMnemonic(String),

    #[error("Network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Insufficient funds: balance {balance} wei, requested {requested} wei")]
    InsufficientFunds { balance: String, requested: String },

    #[error("Invalid recipient: {0}")]
    InvalidRecipient(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Wrong keystore password")]
    WrongPassword,

    #[error("Corrupt keystore: {0}")]
    CorruptKeystore(String),

    #[error("Keystore error: {0}")]
    Keystore(String),

    #[error("Contract call failed: {0}")]
    ContractCall(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl WalletError {
    /// Short stable name of the error kind, used in workflow reports
    pub fn kind(&self) -> &'static str {
        match self {
            WalletError::InvalidKey(_) => "invalid_key",
            WalletError::InvalidMnemonic(_) => "invalid_mnemonic",
            WalletError::NetworkUnreachable(_) => "network_unreachable",
            WalletError::Network(_) => "network_error",
            WalletError::InsufficientFunds { .. } => "insufficient_funds",
            WalletError::InvalidRecipient(_) => "invalid_recipient",
            WalletError::InvalidAmount(_) => "invalid_amount",
            WalletError::WrongPassword => "wrong_password",
            WalletError::CorruptKeystore(_) => "corrupt_keystore",
            WalletError::Keystore(_) => "keystore_error",
            WalletError::ContractCall(_) => "contract_call_error",
            WalletError::Config(_) => "config_error",
            WalletError::Unknown(_) => "unknown_error",
        }
    }

    /// Classify an RPC failure reported by the transport or the node
    ///
    /// Nodes report balance problems as free-form text, so this matches on
    /// the message the same way revert reasons are recovered.
    pub fn from_rpc(error: impl std::fmt::Display) -> Self {
        let message = error.to_string();
        let lower = message.to_lowercase();

        if lower.contains("insufficient funds") {
            return WalletError::InsufficientFunds {
                balance: "unknown".to_string(),
                requested: "unknown".to_string(),
            };
        }

        if lower.contains("error sending request")
            || lower.contains("connection refused")
            || lower.contains("dns error")
            || lower.contains("timed out")
        {
            return WalletError::NetworkUnreachable(message);
        }

        WalletError::Network(message)
    }
}

impl From<serde_json::Error> for WalletError {
    fn from(e: serde_json::Error) -> Self {
        WalletError::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, WalletError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rpc_insufficient_funds_is_classified() {
        let err = WalletError::from_rpc(
            "server returned an error response: error code -32000: insufficient funds for gas * price + value",
        );
        assert_eq!(err.kind(), "insufficient_funds");
    }

    #[test]
    fn rpc_transport_failure_is_unreachable() {
        let err = WalletError::from_rpc("error sending request for url (http://127.0.0.1:1/)");
        assert!(matches!(err, WalletError::NetworkUnreachable(_)));
    }

    #[test]
    fn rpc_other_failure_is_network_error() {
        let err = WalletError::from_rpc("nonce too low");
        assert!(matches!(err, WalletError::Network(_)));
        assert!(err.to_string().contains("nonce too low"));
    }
}
