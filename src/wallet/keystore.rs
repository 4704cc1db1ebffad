//! Password-protected keystore files (Web3 Secret Storage v3)
//!
//! Encryption writes the keystore into a directory and hands back its JSON
//! text. Decryption accepts either that text or a file path, and tells a
//! wrong password apart from a file that is not a keystore at all.

use super::Wallet;
use crate::{Result, WalletError};
use alloy::signers::local::PrivateKeySigner;
use eth_keystore::KeystoreError;
use std::io::Write;
use std::path::{Path, PathBuf};

/// An encrypted wallet as stored on disk
#[derive(Debug, Clone)]
pub struct EncryptedKeystore {
    /// Keystore JSON text
    pub json: String,
    /// File the keystore was written to
    pub path: PathBuf,
}

/// Encrypt `wallet` with `password` into a new file under `dir`
///
/// The file is named after the wallet address. An existing keystore for
/// the same address is never replaced; encrypting it again is an error.
pub fn encrypt(wallet: &Wallet, password: &str, dir: &Path) -> Result<EncryptedKeystore> {
    std::fs::create_dir_all(dir).map_err(|e| {
        WalletError::Keystore(format!("Cannot create {}: {}", dir.display(), e))
    })?;

    let name = format!("{}.json", wallet.address_string().to_lowercase());
    let path = dir.join(&name);
    if path.exists() {
        return Err(WalletError::Keystore(format!(
            "{} already exists",
            path.display()
        )));
    }

    let mut rng = rand::thread_rng();

    eth_keystore::encrypt_key(
        dir,
        &mut rng,
        wallet.private_key().as_slice(),
        password,
        Some(&name),
    )
    .map_err(|e| WalletError::Keystore(e.to_string()))?;

    let json = std::fs::read_to_string(&path)
        .map_err(|e| WalletError::Keystore(format!("{}: {}", path.display(), e)))?;

    tracing::info!(
        address = %wallet.address_string(),
        path = %path.display(),
        "Encrypted wallet"
    );
    tracing::debug!(keystore = %json, "Encrypted keystore JSON");

    Ok(EncryptedKeystore { json, path })
}

/// Decrypt keystore JSON text
pub fn decrypt(json: &str, password: &str) -> Result<Wallet> {
    let mut file = tempfile::NamedTempFile::new()
        .map_err(|e| WalletError::Keystore(format!("Cannot create temp file: {}", e)))?;
    file.write_all(json.as_bytes())
        .map_err(|e| WalletError::Keystore(e.to_string()))?;

    decrypt_file(file.path(), password)
}

/// Decrypt a keystore file
pub fn decrypt_file(path: &Path, password: &str) -> Result<Wallet> {
    let key = eth_keystore::decrypt_key(path, password).map_err(map_keystore_error)?;

    let signer = PrivateKeySigner::from_slice(&key)
        .map_err(|e| WalletError::CorruptKeystore(format!("Decrypted key is invalid: {}", e)))?;

    let wallet = Wallet::from_signer(signer);
    tracing::info!(address = %wallet.address_string(), "Decrypted wallet");
    Ok(wallet)
}

fn map_keystore_error(e: KeystoreError) -> WalletError {
    match e {
        KeystoreError::MacMismatch => WalletError::WrongPassword,
        e @ KeystoreError::StdIo(_) => WalletError::Keystore(e.to_string()),
        other => WalletError::CorruptKeystore(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[test]
    fn encrypt_then_decrypt_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let wallet = Wallet::create().unwrap();

        let keystore = encrypt(&wallet, "correct horse", dir.path()).unwrap();
        assert!(keystore.path.exists());
        assert!(keystore.json.contains("\"crypto\""));

        let restored = decrypt(&keystore.json, "correct horse").unwrap();
        assert_eq!(restored.address(), wallet.address());
        assert_eq!(restored.private_key(), wallet.private_key());

        let from_file = decrypt_file(&keystore.path, "correct horse").unwrap();
        assert_eq!(from_file.address(), wallet.address());
    }

    #[test]
    fn wrong_password_is_distinct() {
        let dir = tempfile::tempdir().unwrap();
        let wallet = Wallet::from_private_key(TEST_KEY).unwrap();
        let keystore = encrypt(&wallet, "right", dir.path()).unwrap();

        let err = decrypt(&keystore.json, "wrong").unwrap_err();
        assert!(matches!(err, WalletError::WrongPassword), "{err:?}");
    }

    #[test]
    fn malformed_keystore_is_corrupt() {
        let err = decrypt("this is not json", "password").unwrap_err();
        assert!(matches!(err, WalletError::CorruptKeystore(_)), "{err:?}");

        let err = decrypt(r#"{"version": 3}"#, "password").unwrap_err();
        assert!(matches!(err, WalletError::CorruptKeystore(_)), "{err:?}");
    }

    #[test]
    fn existing_keystore_is_not_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let wallet = Wallet::from_private_key(TEST_KEY).unwrap();
        let first = encrypt(&wallet, "first", dir.path()).unwrap();

        let err = encrypt(&wallet, "second", dir.path()).unwrap_err();
        assert!(matches!(err, WalletError::Keystore(_)), "{err:?}");
        assert!(err.to_string().contains("already exists"));

        let restored = decrypt_file(&first.path, "first").unwrap();
        assert_eq!(restored.address(), wallet.address());
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = decrypt_file(&dir.path().join("absent.json"), "password").unwrap_err();
        assert!(matches!(err, WalletError::Keystore(_)), "{err:?}");
    }
}
