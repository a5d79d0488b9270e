//! Lamden Wallets Library
//!
//! This crate provides wallet functionality for Lamden networks, including:
//! - Wallet creation from a secret key, a seed or fresh randomness
//! - BIP-39 mnemonic accounts on the `m/44'/789'/i'/0'/0'` path
//! - Message signing and verification
//! - Password encrypted keystores readable by the Lamden JavaScript wallet

pub mod keystore;
pub mod wallet;

// Re-export main types
pub use keystore::{KeyInfo, Keystore, KeystoreData, KeystoreWallet};
pub use wallet::{Bip39Wallet, FormattedKeys, KeyPair, Wallet, WalletOptions};

use thiserror::Error;

/// Result type for wallet operations
pub type Result<T> = std::result::Result<T, Error>;

/// Wallet-related errors
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("Bip32 public key does not match with Lamden public key!")]
    PublicKeyMismatch,

    #[error("Invalid mnemonic")]
    InvalidMnemonic,

    #[error("This is not a valid keystore file.")]
    InvalidKeystore,

    #[error("Incorrect Keystore Password.")]
    IncorrectPassword,

    #[error("No keystore data found.")]
    NoKeystoreData,

    #[error("No keystoreData to decrypt.")]
    NothingToDecrypt,

    #[error("Key index out of range.")]
    KeyIndexOutOfRange,

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Cryptography error: {0}")]
    Cryptography(#[from] lamden_cryptography::Error),
}

impl From<hex::FromHexError> for Error {
    fn from(err: hex::FromHexError) -> Self {
        Error::InvalidArgument(err.to_string())
    }
}
