//! Lamden Cryptography Library
//!
//! Cryptographic primitives used by Lamden wallets and transactions:
//! - [`ed25519::Ed25519`]: key generation, signing and verification
//! - [`hd`]: BIP-39 mnemonics and SLIP-10 ed25519 derivation
//! - [`cryptojs`]: password encryption compatible with CryptoJS AES
//! - [`helpers`]: hex and key format checks

pub mod cryptojs;
pub mod ed25519;
pub mod hash;
pub mod hd;
pub mod helpers;

pub use ed25519::Ed25519;

use thiserror::Error;

/// Result type for cryptographic operations
pub type Result<T> = std::result::Result<T, Error>;

/// Cryptography errors
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Invalid signature: {0}")]
    InvalidSignature(String),

    #[error("Invalid mnemonic: {0}")]
    InvalidMnemonic(String),

    #[error("Invalid derivation path: {0}")]
    InvalidPath(String),

    #[error("Cipher error: {0}")]
    Cipher(String),

    #[error("Encoding error: {0}")]
    Encoding(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<hex::FromHexError> for Error {
    fn from(err: hex::FromHexError) -> Self {
        Error::Encoding(err.to_string())
    }
}

impl From<base64::DecodeError> for Error {
    fn from(err: base64::DecodeError) -> Self {
        Error::Encoding(err.to_string())
    }
}
