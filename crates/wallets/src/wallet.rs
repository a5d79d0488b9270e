//! Lamden wallets.
//!
//! Keys are exchanged as 64 character hex strings: `sk` is the 32 byte
//! ed25519 seed and `vk` the 32 byte public key.

use crate::{Error, Result};
use lamden_cryptography::helpers::{decode_hex_array, is_lamden_key};
use lamden_cryptography::{hd, Ed25519};
use serde::{Deserialize, Serialize};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Raw key pair bytes
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct KeyPair {
    pub sk: [u8; 32],
    pub vk: [u8; 32],
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("vk", &hex::encode(self.vk))
            .finish_non_exhaustive()
    }
}

/// Hex formatted key pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormattedKeys {
    pub sk: String,
    pub vk: String,
}

/// Generates a key pair, from `seed` when given.
pub fn generate_keys(seed: Option<&[u8; 32]>) -> KeyPair {
    let (sk, vk) = match seed {
        Some(seed) => Ed25519::from_seed(seed),
        None => Ed25519::generate_key_pair(),
    };
    KeyPair { sk, vk }
}

/// Decodes a hex `sk` and rebuilds its key pair.
pub fn format_to_keys(sk: &str) -> Result<KeyPair> {
    if !is_lamden_key(sk) {
        return Err(Error::InvalidPrivateKey("expected 64 hex characters".into()));
    }
    let mut seed: [u8; 32] = decode_hex_array(sk)?;
    let keys = generate_keys(Some(&seed));
    seed.zeroize();
    Ok(keys)
}

pub fn keys_to_format(keys: &KeyPair) -> FormattedKeys {
    FormattedKeys {
        sk: hex::encode(keys.sk),
        vk: hex::encode(keys.vk),
    }
}

/// New hex key pair, from `seed` when given.
pub fn new_wallet(seed: Option<&[u8; 32]>) -> FormattedKeys {
    keys_to_format(&generate_keys(seed))
}

/// Public key of a hex `sk`.
pub fn get_vk(sk: &str) -> Result<String> {
    Ok(hex::encode(format_to_keys(sk)?.vk))
}

/// Signs `msg` and returns the 128 character hex signature.
pub fn sign(sk: &str, msg: &[u8]) -> Result<String> {
    let keys = format_to_keys(sk)?;
    Ok(hex::encode(Ed25519::sign(&keys.sk, msg)?))
}

/// Checks a hex signature. Malformed hex is an invalid signature.
pub fn verify(vk: &str, msg: &[u8], sig: &str) -> bool {
    match (hex::decode(vk), hex::decode(sig)) {
        (Ok(vk), Ok(sig)) => Ed25519::verify(&vk, msg, &sig),
        _ => false,
    }
}

pub fn validate_mnemonic(mnemonic: &str) -> bool {
    hd::validate_mnemonic(mnemonic)
}

/// Account derived from a BIP-39 seed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bip39Wallet {
    pub sk: String,
    pub vk: String,
    pub derivation_index: u32,
    /// Hex seed, only set when it was generated here
    pub seed: Option<String>,
    /// Only set when it was generated here
    pub mnemonic: Option<String>,
}

/// Derives the account at `derivation_index` from a hex BIP-39 seed, or from
/// a freshly generated 24 word mnemonic when no seed is given.
pub fn new_wallet_bip39(seed: Option<&str>, derivation_index: u32) -> Result<Bip39Wallet> {
    let (seed_bytes, generated) = match seed {
        Some(seed) => (hex::decode(seed.trim())?, None),
        None => {
            let mnemonic = hd::generate_mnemonic()?;
            let seed = hd::mnemonic_to_seed(&mnemonic)?;
            (seed.to_vec(), Some(mnemonic))
        }
    };

    let mut key = hd::derive_ed25519(&seed_bytes, &hd::lamden_path(derivation_index))?;
    let keys = generate_keys(Some(&key));
    key.zeroize();

    let formatted = keys_to_format(&keys);
    if formatted.vk != get_vk(&formatted.sk)? {
        return Err(Error::PublicKeyMismatch);
    }

    let (seed, mnemonic) = match generated {
        Some(mnemonic) => (Some(hex::encode(&seed_bytes)), Some(mnemonic)),
        None => (None, None),
    };

    Ok(Bip39Wallet {
        sk: formatted.sk,
        vk: formatted.vk,
        derivation_index,
        seed,
        mnemonic,
    })
}

/// Derives the account at `derivation_index` from a mnemonic phrase.
pub fn wallet_from_mnemonic(mnemonic: &str, derivation_index: u32) -> Result<Bip39Wallet> {
    if !hd::validate_mnemonic(mnemonic) {
        return Err(Error::InvalidMnemonic);
    }
    let seed = hd::mnemonic_to_seed(mnemonic)?;
    new_wallet_bip39(Some(&hex::encode(seed)), derivation_index)
}

/// Options for [`Wallet::create`]
#[derive(Debug, Clone, Default)]
pub struct WalletOptions {
    /// Hex secret key to load
    pub sk: Option<String>,
    /// Seed for a new key when `sk` is absent
    pub seed: Option<[u8; 32]>,
    /// Hide the secret key from [`Wallet::sk`]; signing still works
    pub keep_private: bool,
}

/// A signing wallet
#[derive(Clone)]
pub struct Wallet {
    keys: KeyPair,
    vk: String,
    keep_private: bool,
}

impl Wallet {
    pub fn create(options: WalletOptions) -> Result<Self> {
        let keys = match options.sk.as_deref() {
            Some(sk) => format_to_keys(sk)?,
            None => generate_keys(options.seed.as_ref()),
        };
        Ok(Self {
            vk: hex::encode(keys.vk),
            keys,
            keep_private: options.keep_private,
        })
    }

    pub fn from_sk(sk: &str) -> Result<Self> {
        Self::create(WalletOptions {
            sk: Some(sk.to_string()),
            ..Default::default()
        })
    }

    pub fn random() -> Self {
        let keys = generate_keys(None);
        Self {
            vk: hex::encode(keys.vk),
            keys,
            keep_private: false,
        }
    }

    pub fn vk(&self) -> &str {
        &self.vk
    }

    /// Hex secret key, hidden for private wallets.
    pub fn sk(&self) -> Option<String> {
        (!self.keep_private).then(|| hex::encode(self.keys.sk))
    }

    pub fn is_private(&self) -> bool {
        self.keep_private
    }

    pub fn sign(&self, msg: &[u8]) -> Result<String> {
        Ok(hex::encode(Ed25519::sign(&self.keys.sk, msg)?))
    }

    pub fn verify(&self, msg: &[u8], sig: &str) -> bool {
        verify(&self.vk, msg, sig)
    }
}

impl fmt::Debug for Wallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wallet")
            .field("vk", &self.vk)
            .field("keep_private", &self.keep_private)
            .finish_non_exhaustive()
    }
}
