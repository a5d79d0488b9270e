//! Ed25519 implementation for Lamden.
//!
//! Lamden keys are the raw 32 byte ed25519 seed (signing key, `sk`) and the
//! 32 byte public key (verify key, `vk`).

use crate::{Error, Result};
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use rand::RngCore;
use zeroize::Zeroize;

/// Signing key length in bytes.
pub const SECRET_KEY_LENGTH: usize = 32;

/// Verify key length in bytes.
pub const PUBLIC_KEY_LENGTH: usize = 32;

/// Signature length in bytes.
pub const SIGNATURE_LENGTH: usize = 64;

/// Provides Ed25519 signature functionality.
pub struct Ed25519;

impl Ed25519 {
    /// Generates a new Ed25519 key pair from the OS random source.
    ///
    /// # Returns
    ///
    /// A tuple containing the private key and public key
    pub fn generate_key_pair() -> ([u8; SECRET_KEY_LENGTH], [u8; PUBLIC_KEY_LENGTH]) {
        let mut seed = [0u8; SECRET_KEY_LENGTH];
        rand::rngs::OsRng.fill_bytes(&mut seed);
        let pair = Self::from_seed(&seed);
        seed.zeroize();
        pair
    }

    /// Builds the key pair for a 32 byte seed. The seed is the signing key.
    pub fn from_seed(seed: &[u8; SECRET_KEY_LENGTH]) -> ([u8; SECRET_KEY_LENGTH], [u8; PUBLIC_KEY_LENGTH]) {
        let signing_key = SigningKey::from_bytes(seed);
        (signing_key.to_bytes(), signing_key.verifying_key().to_bytes())
    }

    /// Derives a public key from a private key.
    ///
    /// # Arguments
    ///
    /// * `private_key` - The private key
    ///
    /// # Returns
    ///
    /// The derived public key or an error
    pub fn private_key_to_public_key(private_key: &[u8]) -> Result<[u8; PUBLIC_KEY_LENGTH]> {
        let signing_key = signing_key(private_key)?;
        Ok(signing_key.verifying_key().to_bytes())
    }

    /// Signs a message using Ed25519.
    ///
    /// # Arguments
    ///
    /// * `private_key` - The private key to sign with
    /// * `message` - The message to sign
    ///
    /// # Returns
    ///
    /// The signature or an error
    pub fn sign(private_key: &[u8], message: &[u8]) -> Result<[u8; SIGNATURE_LENGTH]> {
        let signing_key = signing_key(private_key)?;
        Ok(signing_key.sign(message).to_bytes())
    }

    /// Verifies an Ed25519 signature.
    ///
    /// # Returns
    ///
    /// `true` if the signature is valid, `false` otherwise, including for
    /// malformed keys or signatures
    pub fn verify(public_key: &[u8], message: &[u8], signature: &[u8]) -> bool {
        let Ok(public_key) = <[u8; PUBLIC_KEY_LENGTH]>::try_from(public_key) else {
            return false;
        };
        let Ok(signature) = <[u8; SIGNATURE_LENGTH]>::try_from(signature) else {
            return false;
        };

        let public_key = match VerifyingKey::from_bytes(&public_key) {
            Ok(pk) => pk,
            Err(_) => return false,
        };
        let signature = Signature::from_bytes(&signature);

        public_key.verify(message, &signature).is_ok()
    }
}

fn signing_key(private_key: &[u8]) -> Result<SigningKey> {
    let bytes = <[u8; SECRET_KEY_LENGTH]>::try_from(private_key).map_err(|_| {
        Error::InvalidKey(format!(
            "Invalid private key length: expected {}, got {}",
            SECRET_KEY_LENGTH,
            private_key.len()
        ))
    })?;
    Ok(SigningKey::from_bytes(&bytes))
}
