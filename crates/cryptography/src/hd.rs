//! BIP-39 mnemonics and SLIP-10 ed25519 key derivation.

use crate::hash::hmac_sha512;
use crate::{Error, Result};
use bip39::Mnemonic;
use rand::RngCore;
use zeroize::Zeroize;

/// Entropy of generated mnemonics (24 words).
pub const MNEMONIC_ENTROPY_BYTES: usize = 32;

/// BIP-44 coin type registered for Lamden.
pub const LAMDEN_COIN_TYPE: u32 = 789;

const HARDENED_OFFSET: u32 = 0x8000_0000;
const ED25519_CURVE: &[u8] = b"ed25519 seed";

/// Derivation path of the Lamden account at `index`.
pub fn lamden_path(index: u32) -> String {
    format!("m/44'/{}'/{}'/0'/0'", LAMDEN_COIN_TYPE, index)
}

/// Generates a new 24 word English mnemonic.
pub fn generate_mnemonic() -> Result<String> {
    let mut entropy = [0u8; MNEMONIC_ENTROPY_BYTES];
    rand::rngs::OsRng.fill_bytes(&mut entropy);
    let mnemonic = Mnemonic::from_entropy(&entropy).map_err(|e| Error::InvalidMnemonic(e.to_string()));
    entropy.zeroize();
    Ok(mnemonic?.to_string())
}

fn parse(phrase: &str) -> Result<Mnemonic> {
    let normalized = phrase.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase();
    Mnemonic::parse_normalized(&normalized).map_err(|e| Error::InvalidMnemonic(e.to_string()))
}

/// Checks word list membership and checksum.
pub fn validate_mnemonic(phrase: &str) -> bool {
    parse(phrase).is_ok()
}

/// BIP-39 seed with an empty passphrase.
pub fn mnemonic_to_seed(phrase: &str) -> Result<[u8; 64]> {
    Ok(parse(phrase)?.to_seed_normalized(""))
}

/// Parses a path such as `m/44'/789'/0'/0'/0'` into hardened child indices.
pub fn parse_path(path: &str) -> Result<Vec<u32>> {
    let invalid = |reason: &str| Error::InvalidPath(format!("{path}: {reason}"));

    let mut segments = path.split('/');
    if segments.next() != Some("m") {
        return Err(invalid("must start with m"));
    }

    segments
        .map(|segment| {
            let index = segment
                .strip_suffix('\'')
                .ok_or_else(|| invalid("ed25519 only supports hardened indices"))?;
            let index: u32 = index.parse().map_err(|_| invalid("index is not a number"))?;
            if index >= HARDENED_OFFSET {
                return Err(invalid("index out of range"));
            }
            Ok(index + HARDENED_OFFSET)
        })
        .collect()
}

/// Derives the 32 byte ed25519 signing key at `path` (SLIP-10).
pub fn derive_ed25519(seed: &[u8], path: &str) -> Result<[u8; 32]> {
    let indices = parse_path(path)?;

    let mut node = hmac_sha512(ED25519_CURVE, seed)?;
    for index in indices {
        let mut data = Vec::with_capacity(37);
        data.push(0u8);
        data.extend_from_slice(&node[..32]);
        data.extend_from_slice(&index.to_be_bytes());

        let child = hmac_sha512(&node[32..], &data)?;
        data.zeroize();
        node.zeroize();
        node = child;
    }

    let mut key = [0u8; 32];
    key.copy_from_slice(&node[..32]);
    node.zeroize();
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    // SLIP-0010 ed25519 test vector 1
    const SEED: &str = "000102030405060708090a0b0c0d0e0f";

    #[test]
    fn slip10_master_and_children() {
        let seed = hex::decode(SEED).unwrap();
        assert_eq!(
            hex::encode(derive_ed25519(&seed, "m").unwrap()),
            "2b4be7f19ee27bbf30c667b642d5f4aa69fd169872f8fc3059c08ebae2eb19e7"
        );
        assert_eq!(
            hex::encode(derive_ed25519(&seed, "m/0'").unwrap()),
            "68e0fe46dfb67e368c75379acec591dad19df3cde26e63b93a8e704f1dade7a3"
        );
        assert_eq!(
            hex::encode(derive_ed25519(&seed, "m/0'/1'/2'/2'/1000000000'").unwrap()),
            "8f94d394a8e8fd6b1bc2f3f49f5c47e385281d5c17e65324b0f62483e37e8793"
        );
    }

    #[test]
    fn rejects_soft_and_malformed_paths() {
        for path in ["", "44'/0'", "m/0", "m/x'", "m/2147483648'"] {
            assert!(matches!(parse_path(path), Err(Error::InvalidPath(_))), "{path}");
        }
        assert_eq!(lamden_path(3), "m/44'/789'/3'/0'/0'");
        assert_eq!(parse_path(&lamden_path(0)).unwrap().len(), 5);
    }

    #[test]
    fn generated_mnemonic_has_24_valid_words() {
        let phrase = generate_mnemonic().unwrap();
        assert_eq!(phrase.split(' ').count(), 24);
        assert!(validate_mnemonic(&phrase));
        assert!(validate_mnemonic(&format!("  {}  ", phrase.to_uppercase())));
        assert!(!validate_mnemonic("abandon abandon"));
    }

    #[test]
    fn bip39_seed_vector() {
        let phrase = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";
        let seed = mnemonic_to_seed(phrase).unwrap();
        assert_eq!(
            hex::encode(seed),
            "5eb00bbddcf069084889a8ab9155568165f5c453ccb85e70811aaed6f6da5fc19a5ac40b389cd370d086206dec8aa6c43daea6690f20ad3d8d48b2d2ce9e38e4"
        );
    }
}
