//! Format checks and small utilities shared by wallets and transactions.

use rand::distributions::Alphanumeric;
use rand::Rng;

/// True for a non-empty string made only of hex digits (either case).
pub fn is_string_hex(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_hexdigit())
}

/// True for a 64 character hex string, the format of Lamden `sk` and `vk`.
pub fn is_lamden_key(value: &str) -> bool {
    value.len() == 64 && is_string_hex(value)
}

/// Random ASCII alphanumeric string of `length` characters.
pub fn random_string(length: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

/// Decodes a hex string into exactly `N` bytes.
pub fn decode_hex_array<const N: usize>(value: &str) -> crate::Result<[u8; N]> {
    let bytes = hex::decode(value)?;
    <[u8; N]>::try_from(bytes.as_slice()).map_err(|_| {
        crate::Error::Encoding(format!("expected {} bytes, got {}", N, bytes.len()))
    })
}
