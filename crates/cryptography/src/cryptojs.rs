//! Password encryption compatible with CryptoJS `AES.encrypt(text, password)`.
//!
//! AES-256-CBC with PKCS#7 padding. Key and IV are derived from the password
//! and an 8 byte random salt with OpenSSL `EVP_BytesToKey` (MD5, one round).
//! Two serializations are supported:
//!
//! - OpenSSL: base64 of `"Salted__" || salt || ciphertext`
//! - JSON: `{"ct": "<base64 ciphertext>", "iv": "<hex>", "s": "<hex salt>"}`

use crate::hash::md5;
use crate::{Error, Result};
use aes::cipher::block_padding::Pkcs7;
use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use rand::RngCore;
use serde_json::{json, Value};
use zeroize::Zeroize;

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

const SALT_LENGTH: usize = 8;
const KEY_LENGTH: usize = 32;
const IV_LENGTH: usize = 16;
const OPENSSL_MAGIC: &[u8] = b"Salted__";

/// Ciphertext with the parameters needed to decrypt it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CipherParams {
    pub ciphertext: Vec<u8>,
    pub iv: [u8; IV_LENGTH],
    pub salt: [u8; SALT_LENGTH],
}

impl CipherParams {
    /// CryptoJS `JsonFormatter` output.
    pub fn to_json(&self) -> String {
        json!({
            "ct": STANDARD.encode(&self.ciphertext),
            "iv": hex::encode(self.iv),
            "s": hex::encode(self.salt),
        })
        .to_string()
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        let field = |name: &str| {
            value
                .get(name)
                .and_then(Value::as_str)
                .ok_or_else(|| Error::Encoding(format!("missing cipher field {name:?}")))
        };

        Ok(Self {
            ciphertext: STANDARD.decode(field("ct")?)?,
            iv: crate::helpers::decode_hex_array(field("iv")?)?,
            salt: crate::helpers::decode_hex_array(field("s")?)?,
        })
    }

    /// OpenSSL salted base64 output, the CryptoJS default format.
    pub fn to_openssl(&self) -> String {
        let mut raw = Vec::with_capacity(OPENSSL_MAGIC.len() + SALT_LENGTH + self.ciphertext.len());
        raw.extend_from_slice(OPENSSL_MAGIC);
        raw.extend_from_slice(&self.salt);
        raw.extend_from_slice(&self.ciphertext);
        STANDARD.encode(raw)
    }

    /// Parses OpenSSL salted base64. The IV is not stored in this format and
    /// is left zeroed; decryption derives it from the password.
    pub fn from_openssl(text: &str) -> Result<Self> {
        let raw = STANDARD.decode(text.trim())?;
        let header = OPENSSL_MAGIC.len() + SALT_LENGTH;
        if raw.len() <= header || !raw.starts_with(OPENSSL_MAGIC) {
            return Err(Error::Encoding("missing Salted__ header".into()));
        }

        let mut salt = [0u8; SALT_LENGTH];
        salt.copy_from_slice(&raw[OPENSSL_MAGIC.len()..header]);
        Ok(Self {
            ciphertext: raw[header..].to_vec(),
            iv: [0u8; IV_LENGTH],
            salt,
        })
    }
}

/// OpenSSL `EVP_BytesToKey` with MD5 and a single iteration.
pub fn evp_bytes_to_key(password: &[u8], salt: &[u8; SALT_LENGTH]) -> ([u8; KEY_LENGTH], [u8; IV_LENGTH]) {
    let mut derived = Vec::with_capacity(KEY_LENGTH + IV_LENGTH + 16);
    let mut block: Vec<u8> = Vec::new();
    while derived.len() < KEY_LENGTH + IV_LENGTH {
        let digest = md5(&[block.as_slice(), password, salt.as_slice()]);
        derived.extend_from_slice(&digest);
        block = digest.to_vec();
    }

    let mut key = [0u8; KEY_LENGTH];
    let mut iv = [0u8; IV_LENGTH];
    key.copy_from_slice(&derived[..KEY_LENGTH]);
    iv.copy_from_slice(&derived[KEY_LENGTH..KEY_LENGTH + IV_LENGTH]);
    derived.zeroize();
    block.zeroize();
    (key, iv)
}

/// Encrypts with a fresh random salt.
pub fn encrypt(password: &str, plaintext: &[u8]) -> Result<CipherParams> {
    let mut salt = [0u8; SALT_LENGTH];
    rand::rngs::OsRng.fill_bytes(&mut salt);
    encrypt_with_salt(password, plaintext, salt)
}

pub fn encrypt_with_salt(password: &str, plaintext: &[u8], salt: [u8; SALT_LENGTH]) -> Result<CipherParams> {
    let (mut key, iv) = evp_bytes_to_key(password.as_bytes(), &salt);
    let cipher = Aes256CbcEnc::new_from_slices(&key, &iv).map_err(|e| Error::Cipher(e.to_string()));
    key.zeroize();

    Ok(CipherParams {
        ciphertext: cipher?.encrypt_padded_vec_mut::<Pkcs7>(plaintext),
        iv,
        salt,
    })
}

/// Decrypts with the key and IV derived from `password` and the salt.
pub fn decrypt(password: &str, params: &CipherParams) -> Result<Vec<u8>> {
    let (mut key, iv) = evp_bytes_to_key(password.as_bytes(), &params.salt);
    let cipher = Aes256CbcDec::new_from_slices(&key, &iv).map_err(|e| Error::Cipher(e.to_string()));
    key.zeroize();

    cipher?
        .decrypt_padded_vec_mut::<Pkcs7>(&params.ciphertext)
        .map_err(|_| Error::Cipher("bad padding".into()))
}

/// Encrypts the JSON text of `value` and returns the JSON cipher format.
pub fn encrypt_object(password: &str, value: &Value) -> Result<String> {
    let plaintext = serde_json::to_vec(value)?;
    Ok(encrypt(password, &plaintext)?.to_json())
}

/// Reverses [`encrypt_object`]. Wrong passwords and corrupt input give `None`.
pub fn decrypt_object(password: &str, text: &str) -> Option<Value> {
    let params = CipherParams::from_json(text).ok()?;
    let plaintext = decrypt(password, &params).ok()?;
    serde_json::from_slice(&plaintext).ok()
}

/// Encrypts a string into OpenSSL salted base64.
pub fn encrypt_str_hash(password: &str, text: &str) -> Result<String> {
    Ok(encrypt(password, text.as_bytes())?.to_openssl())
}

/// Reverses [`encrypt_str_hash`]. Wrong passwords, non UTF-8 output and empty
/// output give `None`.
pub fn decrypt_str_hash(password: &str, text: &str) -> Option<String> {
    let params = CipherParams::from_openssl(text).ok()?;
    let plaintext = decrypt(password, &params).ok()?;
    String::from_utf8(plaintext).ok().filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SALT: [u8; 8] = [1, 2, 3, 4, 5, 6, 7, 8];

    #[test]
    fn key_derivation_matches_openssl() {
        let (key, iv) = evp_bytes_to_key(b"secret", &SALT);
        assert_eq!(
            hex::encode_upper(key),
            "C9E5A1BD216DBE1317E230CEF48F38EE7F0E17AD64022144BCCEC4A1AA2879AB"
        );
        assert_eq!(hex::encode_upper(iv), "E24B32BBBC4EF02ECBCB6576523AD893");
    }

    #[test]
    fn openssl_output_is_reproduced() {
        let params = encrypt_with_salt("secret", b"hello lamden", SALT).unwrap();
        assert_eq!(params.to_openssl(), "U2FsdGVkX18BAgMEBQYHCA9bIw2PwHklE1pROs8Hxf0=");
        assert_eq!(
            decrypt_str_hash("secret", "U2FsdGVkX18BAgMEBQYHCA9bIw2PwHklE1pROs8Hxf0=").as_deref(),
            Some("hello lamden")
        );
    }

    #[test]
    fn json_format_round_trip() {
        let params = encrypt_with_salt("pw", b"{}", SALT).unwrap();
        let text = params.to_json();
        let parsed = CipherParams::from_json(&text).unwrap();
        assert_eq!(parsed, params);
        assert_eq!(parsed.salt, SALT);
    }

    #[test]
    fn wrong_password_yields_none() {
        let encrypted = encrypt_object("right", &json!({"keyList": []})).unwrap();
        assert_eq!(decrypt_object("right", &encrypted), Some(json!({"keyList": []})));
        assert_eq!(decrypt_object("wrong", &encrypted), None);
        assert_eq!(decrypt_str_hash("pw", "not base64!"), None);
        assert_eq!(decrypt_object("pw", "{\"ct\": \"AA==\"}"), None);
    }
}
