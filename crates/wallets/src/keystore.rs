//! Password encrypted key lists.
//!
//! A keystore file is the JSON text `{"data": "...", "w": "..."}`. `data` is
//! the CryptoJS JSON cipher format of `{"version": "1.0", "keyList": [...]}`
//! encrypted with the user's password; `w` is the optional password hint,
//! obscured with a fixed password and not protected by the user's one.

use crate::wallet::{Wallet, WalletOptions};
use crate::{Error, Result};
use lamden_config::KEYSTORE_VERSION;
use lamden_cryptography::cryptojs;
use lamden_cryptography::helpers::is_lamden_key;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::fmt;
use tracing::{debug, info};

/// Password used to obscure hints.
const HINT_PASSWORD: &str = "n1ahcKc0lb";

/// A stored key with any extra metadata (nickname, network, ...)
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyInfo {
    pub sk: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl KeyInfo {
    pub fn new(sk: impl Into<String>) -> Self {
        Self {
            sk: sk.into(),
            extra: Map::new(),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

impl fmt::Debug for KeyInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyInfo")
            .field("extra", &self.extra)
            .finish_non_exhaustive()
    }
}

/// A private wallet for a stored key, with the key's metadata
#[derive(Debug, Clone)]
pub struct KeystoreWallet {
    pub wallet: Wallet,
    pub extra: Map<String, Value>,
}

impl KeystoreWallet {
    pub fn vk(&self) -> &str {
        self.wallet.vk()
    }

    pub fn sign(&self, msg: &[u8]) -> Result<String> {
        self.wallet.sign(msg)
    }

    /// `vk` plus the metadata, without the secret key.
    pub fn to_json(&self) -> Value {
        let mut out = self.extra.clone();
        out.insert("vk".into(), Value::String(self.vk().to_string()));
        Value::Object(out)
    }
}

/// Contents of a keystore file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeystoreData {
    pub data: String,
    #[serde(default)]
    pub w: String,
}

impl KeystoreData {
    pub fn parse(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|_| Error::InvalidKeystore)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Decrypted key list plus the encrypted data it was loaded from
#[derive(Debug, Default)]
pub struct Keystore {
    key_list: Vec<KeyInfo>,
    wallets: Vec<KeystoreWallet>,
    encrypted_data: Option<KeystoreData>,
    version: Option<String>,
}

impl Keystore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_key(key: KeyInfo) -> Result<Self> {
        let mut keystore = Self::new();
        keystore.add_key(key)?;
        Ok(keystore)
    }

    pub fn from_keys(keys: impl IntoIterator<Item = KeyInfo>) -> Result<Self> {
        let mut keystore = Self::new();
        keystore.add_keys(keys)?;
        Ok(keystore)
    }

    /// Loads encrypted keystore text without decrypting it.
    pub fn from_keystore_data(text: &str) -> Result<Self> {
        let mut keystore = Self::new();
        keystore.add_keystore_data(text)?;
        Ok(keystore)
    }

    /// Adds a key. A `vk` field in the metadata is dropped; it is always
    /// derived from `sk`.
    pub fn add_key(&mut self, mut key: KeyInfo) -> Result<()> {
        if !is_lamden_key(&key.sk) {
            return Err(Error::InvalidPrivateKey("keystore keys must be 64 hex characters".into()));
        }
        key.extra.remove("vk");

        let wallet = Wallet::create(WalletOptions {
            sk: Some(key.sk.clone()),
            keep_private: true,
            ..Default::default()
        })?;
        debug!(target: "lamden", vk = %wallet.vk(), "key added to keystore");

        self.wallets.push(KeystoreWallet {
            wallet,
            extra: key.extra.clone(),
        });
        self.key_list.push(key);
        Ok(())
    }

    pub fn add_keys(&mut self, keys: impl IntoIterator<Item = KeyInfo>) -> Result<()> {
        keys.into_iter().try_for_each(|key| self.add_key(key))
    }

    /// Removes the key at `index`. Does nothing on an empty keystore.
    pub fn delete_key(&mut self, index: usize) -> Result<()> {
        if self.key_list.is_empty() {
            return Ok(());
        }
        if index >= self.key_list.len() {
            return Err(Error::KeyIndexOutOfRange);
        }
        self.key_list.remove(index);
        self.wallets.remove(index);
        Ok(())
    }

    pub fn clear_keys(&mut self) {
        self.key_list.clear();
        self.wallets.clear();
    }

    pub fn num_of_keys(&self) -> usize {
        self.key_list.len()
    }

    pub fn wallets(&self) -> &[KeystoreWallet] {
        &self.wallets
    }

    pub fn get_wallet(&self, vk: &str) -> Option<&KeystoreWallet> {
        self.wallets.iter().find(|wallet| wallet.vk() == vk)
    }

    /// Version of the last decrypted keystore.
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn encrypted_data(&self) -> Option<&KeystoreData> {
        self.encrypted_data.as_ref()
    }

    /// Checks the shape of keystore data without decrypting it.
    pub fn validate_keystore(data: &KeystoreData) -> Result<()> {
        let cipher: Value = serde_json::from_str(&data.data).map_err(|_| Error::InvalidKeystore)?;
        let present = |name: &str| {
            cipher
                .get(name)
                .and_then(Value::as_str)
                .is_some_and(|value| !value.is_empty())
        };
        if present("ct") && present("iv") && present("s") {
            Ok(())
        } else {
            Err(Error::InvalidKeystore)
        }
    }

    pub fn add_keystore_data(&mut self, text: &str) -> Result<()> {
        let data = KeystoreData::parse(text)?;
        Self::validate_keystore(&data)?;
        self.encrypted_data = Some(data);
        Ok(())
    }

    /// Reads the password hint of `text`, or of the loaded keystore data.
    /// Keystores without a hint give an empty string.
    pub fn password_hint(&self, text: Option<&str>) -> Result<String> {
        let parsed;
        let data = match text {
            Some(text) => {
                parsed = KeystoreData::parse(text)?;
                &parsed
            }
            None => self.encrypted_data.as_ref().ok_or(Error::NoKeystoreData)?,
        };

        if data.w.is_empty() {
            return Ok(String::new());
        }
        Ok(cryptojs::decrypt_str_hash(HINT_PASSWORD, &data.w).unwrap_or_default())
    }

    /// Encrypts the key list into keystore file text.
    pub fn create_keystore(&self, password: &str, hint: Option<&str>) -> Result<String> {
        if password.is_empty() {
            return Err(Error::InvalidArgument("password must not be empty".into()));
        }

        let payload = json!({
            "version": KEYSTORE_VERSION,
            "keyList": self.key_list,
        });
        let w = match hint.filter(|hint| !hint.is_empty()) {
            Some(hint) => cryptojs::encrypt_str_hash(HINT_PASSWORD, hint)?,
            None => String::new(),
        };

        let data = KeystoreData {
            data: cryptojs::encrypt_object(password, &payload)?,
            w,
        };
        info!(target: "lamden", keys = self.key_list.len(), "keystore created");
        data.to_json_string()
    }

    /// Decrypts keystore data, from `text` or previously loaded, and appends
    /// its keys to this keystore.
    pub fn decrypt_keystore(&mut self, password: &str, text: Option<&str>) -> Result<()> {
        if let Some(text) = text {
            self.add_keystore_data(text)?;
        }
        let data = self.encrypted_data.as_ref().ok_or(Error::NothingToDecrypt)?;

        let decrypted = cryptojs::decrypt_object(password, &data.data).ok_or(Error::IncorrectPassword)?;
        let keys: Vec<KeyInfo> = decrypted
            .get("keyList")
            .cloned()
            .and_then(|list| serde_json::from_value(list).ok())
            .ok_or(Error::IncorrectPassword)?;
        if keys.iter().any(|key| key.sk.is_empty()) {
            return Err(Error::IncorrectPassword);
        }

        let count = keys.len();
        self.add_keys(keys).map_err(|_| Error::IncorrectPassword)?;
        self.version = decrypted
            .get("version")
            .and_then(Value::as_str)
            .map(str::to_string);
        info!(target: "lamden", keys = count, version = ?self.version, "keystore decrypted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wallet::new_wallet;

    fn key(nickname: &str) -> KeyInfo {
        KeyInfo::new(new_wallet(None).sk).with("nickname", nickname)
    }

    #[test]
    fn vk_in_metadata_is_dropped() {
        let keys = new_wallet(None);
        let info = KeyInfo::new(keys.sk.clone()).with("vk", "bogus");
        let keystore = Keystore::from_key(info).unwrap();
        let wallet = &keystore.wallets()[0];
        assert_eq!(wallet.vk(), keys.vk);
        assert_eq!(wallet.to_json(), json!({"vk": keys.vk}));
        assert_eq!(wallet.wallet.sk(), None);
    }

    #[test]
    fn delete_key_bounds() {
        let mut keystore = Keystore::new();
        keystore.delete_key(5).unwrap();

        keystore.add_keys([key("a"), key("b")]).unwrap();
        assert!(matches!(keystore.delete_key(2), Err(Error::KeyIndexOutOfRange)));
        keystore.delete_key(0).unwrap();
        assert_eq!(keystore.num_of_keys(), 1);
        assert_eq!(keystore.wallets()[0].extra["nickname"], json!("b"));
    }

    #[test]
    fn invalid_keystore_shapes() {
        let mut keystore = Keystore::new();
        for text in [
            "not json",
            r#"{"w": ""}"#,
            r#"{"data": "not json"}"#,
            r#"{"data": "{\"ct\": \"x\", \"iv\": \"y\"}"}"#,
        ] {
            assert!(matches!(keystore.add_keystore_data(text), Err(Error::InvalidKeystore)), "{text}");
        }
        assert!(matches!(keystore.password_hint(None), Err(Error::NoKeystoreData)));
        assert!(matches!(keystore.decrypt_keystore("pw", None), Err(Error::NothingToDecrypt)));
    }
}
