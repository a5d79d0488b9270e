use super::StateDriver;
use crate::error::StateError;
use crate::value::ContractValue;
use crate::Result;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Separator between the variable name and each key dimension.
pub const DELIMITER: char = ':';

/// Maximum number of key dimensions of a hash.
pub const MAX_HASH_DIMENSIONS: usize = 16;

/// Maximum storage key size in bytes.
pub const MAX_KEY_SIZE: usize = 1024;

/// Named multi-key variable of a contract.
pub struct Hash {
    driver: Arc<dyn StateDriver>,
    contract: String,
    name: String,
    default_value: ContractValue,
}

impl Hash {
    pub fn new(
        driver: Arc<dyn StateDriver>,
        contract: impl Into<String>,
        name: impl Into<String>,
        default_value: ContractValue,
    ) -> Self {
        Self {
            driver,
            contract: contract.into(),
            name: name.into(),
            default_value,
        }
    }

    /// `<contract>.<name>`
    pub fn variable_key(&self) -> String {
        format!("{}.{}", self.contract, self.name)
    }

    pub fn default_value(&self) -> &ContractValue {
        &self.default_value
    }

    /// Builds the storage key `<contract>.<name>:<k1>:<k2>...`.
    pub fn storage_key<K: AsRef<str>>(&self, keys: &[K]) -> Result<String> {
        if keys.is_empty() {
            return Err(StateError::InvalidKey("hash keys cannot be empty".into()));
        }
        if keys.len() > MAX_HASH_DIMENSIONS {
            return Err(StateError::InvalidKey(format!(
                "too many dimensions ({}) for hash, max is {}",
                keys.len(),
                MAX_HASH_DIMENSIONS
            )));
        }

        let key = self.join(keys)?;
        if key.len() > MAX_KEY_SIZE {
            return Err(StateError::InvalidKey(format!(
                "key is {} bytes, max is {}",
                key.len(),
                MAX_KEY_SIZE
            )));
        }
        Ok(key)
    }

    fn join<K: AsRef<str>>(&self, keys: &[K]) -> Result<String> {
        let mut key = self.variable_key();
        for part in keys {
            let part = part.as_ref();
            if part.contains(DELIMITER) {
                return Err(StateError::InvalidKey(format!(
                    "key part {:?} contains {:?}",
                    part, DELIMITER
                )));
            }
            key.push(DELIMITER);
            key.push_str(part);
        }
        Ok(key)
    }

    pub fn set<K: AsRef<str>>(&self, keys: &[K], value: &ContractValue) -> Result<()> {
        let key = self.storage_key(keys)?;
        let bytes = serde_json::to_vec(&value.to_wire())?;
        debug!(target: "lamden", key = %key, value_type = %value.value_type(), "hash set");
        self.driver.set(&key, bytes)
    }

    /// Reads a value, falling back to the hash default when nothing is stored.
    pub fn get<K: AsRef<str>>(&self, keys: &[K]) -> Result<ContractValue> {
        let key = self.storage_key(keys)?;
        match self.driver.get(&key)? {
            Some(bytes) => decode(&bytes),
            None => {
                debug!(target: "lamden", key = %key, "hash miss, using default");
                Ok(self.default_value.clone())
            }
        }
    }

    pub fn contains<K: AsRef<str>>(&self, keys: &[K]) -> Result<bool> {
        let key = self.storage_key(keys)?;
        Ok(self.driver.get(&key)?.is_some())
    }

    /// Lists stored entries whose keys start with `prefix`.
    pub fn all<K: AsRef<str>>(&self, prefix: &[K]) -> Result<Vec<(Vec<String>, ContractValue)>> {
        let scan = self.scan_prefix(prefix)?;
        let root_len = self.variable_key().len() + 1;

        let mut entries = Vec::new();
        for key in self.driver.keys_with_prefix(&scan)? {
            if let Some(bytes) = self.driver.get(&key)? {
                let parts = key[root_len..]
                    .split(DELIMITER)
                    .map(str::to_string)
                    .collect();
                entries.push((parts, decode(&bytes)?));
            }
        }
        Ok(entries)
    }

    /// Deletes stored entries whose keys start with `prefix` and returns how
    /// many were removed.
    pub fn clear<K: AsRef<str>>(&self, prefix: &[K]) -> Result<usize> {
        let scan = self.scan_prefix(prefix)?;
        let keys = self.driver.keys_with_prefix(&scan)?;
        for key in &keys {
            self.driver.delete(key)?;
        }
        debug!(target: "lamden", prefix = %scan, removed = keys.len(), "hash clear");
        Ok(keys.len())
    }

    fn scan_prefix<K: AsRef<str>>(&self, prefix: &[K]) -> Result<String> {
        if prefix.len() > MAX_HASH_DIMENSIONS {
            return Err(StateError::InvalidKey(format!(
                "too many dimensions ({}) for hash, max is {}",
                prefix.len(),
                MAX_HASH_DIMENSIONS
            )));
        }
        let mut scan = self.join(prefix)?;
        scan.push(DELIMITER);
        Ok(scan)
    }
}

impl fmt::Debug for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hash")
            .field("key", &self.variable_key())
            .field("default_value", &self.default_value)
            .finish()
    }
}

fn decode(bytes: &[u8]) -> Result<ContractValue> {
    let wire: serde_json::Value = serde_json::from_slice(bytes)?;
    Ok(ContractValue::from_wire(&wire)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::MemoryDriver;

    fn hash() -> Hash {
        Hash::new(Arc::new(MemoryDriver::new()), "con_values_testing", "S", ContractValue::from(""))
    }

    #[test]
    fn storage_key_layout() {
        let h = hash();
        assert_eq!(h.storage_key(&["a", "b"]).unwrap(), "con_values_testing.S:a:b");
    }

    #[test]
    fn rejects_bad_keys() {
        let h = hash();
        let none: [&str; 0] = [];
        assert!(matches!(h.storage_key(&none), Err(StateError::InvalidKey(_))));
        assert!(matches!(h.storage_key(&["a:b"]), Err(StateError::InvalidKey(_))));
        let many = vec!["k"; MAX_HASH_DIMENSIONS + 1];
        assert!(matches!(h.storage_key(&many), Err(StateError::InvalidKey(_))));
        let long = "x".repeat(MAX_KEY_SIZE);
        assert!(matches!(h.storage_key(&[long.as_str()]), Err(StateError::InvalidKey(_))));
        assert!(h.storage_key(&vec!["k"; MAX_HASH_DIMENSIONS]).is_ok());
    }

    #[test]
    fn missing_key_returns_default() {
        let h = hash();
        assert_eq!(h.get(&["nobody", "Str"]).unwrap(), ContractValue::from(""));
        assert!(!h.contains(&["nobody", "Str"]).unwrap());
    }

    #[test]
    fn prefix_does_not_match_longer_parts() {
        let h = hash();
        h.set(&["a", "x"], &ContractValue::from(1)).unwrap();
        h.set(&["ab", "x"], &ContractValue::from(2)).unwrap();
        let entries = h.all(&["a"]).unwrap();
        assert_eq!(entries, vec![(vec!["a".to_string(), "x".to_string()], ContractValue::from(1))]);
        assert_eq!(h.clear(&["a"]).unwrap(), 1);
        assert_eq!(h.get(&["ab", "x"]).unwrap(), ContractValue::from(2));
    }
}
