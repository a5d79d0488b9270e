//! Lamden Configuration Module
//!
//! This module provides network presets and client settings shared by the
//! Lamden Rust crates.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Maximum number of transactions sent per sender in one batch round
pub const MAX_BATCH_SIZE: usize = 15;
/// Delay between consecutive sends inside a batch
pub const BATCH_SEND_SPACING_MS: u64 = 1200;
/// Number of `/tx` lookups before giving up on a pending transaction
pub const TX_CHECK_LIMIT: u32 = 10;
/// Delay between `/tx` lookups
pub const TX_CHECK_INTERVAL_MS: u64 = 1000;

/// Keystore file format version
pub const KEYSTORE_VERSION: &str = "1.0";

/// Default currency symbol of a network
pub const DEFAULT_CURRENCY_SYMBOL: &str = "TAU";
/// Default human readable network name
pub const DEFAULT_NETWORK_NAME: &str = "lamden network";

/// Network protocol versions understood by the client
pub const NETWORK_VERSIONS: &[u32] = &[1, 2];

/// Lamden MainNet masternodes
pub const MAINNET_HOSTS: &[&str] = &["https://masternode-01.lamden.io"];

/// Lamden TestNet masternodes
pub const TESTNET_HOSTS: &[&str] = &["https://testnet-master-1.lamden.io"];

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("HOSTS Required (Type: Array)")]
    MissingHosts,

    #[error("Host String must include http:// or https:// (got {0})")]
    InvalidHost(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Network type for Lamden networks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NetworkType {
    MainNet,
    TestNet,
    MockChain,
    #[default]
    Custom,
}

impl NetworkType {
    /// Masternode hosts of the public presets
    pub fn default_hosts(&self) -> Vec<String> {
        let hosts: &[&str] = match self {
            NetworkType::MainNet => MAINNET_HOSTS,
            NetworkType::TestNet => TESTNET_HOSTS,
            NetworkType::MockChain | NetworkType::Custom => &[],
        };
        hosts.iter().map(|h| h.to_string()).collect()
    }
}

impl fmt::Display for NetworkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkType::MainNet => write!(f, "mainnet"),
            NetworkType::TestNet => write!(f, "testnet"),
            NetworkType::MockChain => write!(f, "mockchain"),
            NetworkType::Custom => write!(f, "custom"),
        }
    }
}

impl FromStr for NetworkType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mainnet" | "main" => Ok(NetworkType::MainNet),
            "testnet" | "test" => Ok(NetworkType::TestNet),
            "mockchain" => Ok(NetworkType::MockChain),
            "custom" => Ok(NetworkType::Custom),
            _ => Err(format!("Unknown network type: {}", s)),
        }
    }
}

/// Description of a network the client talks to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkInfo {
    /// Masternode base URLs
    #[serde(default)]
    pub hosts: Vec<String>,
    /// Optional block service base URLs
    #[serde(default)]
    pub blockservice_hosts: Vec<String>,
    #[serde(default, rename = "type")]
    pub network_type: NetworkType,
    #[serde(default = "default_network_name")]
    pub name: String,
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
    /// Whether this is an official Lamden network
    #[serde(default)]
    pub lamden: bool,
    #[serde(default)]
    pub block_explorer: Option<String>,
    #[serde(default = "default_network_version")]
    pub version: u32,
}

fn default_network_name() -> String {
    DEFAULT_NETWORK_NAME.to_string()
}

fn default_currency_symbol() -> String {
    DEFAULT_CURRENCY_SYMBOL.to_string()
}

fn default_network_version() -> u32 {
    1
}

impl Default for NetworkInfo {
    fn default() -> Self {
        Self {
            hosts: Vec::new(),
            blockservice_hosts: Vec::new(),
            network_type: NetworkType::Custom,
            name: default_network_name(),
            currency_symbol: default_currency_symbol(),
            lamden: false,
            block_explorer: None,
            version: default_network_version(),
        }
    }
}

impl NetworkInfo {
    /// Creates network info for a list of masternode hosts
    pub fn with_hosts<I, S>(hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            hosts: hosts.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Creates network info for one of the public presets
    pub fn preset(network_type: NetworkType) -> Self {
        Self {
            hosts: network_type.default_hosts(),
            network_type,
            lamden: matches!(network_type, NetworkType::MainNet | NetworkType::TestNet),
            name: match network_type {
                NetworkType::MainNet => "Lamden Mainnet".to_string(),
                NetworkType::TestNet => "Lamden Testnet".to_string(),
                _ => default_network_name(),
            },
            ..Self::default()
        }
    }

    /// Normalizes the info: lower-cases and checks hosts, clamps the version.
    pub fn validated(mut self) -> Result<Self, ConfigError> {
        if self.hosts.is_empty() {
            return Err(ConfigError::MissingHosts);
        }
        self.hosts = validate_hosts(&self.hosts)?;
        self.blockservice_hosts = validate_hosts(&self.blockservice_hosts)?;
        if !NETWORK_VERSIONS.contains(&self.version) {
            self.version = default_network_version();
        }
        if self.name.is_empty() {
            self.name = default_network_name();
        }
        if self.currency_symbol.is_empty() {
            self.currency_symbol = default_currency_symbol();
        }
        Ok(self)
    }
}

/// Lower-cases each host and checks that it carries an http(s) scheme.
pub fn validate_hosts(hosts: &[String]) -> Result<Vec<String>, ConfigError> {
    hosts
        .iter()
        .map(|host| {
            let host = host.to_lowercase();
            if host.starts_with("https://") || host.starts_with("http://") {
                Ok(host.trim_end_matches('/').to_string())
            } else {
                Err(ConfigError::InvalidHost(host))
            }
        })
        .collect()
}

/// Transaction submission settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransactionConfig {
    pub check_limit: u32,
    pub check_interval_ms: u64,
    pub batch_size: usize,
    pub batch_spacing_ms: u64,
    pub default_stamp_limit: u64,
}

impl Default for TransactionConfig {
    fn default() -> Self {
        Self {
            check_limit: TX_CHECK_LIMIT,
            check_interval_ms: TX_CHECK_INTERVAL_MS,
            batch_size: MAX_BATCH_SIZE,
            batch_spacing_ms: BATCH_SEND_SPACING_MS,
            default_stamp_limit: 100,
        }
    }
}

/// Logger configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Log level filter, e.g. `info` or `lamden=debug`
    pub level: String,
    /// Emit JSON lines instead of human readable output
    pub json: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Client configuration file (`lamden.toml`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_client_network")]
    pub network: NetworkInfo,
    #[serde(default)]
    pub transactions: TransactionConfig,
    #[serde(default)]
    pub logger: LoggerConfig,
}

fn default_client_network() -> NetworkInfo {
    NetworkInfo::preset(NetworkType::TestNet)
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            network: default_client_network(),
            transactions: TransactionConfig::default(),
            logger: LoggerConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Parses a configuration from TOML text
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Loads a configuration file, falling back to defaults when it is absent
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }
}
