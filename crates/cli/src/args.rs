use clap::{Args, Parser, Subcommand, ValueEnum};
use lamden_config::NetworkType;
use lamden_types::VALUES_CONTRACT;
use std::path::PathBuf;

/// Command-line arguments for the Lamden CLI
#[derive(Parser, Debug, Clone)]
#[command(
    name = "lamden-cli",
    version = env!("CARGO_PKG_VERSION"),
    about = "Lamden CLI - keys, keystores, state reads and transactions",
    long_about = "Lamden CLI talks to Lamden masternodes and block services. It creates keys and keystores, reads contract state, and signs, sends and tracks transactions. Every command prints its result as JSON."
)]
pub struct CliArgs {
    /// Specifies the config file
    #[arg(short = 'c', long = "config", value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Network preset to use instead of the configured network
    #[arg(long = "network", value_enum, global = true)]
    pub network: Option<Network>,

    /// Masternode host, replaces the configured hosts (repeatable)
    #[arg(long = "host", value_name = "URL", global = true)]
    pub hosts: Vec<String>,

    /// Block service host, replaces the configured ones (repeatable)
    #[arg(long = "blockservice", value_name = "URL", global = true)]
    pub blockservice_hosts: Vec<String>,

    /// The verbose log level
    #[arg(long = "verbose", value_enum, global = true)]
    pub verbose: Option<LogLevel>,

    /// Emit logs as JSON lines
    #[arg(long = "json-logs", global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Create a key pair, optionally from a BIP-39 mnemonic or seed
    Keygen(KeygenArgs),
    /// Check that the masternodes are online
    Ping,
    /// Currency balance of an account
    Balance {
        /// Account verifying key
        vk: String,
    },
    /// Current value of a contract variable
    Variable {
        contract: String,
        variable: String,
        /// Hash key; parts are joined with ':'
        key: Option<String>,
    },
    /// Methods exported by a contract
    Methods { contract: String },
    /// Sign and send a transaction
    Send(SendArgs),
    /// Processed result of a transaction
    CheckTx { hash: String },
    /// Encrypted keystore files
    Keystore {
        #[command(subcommand)]
        action: KeystoreCommand,
    },
    /// Store and reload every contract value type
    Values(ValuesCommandArgs),
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct KeygenArgs {
    /// Derive from this mnemonic phrase
    #[arg(long, value_name = "PHRASE", conflicts_with = "seed")]
    pub mnemonic: Option<String>,

    /// Derive from this hex BIP-39 seed
    #[arg(long, value_name = "HEX")]
    pub seed: Option<String>,

    /// Generate a fresh 24 word mnemonic
    #[arg(long)]
    pub bip39: bool,

    /// Account index on the derivation path
    #[arg(long, default_value_t = 0)]
    pub index: u32,
}

impl KeygenArgs {
    pub fn is_hd(&self) -> bool {
        self.bip39 || self.mnemonic.is_some() || self.seed.is_some()
    }
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct SendArgs {
    /// Signing key of the sender
    #[arg(long, env = "LAMDEN_SK", hide_env_values = true, value_name = "HEX")]
    pub sk: String,

    pub contract: String,

    pub method: String,

    /// Keyword arguments as a JSON object
    #[arg(long, value_name = "JSON", default_value = "{}")]
    pub kwargs: String,

    /// Stamp limit, defaults to the configured limit
    #[arg(long, value_name = "STAMPS")]
    pub stamps: Option<u64>,

    /// Wait for the processed result
    #[arg(long)]
    pub wait: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum KeystoreCommand {
    /// Encrypt keys into a new keystore file
    Create {
        file: PathBuf,

        /// Key to store (repeatable)
        #[arg(long = "sk", value_name = "HEX", required = true)]
        keys: Vec<String>,

        /// Password hint stored with the keystore
        #[arg(long)]
        hint: Option<String>,

        /// Keystore password, prompted for when absent
        #[arg(long, env = "LAMDEN_KEYSTORE_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Decrypt a keystore file and list its accounts
    Open {
        file: PathBuf,

        /// Keystore password, prompted for when absent
        #[arg(long, env = "LAMDEN_KEYSTORE_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct ValuesCommandArgs {
    /// Key prefix of the stored values, random when absent
    #[arg(long)]
    pub uid: Option<String>,

    /// Send a `test_values` transaction instead of checking locally
    #[arg(long, requires = "sk")]
    pub send: bool,

    /// Signing key used with `--send`
    #[arg(long, env = "LAMDEN_SK", hide_env_values = true, value_name = "HEX")]
    pub sk: Option<String>,

    /// Contract that exports `test_values`
    #[arg(long, default_value = VALUES_CONTRACT)]
    pub contract: String,

    #[arg(long, value_name = "STAMPS")]
    pub stamps: Option<u64>,
}

/// Log level enumeration
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

/// Network presets selectable from the command line
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Network {
    Mainnet,
    Testnet,
    Mockchain,
}

impl From<Network> for NetworkType {
    fn from(network: Network) -> Self {
        match network {
            Network::Mainnet => NetworkType::MainNet,
            Network::Testnet => NetworkType::TestNet,
            Network::Mockchain => NetworkType::MockChain,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn globals_default_to_config() {
        let args = CliArgs::parse_from(["lamden-cli", "ping"]);
        assert_eq!(args.config, None);
        assert_eq!(args.network, None);
        assert!(args.hosts.is_empty());
        assert_eq!(args.verbose, None);
        assert!(!args.json_logs);
        assert_eq!(args.command, Command::Ping);
    }

    #[test]
    fn log_level_conversion() {
        assert_eq!(tracing::Level::from(LogLevel::Trace), tracing::Level::TRACE);
        assert_eq!(tracing::Level::from(LogLevel::Warn), tracing::Level::WARN);
        assert_eq!(LogLevel::Debug.as_str(), "debug");
    }

    #[test]
    fn network_maps_to_preset() {
        assert_eq!(NetworkType::from(Network::Mainnet), NetworkType::MainNet);
        assert_eq!(NetworkType::from(Network::Mockchain), NetworkType::MockChain);
    }
}
