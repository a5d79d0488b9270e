//! # Lamden-RS: Rust client SDK for Lamden networks
//!
//! Everything a client needs to work with a Lamden smart-contract network:
//! - Typed contract values and their JSON wire format
//! - Ed25519 wallets, BIP-39 accounts and encrypted keystores
//! - Masternode and block service APIs, transaction building and batching
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use lamden_rs::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let wallet = Wallet::random();
//!     let network = Network::new(NetworkInfo::preset(NetworkType::TestNet))?;
//!     let balance = network.get_currency_balance(wallet.vk()).await?;
//!     println!("{} has {} TAU", wallet.vk(), balance);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`config`] - network presets and client settings
//! - [`types`] - contract values, the argument encoder and hashed state
//! - [`crypto`] - ed25519, HD derivation and CryptoJS-compatible encryption
//! - [`wallets`] - wallets and keystores
//! - `rpc_client` - masternode and block service access (feature `rpc`)

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub use lamden_config as config;
pub use lamden_cryptography as crypto;
pub use lamden_types as types;
pub use lamden_wallets as wallets;

#[cfg(feature = "rpc")]
pub use lamden_rpc_client as rpc_client;

/// Common imports for Lamden development
pub mod prelude {
    pub use crate::config::{ClientConfig, NetworkInfo, NetworkType, TransactionConfig};
    pub use crate::types::{ContractValue, ContractingDecimal, Encoder, Hash, MemoryDriver, StateDriver};
    pub use crate::wallets::{wallet, Keystore, Wallet};

    #[cfg(feature = "rpc")]
    pub use crate::rpc_client::{Network, TransactionBatcher, TransactionBuilder, TxInfo};
}

/// Lamden-RS library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
