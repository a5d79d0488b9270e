//! Command implementations. Each command returns its result as JSON.

pub mod keys;
pub mod network;
pub mod tx;
pub mod values;

use crate::args::{Command, KeystoreCommand};
use anyhow::Result;
use lamden_config::ClientConfig;
use serde_json::Value;

/// Runs `command` against the network in `config`.
pub async fn run(command: &Command, config: &ClientConfig) -> Result<Value> {
    match command {
        Command::Keygen(args) => keys::keygen(args),
        Command::Keystore { action } => match action {
            KeystoreCommand::Create {
                file,
                keys: sks,
                hint,
                password,
            } => keys::keystore_create(file, sks, hint.as_deref(), password.clone()),
            KeystoreCommand::Open { file, password } => keys::keystore_open(file, password.clone()),
        },
        Command::Ping => network::ping(config).await,
        Command::Balance { vk } => network::balance(config, vk).await,
        Command::Variable {
            contract,
            variable,
            key,
        } => network::variable(config, contract, variable, key.as_deref().unwrap_or_default()).await,
        Command::Methods { contract } => network::methods(config, contract).await,
        Command::Send(args) => tx::send(config, args).await,
        Command::CheckTx { hash } => tx::check_tx(config, hash).await,
        Command::Values(args) => values::run(config, args).await,
    }
}
