//! Read-only network queries.

use anyhow::{Context, Result};
use lamden_config::ClientConfig;
use lamden_rpc_client::Network;
use serde_json::{json, Value};

pub(crate) fn connect(config: &ClientConfig) -> Result<Network> {
    Network::new(config.network.clone()).context("invalid network configuration")
}

pub async fn ping(config: &ClientConfig) -> Result<Value> {
    let network = connect(config)?;
    network.ping().await;
    Ok(serde_json::to_value(network.network_info())?)
}

pub async fn balance(config: &ClientConfig, vk: &str) -> Result<Value> {
    let network = connect(config)?;
    let balance = network.get_currency_balance(vk).await?;
    Ok(json!({
        "vk": vk,
        "balance": balance.to_string(),
        "currency": network.info().currency_symbol,
    }))
}

pub async fn variable(config: &ClientConfig, contract: &str, variable: &str, key: &str) -> Result<Value> {
    let network = connect(config)?;
    let value = network.get_variable_wire(contract, variable, key).await?;
    Ok(json!({
        "contract": contract,
        "variable": variable,
        "key": key,
        "value": value,
    }))
}

pub async fn methods(config: &ClientConfig, contract: &str) -> Result<Value> {
    let network = connect(config)?;
    let methods = network.get_contract_methods(contract).await?;
    Ok(json!({
        "contract": contract,
        "methods": methods,
    }))
}
