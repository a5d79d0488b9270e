//! Sending and checking transactions.

use super::network::connect;
use crate::args::SendArgs;
use anyhow::{bail, Context, Result};
use lamden_config::ClientConfig;
use lamden_rpc_client::{Network, ResultInfo, TransactionBuilder, TxInfo, TxResult};
use lamden_wallets::wallet;
use serde_json::{json, Map, Value};
use tracing::{info, warn};

/// Parses `--kwargs`, which must be a JSON object.
pub fn parse_kwargs(text: &str) -> Result<Map<String, Value>> {
    match serde_json::from_str(text).context("kwargs must be valid JSON")? {
        Value::Object(kwargs) => Ok(kwargs),
        other => bail!("kwargs must be a JSON object, got {}", other),
    }
}

/// Encodes kwargs with the method's declared argument types. Kwargs are sent
/// unchanged when the method signature cannot be fetched.
pub async fn encode_for_method(
    network: &Network,
    contract: &str,
    method: &str,
    kwargs: Map<String, Value>,
) -> Result<Map<String, Value>> {
    let methods = match network.get_contract_methods(contract).await {
        Ok(methods) => methods,
        Err(err) => {
            warn!(target: "lamden", %contract, error = %err, "contract methods unavailable, sending kwargs as given");
            return Ok(kwargs);
        }
    };
    match methods.iter().find(|signature| signature.name == method) {
        Some(signature) => Ok(signature.encode_kwargs(&kwargs)?),
        None => bail!("contract {} has no method {}", contract, method),
    }
}

/// Sends a transaction and, with `wait`, polls for its result.
pub async fn submit(
    config: &ClientConfig,
    network: Network,
    tx_info: TxInfo,
    sk: &str,
    wait: bool,
) -> Result<Value> {
    let mut builder =
        TransactionBuilder::with_network(network, tx_info, None)?.with_config(config.transactions.clone());
    builder.send(Some(sk)).await?;

    if wait && builder.tx_hash().is_some() {
        builder.check_for_transaction_result().await?;
    }
    if let Some(result_info) = builder.result_info() {
        info!(target: "lamden", title = %result_info.title, subtitle = %result_info.subtitle, "transaction finished");
    }
    Ok(serde_json::to_value(builder.all_info())?)
}

pub async fn send(config: &ClientConfig, args: &SendArgs) -> Result<Value> {
    let sender = wallet::get_vk(&args.sk)?;
    let network = connect(config)?;
    let kwargs = parse_kwargs(&args.kwargs)?;
    let kwargs = encode_for_method(&network, &args.contract, &args.method, kwargs).await?;
    let stamps = args.stamps.unwrap_or(config.transactions.default_stamp_limit);

    let tx_info = TxInfo::new(sender, &args.contract, &args.method, kwargs, stamps);
    submit(config, network, tx_info, &args.sk, args.wait).await
}

pub async fn check_tx(config: &ClientConfig, hash: &str) -> Result<Value> {
    let network = connect(config)?;
    let res = network.masternode().check_transaction(hash).await?;
    if let Some(error) = res.get("error").and_then(Value::as_str) {
        bail!("{}", error);
    }
    let result: TxResult = serde_json::from_value(res.clone())?;
    Ok(json!({
        "result": res,
        "resultInfo": ResultInfo::from_result(&result),
    }))
}
