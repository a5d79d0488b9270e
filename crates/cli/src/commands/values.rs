//! Type fidelity fixture: store each contract value type under a UID and
//! check that it loads back with the same type.

use super::network::connect;
use super::tx::submit;
use crate::args::ValuesCommandArgs;
use anyhow::{Context, Result};
use lamden_config::ClientConfig;
use lamden_cryptography::helpers::random_string;
use lamden_rpc_client::TxInfo;
use lamden_types::{test_values, ContractValue, Hash, MemoryDriver, ValuesArgs, VALUES_METHOD, VALUES_STATE};
use lamden_wallets::wallet;
use serde_json::{json, Value};
use std::sync::Arc;

const UID_LENGTH: usize = 16;

pub async fn run(config: &ClientConfig, args: &ValuesCommandArgs) -> Result<Value> {
    let uid = args.uid.clone().unwrap_or_else(|| random_string(UID_LENGTH));
    let values = ValuesArgs::sample(&uid)?;

    if !args.send {
        return check_locally(&args.contract, &values);
    }

    let sk = args.sk.as_deref().context("--send needs a signing key (--sk or LAMDEN_SK)")?;
    let sender = wallet::get_vk(sk)?;
    let stamps = args.stamps.unwrap_or(config.transactions.default_stamp_limit);
    let mut tx_info = TxInfo::new(sender, &args.contract, VALUES_METHOD, values.to_kwargs(), stamps);
    tx_info.uid = Some(uid);
    submit(config, connect(config)?, tx_info, sk, true).await
}

/// Runs the fixture against an in-memory state driver.
pub fn check_locally(contract: &str, values: &ValuesArgs) -> Result<Value> {
    let driver = Arc::new(MemoryDriver::new());
    let state = Hash::new(driver.clone(), contract, VALUES_STATE, ContractValue::from(""));
    test_values(&state, values)?;

    Ok(json!({
        "uid": values.uid,
        "contract": contract,
        "stored": driver.len(),
        "kwargs": values.to_kwargs(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lamden_types::VALUES_CONTRACT;

    #[test]
    fn sample_values_pass_locally() {
        let values = ValuesArgs::sample("cli-uid").unwrap();
        let report = check_locally(VALUES_CONTRACT, &values).unwrap();
        assert_eq!(report["uid"], "cli-uid");
        assert_eq!(report["stored"], 9);
        assert_eq!(report["kwargs"]["Float"], json!({"__fixed__": "1.01"}));
        assert_eq!(report["kwargs"]["TimeDelta"], json!({"__delta__": [0, 1]}));
    }
}
