//! Masternode REST API.

use crate::error::{Result, RpcError};
use crate::models::{ContractInfo, ContractVariables, NonceResult};
use crate::rpc_client::RpcClient;
use lamden_config::{validate_hosts, ConfigError};
use lamden_cryptography::helpers::is_string_hex;
use lamden_types::{ContractValue, ContractingDecimal, MethodSignature};
use serde_json::Value;
use std::str::FromStr;
use tracing::{debug, warn};

/// Client for the masternode endpoints
#[derive(Debug, Clone)]
pub struct MasternodeApi {
    client: RpcClient,
}

impl MasternodeApi {
    /// Creates the API over `hosts`. Hosts are lower-cased and must carry an
    /// http(s) scheme; at least one is required.
    pub fn new(hosts: &[String]) -> Result<Self> {
        if hosts.is_empty() {
            return Err(ConfigError::MissingHosts.into());
        }
        Ok(Self {
            client: RpcClient::new(validate_hosts(hosts)?),
        })
    }

    pub fn hosts(&self) -> &[String] {
        self.client.hosts()
    }

    /// Host for the next call
    pub fn host(&self) -> Result<&str> {
        self.client.random_host()
    }

    pub async fn get_contract_info(&self, contract_name: &str) -> Result<Option<ContractInfo>> {
        let path = format!("/contracts/{}", contract_name);
        let res = match absent_on_error(self.client.get(&path, &[]).await)? {
            Some(res) => res,
            None => return Ok(None),
        };
        if res.get("name").and_then(Value::as_str).is_none() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_value(res)?))
    }

    /// Raw wire value of a contract variable. `key` may be empty for plain
    /// variables.
    pub async fn get_variable(&self, contract: &str, variable: &str, key: &str) -> Result<Option<Value>> {
        let path = format!("/contracts/{}/{}/", contract, variable);
        let query = if key.is_empty() {
            Vec::new()
        } else {
            vec![("key", key.to_string())]
        };

        Ok(absent_on_error(self.client.get(&path, &query).await)?
            .and_then(|mut res| res.get_mut("value").map(Value::take))
            .filter(|value| !value.is_null()))
    }

    pub async fn get_contract_methods(&self, contract: &str) -> Result<Vec<MethodSignature>> {
        let path = format!("/contracts/{}/methods", contract);
        match absent_on_error(self.client.get(&path, &[]).await)? {
            Some(mut res) => match res.get_mut("methods").map(Value::take) {
                Some(methods) => Ok(serde_json::from_value(methods)?),
                None => Ok(Vec::new()),
            },
            None => Ok(Vec::new()),
        }
    }

    pub async fn get_contract_variables(&self, contract: &str) -> Result<ContractVariables> {
        let path = format!("/contracts/{}/variables", contract);
        match absent_on_error(self.client.get(&path, &[]).await)? {
            Some(res) if res.get("variables").is_some() => Ok(serde_json::from_value(res)?),
            _ => Ok(ContractVariables::default()),
        }
    }

    /// `true` when a masternode answers `/ping` with a status.
    pub async fn ping_server(&self) -> bool {
        match self.client.get("/ping", &[]).await {
            Ok(res) => res.get("status").is_some(),
            Err(err) => {
                warn!(target: "lamden", error = %err, "masternode ping failed");
                false
            }
        }
    }

    /// Balance in the `currency` contract. Unknown accounts hold zero.
    pub async fn get_currency_balance(&self, vk: &str) -> Result<ContractingDecimal> {
        let value = match self.get_variable("currency", "balances", vk).await? {
            Some(value) => value,
            None => return Ok(ContractingDecimal::zero()),
        };
        balance_from_wire(&value)
    }

    pub async fn contract_exists(&self, contract_name: &str) -> Result<bool> {
        Ok(self.get_contract_info(contract_name).await?.is_some())
    }

    /// Submits a serialized transaction, to `host` when given.
    pub async fn send_transaction(&self, transaction: &Value, host: Option<&str>) -> Result<Value> {
        self.client.post(host, "/", transaction).await
    }

    /// Fetches the next nonce for `sender` and records which host served it.
    pub async fn get_nonce(&self, sender: &str) -> Result<NonceResult> {
        if !is_string_hex(sender) {
            return Err(RpcError::NotHex(sender.to_string()));
        }
        let host = self.client.random_host()?.to_string();
        let path = format!("/nonce/{}", sender);

        let nonce_error = || RpcError::Nonce {
            sender: sender.to_string(),
            url: host.clone(),
        };
        let res = self.client.get_from(&host, &path, &[]).await.map_err(|err| {
            debug!(target: "lamden", error = %err, "nonce request failed");
            nonce_error()
        })?;
        let mut nonce: NonceResult = serde_json::from_value(res).map_err(|_| nonce_error())?;
        nonce.masternode = Some(host.clone());
        Ok(nonce)
    }

    pub async fn check_transaction(&self, hash: &str) -> Result<Value> {
        self.client.get("/tx", &[("hash", hash.to_string())]).await
    }

    pub async fn get_latest_block(&self) -> Result<Value> {
        self.client.get("/latest_block", &[]).await
    }
}

/// Maps "not found" style responses to `None` and keeps transport errors.
fn absent_on_error(result: Result<Value>) -> Result<Option<Value>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(RpcError::Status { .. }) | Err(RpcError::Service(_)) => Ok(None),
        Err(err) => Err(err),
    }
}

/// Reads a stored balance, either a `__fixed__` value or a plain number or
/// string.
pub(crate) fn balance_from_wire(value: &Value) -> Result<ContractingDecimal> {
    if let Value::String(text) = value {
        return Ok(ContractingDecimal::from_str(text)?);
    }
    let decoded = ContractValue::from_wire(value)?;
    match decoded.as_decimal() {
        Some(balance) => Ok(balance),
        None => Ok(ContractingDecimal::from_str(&decoded.to_string())?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn requires_valid_hosts() {
        assert!(matches!(
            MasternodeApi::new(&[]),
            Err(RpcError::Config(ConfigError::MissingHosts))
        ));
        assert!(matches!(
            MasternodeApi::new(&["localhost:18080".to_string()]),
            Err(RpcError::Config(ConfigError::InvalidHost(_)))
        ));
        let api = MasternodeApi::new(&["HTTP://Node.Example".to_string()]).unwrap();
        assert_eq!(api.hosts(), ["http://node.example"]);
    }

    #[test]
    fn balances_from_wire_forms() {
        assert_eq!(
            balance_from_wire(&json!({"__fixed__": "10.5"})).unwrap().to_string(),
            "10.5"
        );
        assert_eq!(balance_from_wire(&json!(42)).unwrap().to_string(), "42.0");
        assert_eq!(balance_from_wire(&json!("7.25")).unwrap().to_string(), "7.25");
        assert!(balance_from_wire(&json!("seven")).is_err());
    }

    #[tokio::test]
    async fn nonce_requires_hex_sender() {
        let api = MasternodeApi::new(&["http://127.0.0.1:1".to_string()]).unwrap();
        let err = api.get_nonce("not-hex").await.unwrap_err();
        assert_eq!(err.to_string(), "not-hex is not a hex string.");
    }
}
