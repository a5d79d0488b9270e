//! Block service API.
//!
//! The block service indexes masternode state. It is optional: a network
//! without block service hosts answers every read from its masternodes.

use crate::error::{Result, RpcError};
use crate::models::{ContractInfo, KeyRequest};
use crate::rpc_client::{reported_error, RpcClient};
use serde_json::Value;
use tracing::warn;

/// Blocks returned per page when no limit is given
pub const DEFAULT_BLOCK_LIMIT: u32 = 10;

#[derive(Debug, Clone)]
pub struct BlockserviceApi {
    client: RpcClient,
}

impl BlockserviceApi {
    /// Creates the API over `hosts`, which may be empty.
    pub fn new(hosts: &[String]) -> Result<Self> {
        let hosts = hosts
            .iter()
            .map(|host| {
                let host = host.to_lowercase();
                if host.starts_with("http://") || host.starts_with("https://") {
                    Ok(host.trim_end_matches('/').to_string())
                } else {
                    Err(RpcError::InvalidBlockserviceHost(host))
                }
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            client: RpcClient::new(hosts),
        })
    }

    pub fn hosts(&self) -> &[String] {
        self.client.hosts()
    }

    pub fn is_configured(&self) -> bool {
        self.client.has_hosts()
    }

    /// `true` when the service answers `/ping` with `pong`.
    pub async fn ping_server(&self) -> bool {
        match self.client.get_text("/ping", &[]).await {
            Ok(text) => text.trim() == "pong",
            Err(err) => {
                warn!(target: "lamden", error = %err, "blockservice ping failed");
                false
            }
        }
    }

    pub async fn get_latest_block(&self) -> Result<Value> {
        let res = checked(self.client.get("/latest_block", &[]).await?)?;
        Ok(res.get("latest_block").cloned().unwrap_or(Value::Null))
    }

    pub async fn get_blocks(&self, start_block: u64, limit: Option<u32>) -> Result<Value> {
        let query = [
            ("start_block", start_block.to_string()),
            ("limit", limit.unwrap_or(DEFAULT_BLOCK_LIMIT).to_string()),
        ];
        checked(self.client.get("/blocks", &query).await?)
    }

    /// Current value of one key, as `{"value": ...}` plus lookup metadata.
    pub async fn get_current_key_value(&self, contract: &str, variable: &str, key: &str) -> Result<Value> {
        let path = format!("/current/one/{}/{}/{}", contract, variable, key);
        checked(self.client.get(&path, &[]).await?)
    }

    pub async fn get_current_keys_values(&self, keys: &[KeyRequest]) -> Result<Value> {
        let body = serde_json::to_value(keys)?;
        checked(self.client.post(None, "/current/keys", &body).await?)
    }

    /// Transaction by hash. Bodies that are not JSON mean the service has no
    /// record of it.
    pub async fn get_transaction(&self, hash: &str) -> Result<Option<Value>> {
        match self.client.get("/tx", &[("hash", hash.to_string())]).await {
            Ok(res) => checked(res).map(Some),
            Err(RpcError::Json(_)) => Ok(None),
            Err(err) => Err(err),
        }
    }

    pub async fn get_contract_info(&self, contract_name: &str) -> Result<Option<ContractInfo>> {
        let path = format!("/contracts/{}", contract_name);
        let res = match self.client.get(&path, &[]).await {
            Ok(res) => res,
            Err(RpcError::Status { .. }) | Err(RpcError::Service(_)) => return Ok(None),
            Err(err) => return Err(err),
        };
        if res.get("name").and_then(Value::as_str).is_none() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_value(res)?))
    }
}

/// Turns an `{"error": ...}` body into an error.
fn checked(res: Value) -> Result<Value> {
    match reported_error(&res) {
        Some(message) => Err(RpcError::Service(message)),
        None => Ok(res),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_hosts_are_allowed() {
        let api = BlockserviceApi::new(&[]).unwrap();
        assert!(!api.is_configured());
    }

    #[test]
    fn hosts_need_a_scheme() {
        let err = BlockserviceApi::new(&["blocks.example".to_string()]).unwrap_err();
        assert!(err.to_string().starts_with("Blockservice host value must include http:// or https://"));
    }

    #[test]
    fn error_bodies_become_errors() {
        assert!(matches!(checked(json!({"error": "nope"})), Err(RpcError::Service(m)) if m == "nope"));
        assert_eq!(checked(json!({"value": 1})).unwrap(), json!({"value": 1}));
    }
}
