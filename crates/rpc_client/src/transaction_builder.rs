//! Building, signing, sending and tracking a single transaction.
//!
//! The signed payload is the compact JSON text of
//!
//! ```text
//! {"contract", "function", "kwargs", "nonce", "processor", "sender", "stamps_supplied"}
//! ```
//!
//! with object keys sorted at every level. A submitted transaction is
//! `{"metadata": {"signature", "timestamp"}, "payload": <payload>}`.

use crate::error::{Result, RpcError};
use crate::models::{NonceResult, ResultInfo, TxEvent, TxResult};
use crate::network::{Network, NetworkSummary};
use crate::rpc_client::reported_error;
use chrono::Utc;
use lamden_config::{NetworkInfo, TransactionConfig};
use lamden_cryptography::helpers::is_string_hex;
use lamden_wallets::wallet;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

const TX_NOT_FOUND: &str = "Transaction not found.";
const FAILED_TO_FETCH: &str = "TypeError: Failed to fetch";
const EVENT_CHANNEL_CAPACITY: usize = 16;

/// What a transaction calls and who pays for it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    pub sender_vk: String,
    pub contract_name: String,
    pub method_name: String,
    #[serde(default)]
    pub kwargs: Map<String, Value>,
    pub stamp_limit: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nonce: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processor: Option<String>,
}

impl TxInfo {
    pub fn new(
        sender_vk: impl Into<String>,
        contract_name: impl Into<String>,
        method_name: impl Into<String>,
        kwargs: Map<String, Value>,
        stamp_limit: u64,
    ) -> Self {
        Self {
            uid: None,
            sender_vk: sender_vk.into(),
            contract_name: contract_name.into(),
            method_name: method_name.into(),
            kwargs,
            stamp_limit,
            nonce: None,
            processor: None,
        }
    }

    /// Reads loosely typed transaction info, reporting the first bad field.
    pub fn from_json(value: &Value) -> Result<Self> {
        let obj = value
            .as_object()
            .filter(|obj| !obj.is_empty())
            .ok_or_else(|| RpcError::validation("txInfo object not found"))?;
        let text = |name: &str| obj.get(name).and_then(Value::as_str).unwrap_or_default();

        let stamp_limit = obj
            .get("stampLimit")
            .and_then(Value::as_u64)
            .ok_or_else(|| RpcError::validation("Stamps Limit Required (Type: Integer)"))?;
        let nonce = match obj.get("nonce") {
            None | Some(Value::Null) => None,
            Some(nonce) => Some(nonce.as_u64().ok_or_else(|| {
                RpcError::validation(format!("Nonce is required to be an Integer, got {}", nonce))
            })?),
        };
        let processor = match obj.get("processor") {
            None | Some(Value::Null) => None,
            Some(processor) => Some(processor.as_str().map(str::to_string).ok_or_else(|| {
                RpcError::validation(format!("Processor is required to be a String, got {}", processor))
            })?),
        };

        let info = Self {
            uid: obj.get("uid").and_then(Value::as_str).map(str::to_string),
            sender_vk: text("senderVk").to_string(),
            contract_name: text("contractName").to_string(),
            method_name: text("methodName").to_string(),
            kwargs: obj
                .get("kwargs")
                .and_then(Value::as_object)
                .cloned()
                .unwrap_or_default(),
            stamp_limit,
            nonce,
            processor,
        };
        info.validate()?;
        Ok(info)
    }

    pub fn validate(&self) -> Result<()> {
        if !is_string_hex(&self.sender_vk) {
            return Err(RpcError::validation("Sender Public Key Required (Type: Hex String)"));
        }
        if self.contract_name.is_empty() {
            return Err(RpcError::validation("Contract Name Required (Type: String)"));
        }
        if self.method_name.is_empty() {
            return Err(RpcError::validation("Method Required (Type: String)"));
        }
        if self.processor.as_deref() == Some("") {
            return Err(RpcError::validation("Processor is required to be a String, got \"\""));
        }
        Ok(())
    }
}

/// Saved transaction state used to rebuild a builder
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxData {
    #[serde(default)]
    pub uid: Option<String>,
    #[serde(default)]
    pub tx_send_result: Option<TxResult>,
    #[serde(default)]
    pub nonce_result: Option<NonceResult>,
    #[serde(default)]
    pub tx_block_result: Option<TxResult>,
    #[serde(default)]
    pub result_info: Option<ResultInfo>,
}

/// The call a builder makes
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TxSummary {
    pub sender_vk: String,
    pub contract_name: String,
    pub method_name: String,
    pub kwargs: Map<String, Value>,
    pub stamp_limit: u64,
}

/// Everything a builder knows about its transaction
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllInfo {
    pub uid: Option<String>,
    pub tx_hash: Option<String>,
    pub signed: bool,
    pub signature: Option<String>,
    pub network_info: NetworkSummary,
    pub tx_info: TxSummary,
    pub tx_send_result: TxResult,
    pub tx_block_result: Option<TxResult>,
    pub result_info: Option<ResultInfo>,
    pub nonce_result: Option<NonceResult>,
}

#[derive(Debug)]
pub struct TransactionBuilder {
    network: Network,
    config: TransactionConfig,
    uid: Option<String>,
    sender: String,
    contract: String,
    method: String,
    kwargs: Map<String, Value>,
    stamp_limit: u64,
    nonce: Option<u64>,
    processor: Option<String>,
    payload_bytes: Option<Vec<u8>>,
    signature: Option<String>,
    nonce_result: Option<NonceResult>,
    tx_send_result: TxResult,
    tx_block_result: Option<TxResult>,
    tx_hash: Option<String>,
    tx_check_result: TxResult,
    tx_check_attempts: u32,
    result_info: Option<ResultInfo>,
    events: broadcast::Sender<TxEvent>,
}

impl TransactionBuilder {
    /// Creates a builder for `tx_info` on the network described by
    /// `network_info`, restoring saved state from `tx_data` when given.
    pub fn new(network_info: NetworkInfo, tx_info: TxInfo, tx_data: Option<TxData>) -> Result<Self> {
        Self::with_network(Network::new(network_info)?, tx_info, tx_data)
    }

    pub fn with_network(network: Network, tx_info: TxInfo, tx_data: Option<TxData>) -> Result<Self> {
        tx_info.validate()?;
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        let mut builder = Self {
            network,
            config: TransactionConfig::default(),
            uid: tx_info.uid,
            sender: tx_info.sender_vk,
            contract: tx_info.contract_name,
            method: tx_info.method_name,
            kwargs: tx_info.kwargs,
            stamp_limit: tx_info.stamp_limit,
            nonce: tx_info.nonce,
            processor: tx_info.processor,
            payload_bytes: None,
            signature: None,
            nonce_result: None,
            tx_send_result: TxResult::default(),
            tx_block_result: None,
            tx_hash: None,
            tx_check_result: TxResult::default(),
            tx_check_attempts: 0,
            result_info: None,
            events,
        };
        if let Some(data) = tx_data {
            builder.hydrate(data);
        }
        Ok(builder)
    }

    /// Overrides the result polling settings.
    pub fn with_config(mut self, config: TransactionConfig) -> Self {
        self.config = config;
        self
    }

    fn hydrate(&mut self, data: TxData) {
        if let Some(uid) = data.uid {
            self.uid = Some(uid);
        }
        if let Some(nonce_result) = data.nonce_result {
            self.nonce = Some(nonce_result.nonce);
            if !nonce_result.processor.is_empty() {
                self.processor = Some(nonce_result.processor.clone());
            }
            self.nonce_result = Some(nonce_result);
        }
        if let Some(send_result) = data.tx_send_result {
            if let Some(hash) = send_result.hash.clone() {
                self.tx_hash = Some(hash);
            }
            self.tx_send_result = send_result;
        }
        if data.tx_block_result.is_some() {
            self.tx_block_result = data.tx_block_result;
        }
        if data.result_info.is_some() {
            self.result_info = data.result_info;
        }
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TxEvent> {
        self.events.subscribe()
    }

    pub fn uid(&self) -> Option<&str> {
        self.uid.as_deref()
    }

    pub fn sender(&self) -> &str {
        &self.sender
    }

    pub fn nonce(&self) -> Option<u64> {
        self.nonce
    }

    pub fn processor(&self) -> Option<&str> {
        self.processor.as_deref()
    }

    /// Sets the nonce and processor, invalidating any signature.
    pub fn set_nonce(&mut self, nonce: u64, processor: impl Into<String>) {
        self.nonce = Some(nonce);
        self.processor = Some(processor.into());
        self.payload_bytes = None;
        self.signature = None;
    }

    pub fn is_signed(&self) -> bool {
        self.signature.is_some()
    }

    pub fn signature(&self) -> Option<&str> {
        self.signature.as_deref()
    }

    pub fn tx_hash(&self) -> Option<&str> {
        self.tx_hash.as_deref()
    }

    pub fn nonce_result(&self) -> Option<&NonceResult> {
        self.nonce_result.as_ref()
    }

    pub fn tx_send_result(&self) -> &TxResult {
        &self.tx_send_result
    }

    pub fn tx_block_result(&self) -> Option<&TxResult> {
        self.tx_block_result.as_ref()
    }

    pub fn tx_check_result(&self) -> &TxResult {
        &self.tx_check_result
    }

    pub fn tx_check_attempts(&self) -> u32 {
        self.tx_check_attempts
    }

    pub fn result_info(&self) -> Option<&ResultInfo> {
        self.result_info.as_ref()
    }

    /// The payload to sign, with sorted keys.
    pub fn payload(&self) -> Result<Value> {
        let nonce = self.nonce.ok_or(RpcError::NoNonce)?;
        let processor = self.processor.as_deref().ok_or(RpcError::NoProcessor)?;
        Ok(sort_keys(&json!({
            "contract": self.contract,
            "function": self.method,
            "kwargs": self.kwargs,
            "nonce": nonce,
            "processor": processor,
            "sender": self.sender,
            "stamps_supplied": self.stamp_limit,
        })))
    }

    pub fn payload_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(&self.payload()?)?)
    }

    pub fn sign(&mut self, sk: &str) -> Result<()> {
        let bytes = self.payload_bytes()?;
        self.signature = Some(wallet::sign(sk, &bytes)?);
        self.payload_bytes = Some(bytes);
        debug!(target: "lamden", sender = %self.sender, nonce = ?self.nonce, "transaction signed");
        Ok(())
    }

    /// Checks the signature against the sender's key.
    pub fn verify_signature(&self) -> Result<bool> {
        match (&self.signature, &self.payload_bytes) {
            (Some(signature), Some(bytes)) => Ok(wallet::verify(&self.sender, bytes, signature)),
            _ => Err(RpcError::NotSigned),
        }
    }

    /// The signed transaction as submitted to a masternode.
    pub fn serialize(&self) -> Result<Value> {
        if !self.verify_signature()? {
            return Err(RpcError::InvalidSignature);
        }
        Ok(json!({
            "metadata": {
                "signature": self.signature,
                "timestamp": Utc::now().timestamp(),
            },
            "payload": self.payload()?,
        }))
    }

    /// Fetches and stores the sender's next nonce and its processor.
    pub async fn get_nonce(&mut self) -> Result<NonceResult> {
        let mut nonce_result = self.network.masternode().get_nonce(&self.sender).await.map_err(|err| {
            warn!(target: "lamden", sender = %self.sender, error = %err, "nonce request failed");
            match err {
                RpcError::NotHex(_) | RpcError::Nonce { .. } => err,
                _ => RpcError::Nonce {
                    sender: self.sender.clone(),
                    url: self.network.url(),
                },
            }
        })?;
        nonce_result.timestamp = Some(utc_timestamp());
        self.set_nonce(nonce_result.nonce, nonce_result.processor.clone());
        self.nonce_result = Some(nonce_result.clone());
        Ok(nonce_result)
    }

    /// Signs (when `sk` is given) and submits the transaction. Failures after
    /// validation are recorded in the send result rather than returned.
    pub async fn send(&mut self, sk: Option<&str>) -> Result<TxResult> {
        let sk = sk.filter(|sk| !sk.is_empty());
        if sk.is_none() && !self.is_signed() {
            return Err(RpcError::SigningKeyRequired);
        }

        match self.submit(sk).await {
            Ok(response) if response.is_object() => match reported_error(&response) {
                Some(error) => self.tx_send_result.errors = Some(vec![Value::String(error)]),
                None => self.tx_send_result = serde_json::from_value(response)?,
            },
            Err(RpcError::Service(error)) => {
                self.tx_send_result.errors = Some(vec![Value::String(error)]);
            }
            Ok(_) | Err(RpcError::Http(_)) | Err(RpcError::Status { .. }) => {
                self.tx_send_result.errors = Some(vec![Value::String(FAILED_TO_FETCH.to_string())]);
            }
            Err(err) => self.tx_send_result.error = Some(err.to_string()),
        }

        self.tx_send_result.timestamp = Some(utc_timestamp());
        let result = self.tx_send_result.clone();
        Ok(self.handle_masternode_response(result))
    }

    async fn submit(&mut self, sk: Option<&str>) -> Result<Value> {
        if self.nonce.is_none() || self.processor.is_none() {
            self.get_nonce().await?;
        }
        if let Some(sk) = sk {
            self.sign(sk)?;
        }
        let transaction = self.serialize()?;
        let host = self
            .nonce_result
            .as_ref()
            .and_then(|nonce| nonce.masternode.clone());

        info!(target: "lamden", contract = %self.contract, method = %self.method, nonce = ?self.nonce, "sending transaction");
        self.network
            .masternode()
            .send_transaction(&transaction, host.as_deref())
            .await
    }

    /// Polls for the processed result of the sent transaction. Unknown
    /// transactions are retried until the configured attempt limit.
    pub async fn check_for_transaction_result(&mut self) -> Result<TxResult> {
        let hash = self
            .tx_hash
            .clone()
            .ok_or_else(|| RpcError::validation("No transaction hash. Send the transaction first."))?;
        let interval = Duration::from_millis(self.config.check_interval_ms);

        loop {
            tokio::time::sleep(interval).await;
            self.tx_check_attempts += 1;
            debug!(target: "lamden", %hash, attempt = self.tx_check_attempts, "checking transaction");

            let error = match self.network.masternode().check_transaction(&hash).await {
                Ok(res) => match reported_error(&res) {
                    Some(error) => Some(error),
                    None => {
                        self.tx_check_result = serde_json::from_value(res)?;
                        None
                    }
                },
                Err(RpcError::Service(error)) => Some(error),
                Err(RpcError::Http(_)) => {
                    self.tx_check_result.error = Some(FAILED_TO_FETCH.to_string());
                    None
                }
                Err(err) => Some(err.to_string()),
            };

            if let Some(error) = error {
                if error == TX_NOT_FOUND {
                    if self.tx_check_attempts < self.config.check_limit {
                        continue;
                    }
                    self.tx_check_result.errors = Some(vec![
                        Value::String(error),
                        Value::String(format!(
                            "Retry Attmpts {} hit while checking for Tx Result.",
                            self.tx_check_attempts
                        )),
                    ]);
                } else {
                    self.tx_check_result.errors = Some(vec![Value::String(error)]);
                }
            }
            break;
        }

        self.tx_check_result.timestamp = Some(utc_timestamp());
        let result = self.tx_check_result.clone();
        Ok(self.handle_masternode_response(result))
    }

    /// Records a submission or block result, updates the result info and
    /// broadcasts a [`TxEvent::Response`].
    pub fn handle_masternode_response(&mut self, result: TxResult) -> TxResult {
        let info = if result.is_pending() {
            let hash = result.hash.clone().unwrap_or_default();
            let info = ResultInfo::pending(&hash);
            self.tx_hash = Some(hash);
            info
        } else {
            self.tx_block_result = Some(result.clone());
            ResultInfo::from_result(&result)
        };

        info!(target: "lamden", title = %info.title, tx_hash = ?self.tx_hash, "transaction response");
        let subtitle = info.subtitle.clone();
        self.result_info = Some(info);
        // No subscribers is not an error.
        let _ = self.events.send(TxEvent::Response {
            result: result.clone(),
            subtitle,
        });
        result
    }

    pub fn tx_info(&self) -> TxSummary {
        TxSummary {
            sender_vk: self.sender.clone(),
            contract_name: self.contract.clone(),
            method_name: self.method.clone(),
            kwargs: self.kwargs.clone(),
            stamp_limit: self.stamp_limit,
        }
    }

    pub fn all_info(&self) -> AllInfo {
        AllInfo {
            uid: self.uid.clone(),
            tx_hash: self.tx_hash.clone(),
            signed: self.is_signed(),
            signature: self.signature.clone(),
            network_info: self.network.network_info(),
            tx_info: self.tx_info(),
            tx_send_result: self.tx_send_result.clone(),
            tx_block_result: self.tx_block_result.clone(),
            result_info: self.result_info.clone(),
            nonce_result: self.nonce_result.clone(),
        }
    }
}

/// Rebuilds `value` with object keys in sorted order at every level.
pub fn sort_keys(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<_> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(key, value)| (key.clone(), sort_keys(value)))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.iter().map(sort_keys).collect()),
        other => other.clone(),
    }
}

/// Timestamp in the `Date.toUTCString` form used in result records.
fn utc_timestamp() -> String {
    Utc::now().format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SK: &str = "9d61b19deffd5a60ba844af492ec2cc44449c5697b326919703bac031cae7f60";
    const VK: &str = "d75a980182b10ab7d54bfed3c964073a0ee172f3daa62325af021a68f707511a";
    const PROCESSOR: &str = "89f67bb871351a1629d66676e4bd92bbacb23bd0649b890542ef98f1b664a497";

    fn network() -> NetworkInfo {
        NetworkInfo::with_hosts(["http://127.0.0.1:1"])
    }

    fn tx_info() -> TxInfo {
        let mut kwargs = Map::new();
        kwargs.insert("to".into(), json!("bob"));
        kwargs.insert("amount".into(), json!({"__fixed__": "1.5"}));
        TxInfo::new(VK, "currency", "transfer", kwargs, 50)
    }

    #[test]
    fn validates_tx_info() {
        let mut info = tx_info();
        info.sender_vk = "xyz".into();
        let err = TransactionBuilder::new(network(), info, None).unwrap_err();
        assert_eq!(err.to_string(), "Sender Public Key Required (Type: Hex String)");

        let mut info = tx_info();
        info.method_name.clear();
        let err = TransactionBuilder::new(network(), info, None).unwrap_err();
        assert_eq!(err.to_string(), "Method Required (Type: String)");
    }

    #[test]
    fn from_json_reports_js_messages() {
        let err = TxInfo::from_json(&json!({})).unwrap_err();
        assert_eq!(err.to_string(), "txInfo object not found");
        let err = TxInfo::from_json(&json!({
            "senderVk": VK, "contractName": "currency", "methodName": "transfer", "stampLimit": "50"
        }))
        .unwrap_err();
        assert_eq!(err.to_string(), "Stamps Limit Required (Type: Integer)");
        let err = TxInfo::from_json(&json!({
            "senderVk": VK, "methodName": "transfer", "stampLimit": 50
        }))
        .unwrap_err();
        assert_eq!(err.to_string(), "Contract Name Required (Type: String)");

        let info = TxInfo::from_json(&json!({
            "senderVk": VK, "contractName": "currency", "methodName": "transfer",
            "kwargs": {"to": "bob"}, "stampLimit": 50, "nonce": 3, "processor": PROCESSOR
        }))
        .unwrap();
        assert_eq!(info.nonce, Some(3));
        assert_eq!(info.kwargs["to"], "bob");
    }

    #[test]
    fn payload_needs_nonce_and_processor() {
        let mut builder = TransactionBuilder::new(network(), tx_info(), None).unwrap();
        assert!(matches!(builder.payload(), Err(RpcError::NoNonce)));
        assert!(matches!(builder.sign(SK), Err(RpcError::NoNonce)));
        assert!(matches!(builder.verify_signature(), Err(RpcError::NotSigned)));
        builder.nonce = Some(1);
        assert!(matches!(builder.payload(), Err(RpcError::NoProcessor)));
    }

    #[test]
    fn payload_keys_are_sorted() {
        let mut builder = TransactionBuilder::new(network(), tx_info(), None).unwrap();
        builder.set_nonce(7, PROCESSOR);
        let text = String::from_utf8(builder.payload_bytes().unwrap()).unwrap();
        assert_eq!(
            text,
            format!(
                r#"{{"contract":"currency","function":"transfer","kwargs":{{"amount":{{"__fixed__":"1.5"}},"to":"bob"}},"nonce":7,"processor":"{}","sender":"{}","stamps_supplied":50}}"#,
                PROCESSOR, VK
            )
        );
    }

    #[test]
    fn sign_verify_serialize() {
        let mut builder = TransactionBuilder::new(network(), tx_info(), None).unwrap();
        builder.set_nonce(7, PROCESSOR);
        builder.sign(SK).unwrap();
        assert!(builder.verify_signature().unwrap());

        let tx = builder.serialize().unwrap();
        assert_eq!(tx["metadata"]["signature"], json!(builder.signature()));
        assert!(tx["metadata"]["timestamp"].as_i64().unwrap() > 0);
        assert_eq!(tx["payload"]["nonce"], 7);

        builder.set_nonce(8, PROCESSOR);
        assert!(!builder.is_signed());
    }

    #[test]
    fn signature_of_other_key_is_invalid() {
        let other = wallet::new_wallet(None);
        let mut builder = TransactionBuilder::new(network(), tx_info(), None).unwrap();
        builder.set_nonce(1, PROCESSOR);
        builder.sign(&other.sk).unwrap();
        assert!(!builder.verify_signature().unwrap());
        assert!(matches!(builder.serialize(), Err(RpcError::InvalidSignature)));
    }

    #[tokio::test]
    async fn send_without_key_or_signature_fails() {
        let mut builder = TransactionBuilder::new(network(), tx_info(), None).unwrap();
        let err = builder.send(None).await.unwrap_err();
        assert!(matches!(err, RpcError::SigningKeyRequired));
        assert!(builder.send(Some("")).await.is_err());
    }

    #[test]
    fn hydrates_from_saved_data() {
        let data: TxData = serde_json::from_value(json!({
            "uid": "tx-1",
            "txSendResult": {"hash": "abc", "success": "ok"},
            "nonceResult": {"nonce": 4, "processor": PROCESSOR, "sender": VK},
            "resultInfo": ResultInfo::pending("abc"),
        }))
        .unwrap();
        let builder = TransactionBuilder::new(network(), tx_info(), Some(data)).unwrap();
        assert_eq!(builder.uid(), Some("tx-1"));
        assert_eq!(builder.tx_hash(), Some("abc"));
        assert_eq!(builder.nonce(), Some(4));
        assert_eq!(builder.processor(), Some(PROCESSOR));
        assert_eq!(builder.result_info().unwrap().title, "Transaction Pending");

        let all = serde_json::to_value(builder.all_info()).unwrap();
        assert_eq!(all["txHash"], "abc");
        assert_eq!(all["signed"], false);
        assert_eq!(all["txInfo"]["stampLimit"], 50);
    }

    #[test]
    fn responses_update_result_info_and_broadcast() {
        let mut builder = TransactionBuilder::new(network(), tx_info(), None).unwrap();
        let mut events = builder.subscribe();

        let pending = TxResult {
            hash: Some("abc".into()),
            success: Some("submitted".into()),
            ..TxResult::default()
        };
        builder.handle_masternode_response(pending.clone());
        assert_eq!(builder.tx_hash(), Some("abc"));
        assert_eq!(
            events.try_recv().unwrap(),
            TxEvent::Response {
                result: pending,
                subtitle: "Your transaction was submitted and is is being processed".into()
            }
        );

        let failed = TxResult::with_errors(["boom"]);
        builder.handle_masternode_response(failed.clone());
        assert_eq!(builder.tx_block_result(), Some(&failed));
        assert_eq!(builder.result_info().unwrap().title, "Transaction Failed");
    }
}
