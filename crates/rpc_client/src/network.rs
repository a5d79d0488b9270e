//! A Lamden network: masternodes, an optional block service and the
//! reads that prefer the block service when one is configured.

use crate::blockservice_api::BlockserviceApi;
use crate::error::Result;
use crate::masternode_api::{balance_from_wire, MasternodeApi};
use crate::models::{ContractInfo, NetworkEvent};
use lamden_config::{NetworkInfo, NetworkType};
use lamden_types::{ContractValue, ContractingDecimal, MethodSignature};
use serde::Serialize;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::broadcast;
use tracing::info;

const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Snapshot of a network's settings and status
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetworkSummary {
    pub name: String,
    pub lamden: bool,
    #[serde(rename = "type")]
    pub network_type: NetworkType,
    pub hosts: Vec<String>,
    pub blockservice_hosts: Vec<String>,
    pub url: String,
    pub online: bool,
    pub version: u32,
}

#[derive(Debug)]
pub struct Network {
    info: NetworkInfo,
    masternode: MasternodeApi,
    blockservice: BlockserviceApi,
    online: AtomicBool,
    events: broadcast::Sender<NetworkEvent>,
}

impl Network {
    /// Validates `info` and creates the network. It starts offline until
    /// [`Network::ping`] succeeds.
    pub fn new(info: NetworkInfo) -> Result<Self> {
        let masternode = MasternodeApi::new(&info.hosts)?;
        let blockservice = BlockserviceApi::new(&info.blockservice_hosts)?;
        let mut info = info;
        info.blockservice_hosts.clear();
        let mut info = info.validated()?;
        info.blockservice_hosts = blockservice.hosts().to_vec();

        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Ok(Self {
            info,
            masternode,
            blockservice,
            online: AtomicBool::new(false),
            events,
        })
    }

    pub fn info(&self) -> &NetworkInfo {
        &self.info
    }

    pub fn masternode(&self) -> &MasternodeApi {
        &self.masternode
    }

    pub fn blockservice(&self) -> &BlockserviceApi {
        &self.blockservice
    }

    pub fn hosts(&self) -> &[String] {
        self.masternode.hosts()
    }

    /// A randomly chosen masternode host.
    pub fn url(&self) -> String {
        self.masternode.host().map(str::to_string).unwrap_or_default()
    }

    pub fn is_online(&self) -> bool {
        self.online.load(Ordering::Relaxed)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<NetworkEvent> {
        self.events.subscribe()
    }

    /// Pings a masternode, records the result and broadcasts it.
    pub async fn ping(&self) -> bool {
        let online = self.masternode.ping_server().await;
        self.online.store(online, Ordering::Relaxed);
        info!(target: "lamden", network = %self.info.name, online, "network pinged");
        // No subscribers is not an error.
        let _ = self.events.send(NetworkEvent::Online(online));
        online
    }

    pub fn network_info(&self) -> NetworkSummary {
        NetworkSummary {
            name: self.info.name.clone(),
            lamden: self.info.lamden,
            network_type: self.info.network_type,
            hosts: self.hosts().to_vec(),
            blockservice_hosts: self.blockservice.hosts().to_vec(),
            url: self.url(),
            online: self.is_online(),
            version: self.info.version,
        }
    }

    pub async fn ping_server(&self) -> bool {
        if self.blockservice.is_configured() {
            self.blockservice.ping_server().await
        } else {
            self.masternode.ping_server().await
        }
    }

    /// Raw wire value of a variable, `None` when the key or variable does not
    /// exist.
    pub async fn get_variable_wire(&self, contract: &str, variable: &str, key: &str) -> Result<Option<Value>> {
        if self.blockservice.is_configured() {
            let mut res = self.blockservice.get_current_key_value(contract, variable, key).await?;
            Ok(res
                .get_mut("value")
                .map(Value::take)
                .filter(|value| !value.is_null()))
        } else {
            self.masternode.get_variable(contract, variable, key).await
        }
    }

    pub async fn get_variable(&self, contract: &str, variable: &str, key: &str) -> Result<Option<ContractValue>> {
        match self.get_variable_wire(contract, variable, key).await? {
            Some(value) => Ok(Some(ContractValue::from_wire(&value)?)),
            None => Ok(None),
        }
    }

    pub async fn get_currency_balance(&self, vk: &str) -> Result<ContractingDecimal> {
        match self.get_variable_wire("currency", "balances", vk).await? {
            Some(value) => balance_from_wire(&value),
            None => Ok(ContractingDecimal::zero()),
        }
    }

    pub async fn get_contract_info(&self, contract_name: &str) -> Result<Option<ContractInfo>> {
        if self.blockservice.is_configured() {
            self.blockservice.get_contract_info(contract_name).await
        } else {
            self.masternode.get_contract_info(contract_name).await
        }
    }

    pub async fn contract_exists(&self, contract_name: &str) -> Result<bool> {
        Ok(self.get_contract_info(contract_name).await?.is_some())
    }

    pub async fn get_contract_methods(&self, contract_name: &str) -> Result<Vec<MethodSignature>> {
        self.masternode.get_contract_methods(contract_name).await
    }

    pub async fn get_latest_block(&self) -> Result<Value> {
        if self.blockservice.is_configured() {
            self.blockservice.get_latest_block().await
        } else {
            self.masternode.get_latest_block().await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RpcError;
    use lamden_config::ConfigError;

    fn info() -> NetworkInfo {
        NetworkInfo {
            network_type: NetworkType::TestNet,
            version: 7,
            ..NetworkInfo::with_hosts(["HTTPS://Testnet-Master-1.Lamden.io"])
        }
    }

    #[test]
    fn new_network_normalizes_info() {
        let network = Network::new(info()).unwrap();
        assert_eq!(network.hosts(), ["https://testnet-master-1.lamden.io"]);
        assert_eq!(network.info().version, 1);
        assert!(!network.is_online());

        let summary = network.network_info();
        assert_eq!(summary.url, "https://testnet-master-1.lamden.io");
        assert_eq!(summary.name, "lamden network");
        assert!(summary.blockservice_hosts.is_empty());
        assert_eq!(serde_json::to_value(&summary).unwrap()["type"], "testnet");
    }

    #[test]
    fn rejects_bad_hosts() {
        assert!(matches!(
            Network::new(NetworkInfo::default()),
            Err(RpcError::Config(ConfigError::MissingHosts))
        ));
        let bad_blockservice = NetworkInfo {
            blockservice_hosts: vec!["blocks.example".into()],
            ..info()
        };
        assert!(matches!(
            Network::new(bad_blockservice),
            Err(RpcError::InvalidBlockserviceHost(_))
        ));
    }

    #[tokio::test]
    async fn ping_broadcasts_status() {
        let network = Network::new(NetworkInfo::with_hosts(["http://127.0.0.1:1"])).unwrap();
        let mut events = network.subscribe();
        assert!(!network.ping().await);
        assert_eq!(events.recv().await.unwrap(), NetworkEvent::Online(false));
    }
}
