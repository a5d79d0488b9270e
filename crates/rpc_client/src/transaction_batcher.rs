//! Sending many transactions per sender with consecutive nonces.

use crate::error::{Result, RpcError};
use crate::models::NonceResult;
use crate::network::Network;
use crate::transaction_builder::{TransactionBuilder, TxInfo};
use chrono::Utc;
use futures::future::join_all;
use lamden_config::{NetworkInfo, TransactionConfig};
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;
use tracing::{info, warn};

#[derive(Debug, Default)]
struct BatcherState {
    tx_batches: BTreeMap<String, Vec<TxInfo>>,
    overflow: Vec<TxInfo>,
    nonce_results: HashMap<String, NonceResult>,
    running: bool,
}

/// Outcome of [`TransactionBatcher::send_all_batches`]
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Builders of the submitted transactions, per sender in nonce order
    pub sent: Vec<TransactionBuilder>,
    /// Senders whose batch could not be prepared
    pub failed: Vec<(String, RpcError)>,
}

/// Queues transactions per sender and sends them in batches.
///
/// Transactions added while a send is running are held in an overflow queue
/// and queued once it finishes.
#[derive(Debug)]
pub struct TransactionBatcher {
    network: Network,
    config: TransactionConfig,
    state: Mutex<BatcherState>,
}

impl TransactionBatcher {
    pub fn new(network_info: NetworkInfo) -> Result<Self> {
        Ok(Self {
            network: Network::new(network_info)?,
            config: TransactionConfig::default(),
            state: Mutex::new(BatcherState::default()),
        })
    }

    pub fn with_config(mut self, config: TransactionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    pub fn is_running(&self) -> bool {
        self.state.lock().running
    }

    /// Queues a transaction for its sender.
    pub fn add_transaction(&self, tx_info: TxInfo) -> Result<()> {
        let mut state = self.state.lock();
        if state.running {
            state.overflow.push(tx_info);
            return Ok(());
        }
        tx_info.validate()?;
        state
            .tx_batches
            .entry(tx_info.sender_vk.clone())
            .or_default()
            .push(tx_info);
        Ok(())
    }

    pub fn add_transaction_list(&self, tx_list: impl IntoIterator<Item = TxInfo>) -> Result<()> {
        tx_list.into_iter().try_for_each(|tx_info| self.add_transaction(tx_info))
    }

    /// Moves overflowed transactions into the batches. Invalid ones are
    /// dropped.
    pub fn process_overflow(&self) {
        let overflow = std::mem::take(&mut self.state.lock().overflow);
        for tx_info in overflow {
            if let Err(err) = self.add_transaction(tx_info) {
                warn!(target: "lamden", error = %err, "dropping overflowed transaction");
            }
        }
    }

    pub fn has_transactions(&self) -> bool {
        self.state.lock().tx_batches.values().any(|batch| !batch.is_empty())
    }

    /// Number of queued transactions for `sender_vk`
    pub fn pending(&self, sender_vk: &str) -> usize {
        self.state.lock().tx_batches.get(sender_vk).map_or(0, Vec::len)
    }

    pub fn overflow_len(&self) -> usize {
        self.state.lock().overflow.len()
    }

    pub fn nonce_result(&self, sender_vk: &str) -> Option<NonceResult> {
        self.state.lock().nonce_results.get(sender_vk).cloned()
    }

    /// Fetches and records the next nonce of `sender_vk`.
    pub async fn get_starting_nonce(&self, sender_vk: &str) -> Result<NonceResult> {
        let timestamp = Utc::now().format("%a, %d %b %Y %H:%M:%S GMT").to_string();
        let mut nonce_result = self.network.masternode().get_nonce(sender_vk).await?;
        nonce_result.timestamp = Some(timestamp);
        self.state
            .lock()
            .nonce_results
            .insert(sender_vk.to_string(), nonce_result.clone());
        Ok(nonce_result)
    }

    /// Assigns consecutive nonces from `nonce_result` and builds transactions
    /// bound to the masternode that issued the nonce.
    pub fn set_batch_nonces(&self, nonce_result: &NonceResult, tx_list: Vec<TxInfo>) -> Result<Vec<TransactionBuilder>> {
        let mut network_info = self.network.info().clone();
        if let Some(masternode) = &nonce_result.masternode {
            network_info.hosts = vec![masternode.clone()];
        }

        let mut builders = tx_list
            .into_iter()
            .enumerate()
            .map(|(index, mut tx_info)| {
                tx_info.nonce = Some(nonce_result.nonce + index as u64);
                tx_info.processor = Some(nonce_result.processor.clone());
                Ok(TransactionBuilder::new(network_info.clone(), tx_info, None)?.with_config(self.config.clone()))
            })
            .collect::<Result<Vec<_>>>()?;
        builders.sort_by_key(|builder| builder.nonce());
        Ok(builders)
    }

    /// Sends up to one batch per sender, signing with `keys` (vk to sk).
    ///
    /// Every queued sender needs a key; otherwise nothing is sent. Senders
    /// are processed concurrently; within a batch each send starts after the
    /// previous one by the configured spacing. Does nothing while another
    /// send is running.
    pub async fn send_all_batches(&self, keys: &HashMap<String, String>) -> Result<BatchReport> {
        let batches = {
            let mut state = self.state.lock();
            if state.running {
                return Ok(BatchReport::default());
            }
            if let Some(sender) = state
                .tx_batches
                .iter()
                .find(|(sender, batch)| !batch.is_empty() && !keys.contains_key(*sender))
                .map(|(sender, _)| sender.clone())
            {
                return Err(RpcError::MissingBatchKey(sender));
            }

            state.running = true;
            let batch_size = self.config.batch_size;
            let mut batches = Vec::new();
            state.tx_batches.retain(|sender, queue| {
                let take = queue.len().min(batch_size);
                let batch: Vec<TxInfo> = queue.drain(..take).collect();
                if !batch.is_empty() {
                    batches.push((sender.clone(), batch));
                }
                !queue.is_empty()
            });
            batches
        };

        info!(target: "lamden", senders = batches.len(), "sending transaction batches");
        let outcomes = join_all(batches.into_iter().map(|(sender, batch)| async move {
            let sk = keys.get(&sender).map(String::as_str).unwrap_or_default();
            let outcome = self.send_batch_for(&sender, sk, batch).await;
            (sender, outcome)
        }))
        .await;

        let mut report = BatchReport::default();
        for (sender, outcome) in outcomes {
            match outcome {
                Ok(builders) => report.sent.extend(builders),
                Err(err) => {
                    warn!(target: "lamden", %sender, error = %err, "batch failed");
                    report.failed.push((sender, err));
                }
            }
        }

        self.state.lock().running = false;
        self.process_overflow();
        Ok(report)
    }

    async fn send_batch_for(&self, sender: &str, sk: &str, batch: Vec<TxInfo>) -> Result<Vec<TransactionBuilder>> {
        let nonce_result = self.get_starting_nonce(sender).await?;
        let mut builders = self.set_batch_nonces(&nonce_result, batch)?;
        for builder in builders.iter_mut() {
            builder.sign(sk)?;
        }
        Ok(self.send_batch(builders).await)
    }

    /// Sends signed transactions, spacing their start times.
    pub async fn send_batch(&self, builders: Vec<TransactionBuilder>) -> Vec<TransactionBuilder> {
        let spacing = self.config.batch_spacing_ms;
        join_all(builders.into_iter().enumerate().map(|(index, mut builder)| async move {
            tokio::time::sleep(Duration::from_millis(spacing * index as u64)).await;
            if let Err(err) = builder.send(None).await {
                warn!(target: "lamden", nonce = ?builder.nonce(), error = %err, "transaction not sent");
            }
            builder
        }))
        .await
    }
}
