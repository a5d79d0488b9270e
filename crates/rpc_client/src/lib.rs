//! Lamden Network Client Library
//!
//! Talks to Lamden masternodes and the optional block service over HTTP:
//! - [`MasternodeApi`] and [`BlockserviceApi`]: the REST endpoints
//! - [`Network`]: host validation, status pings and unified state reads
//! - [`TransactionBuilder`]: nonce retrieval, signing, submission and result
//!   polling of a single transaction
//! - [`TransactionBatcher`]: per-sender batches with consecutive nonces

pub mod blockservice_api;
pub mod error;
pub mod masternode_api;
pub mod models;
pub mod network;
mod rpc_client;
pub mod transaction_batcher;
pub mod transaction_builder;

pub use blockservice_api::BlockserviceApi;
pub use error::{Result, RpcError};
pub use masternode_api::MasternodeApi;
pub use models::{
    ContractInfo, ContractVariables, KeyRequest, NetworkEvent, NonceResult, ResultInfo, ResultKind, TxEvent,
    TxResult,
};
pub use network::{Network, NetworkSummary};
pub use rpc_client::RpcClient;
pub use transaction_batcher::{BatchReport, TransactionBatcher};
pub use transaction_builder::{AllInfo, TransactionBuilder, TxData, TxInfo, TxSummary};
