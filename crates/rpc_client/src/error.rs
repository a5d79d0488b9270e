use lamden_config::ConfigError;
use lamden_types::{DecodeError, EncodeError};
use thiserror::Error;

/// Errors raised by the network client
#[derive(Error, Debug)]
pub enum RpcError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("Blockservice host value must include http:// or https:// (got {0})")]
    InvalidBlockserviceHost(String),

    #[error("No hosts configured")]
    NoHosts,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A non-200 response; the message is the reason phrase.
    #[error("{message}")]
    Status { status: u16, message: String },

    /// An error reported in a response body
    #[error("{0}")]
    Service(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Encode(#[from] EncodeError),

    #[error("{0}")]
    Decode(#[from] DecodeError),

    #[error("{0}")]
    Wallet(#[from] lamden_wallets::Error),

    /// Invalid transaction info
    #[error("{0}")]
    Validation(String),

    #[error("{0} is not a hex string.")]
    NotHex(String),

    #[error("Unable to get nonce for {sender} on network {url}")]
    Nonce { sender: String, url: String },

    #[error("No Nonce Set. Call getNonce()")]
    NoNonce,

    #[error("No Processor Set. Call getNonce()")]
    NoProcessor,

    #[error("Transaction has not be been signed. Use the sign(<private key>) method first.")]
    NotSigned,

    #[error("Transation Not Signed: Private key needed or call sign(<private key>) first")]
    SigningKeyRequired,

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Cannot sign batch for {0}. No signing key provided.")]
    MissingBatchKey(String),
}

impl RpcError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        RpcError::Validation(message.into())
    }
}

/// Result type for client operations
pub type Result<T> = std::result::Result<T, RpcError>;
