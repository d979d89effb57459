//! Error types for the wallet terminal

use std::path::PathBuf;
use std::time::Duration;

use alloy::primitives::TxHash;
use thiserror::Error;

/// Key file could not be read, parsed, or written
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Key file {path} unreadable: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Key file {path} malformed: {reason}")]
    Malformed { path: PathBuf, reason: String },

    #[error("Invalid private key: {0}")]
    InvalidKey(String),
}

/// A JSON-RPC call failed or returned something unusable
#[derive(Error, Debug)]
pub enum RpcError {
    #[error("RPC transport error: {0}")]
    Transport(String),

    #[error("RPC rejected request: {0}")]
    Rejected(String),

    #[error("Unexpected RPC response: {0}")]
    InvalidResponse(String),

    #[error("Invalid RPC URL: {0}")]
    InvalidUrl(String),
}

impl From<reqwest::Error> for RpcError {
    fn from(e: reqwest::Error) -> Self {
        RpcError::Transport(e.to_string())
    }
}

/// `connect()` failed; the engine stays disconnected and may retry
#[derive(Error, Debug)]
pub enum ConnectionError {
    #[error("RPC connection failed: {0}")]
    Unreachable(String),

    #[error("Initial chain read failed: {0}")]
    Rpc(#[from] RpcError),

    #[error("Key load failed: {0}")]
    Storage(#[from] StorageError),
}

/// A buy, sell, or send did not complete
#[derive(Error, Debug)]
pub enum TxError {
    #[error("Wallet not connected")]
    NotConnected,

    #[error("Invalid amount {0}: must be a positive finite number")]
    InvalidAmount(f64),

    #[error("Signing failed: {0}")]
    Signing(String),

    #[error(transparent)]
    Rpc(#[from] RpcError),

    #[error("Timed out after {}s waiting for receipt of {tx_hash}", waited.as_secs())]
    Timeout { tx_hash: TxHash, waited: Duration },

    #[error("Transaction {0} reverted")]
    Reverted(TxHash),
}

/// Model invocation or response parsing failed
///
/// Never escapes `DecisionEngine::analyze`; it is folded into a HOLD decision.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Model request failed: {0}")]
    Request(String),

    #[error("Model returned an empty response")]
    EmptyResponse,

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Model output was not a valid decision
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Invalid decision JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid amount {0}: must be non-negative")]
    NegativeAmount(f64),
}

/// Top-level error for the CLI
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Connection(#[from] ConnectionError),

    #[error(transparent)]
    Tx(#[from] TxError),

    #[error(transparent)]
    Rpc(#[from] RpcError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
