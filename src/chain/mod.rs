//! Blockchain access
//!
//! All JSON-RPC shape knowledge lives behind these traits:
//! - [`ChainClient`] covers the standard reads, raw submission and receipt waiting
//! - [`Faucet`] is the test-network-only balance credit. It has no real-network
//!   analogue, so a client for a production chain simply does not implement it.

mod faucet;
mod rpc;

#[cfg(test)]
pub(crate) mod fake;
#[cfg(test)]
mod stub;

use alloy::primitives::{address, Address, TxHash, U256};
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;

use crate::error::{RpcError, TxError};
use crate::wallet::SignedTransaction;

pub use rpc::RpcChainClient;

/// Destination of "buy" transfers; funds sent here are unrecoverable
pub const BURN_ADDRESS: Address = address!("0x000000000000000000000000000000000000dEaD");

/// Confirmation record for an included transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Receipt {
    pub tx_hash: TxHash,
    pub block_number: Option<u64>,
    pub gas_used: u64,
    pub success: bool,
}

/// Standard JSON-RPC chain access
///
/// Each read is independently fallible; a failed read means "unknown", never zero.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Liveness probe
    async fn is_connected(&self) -> bool;

    /// Balance in wei
    async fn get_balance(&self, address: Address) -> Result<U256, RpcError>;

    /// Confirmed transaction count (the next nonce)
    async fn get_tx_count(&self, address: Address) -> Result<u64, RpcError>;

    /// Current legacy gas price in wei
    async fn get_gas_price(&self) -> Result<u128, RpcError>;

    async fn get_chain_id(&self) -> Result<u64, RpcError>;

    /// Submit a pre-signed transaction
    async fn send_raw(&self, tx: &SignedTransaction) -> Result<TxHash, RpcError>;

    /// Wait until the transaction is included or `timeout` elapses
    async fn wait_for_receipt(&self, tx_hash: TxHash, timeout: Duration)
        -> Result<Receipt, TxError>;
}

/// Test-network balance crediting, without a signed transaction
#[async_trait]
pub trait Faucet: Send + Sync {
    /// Credit `amount` wei to `address`; `Ok(false)` means the endpoint answered
    /// without a result
    async fn faucet_add_balance(&self, address: Address, amount: U256) -> Result<bool, RpcError>;
}
