//! JSON-RPC chain client over HTTP

use alloy::network::{Ethereum, ReceiptResponse};
use alloy::primitives::{Address, TxHash, U256};
use alloy::providers::{Provider, RootProvider};
use alloy::transports::TransportError;
use async_trait::async_trait;
use std::time::Duration;
use url::Url;

use super::{ChainClient, Receipt};
use crate::config::RpcConfig;
use crate::error::{RpcError, TxError};
use crate::wallet::SignedTransaction;

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Chain client backed by an alloy HTTP provider
///
/// The faucet method is sent as a plain JSON-RPC POST (see `faucet.rs`), so the
/// client keeps its own HTTP handle next to the provider.
pub struct RpcChainClient {
    pub(super) provider: RootProvider<Ethereum>,
    pub(super) http: reqwest::Client,
    pub(super) rpc_url: Url,
    pub(super) faucet_method: String,
    poll_interval: Duration,
}

impl RpcChainClient {
    pub fn new(config: &RpcConfig) -> Result<Self, RpcError> {
        let rpc_url: Url = config
            .url()
            .parse()
            .map_err(|e| RpcError::InvalidUrl(format!("{}", e)))?;

        Ok(Self {
            provider: RootProvider::new_http(rpc_url.clone()),
            http: reqwest::Client::new(),
            rpc_url,
            faucet_method: config.faucet_method().to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
        })
    }

    /// Set the delay between receipt polls
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn rpc_url(&self) -> &Url {
        &self.rpc_url
    }
}

/// JSON-RPC error responses are rejections; everything else is transport
fn rpc_error(e: TransportError) -> RpcError {
    match e.as_error_resp() {
        Some(payload) => RpcError::Rejected(payload.message.to_string()),
        None => RpcError::Transport(e.to_string()),
    }
}

#[async_trait]
impl ChainClient for RpcChainClient {
    async fn is_connected(&self) -> bool {
        match self.provider.get_block_number().await {
            Ok(block) => {
                tracing::debug!(block, url = %self.rpc_url, "RPC reachable");
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, url = %self.rpc_url, "RPC liveness probe failed");
                false
            }
        }
    }

    async fn get_balance(&self, address: Address) -> Result<U256, RpcError> {
        self.provider.get_balance(address).await.map_err(rpc_error)
    }

    async fn get_tx_count(&self, address: Address) -> Result<u64, RpcError> {
        self.provider
            .get_transaction_count(address)
            .await
            .map_err(rpc_error)
    }

    async fn get_gas_price(&self) -> Result<u128, RpcError> {
        self.provider.get_gas_price().await.map_err(rpc_error)
    }

    async fn get_chain_id(&self) -> Result<u64, RpcError> {
        self.provider.get_chain_id().await.map_err(rpc_error)
    }

    async fn send_raw(&self, tx: &SignedTransaction) -> Result<TxHash, RpcError> {
        let pending = self
            .provider
            .send_raw_transaction(&tx.raw)
            .await
            .map_err(rpc_error)?;
        let tx_hash = *pending.tx_hash();

        tracing::info!(
            tx_hash = %tx_hash,
            nonce = tx.nonce,
            to = %tx.to,
            "Submitted transaction"
        );
        Ok(tx_hash)
    }

    async fn wait_for_receipt(
        &self,
        tx_hash: TxHash,
        timeout: Duration,
    ) -> Result<Receipt, TxError> {
        let poll = async {
            loop {
                match self.provider.get_transaction_receipt(tx_hash).await {
                    Ok(Some(receipt)) => return receipt,
                    Ok(None) => {}
                    // Transient read failures are retried until the deadline
                    Err(e) => tracing::debug!(error = %e, tx_hash = %tx_hash, "Receipt poll failed"),
                }
                tokio::time::sleep(self.poll_interval).await;
            }
        };

        let receipt = tokio::time::timeout(timeout, poll)
            .await
            .map_err(|_| TxError::Timeout {
                tx_hash,
                waited: timeout,
            })?;

        Ok(Receipt {
            tx_hash: ReceiptResponse::transaction_hash(&receipt),
            block_number: ReceiptResponse::block_number(&receipt),
            gas_used: ReceiptResponse::gas_used(&receipt),
            success: ReceiptResponse::status(&receipt),
        })
    }
}
