//! Stateful wallet driven by the session
//!
//! State machine: `Disconnected -> Connected -> (Connected, stale)`.
//!
//! The cached `tx_count` is the nonce of the next transaction. It is never
//! advanced locally: after a send it is re-read from the chain. When a read
//! fails or a send fails part-way (possibly after the node accepted it and
//! consumed the nonce), the cache is marked stale and the next mutating call
//! re-syncs strictly before building a transaction.

use alloy::primitives::{Address, Bytes, TxHash, U256};
use serde::Serialize;

use super::keystore::KeyStore;
use super::signer::{KeyHandle, TransactionIntent};
use super::units::{ether_to_wei, validate_amount, wei_to_ether};
use crate::chain::{ChainClient, Faucet, BURN_ADDRESS};
use crate::config::WalletSettings;
use crate::error::{ConnectionError, RpcError, TxError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WalletStatus {
    Disconnected,
    Connected,
    /// Connected, but the cached balance/nonce may not match the chain
    Stale,
}

/// Read-only view of the wallet state for presentation
#[derive(Debug, Clone, Serialize)]
pub struct WalletSnapshot {
    pub status: WalletStatus,
    pub address: Option<Address>,
    pub balance: f64,
    pub tx_count: u64,
}

struct Connected {
    key: KeyHandle,
    balance_wei: U256,
    tx_count: u64,
    stale: bool,
}

/// Single-account wallet over a chain client
pub struct WalletEngine<C> {
    client: C,
    keystore: KeyStore,
    settings: WalletSettings,
    state: Option<Connected>,
}

impl<C: ChainClient> WalletEngine<C> {
    pub fn new(client: C, keystore: KeyStore, settings: WalletSettings) -> Self {
        Self {
            client,
            keystore,
            settings,
            state: None,
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn status(&self) -> WalletStatus {
        match &self.state {
            None => WalletStatus::Disconnected,
            Some(s) if s.stale => WalletStatus::Stale,
            Some(_) => WalletStatus::Connected,
        }
    }

    pub fn address(&self) -> Option<Address> {
        self.state.as_ref().map(|s| s.key.address())
    }

    /// Cached balance in native units; 0 while disconnected
    pub fn balance(&self) -> f64 {
        wei_to_ether(self.balance_wei())
    }

    pub fn balance_wei(&self) -> U256 {
        self.state.as_ref().map(|s| s.balance_wei).unwrap_or_default()
    }

    pub fn tx_count(&self) -> u64 {
        self.state.as_ref().map(|s| s.tx_count).unwrap_or_default()
    }

    pub fn snapshot(&self) -> WalletSnapshot {
        WalletSnapshot {
            status: self.status(),
            address: self.address(),
            balance: self.balance(),
            tx_count: self.tx_count(),
        }
    }

    /// Probe the endpoint, load the key, and take an initial reading
    ///
    /// On failure the engine keeps its previous state (initially disconnected)
    /// and `connect` may simply be called again.
    pub async fn connect(&mut self) -> Result<Address, ConnectionError> {
        if !self.client.is_connected().await {
            return Err(ConnectionError::Unreachable(
                "RPC endpoint did not answer the liveness probe".to_string(),
            ));
        }

        let key = self.keystore.load_or_create().await?;
        let address = key.address();

        // Reconnecting to the same key keeps the cached reading until refreshed
        let (balance_wei, tx_count) = match self.state.take() {
            Some(prev) if prev.key.address() == address => (prev.balance_wei, prev.tx_count),
            _ => (U256::ZERO, 0),
        };
        self.state = Some(Connected {
            key,
            balance_wei,
            tx_count,
            stale: true,
        });

        let balance = self.refresh().await;
        tracing::info!(
            address = %address,
            balance,
            tx_count = self.tx_count(),
            "Wallet connected"
        );
        Ok(address)
    }

    /// Best-effort re-read of balance and nonce
    ///
    /// A failed read keeps the previous values, marks the cache stale and is
    /// logged rather than returned.
    pub async fn refresh(&mut self) -> f64 {
        if let Err(e) = self.sync().await {
            tracing::warn!(error = %e, "Wallet refresh failed, keeping cached state");
            if let Some(state) = self.state.as_mut() {
                state.stale = true;
            }
        }
        self.balance()
    }

    /// Strict re-read; both values are committed only if both reads succeed
    async fn sync(&mut self) -> Result<(), RpcError> {
        let Some(state) = self.state.as_mut() else {
            return Ok(());
        };
        let address = state.key.address();

        let balance_wei = self.client.get_balance(address).await?;
        let tx_count = self.client.get_tx_count(address).await?;

        state.balance_wei = balance_wei;
        state.tx_count = tx_count;
        state.stale = false;
        Ok(())
    }

    /// Resolve staleness before a mutating call
    async fn ensure_synced(&mut self) -> Result<(), TxError> {
        let stale = self.state.as_ref().ok_or(TxError::NotConnected)?.stale;
        if stale {
            tracing::debug!("Cached wallet state is stale, re-syncing before mutation");
            self.sync().await?;
        }
        Ok(())
    }

    /// Irreversible transfer of `amount` to the burn address
    pub async fn buy(&mut self, amount: f64) -> Result<TxHash, TxError> {
        validate_amount(amount)?;
        self.send(amount, BURN_ADDRESS, Bytes::new()).await
    }

    /// Build, sign, submit and confirm a transfer
    ///
    /// Waits for the receipt before returning; the only exit from that wait is
    /// inclusion or the configured timeout.
    pub async fn send(&mut self, amount: f64, to: Address, data: Bytes) -> Result<TxHash, TxError> {
        let value = ether_to_wei(amount)?;
        self.ensure_synced().await?;

        match self.submit(value, to, data).await {
            Ok(tx_hash) => {
                self.refresh().await;
                tracing::info!(
                    tx_hash = %tx_hash,
                    amount,
                    to = %to,
                    balance = self.balance(),
                    tx_count = self.tx_count(),
                    "Transfer confirmed"
                );
                Ok(tx_hash)
            }
            Err(e) => {
                if let Some(state) = self.state.as_mut() {
                    state.stale = true;
                }
                tracing::warn!(error = %e, amount, to = %to, "Transfer failed");
                Err(e)
            }
        }
    }

    async fn submit(&self, value: U256, to: Address, data: Bytes) -> Result<TxHash, TxError> {
        let state = self.state.as_ref().ok_or(TxError::NotConnected)?;

        let gas_price = self.client.get_gas_price().await?;
        let chain_id = self.client.get_chain_id().await?;
        let intent = TransactionIntent {
            to,
            value,
            gas_limit: self.settings.gas_limit,
            gas_price,
            chain_id,
            nonce: state.tx_count,
            data,
        };
        tracing::debug!(?intent, "Signing transaction");

        let signed = state.key.sign(&intent)?;
        let tx_hash = self.client.send_raw(&signed).await?;
        let receipt = self
            .client
            .wait_for_receipt(tx_hash, self.settings.receipt_timeout())
            .await?;

        if !receipt.success {
            return Err(TxError::Reverted(tx_hash));
        }
        Ok(tx_hash)
    }
}

impl<C: ChainClient + Faucet> WalletEngine<C> {
    /// Credit `amount` through the test-network faucet
    pub async fn sell(&mut self, amount: f64) -> Result<(), TxError> {
        let wei = validate_amount(amount)?;
        let address = self.address().ok_or(TxError::NotConnected)?;

        let credited = self.client.faucet_add_balance(address, wei).await?;
        if !credited {
            return Err(RpcError::Rejected("faucet returned no result".to_string()).into());
        }

        self.refresh().await;
        tracing::info!(amount, balance = self.balance(), "Faucet credit applied");
        Ok(())
    }
}
