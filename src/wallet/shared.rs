//! Concurrent access to a wallet engine
//!
//! Mutations (connect, refresh, buy, sell, send) take the write lock for their
//! whole duration, so two sends can never read the same cached nonce. Readers
//! get snapshots.

use alloy::primitives::{Address, Bytes, TxHash};
use std::sync::Arc;
use tokio::sync::RwLock;

use super::engine::{WalletEngine, WalletSnapshot};
use crate::chain::{ChainClient, Faucet};
use crate::error::{ConnectionError, TxError};

/// Cloneable handle to one wallet engine
pub struct SharedWallet<C> {
    inner: Arc<RwLock<WalletEngine<C>>>,
}

impl<C> Clone for SharedWallet<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C: ChainClient> SharedWallet<C> {
    pub fn new(engine: WalletEngine<C>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(engine)),
        }
    }

    pub async fn snapshot(&self) -> WalletSnapshot {
        self.inner.read().await.snapshot()
    }

    pub async fn connect(&self) -> Result<Address, ConnectionError> {
        self.inner.write().await.connect().await
    }

    pub async fn refresh(&self) -> f64 {
        self.inner.write().await.refresh().await
    }

    pub async fn buy(&self, amount: f64) -> Result<TxHash, TxError> {
        self.inner.write().await.buy(amount).await
    }

    pub async fn send(&self, amount: f64, to: Address, data: Bytes) -> Result<TxHash, TxError> {
        self.inner.write().await.send(amount, to, data).await
    }
}

impl<C: ChainClient + Faucet> SharedWallet<C> {
    pub async fn sell(&self, amount: f64) -> Result<(), TxError> {
        self.inner.write().await.sell(amount).await
    }
}
