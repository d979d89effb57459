//! Deterministic in-memory chain for engine tests
//!
//! Behaves like a strict node: a transaction must carry exactly the account's
//! current nonce and the sender must cover `value + gas_limit * gas_price`.
//! Inclusion is immediate, charges 21 000 gas and credits the recipient.

use alloy::primitives::{Address, TxHash, U256};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use super::{ChainClient, Faucet, Receipt};
use crate::error::{RpcError, TxError};
use crate::wallet::SignedTransaction;

pub const TRANSFER_GAS: u64 = 21_000;

#[derive(Default)]
struct Account {
    balance: U256,
    nonce: u64,
}

pub struct FakeState {
    accounts: HashMap<Address, Account>,
    receipts: HashMap<TxHash, Receipt>,
    block: u64,
    pub gas_price: u128,
    pub chain_id: u64,
    pub connected: bool,
    pub faucet_supported: bool,
    pub fail_reads: bool,
    /// Accept the transaction (consuming the nonce) but never produce a receipt
    pub drop_receipts: bool,
    /// Include the transaction but mark its receipt as failed
    pub revert_receipts: bool,
    /// Every (sender, nonce) pair ever accepted
    pub accepted: Vec<(Address, u64)>,
    /// Rejections seen, as error strings
    pub rejections: Vec<String>,
}

pub struct FakeChain {
    state: Mutex<FakeState>,
}

impl FakeChain {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(FakeState {
                accounts: HashMap::new(),
                receipts: HashMap::new(),
                block: 1,
                gas_price: 1_000_000_000,
                chain_id: 11_155_111,
                connected: true,
                faucet_supported: true,
                fail_reads: false,
                drop_receipts: false,
                revert_receipts: false,
                accepted: Vec::new(),
                rejections: Vec::new(),
            }),
        }
    }

    /// Mutate the fake's knobs
    pub fn with_state<R>(&self, f: impl FnOnce(&mut FakeState) -> R) -> R {
        f(&mut self.state.lock().unwrap())
    }

    pub fn balance_of(&self, address: Address) -> U256 {
        self.with_state(|s| s.accounts.get(&address).map(|a| a.balance).unwrap_or_default())
    }

    pub fn nonce_of(&self, address: Address) -> u64 {
        self.with_state(|s| s.accounts.get(&address).map(|a| a.nonce).unwrap_or_default())
    }

    pub fn fund(&self, address: Address, amount: U256) {
        self.with_state(|s| s.accounts.entry(address).or_default().balance += amount);
    }

    fn read<T>(&self, f: impl FnOnce(&FakeState) -> T) -> Result<T, RpcError> {
        let state = self.state.lock().unwrap();
        if state.fail_reads {
            return Err(RpcError::Transport("connection reset".to_string()));
        }
        Ok(f(&state))
    }
}

#[async_trait]
impl ChainClient for FakeChain {
    async fn is_connected(&self) -> bool {
        self.with_state(|s| s.connected)
    }

    async fn get_balance(&self, address: Address) -> Result<U256, RpcError> {
        self.read(|s| s.accounts.get(&address).map(|a| a.balance).unwrap_or_default())
    }

    async fn get_tx_count(&self, address: Address) -> Result<u64, RpcError> {
        self.read(|s| s.accounts.get(&address).map(|a| a.nonce).unwrap_or_default())
    }

    async fn get_gas_price(&self) -> Result<u128, RpcError> {
        self.read(|s| s.gas_price)
    }

    async fn get_chain_id(&self) -> Result<u64, RpcError> {
        self.read(|s| s.chain_id)
    }

    async fn send_raw(&self, tx: &SignedTransaction) -> Result<TxHash, RpcError> {
        let mut guard = self.state.lock().unwrap();
        let state = &mut *guard;
        let gas_price = U256::from(tx.gas_price);
        let account = state.accounts.entry(tx.from).or_default();

        let rejection = if tx.nonce != account.nonce {
            Some(format!(
                "nonce mismatch: expected {}, got {}",
                account.nonce, tx.nonce
            ))
        } else if account.balance < tx.value + U256::from(tx.gas_limit) * gas_price {
            Some("insufficient funds for gas * price + value".to_string())
        } else {
            None
        };
        if let Some(reason) = rejection {
            state.rejections.push(reason.clone());
            return Err(RpcError::Rejected(reason));
        }

        // A reverted transfer still pays gas but moves no value
        let moved = if state.revert_receipts { U256::ZERO } else { tx.value };
        account.balance -= moved + U256::from(TRANSFER_GAS) * gas_price;
        account.nonce += 1;
        state.accounts.entry(tx.to).or_default().balance += moved;
        state.accepted.push((tx.from, tx.nonce));
        state.block += 1;

        if !state.drop_receipts {
            let receipt = Receipt {
                tx_hash: tx.hash,
                block_number: Some(state.block),
                gas_used: TRANSFER_GAS,
                success: !state.revert_receipts,
            };
            state.receipts.insert(tx.hash, receipt);
        }
        Ok(tx.hash)
    }

    async fn wait_for_receipt(
        &self,
        tx_hash: TxHash,
        timeout: Duration,
    ) -> Result<Receipt, TxError> {
        self.with_state(|s| s.receipts.get(&tx_hash).cloned())
            .ok_or(TxError::Timeout {
                tx_hash,
                waited: timeout,
            })
    }
}

#[async_trait]
impl Faucet for FakeChain {
    async fn faucet_add_balance(&self, address: Address, amount: U256) -> Result<bool, RpcError> {
        let mut state = self.state.lock().unwrap();
        if !state.faucet_supported {
            return Err(RpcError::Rejected(
                "the method tenderly_addBalance does not exist".to_string(),
            ));
        }
        state.accounts.entry(address).or_default().balance += amount;
        Ok(true)
    }
}
