//! WalletZero
//!
//! A simulated trading terminal on an EVM test network:
//! - "sell" credits the wallet through the network's faucet method
//! - "buy" sends a real signed transfer to the burn address
//! - a hosted language model recommends BUY_ENTRY / SELL_EXIT / HOLD
//!
//! # Safety Model
//!
//! - The key file is the only durable state; the key never leaves `wallet`
//! - Nonces are read from the chain, never advanced locally
//! - Model output is parsed strictly and every failure becomes HOLD

pub mod chain;
pub mod config;
pub mod decision;
pub mod session;
pub mod wallet;

mod error;

// Re-export commonly used types
pub use chain::{ChainClient, Faucet, RpcChainClient, BURN_ADDRESS};
pub use config::{Config, RpcConfig, MODEL_API_KEY_ENV};
pub use decision::{Action, Decision, DecisionEngine};
pub use error::{ConnectionError, Error, ModelError, ParseError, Result, RpcError, StorageError, TxError};
pub use session::Session;
pub use wallet::{KeyStore, SharedWallet, WalletEngine};
