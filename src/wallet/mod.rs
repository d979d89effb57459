//! Wallet management
//!
//! The private key is loaded by [`KeyStore`], held by [`KeyHandle`], and never
//! leaves this module except through the key file itself.

mod engine;
mod keystore;
mod shared;
mod signer;
pub mod units;

pub use engine::{WalletEngine, WalletSnapshot, WalletStatus};
pub use keystore::KeyStore;
pub use shared::SharedWallet;
pub use signer::{KeyHandle, SignedTransaction, TransactionIntent};
