//! Key handle and transaction signing
//!
//! SECURITY: This is the ONLY place where the private key is used.
//! - Keys are held in alloy's PrivateKeySigner
//! - Keys are never logged; `Debug` is redacted
//! - Outside the key store, the key is only reachable through signing

use alloy::consensus::{SignableTransaction, TxEnvelope, TxLegacy};
use alloy::eips::eip2718::Encodable2718;
use alloy::network::TxSignerSync;
use alloy::primitives::{Address, Bytes, TxHash, TxKind, U256};
use alloy::signers::local::PrivateKeySigner;
use serde::Serialize;

use crate::error::{StorageError, TxError};

/// Everything needed to build one transfer
///
/// Constructed, signed and discarded per call; never stored.
#[derive(Debug, Clone, Serialize)]
pub struct TransactionIntent {
    pub to: Address,
    pub value: U256,
    pub gas_limit: u64,
    pub gas_price: u128,
    pub chain_id: u64,
    pub nonce: u64,
    pub data: Bytes,
}

/// A signed, EIP-2718 encoded transaction plus the fields it was built from
#[derive(Debug, Clone)]
pub struct SignedTransaction {
    pub raw: Bytes,
    pub hash: TxHash,
    pub from: Address,
    pub to: Address,
    pub nonce: u64,
    pub value: U256,
    pub gas_limit: u64,
    pub gas_price: u128,
}

/// Handle to the custodial key
pub struct KeyHandle {
    signer: PrivateKeySigner,
    address: Address,
}

impl KeyHandle {
    /// Generate a fresh random key
    pub fn generate() -> Self {
        Self::from_signer(PrivateKeySigner::random())
    }

    /// Create a handle from a hex-encoded private key, with or without `0x`
    pub fn from_hex(key_hex: &str) -> Result<Self, StorageError> {
        let key_hex = key_hex.trim();
        let key_hex = key_hex.strip_prefix("0x").unwrap_or(key_hex);

        let signer: PrivateKeySigner = key_hex
            .parse()
            .map_err(|e| StorageError::InvalidKey(format!("{}", e)))?;

        Ok(Self::from_signer(signer))
    }

    fn from_signer(signer: PrivateKeySigner) -> Self {
        let address = signer.address();
        Self { signer, address }
    }

    /// Public address (safe to share)
    pub fn address(&self) -> Address {
        self.address
    }

    /// Hex-encoded private key, for persisting to the key file only
    pub(super) fn export_hex(&self) -> String {
        alloy::hex::encode_prefixed(self.signer.to_bytes())
    }

    /// Sign a legacy (EIP-155) transfer
    pub fn sign(&self, intent: &TransactionIntent) -> Result<SignedTransaction, TxError> {
        let mut tx = TxLegacy {
            chain_id: Some(intent.chain_id),
            nonce: intent.nonce,
            gas_price: intent.gas_price,
            gas_limit: intent.gas_limit,
            to: TxKind::Call(intent.to),
            value: intent.value,
            input: intent.data.clone(),
        };

        let sig = TxSignerSync::sign_transaction_sync(&self.signer, &mut tx)
            .map_err(|e| TxError::Signing(e.to_string()))?;
        let signed: TxEnvelope = tx.into_signed(sig).into();
        let hash = *signed.tx_hash();
        let raw = Bytes::from(signed.encoded_2718());

        Ok(SignedTransaction {
            raw,
            hash,
            from: self.address,
            to: intent.to,
            nonce: intent.nonce,
            value: intent.value,
            gas_limit: intent.gas_limit,
            gas_price: intent.gas_price,
        })
    }
}

// Implement Debug manually to avoid exposing the signer
impl std::fmt::Debug for KeyHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyHandle")
            .field("address", &self.address)
            .field("signer", &"[REDACTED]")
            .finish()
    }
}
