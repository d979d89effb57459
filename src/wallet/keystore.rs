//! Key file persistence
//!
//! The key file is a single JSON object `{"private_key": "0x..."}`. It is the
//! entire durable state of the terminal. Not encrypted, not locked: the key is
//! a disposable test-network identity used by one process at a time.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::signer::KeyHandle;
use crate::error::StorageError;

#[derive(Serialize, Deserialize)]
struct KeyFile {
    private_key: String,
}

/// Loads the key from a fixed path, creating it on first use
#[derive(Debug, Clone)]
pub struct KeyStore {
    path: PathBuf,
}

impl KeyStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the key file, or generate and persist a new key if it is missing
    pub async fn load_or_create(&self) -> Result<KeyHandle, StorageError> {
        if self.path.exists() {
            return self.load().await;
        }

        let key = KeyHandle::generate();
        let content = serde_json::to_string(&KeyFile {
            private_key: key.export_hex(),
        })
        .map_err(|e| self.malformed(e))?;

        tokio::fs::write(&self.path, content)
            .await
            .map_err(|e| self.io(e))?;

        tracing::info!(
            path = %self.path.display(),
            address = %key.address(),
            "Created new wallet key"
        );
        Ok(key)
    }

    async fn load(&self) -> Result<KeyHandle, StorageError> {
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| self.io(e))?;
        let file: KeyFile = serde_json::from_str(&content).map_err(|e| self.malformed(e))?;
        let key = KeyHandle::from_hex(&file.private_key)?;

        tracing::debug!(
            path = %self.path.display(),
            address = %key.address(),
            "Loaded wallet key"
        );
        Ok(key)
    }

    fn io(&self, source: std::io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn malformed(&self, e: impl std::fmt::Display) -> StorageError {
        StorageError::Malformed {
            path: self.path.clone(),
            reason: e.to_string(),
        }
    }
}
