//! File-based unlock credential storage.
//!
//! Persists the biometric-wrapped password blob in
//! `~/.otpvault/.unlock.json`. The blob is already opaque when it
//! reaches this adapter; this file never sees plaintext.

use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::traits::{UnlockCredentialStore, UnlockStoreError};

#[derive(Debug, Serialize, Deserialize)]
struct UnlockRecord {
    #[serde(rename = "encryptedPassword")]
    encrypted_password: String,
}

/// Unlock credential storage backed by a JSON file in the user's home
/// directory.
#[derive(Debug, Clone)]
pub struct FileUnlockStore {
    path: PathBuf,
}

impl FileUnlockStore {
    /// Create a store rooted in the user's home directory. Returns
    /// `None` when the home directory cannot be determined.
    pub fn new() -> Option<Self> {
        dirs::home_dir().map(|home| Self {
            path: home.join(".otpvault").join(".unlock.json"),
        })
    }

    /// Create a store at an explicit path.
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

#[async_trait]
impl UnlockCredentialStore for FileUnlockStore {
    /// Load the persisted blob. A missing or unreadable record is
    /// `Ok(None)`: either way there is nothing to silently unlock
    /// with, and the caller falls back to manual entry.
    async fn load(&self) -> Result<Option<String>, UnlockStoreError> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(_) => return Ok(None),
        };
        match serde_json::from_str::<UnlockRecord>(&contents) {
            Ok(record) => Ok(Some(record.encrypted_password)),
            Err(err) => {
                tracing::warn!(error = %err, "unlock credential file is corrupt, ignoring");
                Ok(None)
            }
        }
    }

    async fn save(&self, blob: &str) -> Result<(), UnlockStoreError> {
        let record = UnlockRecord {
            encrypted_password: blob.to_string(),
        };
        let contents = serde_json::to_string_pretty(&record)
            .map_err(|err| UnlockStoreError::SaveFailed(err.to_string()))?;
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|err| UnlockStoreError::SaveFailed(err.to_string()))?;
        }
        tokio::fs::write(&self.path, contents)
            .await
            .map_err(|err| UnlockStoreError::SaveFailed(err.to_string()))
    }

    /// Delete the record. Already-absent is success.
    async fn clear(&self) -> Result<(), UnlockStoreError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(UnlockStoreError::ClearFailed(err.to_string())),
        }
    }
}
