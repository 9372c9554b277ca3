//! Unlock credential storage trait abstraction.
//!
//! Persists the single opaque blob holding the wrapped password. The
//! blob is written only after explicit user opt-in, read once at
//! startup to attempt silent unlock, and deleted only by explicit
//! user action.

use async_trait::async_trait;
use std::fmt;

/// Unlock credential storage errors.
#[derive(Debug, Clone, PartialEq)]
pub enum UnlockStoreError {
    /// Failed to read the stored blob.
    LoadFailed(String),
    /// Failed to write the blob.
    SaveFailed(String),
    /// Failed to delete the blob.
    ClearFailed(String),
}

impl fmt::Display for UnlockStoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnlockStoreError::LoadFailed(msg) => {
                write!(f, "Failed to load unlock credential: {}", msg)
            }
            UnlockStoreError::SaveFailed(msg) => {
                write!(f, "Failed to save unlock credential: {}", msg)
            }
            UnlockStoreError::ClearFailed(msg) => {
                write!(f, "Failed to clear unlock credential: {}", msg)
            }
        }
    }
}

impl std::error::Error for UnlockStoreError {}

/// Trait for persisting the wrapped unlock password.
#[async_trait]
pub trait UnlockCredentialStore: Send + Sync {
    /// Load the stored blob.
    ///
    /// # Returns
    /// - `Ok(Some(blob))` when a credential is stored
    /// - `Ok(None)` when none is stored
    /// - `Err(error)` when reading failed
    async fn load(&self) -> Result<Option<String>, UnlockStoreError>;

    /// Store the blob, overwriting any previous one.
    async fn save(&self, blob: &str) -> Result<(), UnlockStoreError>;

    /// Delete the stored blob, if any.
    async fn clear(&self) -> Result<(), UnlockStoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unlock_store_error_display() {
        assert_eq!(
            UnlockStoreError::LoadFailed("read error".to_string()).to_string(),
            "Failed to load unlock credential: read error"
        );
        assert_eq!(
            UnlockStoreError::SaveFailed("disk full".to_string()).to_string(),
            "Failed to save unlock credential: disk full"
        );
        assert_eq!(
            UnlockStoreError::ClearFailed("locked".to_string()).to_string(),
            "Failed to clear unlock credential: locked"
        );
    }
}
