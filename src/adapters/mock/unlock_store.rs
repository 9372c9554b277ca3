//! In-memory unlock credential store for testing.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::traits::{UnlockCredentialStore, UnlockStoreError};

/// Unlock credential storage backed by a shared in-memory slot.
#[derive(Clone, Default)]
pub struct InMemoryUnlockStore {
    blob: Arc<Mutex<Option<String>>>,
}

impl InMemoryUnlockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The currently stored blob, for test assertions.
    pub fn stored_blob(&self) -> Option<String> {
        self.blob.lock().unwrap().clone()
    }
}

#[async_trait]
impl UnlockCredentialStore for InMemoryUnlockStore {
    async fn load(&self) -> Result<Option<String>, UnlockStoreError> {
        Ok(self.blob.lock().unwrap().clone())
    }

    async fn save(&self, blob: &str) -> Result<(), UnlockStoreError> {
        *self.blob.lock().unwrap() = Some(blob.to_string());
        Ok(())
    }

    async fn clear(&self) -> Result<(), UnlockStoreError> {
        *self.blob.lock().unwrap() = None;
        Ok(())
    }
}
