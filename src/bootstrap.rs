//! Credential bootstrap: password and biometric unlock.
//!
//! Turns a user-supplied or biometrically recovered password into an
//! unlocked directory session. The flow is `Locked -> Unlocking ->
//! Unlocked | Failed`; a failed attempt is terminal for that attempt
//! only and leaves the directory empty.

use std::sync::Arc;

use crate::commands::StoreClient;
use crate::error::UnlockError;
use crate::models::ServiceMap;
use crate::traits::{PlatformSecret, PromptOptions, UnlockCredentialStore};

const PERSIST_REASON: &str = "Next time you will be able to log in with your biometrics";
const UNLOCK_REASON: &str = "Open the services file without a password";

/// Bootstrap state. `Unlocked { onboarding: true }` means the store
/// opened with zero services: a distinct success sub-state, not a
/// failure.
#[derive(Debug, Clone, PartialEq)]
pub enum UnlockState {
    Locked,
    Unlocking,
    Unlocked { onboarding: bool },
    Failed { detail: String },
}

/// The unlock state machine. Owns the store client plus the platform
/// secret and unlock-credential seams; the caller applies the
/// returned map to the directory cache.
pub struct UnlockFlow {
    client: StoreClient,
    secret: Arc<dyn PlatformSecret>,
    store: Arc<dyn UnlockCredentialStore>,
    state: UnlockState,
}

impl UnlockFlow {
    pub fn new(
        client: StoreClient,
        secret: Arc<dyn PlatformSecret>,
        store: Arc<dyn UnlockCredentialStore>,
    ) -> Self {
        Self {
            client,
            secret,
            store,
            state: UnlockState::Locked,
        }
    }

    pub fn state(&self) -> &UnlockState {
        &self.state
    }

    pub fn is_unlocked(&self) -> bool {
        matches!(self.state, UnlockState::Unlocked { .. })
    }

    /// Unlock with a plaintext password and return the full service
    /// map. On failure the state is `Failed` and nothing was cached.
    pub async fn unlock_with_password(
        &mut self,
        password: &str,
    ) -> Result<ServiceMap, UnlockError> {
        self.state = UnlockState::Unlocking;
        tracing::debug!("requesting storage key setup");
        match self.client.setup_storage_keys(password).await {
            Ok(services) => {
                let onboarding = services.is_empty();
                tracing::info!(count = services.len(), onboarding, "store unlocked");
                self.state = UnlockState::Unlocked { onboarding };
                Ok(services)
            }
            Err(err) => {
                let detail = err.to_string();
                tracing::warn!(error = %detail, "unlock failed");
                self.state = UnlockState::Failed {
                    detail: detail.clone(),
                };
                Err(UnlockError::UnlockFailed { message: detail })
            }
        }
    }

    /// Attempt the silent unlock path: recover the password from the
    /// persisted blob via the platform prompt, then unlock with it.
    ///
    /// Returns `Ok(None)` when no blob is persisted. A decryption
    /// denial or failure surfaces the raw platform error; falling back
    /// to manual entry is the caller's decision, not taken here.
    pub async fn try_silent_unlock(&mut self) -> Result<Option<ServiceMap>, UnlockError> {
        let blob = self
            .store
            .load()
            .await
            .map_err(|err| UnlockError::CredentialLoadFailed {
                message: err.to_string(),
            })?;
        let Some(blob) = blob else {
            tracing::debug!("no persisted unlock credential");
            return Ok(None);
        };

        self.state = UnlockState::Unlocking;
        let password = match self
            .secret
            .decrypt(UNLOCK_REASON, &PromptOptions::unlock_prompt(), &blob)
            .await
        {
            Ok(password) => password,
            Err(err) => {
                let detail = err.to_string();
                tracing::warn!(error = %detail, "silent unlock aborted");
                self.state = UnlockState::Failed {
                    detail: detail.clone(),
                };
                return Err(err.into());
            }
        };

        self.unlock_with_password(&password).await.map(Some)
    }

    /// Whether to offer wrapping the just-used password: unlocked,
    /// biometric capability present, and nothing persisted yet.
    pub async fn should_offer_persistence(&self) -> bool {
        if !self.is_unlocked() || !self.secret.is_available() {
            return false;
        }
        matches!(self.store.load().await, Ok(None))
    }

    /// Wrap the password via the platform secret and persist the blob.
    /// Idempotent; overwrites any previous blob.
    pub async fn persist_password(&self, password: &str) -> Result<(), UnlockError> {
        let blob = self
            .secret
            .encrypt(PERSIST_REASON, &PromptOptions::persist_prompt(), password)
            .await?;
        self.store
            .save(&blob)
            .await
            .map_err(|err| UnlockError::CredentialSaveFailed {
                message: err.to_string(),
            })?;
        tracing::info!("unlock credential persisted");
        Ok(())
    }

    /// Delete the persisted blob (explicit user action).
    pub async fn forget_persisted_password(&self) -> Result<(), UnlockError> {
        self.store
            .clear()
            .await
            .map_err(|err| UnlockError::CredentialSaveFailed {
                message: err.to_string(),
            })
    }
}
