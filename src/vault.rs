//! The engine facade: bootstrap plus directory mutation flows.
//!
//! `Vault` wires the unlock flow, the directory cache, and the token
//! refresh scheduler together. Mutation methods take `&mut self` so
//! the caller serializes them: the directory is a single-writer
//! resource, and the presentation layer is expected to disable
//! controls while a call is outstanding.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use tokio::sync::watch;

use crate::bootstrap::{UnlockFlow, UnlockState};
use crate::commands::StoreClient;
use crate::directory::ServiceDirectory;
use crate::error::{DirectoryError, UnlockError};
use crate::models::{ServiceEdit, ServiceMap};
use crate::scheduler::{TokenRefreshScheduler, TokenView};
use crate::traits::{CommandInvoker, PlatformSecret, UnlockCredentialStore};

pub struct Vault {
    client: StoreClient,
    directory: ServiceDirectory,
    scheduler: TokenRefreshScheduler,
    unlock: UnlockFlow,
    /// Service ids with an icon fetch in flight (single-flight guard).
    icon_fetches: Arc<Mutex<HashSet<String>>>,
}

impl Vault {
    pub fn new(
        invoker: Arc<dyn CommandInvoker>,
        secret: Arc<dyn PlatformSecret>,
        unlock_store: Arc<dyn UnlockCredentialStore>,
    ) -> Self {
        let client = StoreClient::new(invoker);
        let directory = ServiceDirectory::new();
        let scheduler = TokenRefreshScheduler::new(client.clone(), directory.clone());
        let unlock = UnlockFlow::new(client.clone(), secret, unlock_store);
        Self {
            client,
            directory,
            scheduler,
            unlock,
            icon_fetches: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    pub fn directory(&self) -> &ServiceDirectory {
        &self.directory
    }

    /// Watch the token view published by the refresh scheduler.
    pub fn tokens(&self) -> watch::Receiver<TokenView> {
        self.scheduler.subscribe()
    }

    pub fn token_view(&self) -> TokenView {
        self.scheduler.view()
    }

    pub fn unlock_state(&self) -> &UnlockState {
        self.unlock.state()
    }

    // ── Bootstrap ────────────────────────────────────────────────────

    /// Unlock with a typed password. On success the directory is
    /// replaced wholesale and, when non-empty, the refresh cycle
    /// starts. An empty result is onboarding, not failure.
    pub async fn unlock_with_password(
        &mut self,
        password: &str,
    ) -> Result<ServiceMap, UnlockError> {
        match self.unlock.unlock_with_password(password).await {
            Ok(services) => {
                self.apply_unlocked(services.clone());
                Ok(services)
            }
            Err(err) => {
                self.directory.fail(err.to_string());
                Err(err)
            }
        }
    }

    /// Attempt silent unlock from the persisted credential, if any.
    pub async fn try_silent_unlock(&mut self) -> Result<Option<ServiceMap>, UnlockError> {
        match self.unlock.try_silent_unlock().await {
            Ok(Some(services)) => {
                self.apply_unlocked(services.clone());
                Ok(Some(services))
            }
            Ok(None) => Ok(None),
            Err(err) => {
                if matches!(err, UnlockError::UnlockFailed { .. }) {
                    self.directory.fail(err.to_string());
                }
                Err(err)
            }
        }
    }

    pub async fn should_offer_persistence(&self) -> bool {
        self.unlock.should_offer_persistence().await
    }

    pub async fn persist_password(&self, password: &str) -> Result<(), UnlockError> {
        self.unlock.persist_password(password).await
    }

    pub async fn forget_persisted_password(&self) -> Result<(), UnlockError> {
        self.unlock.forget_persisted_password().await
    }

    fn apply_unlocked(&mut self, services: ServiceMap) {
        let start_refresh = !services.is_empty();
        self.directory.replace_all(services);
        if start_refresh {
            self.scheduler.start();
        }
    }

    // ── Mutation flows ───────────────────────────────────────────────

    /// Add a service from a provisioning URI.
    ///
    /// Success is decided by the size heuristic: the returned map must
    /// be strictly larger than the cached one. Anything else - a map
    /// of the same size (malformed URI swallowed by the store, or a
    /// duplicate resubmission, indistinguishable here) - discards the
    /// response and surfaces `InvalidServiceUri`.
    pub async fn add_service(&mut self, totp_uri: &str) -> Result<ServiceMap, DirectoryError> {
        let size_before = self.directory.len();
        match self.client.add_service(totp_uri).await {
            Ok(services) if services.len() > size_before => {
                tracing::info!(count = services.len(), "service added");
                self.directory.replace_all(services.clone());
                self.scheduler.start();
                Ok(services)
            }
            Ok(_) => {
                tracing::warn!(uri = totp_uri, "add rejected by size heuristic");
                Err(DirectoryError::InvalidServiceUri {
                    uri: totp_uri.to_string(),
                })
            }
            Err(err) => {
                self.directory.fail(err.to_string());
                Err(DirectoryError::InvalidServiceUri {
                    uri: totp_uri.to_string(),
                })
            }
        }
    }

    /// Update a service's display fields. On success the cache entry
    /// is patched locally; no map refetch is needed.
    pub async fn update_service(
        &mut self,
        id: &str,
        edit: ServiceEdit,
    ) -> Result<(), DirectoryError> {
        let Some(mut service) = self.directory.get(id) else {
            return Err(DirectoryError::MutationFailed {
                operation: "update_service".to_string(),
                message: format!("unknown service id '{}'", id),
            });
        };
        service.apply_edit(&edit);

        match self.client.update_service(&service).await {
            Ok(()) => {
                self.directory.patch_display(id, &edit);
                Ok(())
            }
            Err(err) => Err(DirectoryError::MutationFailed {
                operation: "update_service".to_string(),
                message: err.to_string(),
            }),
        }
    }

    /// Delete a service. The cache entry is removed optimistically on
    /// success and the token view pruned at the same instant, then the
    /// refresh cycle restarts.
    pub async fn delete_service(&mut self, id: &str) -> Result<(), DirectoryError> {
        if !self.directory.contains(id) {
            return Err(DirectoryError::MutationFailed {
                operation: "remove_service".to_string(),
                message: format!("unknown service id '{}'", id),
            });
        }

        match self.client.remove_service(id).await {
            Ok(_) => {
                tracing::info!(id, "service removed");
                self.directory.remove_entry(id);
                self.scheduler.prune_missing();
                if self.directory.is_empty() {
                    self.scheduler.stop();
                } else {
                    self.scheduler.start();
                }
                Ok(())
            }
            Err(err) => {
                self.directory.fail(err.to_string());
                Err(DirectoryError::MutationFailed {
                    operation: "remove_service".to_string(),
                    message: err.to_string(),
                })
            }
        }
    }

    // ── Icon repair ──────────────────────────────────────────────────

    /// Clear a service's icon after it failed to render. Cache-local;
    /// no backend call.
    pub fn clear_icon(&self, id: &str) -> bool {
        self.directory.clear_icon(id)
    }

    /// Fetch an icon on demand and patch it into the cache.
    ///
    /// Returns `Ok(None)` when a fetch for this id is already in
    /// flight. On failure the icon is cleared locally and
    /// `IconFetchFailed` surfaced.
    pub async fn refresh_icon(&self, id: &str) -> Result<Option<String>, DirectoryError> {
        if !self.icon_fetches.lock().unwrap().insert(id.to_string()) {
            return Ok(None);
        }

        let result = self.client.get_service_icon(id).await;
        self.icon_fetches.lock().unwrap().remove(id);

        match result {
            Ok(icon) => {
                if icon.is_empty() {
                    self.directory.clear_icon(id);
                } else {
                    self.directory.set_icon(id, &icon);
                }
                Ok(Some(icon))
            }
            Err(err) => {
                self.directory.clear_icon(id);
                Err(DirectoryError::IconFetchFailed {
                    id: id.to_string(),
                    message: err.to_string(),
                })
            }
        }
    }

    /// Stop the refresh cycle ahead of session teardown.
    pub fn shutdown(&mut self) {
        self.scheduler.stop();
    }
}
