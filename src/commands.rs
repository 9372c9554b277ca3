//! Typed client over the command adapter.
//!
//! [`StoreClient`] owns the command surface consumed by the engine and
//! decodes the store's untyped JSON payloads into the strict model
//! shapes at the boundary. A payload that does not decode is a
//! [`CommandError::MalformedPayload`], never trusted as already-typed.

use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;

use crate::models::{RawToken, Service, ServiceMap, TokenSet, TotpToken};
use crate::traits::{CommandError, CommandInvoker};

/// Typed wrapper around an [`CommandInvoker`] implementation.
///
/// Cheap to clone; every flow in the engine holds its own handle.
#[derive(Clone)]
pub struct StoreClient {
    invoker: Arc<dyn CommandInvoker>,
}

impl StoreClient {
    pub fn new(invoker: Arc<dyn CommandInvoker>) -> Self {
        Self { invoker }
    }

    /// Derive the storage keys from the user's password and return the
    /// full service map. Fails on a wrong password or unreadable store.
    pub async fn setup_storage_keys(&self, user_pass: &str) -> Result<ServiceMap, CommandError> {
        let payload = self
            .invoker
            .invoke("setup_storage_keys", json!({ "userPass": user_pass }))
            .await?;
        decode("setup_storage_keys", payload)
    }

    /// Ask the store to parse a provisioning URI and return the full
    /// resulting service map. A malformed URI is not necessarily a
    /// hard error here; callers apply the size heuristic.
    pub async fn add_service(&self, totp_uri: &str) -> Result<ServiceMap, CommandError> {
        let payload = self
            .invoker
            .invoke("add_service", json!({ "totpUri": totp_uri }))
            .await?;
        decode("add_service", payload)
    }

    /// Persist updated display fields for an existing service.
    pub async fn update_service(&self, service: &Service) -> Result<(), CommandError> {
        self.invoker
            .invoke("update_service", json!({ "service": service }))
            .await?;
        Ok(())
    }

    /// Remove a service and return the full resulting map.
    pub async fn remove_service(&self, service_id: &str) -> Result<ServiceMap, CommandError> {
        let payload = self
            .invoker
            .invoke("remove_service", json!({ "serviceId": service_id }))
            .await?;
        decode("remove_service", payload)
    }

    /// Fetch the current code and expiry instant for every service.
    pub async fn get_services_tokens(&self) -> Result<TokenSet, CommandError> {
        let payload = self.invoker.invoke("get_services_tokens", json!({})).await?;
        let raw: HashMap<String, RawToken> = decode("get_services_tokens", payload)?;
        raw.into_iter()
            .map(|(id, entry)| {
                let step = entry.next_step_time;
                TotpToken::from_raw(entry)
                    .map(|token| (id, token))
                    .ok_or_else(|| CommandError::MalformedPayload {
                        command: "get_services_tokens".to_string(),
                        message: format!("next_step_time {} is out of range", step),
                    })
            })
            .collect()
    }

    /// Fetch an icon URI for a service on demand.
    pub async fn get_service_icon(&self, service_id: &str) -> Result<String, CommandError> {
        let payload = self
            .invoker
            .invoke("get_service_icon", json!({ "serviceId": service_id }))
            .await?;
        decode("get_service_icon", payload)
    }
}

fn decode<T: DeserializeOwned>(command: &str, payload: Value) -> Result<T, CommandError> {
    serde_json::from_value(payload).map_err(|err| CommandError::MalformedPayload {
        command: command.to_string(),
        message: err.to_string(),
    })
}
