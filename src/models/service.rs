//! Service records as the backend store returns them.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// HMAC algorithm of a TOTP service. Opaque to this engine; carried
/// through so edits can round-trip the full record to the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TotpAlgorithm {
    #[default]
    #[serde(rename = "SHA1")]
    Sha1,
    #[serde(rename = "SHA256")]
    Sha256,
    #[serde(rename = "SHA512")]
    Sha512,
}

/// One OTP-generating identity.
///
/// Identity is `id` (opaque, stable, unique). `issuer`, `name`, and
/// `icon` are mutable display metadata; `secret`, `algorithm`,
/// `digits`, and `period` are fixed once the store has parsed the
/// provisioning URI. Records are only ever created by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub id: String,
    pub issuer: String,
    pub name: String,
    /// Shared key material, opaque here. Never displayed.
    pub secret: String,
    pub algorithm: TotpAlgorithm,
    pub digits: u32,
    /// Step length in seconds.
    pub period: u32,
    /// Icon URI, or empty/absent when none is known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl Service {
    /// Apply a display-only edit, leaving the OTP parameters intact.
    pub fn apply_edit(&mut self, edit: &ServiceEdit) {
        self.name = edit.name.clone();
        self.issuer = edit.issuer.clone();
        if let Some(icon) = &edit.icon {
            self.icon = Some(icon.clone());
        }
    }
}

/// The full directory mapping as returned by the store: id -> Service.
pub type ServiceMap = HashMap<String, Service>;

/// The display fields the update flow may change. `icon: None` leaves
/// the current icon untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceEdit {
    pub name: String,
    pub issuer: String,
    pub icon: Option<String>,
}

impl ServiceEdit {
    pub fn new(name: impl Into<String>, issuer: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            issuer: issuer.into(),
            icon: None,
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }
}
