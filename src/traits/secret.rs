//! Platform secret trait abstraction.
//!
//! Wraps and unwraps the user's password behind the platform's
//! biometric prompt (secure enclave, keystore). The engine never sees
//! how the wrapping works; it only holds the resulting opaque blob.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Options forwarded to the platform prompt, mirroring the biometric
/// plugin's camelCase wire shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptOptions {
    /// Allow falling back to the device PIN/password.
    pub allow_device_credential: bool,
    /// Label for the cancel button.
    pub cancel_title: Option<String>,
    /// Fallback button label (iOS only).
    pub fallback_title: Option<String>,
    /// Prompt title (Android only).
    pub title: Option<String>,
    /// Prompt subtitle (Android only).
    pub subtitle: Option<String>,
    /// Require an explicit confirmation tap after the biometric
    /// succeeds (Android only).
    pub confirmation_required: Option<bool>,
}

impl PromptOptions {
    /// Prompt used when wrapping the password after a manual unlock.
    pub fn persist_prompt() -> Self {
        Self {
            allow_device_credential: false,
            cancel_title: Some("You won't be able to log in without your password".to_string()),
            title: Some("Log in without password".to_string()),
            subtitle: Some(
                "Next time you will be able to log in with biometric authentication".to_string(),
            ),
            ..Self::default()
        }
    }

    /// Prompt used when recovering the password at startup.
    pub fn unlock_prompt() -> Self {
        Self {
            allow_device_credential: false,
            cancel_title: Some("Cancel and type password".to_string()),
            title: Some("Open services without password".to_string()),
            ..Self::default()
        }
    }
}

/// Platform secret errors.
#[derive(Debug, Clone, PartialEq)]
pub enum SecretError {
    /// No biometric capability on this device.
    Unavailable,
    /// The user dismissed or failed the prompt.
    Denied { message: String },
    /// The platform call itself failed.
    Failed { message: String },
}

impl fmt::Display for SecretError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SecretError::Unavailable => write!(f, "Biometric capability unavailable"),
            SecretError::Denied { message } => write!(f, "Biometric prompt denied: {}", message),
            SecretError::Failed { message } => write!(f, "Platform secret call failed: {}", message),
        }
    }
}

impl std::error::Error for SecretError {}

/// Trait for the biometric-gated wrap/unwrap of the unlock password.
///
/// A wrap followed by an unwrap of the resulting blob must yield the
/// original plaintext byte-for-byte.
#[async_trait]
pub trait PlatformSecret: Send + Sync {
    /// Whether the platform reports biometric capability right now.
    fn is_available(&self) -> bool;

    /// Wrap `plaintext` after a successful prompt, returning the
    /// opaque blob to persist.
    async fn encrypt(
        &self,
        reason: &str,
        options: &PromptOptions,
        plaintext: &str,
    ) -> Result<String, SecretError>;

    /// Unwrap a previously persisted blob after a successful prompt.
    async fn decrypt(
        &self,
        reason: &str,
        options: &PromptOptions,
        blob: &str,
    ) -> Result<String, SecretError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_options_wire_shape() {
        let json = serde_json::to_value(PromptOptions::unlock_prompt()).unwrap();
        assert_eq!(json["allowDeviceCredential"], false);
        assert_eq!(json["cancelTitle"], "Cancel and type password");
        assert_eq!(json["title"], "Open services without password");
    }

    #[test]
    fn test_secret_error_display() {
        assert!(SecretError::Denied {
            message: "dismissed".to_string()
        }
        .to_string()
        .contains("dismissed"));
        assert_eq!(
            SecretError::Unavailable.to_string(),
            "Biometric capability unavailable"
        );
    }
}
