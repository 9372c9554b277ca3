//! Credential bootstrap error types.

use std::fmt;

use crate::traits::SecretError;

/// Errors raised while turning a password (typed or biometrically
/// recovered) into an unlocked directory session.
#[derive(Debug, Clone, PartialEq)]
pub enum UnlockError {
    /// The storage-key setup call failed: wrong password or an
    /// unreadable store. Terminal for this attempt; the directory
    /// stays empty.
    UnlockFailed { message: String },

    /// No biometric capability on this platform.
    BiometricUnavailable,

    /// The platform prompt was denied or the wrap/unwrap call failed.
    /// Carries the raw platform error; the silent-unlock path aborts
    /// without falling back to manual entry on its own.
    BiometricDenied { message: String },

    /// The persisted unlock blob could not be read.
    CredentialLoadFailed { message: String },

    /// The unlock blob could not be persisted.
    CredentialSaveFailed { message: String },
}

impl UnlockError {
    /// A user-facing message for the presentation layer.
    pub fn user_message(&self) -> String {
        match self {
            UnlockError::UnlockFailed { .. } => {
                "Couldn't open the services file. Check your password and try again.".to_string()
            }
            UnlockError::BiometricUnavailable => {
                "Biometric unlock is not available on this device.".to_string()
            }
            UnlockError::BiometricDenied { .. } => {
                "Biometric unlock was denied. Enter your password instead.".to_string()
            }
            UnlockError::CredentialLoadFailed { .. } => {
                "Couldn't read the stored unlock credential.".to_string()
            }
            UnlockError::CredentialSaveFailed { .. } => {
                "Couldn't store the unlock credential.".to_string()
            }
        }
    }

    /// Short code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            UnlockError::UnlockFailed { .. } => "E_UNLOCK_FAILED",
            UnlockError::BiometricUnavailable => "E_UNLOCK_BIO_UNAVAIL",
            UnlockError::BiometricDenied { .. } => "E_UNLOCK_BIO_DENIED",
            UnlockError::CredentialLoadFailed { .. } => "E_UNLOCK_CRED_LOAD",
            UnlockError::CredentialSaveFailed { .. } => "E_UNLOCK_CRED_SAVE",
        }
    }
}

impl fmt::Display for UnlockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnlockError::UnlockFailed { message } => {
                write!(f, "Unlock failed: {}", message)
            }
            UnlockError::BiometricUnavailable => {
                write!(f, "Biometric capability unavailable")
            }
            UnlockError::BiometricDenied { message } => {
                write!(f, "Biometric prompt denied: {}", message)
            }
            UnlockError::CredentialLoadFailed { message } => {
                write!(f, "Failed to load unlock credential: {}", message)
            }
            UnlockError::CredentialSaveFailed { message } => {
                write!(f, "Failed to save unlock credential: {}", message)
            }
        }
    }
}

impl std::error::Error for UnlockError {}

impl From<SecretError> for UnlockError {
    fn from(err: SecretError) -> Self {
        match err {
            SecretError::Unavailable => UnlockError::BiometricUnavailable,
            SecretError::Denied { message } | SecretError::Failed { message } => {
                UnlockError::BiometricDenied { message }
            }
        }
    }
}
