//! Unified error type for the otpvault engine.

use std::fmt;

use super::directory::DirectoryError;
use super::token::TokenError;
use super::unlock::UnlockError;
use crate::traits::CommandError;

/// Type alias for Results using [`VaultError`].
pub type VaultResult<T> = Result<T, VaultError>;

/// Unified error type consolidating the engine's domain errors, for
/// callers that route every failure through one channel.
#[derive(Debug, Clone, PartialEq)]
pub enum VaultError {
    /// Credential bootstrap errors.
    Unlock(UnlockError),

    /// Directory mutation errors.
    Directory(DirectoryError),

    /// Token refresh errors.
    Token(TokenError),

    /// Raw command adapter errors that no flow translated.
    Command(CommandError),
}

impl VaultError {
    /// A user-facing message for the presentation layer.
    pub fn user_message(&self) -> String {
        match self {
            VaultError::Unlock(err) => err.user_message(),
            VaultError::Directory(err) => err.user_message(),
            VaultError::Token(err) => err.user_message(),
            VaultError::Command(err) => err.to_string(),
        }
    }

    /// Short code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            VaultError::Unlock(err) => err.error_code(),
            VaultError::Directory(err) => err.error_code(),
            VaultError::Token(err) => err.error_code(),
            VaultError::Command(err) => err.error_code(),
        }
    }

    /// Whether a subsequent user action can recover from this error.
    /// No engine failure is fatal to the process.
    pub fn is_recoverable(&self) -> bool {
        true
    }
}

impl fmt::Display for VaultError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VaultError::Unlock(err) => err.fmt(f),
            VaultError::Directory(err) => err.fmt(f),
            VaultError::Token(err) => err.fmt(f),
            VaultError::Command(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for VaultError {}

impl From<UnlockError> for VaultError {
    fn from(err: UnlockError) -> Self {
        VaultError::Unlock(err)
    }
}

impl From<DirectoryError> for VaultError {
    fn from(err: DirectoryError) -> Self {
        VaultError::Directory(err)
    }
}

impl From<TokenError> for VaultError {
    fn from(err: TokenError) -> Self {
        VaultError::Token(err)
    }
}

impl From<CommandError> for VaultError {
    fn from(err: CommandError) -> Self {
        VaultError::Command(err)
    }
}
