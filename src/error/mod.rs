//! Error handling for otpvault.
//!
//! Domain-specific error enums plus a unified [`VaultError`] type:
//!
//! - [`UnlockError`] - credential bootstrap failures
//! - [`DirectoryError`] - service mutation failures
//! - [`TokenError`] - token refresh failures
//! - [`VaultError`] / [`VaultResult`] - unified type for callers that
//!   handle any engine error
//!
//! Nothing here recovers silently: every failure carries a typed kind
//! plus a human-readable detail string for the presentation layer, and
//! cached state is left intact except where a flow documents otherwise
//! (icon clearing, optimistic delete).

mod directory;
mod token;
mod unlock;
mod vault_error;

pub use directory::DirectoryError;
pub use token::TokenError;
pub use unlock::UnlockError;
pub use vault_error::{VaultError, VaultResult};
