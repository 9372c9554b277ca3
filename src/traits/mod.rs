//! Boundary trait abstractions.
//!
//! Every external collaborator of the engine sits behind one of these
//! traits, enabling dependency injection and mocking in tests:
//!
//! - [`CommandInvoker`] - request/response bridge to the secure store
//! - [`PlatformSecret`] - biometric-gated wrap/unwrap of the password
//! - [`UnlockCredentialStore`] - persistence of the wrapped password

pub mod command;
pub mod secret;
pub mod unlock_store;

pub use command::{CommandError, CommandInvoker};
pub use secret::{PlatformSecret, PromptOptions, SecretError};
pub use unlock_store::{UnlockCredentialStore, UnlockStoreError};
