//! Mock implementations for testing.
//!
//! This module provides mock implementations of all trait abstractions,
//! enabling unit testing without a live store process, platform
//! biometrics, or file system access.
//!
//! # Available Mocks
//!
//! - [`MockCommandInvoker`] - command adapter with scripted responses
//! - [`MockPlatformSecret`] - reversible secret wrap with deniable prompts
//! - [`InMemoryUnlockStore`] - in-memory unlock credential storage

pub mod command;
pub mod secret;
pub mod unlock_store;

pub use command::{MockCommandInvoker, MockResult, RecordedInvocation};
pub use secret::MockPlatformSecret;
pub use unlock_store::InMemoryUnlockStore;
