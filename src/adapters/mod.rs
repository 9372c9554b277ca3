//! Concrete implementations of trait abstractions.
//!
//! Production adapters implementing the seams defined in
//! `crate::traits`, plus test doubles under [`mock`].
//!
//! # Adapters
//!
//! - [`FileUnlockStore`] - file-based unlock credential storage
//!
//! # Mock Implementations
//!
//! - [`mock::MockCommandInvoker`] - scripted command responses
//! - [`mock::MockPlatformSecret`] - reversible wrap, deniable prompts
//! - [`mock::InMemoryUnlockStore`] - in-memory credential storage

pub mod file_unlock_store;
pub mod mock;

pub use file_unlock_store::FileUnlockStore;
