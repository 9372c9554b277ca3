//! otpvault - service-directory sync and token-refresh engine for a
//! TOTP credential manager.
//!
//! The encrypted store, key derivation, and TOTP computation live in an
//! out-of-process secure store reached through the [`traits::CommandInvoker`]
//! seam. This crate owns the in-memory state machine around it: unlocking,
//! the service directory cache and its snapshot broadcast, the mutation
//! flows, and the countdown-driven token refresh loop.

pub mod adapters;
pub mod bootstrap;
pub mod commands;
pub mod directory;
pub mod error;
pub mod models;
pub mod scheduler;
pub mod traits;
pub mod vault;

pub use bootstrap::{UnlockFlow, UnlockState};
pub use commands::StoreClient;
pub use directory::{DirectoryUpdate, ServiceDirectory};
pub use scheduler::{TokenRefreshScheduler, TokenView};
pub use vault::Vault;
