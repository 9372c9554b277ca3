//! Data model for the service directory and token views.

pub mod service;
pub mod token;

pub use service::{Service, ServiceEdit, ServiceMap, TotpAlgorithm};
pub use token::{RawToken, TokenSet, TotpToken};
