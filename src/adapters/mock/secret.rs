//! Mock platform secret for testing.
//!
//! Wraps plaintext reversibly (base64) so round-trip tests can assert
//! byte-for-byte recovery, and lets tests script prompt denials and
//! capability loss.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::traits::{PlatformSecret, PromptOptions, SecretError};

/// Mock biometric wrap. Clonable; clones share the denial queue and
/// the availability flag.
#[derive(Clone)]
pub struct MockPlatformSecret {
    available: Arc<AtomicBool>,
    denials: Arc<Mutex<VecDeque<String>>>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl MockPlatformSecret {
    pub fn new() -> Self {
        Self {
            available: Arc::new(AtomicBool::new(true)),
            denials: Arc::new(Mutex::new(VecDeque::new())),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Make the next prompt fail as a user denial.
    pub fn deny_next(&self, message: &str) {
        self.denials
            .lock()
            .unwrap()
            .push_back(message.to_string());
    }

    /// Toggle the reported biometric capability.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// The prompt reasons shown so far, in order.
    pub fn prompt_reasons(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    fn prompt(&self, reason: &str) -> Result<(), SecretError> {
        if !self.is_available() {
            return Err(SecretError::Unavailable);
        }
        self.prompts.lock().unwrap().push(reason.to_string());
        if let Some(message) = self.denials.lock().unwrap().pop_front() {
            return Err(SecretError::Denied { message });
        }
        Ok(())
    }
}

impl Default for MockPlatformSecret {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PlatformSecret for MockPlatformSecret {
    fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    async fn encrypt(
        &self,
        reason: &str,
        _options: &PromptOptions,
        plaintext: &str,
    ) -> Result<String, SecretError> {
        self.prompt(reason)?;
        Ok(STANDARD.encode(plaintext.as_bytes()))
    }

    async fn decrypt(
        &self,
        reason: &str,
        _options: &PromptOptions,
        blob: &str,
    ) -> Result<String, SecretError> {
        self.prompt(reason)?;
        let bytes = STANDARD.decode(blob).map_err(|err| SecretError::Failed {
            message: format!("blob is not valid base64: {}", err),
        })?;
        String::from_utf8(bytes).map_err(|err| SecretError::Failed {
            message: format!("blob is not valid UTF-8: {}", err),
        })
    }
}
