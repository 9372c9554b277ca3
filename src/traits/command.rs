//! Command adapter trait abstraction.
//!
//! The secure store is out of process; every operation against it is a
//! single-shot, asynchronous request/response call that may fail.

use async_trait::async_trait;
use serde_json::Value;
use std::fmt;

/// Command adapter errors.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandError {
    /// The store rejected the call or the bridge itself failed.
    Rejected { command: String, message: String },
    /// The call succeeded but the response payload did not decode
    /// into the expected shape.
    MalformedPayload { command: String, message: String },
}

impl CommandError {
    /// Short code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            CommandError::Rejected { .. } => "E_CMD_REJECTED",
            CommandError::MalformedPayload { .. } => "E_CMD_PAYLOAD",
        }
    }
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::Rejected { command, message } => {
                write!(f, "Command '{}' rejected: {}", command, message)
            }
            CommandError::MalformedPayload { command, message } => {
                write!(f, "Command '{}' returned a malformed payload: {}", command, message)
            }
        }
    }
}

impl std::error::Error for CommandError {}

/// Trait for the request/response bridge to the secure store.
///
/// The engine submits a request, suspends the calling flow until the
/// response or failure arrives, and never retries on its own. The
/// adapter provides no concurrency control; callers serialize mutation
/// calls through the directory's single-writer discipline. Timeouts
/// are likewise not modeled here - an implementor that can hang should
/// wrap calls in its own deadline, otherwise the calling flow stays
/// suspended.
#[async_trait]
pub trait CommandInvoker: Send + Sync {
    /// Invoke a named command with JSON-shaped arguments.
    ///
    /// # Returns
    /// The opaque JSON payload on success, or a descriptive failure.
    async fn invoke(&self, command: &str, args: Value) -> Result<Value, CommandError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_error_display() {
        assert_eq!(
            CommandError::Rejected {
                command: "add_service".to_string(),
                message: "store locked".to_string(),
            }
            .to_string(),
            "Command 'add_service' rejected: store locked"
        );
        assert_eq!(
            CommandError::MalformedPayload {
                command: "get_services_tokens".to_string(),
                message: "expected object".to_string(),
            }
            .to_string(),
            "Command 'get_services_tokens' returned a malformed payload: expected object"
        );
    }

    #[test]
    fn test_command_error_implements_error_trait() {
        let err = CommandError::Rejected {
            command: "x".to_string(),
            message: "y".to_string(),
        };
        let _: &dyn std::error::Error = &err;
    }
}
