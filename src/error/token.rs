//! Token refresh error types.

use std::fmt;

/// Errors raised by the token refresh cycle. Always transient from the
/// engine's point of view: the scheduler records the failure on its
/// published view and retries on the next cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenError {
    /// `get_services_tokens` failed in the backend store.
    FetchFailed { message: String },
}

impl TokenError {
    /// A user-facing message for the presentation layer.
    pub fn user_message(&self) -> String {
        match self {
            TokenError::FetchFailed { .. } => {
                "Couldn't refresh the one-time codes. Retrying shortly.".to_string()
            }
        }
    }

    /// Short code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            TokenError::FetchFailed { .. } => "E_TOKEN_FETCH",
        }
    }
}

impl fmt::Display for TokenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenError::FetchFailed { message } => {
                write!(f, "Token fetch failed: {}", message)
            }
        }
    }
}

impl std::error::Error for TokenError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_and_code() {
        let err = TokenError::FetchFailed {
            message: "store busy".to_string(),
        };
        assert!(err.to_string().contains("store busy"));
        assert_eq!(err.error_code(), "E_TOKEN_FETCH");
        assert!(err.user_message().contains("Retrying"));
    }
}
