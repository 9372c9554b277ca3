//! Service directory mutation error types.

use std::fmt;

/// Errors raised by the add/update/delete/icon flows. The directory
/// cache is left unchanged on every variant except `IconFetchFailed`,
/// which clears the affected icon locally.
#[derive(Debug, Clone, PartialEq)]
pub enum DirectoryError {
    /// The provisioning URI did not produce a new service. Detected
    /// either by the add-size heuristic or an explicit backend error;
    /// a duplicate resubmission is indistinguishable from a malformed
    /// URI here.
    InvalidServiceUri { uri: String },

    /// An update or delete call failed in the backend, or named a
    /// service the directory does not hold.
    MutationFailed { operation: String, message: String },

    /// An on-demand icon fetch failed. Non-fatal; the icon field is
    /// cleared locally.
    IconFetchFailed { id: String, message: String },
}

impl DirectoryError {
    /// A user-facing message for the presentation layer.
    pub fn user_message(&self) -> String {
        match self {
            DirectoryError::InvalidServiceUri { .. } => {
                "Couldn't add this service. The provisioning URI was not accepted.".to_string()
            }
            DirectoryError::MutationFailed { operation, .. } => {
                format!("The {} operation failed. Your services were left unchanged.", operation)
            }
            DirectoryError::IconFetchFailed { .. } => {
                "Couldn't fetch the service icon.".to_string()
            }
        }
    }

    /// Short code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            DirectoryError::InvalidServiceUri { .. } => "E_DIR_INVALID_URI",
            DirectoryError::MutationFailed { .. } => "E_DIR_MUTATION",
            DirectoryError::IconFetchFailed { .. } => "E_DIR_ICON",
        }
    }
}

impl fmt::Display for DirectoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DirectoryError::InvalidServiceUri { uri } => {
                write!(f, "Invalid service provisioning URI: {}", uri)
            }
            DirectoryError::MutationFailed { operation, message } => {
                write!(f, "Directory mutation '{}' failed: {}", operation, message)
            }
            DirectoryError::IconFetchFailed { id, message } => {
                write!(f, "Icon fetch for service '{}' failed: {}", id, message)
            }
        }
    }
}

impl std::error::Error for DirectoryError {}
