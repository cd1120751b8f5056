//! Error types for grabarr.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for grabarr.
#[derive(Error, Debug)]
pub enum Error {
    // Workflow errors
    #[error("No match found for: {0}")]
    LookupEmpty(String),

    #[error("Selection {index} is out of range (0..{len})")]
    SelectionOutOfRange { index: usize, len: usize },

    #[error("Signal '{signal}' is not valid while {state}")]
    InvalidTransition { state: String, signal: String },

    // Backend errors
    #[error("{operation} failed: backend unavailable ({reason})")]
    BackendUnavailable { operation: String, reason: String },

    #[error("{operation} failed: backend rejected the call with status {status}")]
    BackendRejected { operation: String, status: u16 },

    // Configuration errors
    #[error("Configuration missing: {0}")]
    ConfigurationMissing(String),

    #[error("Invalid configuration file {path}: {reason}")]
    InvalidConfig { path: String, reason: String },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // JSON errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // Generic errors
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a generic error from a string.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Error::Other(msg.into())
    }

    /// Wrap a transport-level failure (connect error, timeout, bad body).
    pub fn unavailable<S: Into<String>>(operation: S, err: reqwest::Error) -> Self {
        let reason = if err.is_timeout() {
            "timed out".to_string()
        } else {
            err.to_string()
        };
        Error::BackendUnavailable {
            operation: operation.into(),
            reason,
        }
    }

    /// Whether this error came from talking to a backend.
    pub fn is_backend(&self) -> bool {
        matches!(
            self,
            Error::BackendUnavailable { .. } | Error::BackendRejected { .. }
        )
    }
}
