//! Error types for Secquiz
//!
//! This module defines all error types used throughout the client,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for Secquiz operations
///
/// Covers configuration loading, calls to the remote quiz service,
/// local storage, and local state preconditions.
#[derive(Error, Debug)]
pub enum SecquizError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// The service answered with a non-success status
    #[error("Service error {status}: {message}")]
    Api {
        /// HTTP status code returned by the service
        status: u16,
        /// Detail message extracted from the response body
        message: String,
    },

    /// The service could not be reached
    #[error("Network error: {0}")]
    Network(String),

    /// The service answered with a body that does not match the contract
    #[error("Unexpected response: {0}")]
    Decode(String),

    /// Credentials were rejected by the service
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// No bearer token is stored locally
    #[error("Not logged in. Run `secquiz login` first")]
    NotAuthenticated,

    /// Topic slug outside the supported set
    #[error("Unknown topic: {0}")]
    InvalidTopic(String),

    /// A local precondition for the requested operation does not hold
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Local storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// OS credential store errors
    #[error("Keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl SecquizError {
    /// Returns true when re-triggering the same action may succeed.
    ///
    /// Transport failures and 5xx responses are retryable; rejected
    /// requests and local precondition failures are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) | Self::Http(_) => true,
            Self::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

/// Result type alias for Secquiz operations
///
/// Uses `anyhow::Error` so call sites can attach context while the
/// typed `SecquizError` stays recoverable through `downcast_ref`.
pub type Result<T> = anyhow::Result<T>;
