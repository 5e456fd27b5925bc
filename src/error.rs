//! Error types for sachat
//!
//! This module defines all error types used throughout the client,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for sachat operations
///
/// Covers configuration loading, session storage, and gateway
/// interactions. Gateway failures carry the actual HTTP status so callers
/// can distinguish authentication failures structurally instead of
/// matching on error text.
#[derive(Error, Debug)]
pub enum SachatError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Session storage errors (reading/writing the session file)
    #[error("Session error: {0}")]
    Session(String),

    /// Authentication failure reported by the gateway (HTTP 401)
    #[error("Authentication failed (HTTP {0})")]
    Auth(u16),

    /// Non-2xx gateway response other than 401
    #[error("Gateway error (HTTP {status}): {message}")]
    Gateway {
        /// HTTP status code of the failed response
        status: u16,
        /// Response body or status text
        message: String,
    },

    /// No session is present for an operation that requires one
    #[error("Not logged in")]
    NotLoggedIn,

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP transport errors (connection refused, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl SachatError {
    /// Returns true if this error represents an authentication failure
    ///
    /// Used by the mutation coordinator to decide whether a failure must
    /// trigger the shared forced-logout procedure.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::Auth(_))
    }
}

/// Result type alias for sachat operations
///
/// This is a convenience alias that uses `anyhow::Error` as the error type,
/// allowing for rich error context and easy error propagation.
pub type Result<T> = anyhow::Result<T>;

/// Checks whether an error chain contains an authentication failure
///
/// Downcasts through `anyhow::Error` so callers never have to inspect
/// error message strings.
pub fn is_auth_failure(err: &anyhow::Error) -> bool {
    err.downcast_ref::<SachatError>()
        .map(SachatError::is_auth_failure)
        .unwrap_or(false)
}
