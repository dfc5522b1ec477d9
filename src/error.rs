//! Error types for Palaver
//!
//! This module defines all error types used throughout the client,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Which authentication operation failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthKind {
    /// `POST users/login/`
    Login,
    /// `POST users/signup/`
    Signup,
}

impl std::fmt::Display for AuthKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthKind::Login => write!(f, "Login"),
            AuthKind::Signup => write!(f, "Signup"),
        }
    }
}

/// Main error type for Palaver operations
///
/// Covers configuration loading, token persistence, HTTP transport
/// failures and non-success responses from the backend.
#[derive(Error, Debug)]
pub enum PalaverError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// The backend answered with a non-success status
    ///
    /// The body is kept verbatim; the client does not interpret it.
    #[error("Request failed with HTTP {status}: {body}")]
    Status {
        /// HTTP status code returned by the backend
        status: u16,
        /// Raw response body
        body: String,
    },

    /// Login or signup was rejected or could not be completed
    ///
    /// The display text is intentionally non-descriptive; the cause is
    /// logged separately.
    #[error("{0} failed")]
    AuthFailed(AuthKind),

    /// An operation needed an authenticated session but none was present
    #[error("Not logged in")]
    Unauthenticated,

    /// Token persistence errors (file backend, lock poisoning)
    #[error("Token store error: {0}")]
    TokenStore(String),

    /// Keyring/credential storage errors
    #[error("Keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// URL parsing errors
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Line editor errors from the interactive prompt
    #[error("Readline error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),
}

/// Result type alias for Palaver operations
///
/// This is a convenience alias that uses `anyhow::Error` as the error type,
/// allowing for rich error context and easy error propagation.
pub type Result<T> = anyhow::Result<T>;
