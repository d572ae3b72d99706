//! Error types for db-relay.
//!
//! Defines the main error enum used throughout the crate.

use thiserror::Error;

/// Main error type for relay operations.
#[derive(Error, Debug)]
pub enum RelayError {
    /// Driver connection errors (host unreachable, auth failed, etc.)
    #[error("Connection error: {0}")]
    Connection(String),

    /// Query execution errors (syntax errors, constraint violations, etc.)
    #[error("Query error: {0}")]
    Query(String),

    /// Connection teardown errors. Always caught and logged by the
    /// orchestration layer, never surfaced to callers.
    #[error("Cleanup error: {0}")]
    Cleanup(String),

    /// Configuration errors (invalid profile, missing required fields, etc.)
    #[error("Configuration error: {0}")]
    Config(String),
}

impl RelayError {
    /// Creates a connection error with the given message.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Creates a query error with the given message.
    pub fn query(msg: impl Into<String>) -> Self {
        Self::Query(msg.into())
    }

    /// Creates a cleanup error with the given message.
    pub fn cleanup(msg: impl Into<String>) -> Self {
        Self::Cleanup(msg.into())
    }

    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Connection(_) => "Connection Error",
            Self::Query(_) => "Query Error",
            Self::Cleanup(_) => "Cleanup Error",
            Self::Config(_) => "Configuration Error",
        }
    }
}

/// Result type alias using RelayError.
pub type Result<T> = std::result::Result<T, RelayError>;
