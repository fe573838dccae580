//! Core error types for clockwatch-core.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for clockwatch-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Credential store errors
    #[error("Credential error: {0}")]
    Credential(#[from] CredentialError),

    /// Remote service returned a non-success status
    #[error("API error: HTTP {status}")]
    Api { status: u16 },

    /// Transport-level errors (connection, TLS, body decoding)
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Credential-store-specific errors.
///
/// These propagate to the caller unchanged -- the store has no retry or
/// recovery semantics of its own.
#[derive(Error, Debug)]
pub enum CredentialError {
    /// OS keyring operation failed
    #[error("Keyring operation failed: {0}")]
    Keyring(#[from] keyring::Error),

    /// Non-keyring backend failure (e.g. poisoned lock in the test store)
    #[error("Credential store failure: {0}")]
    Backend(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
