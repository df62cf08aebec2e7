//! Core error types for hearth-core.
//!
//! The error hierarchy is built with thiserror so callers can match on
//! the failing subsystem without string inspection.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for hearth-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Task store errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Errors raised by the hosted task-store client.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Transport-level failure (connect, timeout, body read)
    #[error("Store request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The store answered with a non-success status
    #[error("Store API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// The configured endpoint is not a valid URL
    #[error("Invalid store URL: {0}")]
    Url(#[from] url::ParseError),

    /// No credential stored for the task store
    #[error("Not authenticated with the task store")]
    NotAuthenticated,

    /// A document came back without a field the model requires
    #[error("Missing field '{0}' in store document")]
    MissingField(&'static str),

    /// The blocking runtime backing the client could not be created
    #[error("Failed to start store runtime: {0}")]
    Runtime(std::io::Error),

    /// Credential lookup in the OS keyring failed
    #[error("Keyring error: {0}")]
    Keyring(String),
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

    /// Key does not name a known configuration field
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// The data directory could not be resolved or created
    #[error("Failed to prepare data directory: {0}")]
    DataDir(String),
}

impl From<Box<dyn std::error::Error + Send + Sync>> for CoreError {
    fn from(err: Box<dyn std::error::Error + Send + Sync>) -> Self {
        CoreError::Custom(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
