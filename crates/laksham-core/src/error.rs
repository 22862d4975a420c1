//! Core error types for laksham-core.
//!
//! Network-facing failures are caught at the call site and carried as typed
//! values; the session machine decides what the candidate sees based on
//! which phase failed.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for laksham-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Portal API errors
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Candidate intake errors
    #[error("Intake error: {0}")]
    Intake(#[from] IntakeError),

    /// Assessment data validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from the external portal API.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Transport-level failure (connect, timeout, decode)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server answered with a non-success status
    #[error("{endpoint} returned HTTP {status}")]
    Status { endpoint: String, status: u16 },

    /// The configured base URL cannot be parsed or joined
    #[error("Invalid API base URL: {0}")]
    InvalidBaseUrl(String),
}

/// Errors rejected at intake, before any network call is made.
#[derive(Error, Debug)]
pub enum IntakeError {
    /// Email is required to create an attempt
    #[error("candidate email is required")]
    MissingEmail,

    /// `start` was called on a session that already left intake
    #[error("attempt has already been started")]
    AlreadyStarted,
}

/// Assessment data validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Empty collection
    #[error("Empty collection: {0}")]
    EmptyCollection(String),

    /// Question order values must be unique and contiguous starting at 1
    #[error("question order values must be contiguous from 1: expected {expected}, found {found}")]
    NonContiguousOrder { expected: u32, found: u32 },

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
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

    /// Missing or unknown configuration key
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// The config directory cannot be determined or created
    #[error("Failed to prepare config directory: {0}")]
    DirUnavailable(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
