// src/error.rs

use thiserror::Error;

/// Core error types for Splitset
#[derive(Error, Debug)]
pub enum Error {
    /// Programmer-error class failure: inputs inconsistent with the build mode,
    /// unexpected fragment category, unknown module
    #[error("Internal error: {0}")]
    InvariantViolation(String),

    /// The manifest modification hook rejected a fragment
    #[error("Manifest modification failed: {0}")]
    ModifierError(String),

    /// The device matcher could not evaluate a fragment
    #[error("Device matching failed: {0}")]
    MatcherError(String),

    /// Writing a fragment to the archive failed
    #[error("Failed to serialize '{path}': {message}")]
    SerializationError { path: String, message: String },

    /// Invalid build configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The worker pool could not be created
    #[error("Thread pool error: {0}")]
    ThreadPoolError(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias using Splitset's Error type
pub type Result<T> = std::result::Result<T, Error>;
