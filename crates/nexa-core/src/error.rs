//! Error types for nexa-core

use thiserror::Error;

/// Core library error type.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid session key: {0:?}")]
    InvalidKey(String),

    #[error("Generation error: {0}")]
    Generate(String),

    #[error("Request timed out after {0}s")]
    Timeout(u64),
}

/// Result type alias using Error.
pub type Result<T> = std::result::Result<T, Error>;
