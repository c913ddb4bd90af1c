//! Error types for Deskcore

use thiserror::Error;

/// Errors that can occur inside the engine
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Storage I/O failure: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse profile: {0}")]
    ProfileParseError(String),

    #[error("Date parse error: {0}")]
    DateParseError(String),

    #[error("Malformed catalog data: {0}")]
    CatalogError(String),

    #[error("Unknown exercise id: {0}")]
    UnknownExercise(String),
}
