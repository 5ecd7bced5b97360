//! Error types for the billscan-core library.

use thiserror::Error;

/// Main error type for the billscan library.
#[derive(Error, Debug)]
pub enum BillError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Recorded OCR output could not be parsed.
    #[error("invalid OCR output: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors related to OCR processing.
#[derive(Error, Debug)]
pub enum OcrError {
    /// Failed to load OCR models.
    #[error("failed to load model: {0}")]
    ModelLoad(String),

    /// Text detection or recognition failed.
    #[error("inference failed: {0}")]
    Inference(String),

    /// The engine is unusable after a panic in another request.
    #[error("engine lock poisoned")]
    Poisoned,
}

/// Errors related to configuration files.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read or write the file.
    #[error("failed to access {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// File content is not a valid configuration.
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// A value is out of its accepted range.
    #[error("invalid value for {field}: {reason}")]
    Invalid { field: String, reason: String },
}

/// Result type for the billscan library.
pub type Result<T> = std::result::Result<T, BillError>;
