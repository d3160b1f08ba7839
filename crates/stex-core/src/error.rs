//! Error types for the stex-core library.
//!
//! The pipeline itself is best-effort: parse misses, rejected detector
//! candidates, and malformed amounts are silently skipped, never raised.
//! Errors exist only at the edges - configuration loading and the model
//! boundary.

use thiserror::Error;

/// Main error type for the stex library.
#[derive(Error, Debug)]
pub enum StexError {
    /// Model boundary error (classifier construction or call).
    #[error("model error: {0}")]
    Model(#[from] stex_model::ModelError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for the stex library.
pub type Result<T> = std::result::Result<T, StexError>;
