//! Error types for the model boundary.

use thiserror::Error;

/// Errors that can occur when calling the classification model.
#[derive(Error, Debug)]
pub enum ModelError {
    /// No API credential was configured.
    #[error("missing API credential: {0}")]
    MissingCredential(String),

    /// The HTTP request itself failed (network, TLS, timeout).
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The endpoint returned a non-success status.
    #[error("model API returned status {0}")]
    Status(u16),

    /// The response body did not contain a usable JSON object.
    #[error("unparsable model response: {0}")]
    Schema(String),
}
