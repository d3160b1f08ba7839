//! Model-API boundary for stex.
//!
//! This crate isolates everything that talks to a language model behind
//! the [`ModelClassifier`] trait, so the core pipeline can run with or
//! without a model configured:
//! - `TagClassifier` posts to an OpenAI-compatible chat-completions
//!   endpoint
//! - callers hand it only pre-masked text; this crate never redacts

mod client;
mod error;

pub use client::{TagClassifier, extract_json_object};
pub use error::ModelError;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Result type for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;

/// Input to a classification call.
///
/// All free-text fields (merchant, item names) must already be masked by
/// the caller; this type is what crosses the process boundary.
#[derive(Debug, Clone, Serialize)]
pub struct ClassificationRequest {
    /// Masked merchant string, if known.
    pub merchant: Option<String>,
    /// Display amount, e.g. "$45.67".
    pub amount: Option<String>,
    /// ISO date, if known.
    pub date: Option<String>,
    /// Masked item names.
    pub items: Vec<String>,
    /// Allowed category taxonomy the model must pick from.
    pub taxonomy: Vec<String>,
}

/// What the model answered, after schema validation.
///
/// Confidence is passed through as returned; clamping to [0, 1] is the
/// caller's responsibility.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ModelVerdict {
    /// Chosen category.
    pub category: String,
    /// Optional subcategory.
    pub subcategory: Option<String>,
    /// Model-reported confidence.
    pub confidence: f32,
}

/// Trait for transaction classifiers backed by a language model.
///
/// The response is treated as untrusted: implementations must tolerate
/// surrounding prose, missing fields, and out-of-range confidence, and
/// map anything unusable to a [`ModelError`].
#[async_trait]
pub trait ModelClassifier: Send + Sync {
    /// Classify one transaction into the request's taxonomy.
    async fn classify(&self, request: &ClassificationRequest) -> Result<ModelVerdict>;
}
