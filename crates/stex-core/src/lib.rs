//! Core library for statement extraction and PII safety.
//!
//! This crate provides:
//! - Priority-ordered PII detection and masking (idempotent, span-based)
//! - Bank-statement line parsing (cascading line shapes, dedup, sorting)
//! - Normalization of parsed documents into canonical transactions
//! - Deterministic categorization with a confidence-gated model fallback
//!
//! Text is masked before it can reach any process boundary: the
//! categorizer feeds the model only redacted merchant/item strings, and
//! nothing in this crate logs raw input.

pub mod categorize;
pub mod error;
pub mod models;
pub mod normalize;
pub mod pii;
pub mod statement;

pub use categorize::{Categorization, Categorizer};
pub use error::{Result, StexError};
pub use models::config::PipelineConfig;
pub use models::transaction::{DocKind, NormalizedTransaction, ParsedDocument, TransactionItem};
pub use normalize::{from_statement, to_transactions};
pub use pii::{MaskResult, MaskStrategy, PiiFinding, contains_pii, count_pii, mask, mask_specific};
pub use statement::{ParsedLine, StatementParser, parse_bank_statement};

/// Re-export model boundary types.
pub use stex_model::{ClassificationRequest, ModelClassifier, ModelError, ModelVerdict, TagClassifier};
