//! PII detection and masking.
//!
//! A fixed registry of regex detectors ([`registry`]) feeds a span-based
//! masker ([`masker`]) that rewrites text in a single pass. Masking is
//! idempotent: running already-masked output through again is a no-op.

pub mod masker;
mod patterns;
pub mod registry;

use serde::{Deserialize, Serialize};

pub use masker::{MaskResult, PiiFinding, contains_pii, count_pii, mask, mask_specific};
pub use registry::{
    PiiCategory, PiiDetector, critical_detectors, detectors_by_category, get_detector,
    list_detectors,
};

/// How matched PII is rewritten.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaskStrategy {
    /// Keep the last four characters where the detector supports it.
    #[default]
    Last4,
    /// Replace every match with a `[REDACTED:TYPE]` tag.
    Full,
    /// Like `Full`, but emails keep their first character and domain.
    Domain,
}
