//! Configuration structures for the extraction pipeline.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::pii::MaskStrategy;

/// Main configuration for the stex pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// PII masking configuration.
    pub masking: MaskingConfig,

    /// Statement parser configuration.
    pub statement: StatementConfig,

    /// Categorizer configuration.
    pub categorizer: CategorizerConfig,
}

impl PipelineConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&contents)?;
        Ok(config)
    }

    /// Write configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }
}

/// PII masking configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MaskingConfig {
    /// Default masking strategy when the caller does not pick one.
    pub strategy: MaskStrategy,
}

impl Default for MaskingConfig {
    fn default() -> Self {
        Self {
            strategy: MaskStrategy::Last4,
        }
    }
}

/// Statement parser configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StatementConfig {
    /// Lines shorter than this are dropped as noise.
    pub min_line_chars: usize,

    /// Cleaned descriptions are truncated to this length.
    pub max_description_chars: usize,

    /// Merchant guesses are truncated to this length.
    pub max_merchant_chars: usize,
}

impl Default for StatementConfig {
    fn default() -> Self {
        Self {
            min_line_chars: 6,
            max_description_chars: 200,
            max_merchant_chars: 100,
        }
    }
}

/// Categorizer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CategorizerConfig {
    /// Rules results below this confidence trigger the model fallback.
    pub fallback_threshold: f32,

    /// Model name for the fallback classifier.
    pub model: String,

    /// Optional base URL override for the model endpoint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
}

impl Default for CategorizerConfig {
    fn default() -> Self {
        Self {
            fallback_threshold: 0.6,
            model: "gpt-4o-mini".to_string(),
            api_base: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_round_trip() {
        let config = PipelineConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: PipelineConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.statement.min_line_chars, 6);
        assert_eq!(parsed.categorizer.fallback_threshold, 0.6);
        assert_eq!(parsed.masking.strategy, MaskStrategy::Last4);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let parsed: PipelineConfig =
            serde_json::from_str(r#"{"categorizer": {"model": "gpt-4o"}}"#).unwrap();

        assert_eq!(parsed.categorizer.model, "gpt-4o");
        assert_eq!(parsed.categorizer.fallback_threshold, 0.6);
        assert_eq!(parsed.statement.max_description_chars, 200);
    }
}
