//! Transaction categorization.
//!
//! Deterministic keyword rules first; when no rule clears the confidence
//! threshold, an optional model classifier is consulted. Anything sent to
//! the classifier passes through the PII masker first.

pub mod rules;

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use stex_model::{ClassificationRequest, ModelClassifier};

use crate::pii::{self, MaskStrategy};
use crate::statement::ParsedLine;

/// Categorization outcome, tagged by how it was decided.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "method", rename_all = "lowercase")]
pub enum Categorization {
    /// Decided by a keyword rule.
    Rules {
        category: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        subcategory: Option<String>,
        confidence: f32,
    },
    /// Decided by the model classifier.
    #[serde(rename = "tag")]
    Model {
        category: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        subcategory: Option<String>,
        confidence: f32,
    },
}

impl Categorization {
    pub fn category(&self) -> &str {
        match self {
            Self::Rules { category, .. } | Self::Model { category, .. } => category,
        }
    }

    pub fn subcategory(&self) -> Option<&str> {
        match self {
            Self::Rules { subcategory, .. } | Self::Model { subcategory, .. } => {
                subcategory.as_deref()
            }
        }
    }

    pub fn confidence(&self) -> f32 {
        match self {
            Self::Rules { confidence, .. } | Self::Model { confidence, .. } => *confidence,
        }
    }

    pub fn method(&self) -> &'static str {
        match self {
            Self::Rules { .. } => "rules",
            Self::Model { .. } => "tag",
        }
    }

    fn uncategorized() -> Self {
        Self::Rules {
            category: "Uncategorized".to_string(),
            subcategory: None,
            confidence: 0.5,
        }
    }
}

/// Rule-then-model categorizer.
pub struct Categorizer {
    fallback_threshold: f32,
    classifier: Option<Arc<dyn ModelClassifier>>,
}

impl Default for Categorizer {
    fn default() -> Self {
        Self {
            fallback_threshold: 0.6,
            classifier: None,
        }
    }
}

impl Categorizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Confidence below which the model fallback kicks in.
    pub fn with_fallback_threshold(mut self, threshold: f32) -> Self {
        self.fallback_threshold = threshold;
        self
    }

    pub fn with_classifier(mut self, classifier: Arc<dyn ModelClassifier>) -> Self {
        self.classifier = Some(classifier);
        self
    }

    /// Categorize a transaction.
    ///
    /// `text` is the merchant or description string the keyword rules run
    /// against; `amount`, `date`, and `items` only enrich the model
    /// prompt. Always returns a result with confidence in `[0, 1]`; a
    /// classifier failure degrades to `Uncategorized` rather than
    /// erroring out.
    pub async fn categorize(
        &self,
        text: &str,
        amount: Option<Decimal>,
        date: Option<NaiveDate>,
        items: &[String],
    ) -> Categorization {
        if let Some(rule) = rules::match_merchant(text) {
            if rule.confidence >= self.fallback_threshold {
                return Categorization::Rules {
                    category: rule.category.to_string(),
                    subcategory: rule.subcategory.map(str::to_string),
                    confidence: rule.confidence,
                };
            }
        }

        let Some(classifier) = &self.classifier else {
            return Categorization::uncategorized();
        };

        // The classifier only ever sees redacted text.
        let request = ClassificationRequest {
            merchant: Some(pii::mask(text, MaskStrategy::Last4).masked),
            amount: amount.map(|a| a.to_string()),
            date: date.map(|d| d.to_string()),
            items: items
                .iter()
                .map(|item| pii::mask(item, MaskStrategy::Last4).masked)
                .collect(),
            taxonomy: rules::TAXONOMY.iter().map(|c| c.to_string()).collect(),
        };

        match classifier.classify(&request).await {
            Ok(verdict) => {
                debug!(
                    category = %verdict.category,
                    confidence = verdict.confidence,
                    "model classification"
                );
                Categorization::Model {
                    category: verdict.category,
                    subcategory: verdict.subcategory,
                    confidence: clamp_confidence(verdict.confidence),
                }
            }
            Err(error) => {
                warn!(%error, "model classification failed");
                Categorization::uncategorized()
            }
        }
    }

    /// Categorize a parsed statement line.
    pub async fn categorize_line(&self, line: &ParsedLine) -> Categorization {
        self.categorize(&line.description, Some(line.amount), line.date, &[])
            .await
    }
}

fn clamp_confidence(confidence: f32) -> f32 {
    if confidence.is_finite() {
        confidence.clamp(0.0, 1.0)
    } else {
        0.5
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use pretty_assertions::assert_eq;

    use stex_model::{ModelError, ModelVerdict};

    use super::*;

    struct StubClassifier {
        verdict: Result<ModelVerdict, ()>,
        last_request: Mutex<Option<ClassificationRequest>>,
    }

    impl StubClassifier {
        fn ok(category: &str, confidence: f32) -> Self {
            Self {
                verdict: Ok(ModelVerdict {
                    category: category.to_string(),
                    subcategory: None,
                    confidence,
                }),
                last_request: Mutex::new(None),
            }
        }

        fn failing() -> Self {
            Self {
                verdict: Err(()),
                last_request: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl ModelClassifier for StubClassifier {
        async fn classify(
            &self,
            request: &ClassificationRequest,
        ) -> stex_model::Result<ModelVerdict> {
            *self.last_request.lock().unwrap() = Some(request.clone());
            self.verdict
                .clone()
                .map_err(|_| ModelError::Status(500))
        }
    }

    #[tokio::test]
    async fn test_rules_win_without_model() {
        let result = Categorizer::new()
            .categorize("WALMART SUPERCENTER", None, None, &[])
            .await;
        assert_eq!(result.category(), "Groceries");
        assert_eq!(result.method(), "rules");
        assert_eq!(result.confidence(), 0.9);
    }

    #[tokio::test]
    async fn test_categorize_parsed_line() {
        let lines = crate::statement::parse_bank_statement("01/15/2024 COSTCO WHOLESALE $80.00");
        let result = Categorizer::new().categorize_line(&lines[0]).await;
        assert_eq!(result.category(), "Groceries");
        assert_eq!(result.method(), "rules");
    }

    #[tokio::test]
    async fn test_unknown_without_classifier_degrades() {
        let result = Categorizer::new()
            .categorize("ACME WIDGETS", None, None, &[])
            .await;
        assert_eq!(result.category(), "Uncategorized");
        assert_eq!(result.confidence(), 0.5);
        assert_eq!(result.method(), "rules");
    }

    #[tokio::test]
    async fn test_model_fallback_used_for_unknown() {
        let classifier = Arc::new(StubClassifier::ok("Shopping", 0.8));
        let result = Categorizer::new()
            .with_classifier(classifier)
            .categorize("ACME WIDGETS", None, None, &[])
            .await;
        assert_eq!(result.category(), "Shopping");
        assert_eq!(result.method(), "tag");
    }

    #[tokio::test]
    async fn test_confidence_clamped() {
        let classifier = Arc::new(StubClassifier::ok("Shopping", 3.7));
        let result = Categorizer::new()
            .with_classifier(classifier)
            .categorize("ACME WIDGETS", None, None, &[])
            .await;
        assert_eq!(result.confidence(), 1.0);

        let classifier = Arc::new(StubClassifier::ok("Shopping", -0.2));
        let result = Categorizer::new()
            .with_classifier(classifier)
            .categorize("ACME WIDGETS", None, None, &[])
            .await;
        assert_eq!(result.confidence(), 0.0);
    }

    #[tokio::test]
    async fn test_classifier_error_degrades() {
        let classifier = Arc::new(StubClassifier::failing());
        let result = Categorizer::new()
            .with_classifier(classifier)
            .categorize("ACME WIDGETS", None, None, &[])
            .await;
        assert_eq!(result.category(), "Uncategorized");
        assert_eq!(result.method(), "rules");
    }

    #[tokio::test]
    async fn test_classifier_sees_masked_text_only() {
        let classifier = Arc::new(StubClassifier::ok("Shopping", 0.8));
        Categorizer::new()
            .with_classifier(classifier.clone())
            .categorize(
                "PAYPAL 4532-1234-5678-9012",
                None,
                None,
                &["card 4111-1111-1111-1111".to_string()],
            )
            .await;

        let request = classifier.last_request.lock().unwrap().clone().unwrap();
        let merchant = request.merchant.unwrap();
        assert!(!merchant.contains("4532-1234-5678"));
        assert!(merchant.ends_with("9012"));
        assert!(!request.items[0].contains("4111-1111-1111"));
    }

    #[test]
    fn test_method_discriminator_serialization() {
        let rules = Categorization::Rules {
            category: "Groceries".to_string(),
            subcategory: None,
            confidence: 0.9,
        };
        let json = serde_json::to_value(&rules).unwrap();
        assert_eq!(json["method"], "rules");

        let model = Categorization::Model {
            category: "Shopping".to_string(),
            subcategory: None,
            confidence: 0.8,
        };
        let json = serde_json::to_value(&model).unwrap();
        assert_eq!(json["method"], "tag");
    }
}
