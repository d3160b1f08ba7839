//! OpenAI-compatible classifier client.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::{ClassificationRequest, ModelClassifier, ModelError, ModelVerdict, Result};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Classifier backed by an OpenAI-compatible chat-completions endpoint.
///
/// Requests carry a fixed instruction prompt plus the (already masked)
/// transaction fields; responses are parsed defensively via
/// [`extract_json_object`].
pub struct TagClassifier {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl TagClassifier {
    /// Create a classifier with an explicit API key.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(ModelError::MissingCredential("empty API key".to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.3,
            max_tokens: 100,
        })
    }

    /// Create a classifier from the `OPENAI_API_KEY` environment variable.
    ///
    /// Fails with [`ModelError::MissingCredential`] if unset, so a missing
    /// credential surfaces at construction rather than mid-batch.
    pub fn from_env() -> Result<Self> {
        let key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| ModelError::MissingCredential("OPENAI_API_KEY not set".to_string()))?;
        Self::new(key)
    }

    /// Override the endpoint base URL (for proxies or compatible servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the model name.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    fn build_prompt(request: &ClassificationRequest) -> String {
        let taxonomy = request
            .taxonomy
            .iter()
            .map(|c| format!("- {c}"))
            .collect::<Vec<_>>()
            .join("\n");

        let items = if request.items.is_empty() {
            "N/A".to_string()
        } else {
            request.items.join(", ")
        };

        format!(
            "Categorize this transaction into one of these categories:\n\
             {taxonomy}\n\n\
             Transaction:\n\
             - Merchant: {merchant}\n\
             - Amount: {amount}\n\
             - Date: {date}\n\
             - Items: {items}\n\n\
             Respond with JSON:\n\
             {{\n  \"category\": \"category name\",\n  \"subcategory\": \"optional subcategory\",\n  \"confidence\": 0.0-1.0\n}}",
            merchant = request.merchant.as_deref().unwrap_or("N/A"),
            amount = request.amount.as_deref().unwrap_or("N/A"),
            date = request.date.as_deref().unwrap_or("N/A"),
        )
    }
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct RawVerdict {
    category: Option<String>,
    subcategory: Option<String>,
    confidence: Option<f32>,
}

#[async_trait]
impl ModelClassifier for TagClassifier {
    async fn classify(&self, request: &ClassificationRequest) -> Result<ModelVerdict> {
        let prompt = Self::build_prompt(request);

        debug!(
            prompt_len = prompt.len(),
            model = %self.model,
            "sending classification request"
        );

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&json!({
                "model": self.model,
                "messages": [{ "role": "user", "content": prompt }],
                "temperature": self.temperature,
                "max_tokens": self.max_tokens,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ModelError::Status(response.status().as_u16()));
        }

        let body: ChatResponse = response.json().await?;
        let content = body
            .choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .unwrap_or("");

        let object = extract_json_object(content)
            .ok_or_else(|| ModelError::Schema("no JSON object in response".to_string()))?;

        let raw: RawVerdict = serde_json::from_str(object)
            .map_err(|e| ModelError::Schema(e.to_string()))?;

        Ok(ModelVerdict {
            category: raw.category.unwrap_or_else(|| "Uncategorized".to_string()),
            subcategory: raw.subcategory,
            confidence: raw.confidence.unwrap_or(0.5),
        })
    }
}

/// Extract the first balanced JSON object from free text.
///
/// Models wrap answers in prose or code fences often enough that a plain
/// `serde_json::from_str` on the whole body is useless. This walks from
/// the first `{` and tracks brace depth, honoring string literals and
/// escapes, returning the balanced slice.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let bytes = text.as_bytes();

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, &b) in bytes.iter().enumerate().skip(start) {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }

        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..=i]);
                }
            }
            _ => {}
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_plain_object() {
        let text = r#"{"category": "Dining", "confidence": 0.8}"#;
        assert_eq!(extract_json_object(text), Some(text));
    }

    #[test]
    fn test_extract_with_surrounding_prose() {
        let text = "Sure! Here is the result:\n```json\n{\"category\": \"Dining\"}\n``` hope that helps";
        assert_eq!(extract_json_object(text), Some(r#"{"category": "Dining"}"#));
    }

    #[test]
    fn test_extract_nested_and_braces_in_strings() {
        let text = r#"answer {"a": {"b": 1}, "note": "keep } this"} trailing"#;
        assert_eq!(
            extract_json_object(text),
            Some(r#"{"a": {"b": 1}, "note": "keep } this"}"#)
        );
    }

    #[test]
    fn test_extract_unbalanced_returns_none() {
        assert_eq!(extract_json_object("no object here"), None);
        assert_eq!(extract_json_object("{\"open\": true"), None);
    }

    #[test]
    fn test_missing_credential() {
        assert!(matches!(
            TagClassifier::new(""),
            Err(ModelError::MissingCredential(_))
        ));
    }

    #[test]
    fn test_prompt_includes_taxonomy_and_fields() {
        let request = ClassificationRequest {
            merchant: Some("ACME ****1234".to_string()),
            amount: Some("$45.67".to_string()),
            date: Some("2024-01-15".to_string()),
            items: vec!["widget".to_string()],
            taxonomy: vec!["Groceries".to_string(), "Uncategorized".to_string()],
        };

        let prompt = TagClassifier::build_prompt(&request);
        assert!(prompt.contains("- Groceries"));
        assert!(prompt.contains("ACME ****1234"));
        assert!(prompt.contains("Respond with JSON"));
    }
}
