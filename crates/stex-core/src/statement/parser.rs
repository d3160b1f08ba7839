//! Cascading line parser for OCR'd bank statements.

use std::collections::HashSet;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use crate::categorize::rules;

use super::amounts::parse_amount;
use super::dates::normalize_date;
use super::patterns::{
    LINE_SHAPES, MERCHANT_STORE_NUMBER, MERCHANT_SUFFIX, MULTI_SPACE, NON_DESCRIPTION,
    SUMMARY_KEYWORDS,
};

/// One transaction extracted from a statement line.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ParsedLine {
    /// Transaction date, when the line carried a resolvable one.
    pub date: Option<NaiveDate>,
    /// Cleaned description text.
    pub description: String,
    /// Merchant token derived from the description.
    pub merchant: String,
    /// Unsigned amount.
    pub amount: Decimal,
    /// The trimmed source line, kept for audit trails.
    pub raw_line_text: String,
    /// Keyword-rule category, when one matched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<&'static str>,
}

/// Configurable statement parser.
///
/// The defaults match typical OCR output; the limits exist to keep
/// garbled lines from producing oversized fields downstream.
pub struct StatementParser {
    min_line_chars: usize,
    max_description_chars: usize,
    max_merchant_chars: usize,
}

impl Default for StatementParser {
    fn default() -> Self {
        Self {
            min_line_chars: 6,
            max_description_chars: 200,
            max_merchant_chars: 100,
        }
    }
}

impl StatementParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_min_line_chars(mut self, chars: usize) -> Self {
        self.min_line_chars = chars;
        self
    }

    pub fn with_max_description_chars(mut self, chars: usize) -> Self {
        self.max_description_chars = chars;
        self
    }

    pub fn with_max_merchant_chars(mut self, chars: usize) -> Self {
        self.max_merchant_chars = chars;
        self
    }

    /// Parse statement text into transactions.
    ///
    /// Lines are filtered (too short, summary/balance rows), matched
    /// against the shape cascade, deduplicated on the
    /// `(date, merchant, amount)` triple with the first occurrence kept,
    /// and returned sorted by date with undated lines first.
    pub fn parse(&self, text: &str) -> Vec<ParsedLine> {
        let mut seen: HashSet<(Option<NaiveDate>, String, Decimal)> = HashSet::new();
        let mut parsed: Vec<ParsedLine> = Vec::new();
        let mut total_lines = 0usize;

        for raw in text.lines() {
            total_lines += 1;
            let line = raw.trim();
            if line.chars().count() < self.min_line_chars {
                continue;
            }
            if is_summary_line(line) {
                continue;
            }
            let Some(entry) = self.match_line(line) else {
                continue;
            };
            let key = (entry.date, entry.merchant.clone(), entry.amount);
            if seen.insert(key) {
                parsed.push(entry);
            }
        }

        // Stable sort keeps source order within a day; undated lines
        // sort to the front.
        parsed.sort_by_key(|entry| entry.date.unwrap_or_default());

        debug!(
            lines = total_lines,
            transactions = parsed.len(),
            "parsed statement text"
        );
        parsed
    }

    fn match_line(&self, line: &str) -> Option<ParsedLine> {
        for shape in LINE_SHAPES.iter() {
            let Some(caps) = shape.pattern.captures(line) else {
                continue;
            };
            let Some(amount) = parse_amount(&caps[shape.amount]) else {
                continue;
            };
            let description =
                clean_description(&caps[shape.description], self.max_description_chars);
            if description.is_empty() {
                continue;
            }
            let date = shape.date.and_then(|idx| normalize_date(&caps[idx]));
            let merchant = extract_merchant(&description, self.max_merchant_chars);
            let category = rules::match_merchant(&description).map(|rule| rule.category);

            return Some(ParsedLine {
                date,
                description,
                merchant,
                amount,
                raw_line_text: line.to_string(),
                category,
            });
        }
        None
    }
}

/// Parse statement text with default limits.
pub fn parse_bank_statement(text: &str) -> Vec<ParsedLine> {
    StatementParser::new().parse(text)
}

fn is_summary_line(line: &str) -> bool {
    let lowered = line.to_lowercase();
    SUMMARY_KEYWORDS.iter().any(|kw| lowered.contains(kw))
}

/// Strip OCR noise characters, collapse whitespace, cap length.
fn clean_description(text: &str, max_chars: usize) -> String {
    let stripped = NON_DESCRIPTION.replace_all(text, "");
    let collapsed = MULTI_SPACE.replace_all(stripped.trim(), " ");
    truncate_chars(&collapsed, max_chars)
}

/// Derive the merchant token: drop corporate suffixes and trailing store
/// numbers, then take the leading word.
fn extract_merchant(description: &str, max_chars: usize) -> String {
    let without_suffix = MERCHANT_SUFFIX.replace(description, "");
    let without_store = MERCHANT_STORE_NUMBER.replace(&without_suffix, "");
    let first_token = without_store
        .split_whitespace()
        .next()
        .unwrap_or_default();
    truncate_chars(first_token, max_chars)
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
