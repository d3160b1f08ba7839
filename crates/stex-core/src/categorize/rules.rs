//! Deterministic keyword rules for transaction categorization.
//!
//! Case-insensitive substring matching against the merchant string. Rules
//! are checked in declaration order and the first hit wins, so put the
//! higher-signal keyword groups first.

/// The category taxonomy used across rules, model fallback, and output.
pub const TAXONOMY: &[&str] = &[
    "Groceries",
    "Dining",
    "Transportation",
    "Utilities",
    "Office",
    "Shopping",
    "Healthcare",
    "Entertainment",
    "Education",
    "Uncategorized",
];

pub struct KeywordRule {
    pub keywords: &'static [&'static str],
    pub category: &'static str,
    pub subcategory: Option<&'static str>,
    pub confidence: f32,
}

pub static RULES: &[KeywordRule] = &[
    KeywordRule {
        keywords: &[
            "save-on-foods",
            "sobeys",
            "walmart",
            "target",
            "safeway",
            "kroger",
            "whole foods",
            "costco",
            "superstore",
        ],
        category: "Groceries",
        subcategory: None,
        confidence: 0.9,
    },
    KeywordRule {
        keywords: &[
            "shell",
            "esso",
            "chevron",
            "bp",
            "exxon",
            "petro-canada",
            "gas station",
            "petrol",
        ],
        category: "Transportation",
        subcategory: Some("Fuel"),
        confidence: 0.9,
    },
    KeywordRule {
        keywords: &[
            "grill",
            "café",
            "cafe",
            "pizza",
            "restaurant",
            "diner",
            "bistro",
            "starbucks",
            "tim hortons",
            "mcdonalds",
            "subway",
        ],
        category: "Dining",
        subcategory: None,
        confidence: 0.85,
    },
    KeywordRule {
        keywords: &["staples", "office depot", "office max"],
        category: "Office",
        subcategory: Some("Supplies"),
        confidence: 0.85,
    },
    KeywordRule {
        keywords: &[
            "hydro",
            "electric",
            "gas company",
            "water",
            "internet",
            "phone",
            "cable",
        ],
        category: "Utilities",
        subcategory: None,
        confidence: 0.85,
    },
];

/// First keyword rule whose keywords appear in `merchant`, if any.
pub fn match_merchant(merchant: &str) -> Option<&'static KeywordRule> {
    let haystack = merchant.to_lowercase();
    RULES
        .iter()
        .find(|rule| rule.keywords.iter().any(|kw| haystack.contains(kw)))
}
