//! PII detector registry.
//!
//! Every detector declares an explicit `priority` sort key; the registry
//! is sorted once at load and never reordered per call. Priority encodes
//! the safety-critical evaluation order:
//!
//! - routing numbers before any other financial detector (a 9-digit
//!   routing number is numerically indistinguishable from a dashless SSN
//!   and must claim the span first)
//! - card/PAN detectors before generic bank-account detectors (fixed
//!   length beats a 7-17 digit catch-all)
//! - specific government IDs before the generic driver-license pattern
//! - contact, then address, then network, with IP detectors ahead of the
//!   rest of network

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::MaskStrategy;
use super::patterns;

/// Category of a PII detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PiiCategory {
    Financial,
    Government,
    Contact,
    Address,
    Network,
}

impl PiiCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Financial => "financial",
            Self::Government => "government",
            Self::Contact => "contact",
            Self::Address => "address",
            Self::Network => "network",
        }
    }
}

/// How a detector rewrites a confirmed match.
#[derive(Debug, Clone, Copy)]
enum MaskRule {
    /// Keep the last four characters under `last4`, otherwise a tag.
    Keep4 { label: &'static str },
    /// Always replace with a `[REDACTED:label]` tag.
    Tag { label: &'static str },
    /// Email: preserve first char + domain under `domain`, otherwise a tag.
    Email,
    /// Ethereum address: keep the `0x` prefix and last four under `last4`.
    EthAddress,
}

impl MaskRule {
    fn apply(&self, matched: &str, strategy: MaskStrategy) -> String {
        match self {
            Self::Keep4 { label } => match strategy {
                MaskStrategy::Last4 => last4_mask(matched),
                _ => full_tag(label),
            },
            Self::Tag { label } => full_tag(label),
            Self::Email => match strategy {
                MaskStrategy::Domain => {
                    match matched.split_once('@') {
                        Some((local, domain)) if !local.is_empty() => {
                            let first = local.chars().next().unwrap();
                            format!("{first}***@{domain}")
                        }
                        _ => full_tag("EMAIL"),
                    }
                }
                _ => full_tag("EMAIL"),
            },
            Self::EthAddress => match strategy {
                MaskStrategy::Last4 => {
                    let tail: String = matched
                        .chars()
                        .skip(matched.chars().count().saturating_sub(4))
                        .collect();
                    format!("0x{}{}", "*".repeat(36), tail)
                }
                _ => full_tag("ETH"),
            },
        }
    }
}

/// Keep the last four characters visible, mask the rest.
fn last4_mask(text: &str) -> String {
    let digits = text.chars().filter(|c| c.is_ascii_digit()).count();
    let len = text.chars().count();
    if digits < 4 {
        return "*".repeat(len);
    }
    let tail: String = text.chars().skip(len.saturating_sub(4)).collect();
    format!("{}{}", "*".repeat(len - 4), tail)
}

fn full_tag(label: &str) -> String {
    format!("[REDACTED:{label}]")
}

/// A single PII pattern detector.
///
/// Detectors are immutable and registered once at load; masking is a pure
/// function of the matched substring and the chosen strategy.
pub struct PiiDetector {
    /// Unique identifier.
    pub name: &'static str,
    /// What it detects.
    pub description: &'static str,
    /// Category grouping.
    pub category: PiiCategory,
    /// Evaluation order, lower runs first.
    pub priority: u16,
    /// Match pattern.
    pub pattern: &'static Regex,
    rule: MaskRule,
    validate: Option<fn(&str) -> bool>,
}

impl PiiDetector {
    /// Whether a raw regex match survives the detector's validation.
    pub fn confirms(&self, matched: &str) -> bool {
        self.validate.is_none_or(|validate| validate(matched))
    }

    /// Mask a matched substring.
    ///
    /// Returns the input unchanged when the detector's validation rejects
    /// the candidate; the masker treats that as a non-match.
    pub fn mask(&self, matched: &str, strategy: MaskStrategy) -> String {
        if !self.confirms(matched) {
            return matched.to_string();
        }
        self.rule.apply(matched, strategy)
    }
}

// Validators: each embeds the rejection logic that keeps the deliberately
// broad patterns honest.

/// Card numbers carry 13-19 digits. Luhn is intentionally skipped, same
/// trade-off the masking path has always made for throughput.
fn validate_pan(text: &str) -> bool {
    let digits = text.chars().filter(|c| c.is_ascii_digit()).count();
    (13..=19).contains(&digits)
}

fn validate_bank_account(text: &str) -> bool {
    let digits = text.chars().filter(|c| c.is_ascii_digit()).count();
    (7..=17).contains(&digits)
}

/// ABA routing numbers: 9 digits with a constrained 2-digit prefix
/// (00-12, 21-32, 61-72, 80).
fn validate_routing(text: &str) -> bool {
    let digits: String = text.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() != 9 {
        return false;
    }
    let prefix: u32 = digits[..2].parse().unwrap_or(99);
    prefix <= 12 || (21..=32).contains(&prefix) || (61..=72).contains(&prefix) || prefix == 80
}

/// IBAN mod-97 checksum: move the first four characters to the end, map
/// letters to 10-35, and the resulting number mod 97 must equal 1.
fn validate_iban(text: &str) -> bool {
    let iban: String = text
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase();

    // (?i) case folding can match non-ASCII letters such as U+212A.
    if !iban.is_ascii() || iban.len() < 15 || iban.len() > 34 {
        return false;
    }
    if !iban[..2].chars().all(|c| c.is_ascii_alphabetic()) {
        return false;
    }
    if !iban[2..4].chars().all(|c| c.is_ascii_digit()) {
        return false;
    }

    let rearranged = format!("{}{}", &iban[4..], &iban[..4]);
    let mut remainder: u32 = 0;
    for c in rearranged.chars() {
        if let Some(d) = c.to_digit(10) {
            remainder = (remainder * 10 + d) % 97;
        } else if c.is_ascii_alphabetic() {
            let value = (c as u32) - ('A' as u32) + 10;
            remainder = (remainder * 100 + value) % 97;
        } else {
            return false;
        }
    }
    remainder == 1
}

/// SSN area numbers 000, 666, and 900-999 are never issued.
fn validate_ssn_no_dash(text: &str) -> bool {
    let area: String = text.chars().take(3).collect();
    area != "000" && area != "666" && area.parse::<u32>().unwrap_or(900) < 900
}

lazy_static! {
    static ref DETECTORS: Vec<PiiDetector> = {
        let mut detectors = vec![
            // Financial
            PiiDetector {
                name: "routing_us",
                description: "US routing numbers (9 digits, ABA)",
                category: PiiCategory::Financial,
                priority: 10,
                pattern: &patterns::ROUTING_US,
                rule: MaskRule::Tag { label: "ROUTING" },
                validate: Some(validate_routing),
            },
            PiiDetector {
                name: "pan_generic",
                description: "Payment card numbers (PAN), 13-19 digits",
                category: PiiCategory::Financial,
                priority: 20,
                pattern: &patterns::PAN_GENERIC,
                rule: MaskRule::Keep4 { label: "CARD" },
                validate: Some(validate_pan),
            },
            PiiDetector {
                name: "iban",
                description: "International bank account numbers (IBAN)",
                category: PiiCategory::Financial,
                priority: 30,
                pattern: &patterns::IBAN,
                rule: MaskRule::Keep4 { label: "IBAN" },
                validate: Some(validate_iban),
            },
            PiiDetector {
                name: "swift_bic",
                description: "SWIFT/BIC codes (8 or 11 characters)",
                category: PiiCategory::Financial,
                priority: 40,
                pattern: &patterns::SWIFT_BIC,
                rule: MaskRule::Tag { label: "SWIFT" },
                validate: None,
            },
            PiiDetector {
                name: "bank_account_us",
                description: "US bank account numbers (7-17 digits)",
                category: PiiCategory::Financial,
                priority: 50,
                pattern: &patterns::BANK_ACCOUNT_US,
                rule: MaskRule::Keep4 { label: "BANK" },
                validate: Some(validate_bank_account),
            },
            PiiDetector {
                name: "transit_ca",
                description: "Canadian transit numbers (5-3 digits)",
                category: PiiCategory::Financial,
                priority: 60,
                pattern: &patterns::TRANSIT_CA,
                rule: MaskRule::Tag { label: "TRANSIT" },
                validate: None,
            },
            PiiDetector {
                name: "btc_address",
                description: "Bitcoin wallet addresses (base58)",
                category: PiiCategory::Financial,
                priority: 70,
                pattern: &patterns::BTC_ADDRESS,
                rule: MaskRule::Keep4 { label: "BTC" },
                validate: None,
            },
            PiiDetector {
                name: "eth_address",
                description: "Ethereum wallet addresses (0x + 40 hex)",
                category: PiiCategory::Financial,
                priority: 71,
                pattern: &patterns::ETH_ADDRESS,
                rule: MaskRule::EthAddress,
                validate: None,
            },
            // Government identifiers
            PiiDetector {
                name: "ssn_us",
                description: "US Social Security numbers (XXX-XX-XXXX)",
                category: PiiCategory::Government,
                priority: 100,
                pattern: &patterns::SSN_US,
                rule: MaskRule::Keep4 { label: "SSN" },
                validate: None,
            },
            PiiDetector {
                name: "ssn_us_no_dash",
                description: "US SSN without dashes (9 digits)",
                category: PiiCategory::Government,
                priority: 110,
                pattern: &patterns::SSN_US_NO_DASH,
                rule: MaskRule::Keep4 { label: "SSN" },
                validate: Some(validate_ssn_no_dash),
            },
            PiiDetector {
                name: "itin_us",
                description: "US taxpayer identification numbers (9XX-7X/8X-XXXX)",
                category: PiiCategory::Government,
                priority: 120,
                pattern: &patterns::ITIN_US,
                rule: MaskRule::Tag { label: "ITIN" },
                validate: None,
            },
            PiiDetector {
                name: "ein_us",
                description: "US employer identification numbers (XX-XXXXXXX)",
                category: PiiCategory::Government,
                priority: 130,
                pattern: &patterns::EIN_US,
                rule: MaskRule::Tag { label: "EIN" },
                validate: None,
            },
            PiiDetector {
                name: "sin_ca",
                description: "Canadian social insurance numbers (XXX-XXX-XXX)",
                category: PiiCategory::Government,
                priority: 140,
                pattern: &patterns::SIN_CA,
                rule: MaskRule::Tag { label: "SIN" },
                validate: None,
            },
            PiiDetector {
                name: "passport_us",
                description: "US passports (1 letter + 8 digits)",
                category: PiiCategory::Government,
                priority: 150,
                pattern: &patterns::PASSPORT_US,
                rule: MaskRule::Tag { label: "PASSPORT" },
                validate: None,
            },
            PiiDetector {
                name: "uk_nino",
                description: "UK national insurance numbers",
                category: PiiCategory::Government,
                priority: 160,
                pattern: &patterns::UK_NINO,
                rule: MaskRule::Tag { label: "NINO" },
                validate: None,
            },
            PiiDetector {
                name: "uk_nhs",
                description: "UK NHS numbers (### ### ####)",
                category: PiiCategory::Government,
                priority: 170,
                pattern: &patterns::UK_NHS,
                rule: MaskRule::Tag { label: "NHS" },
                validate: None,
            },
            PiiDetector {
                name: "dl_generic",
                description: "Driver licenses (1-2 letters + 5-8 digits)",
                category: PiiCategory::Government,
                priority: 190,
                pattern: &patterns::DL_GENERIC,
                rule: MaskRule::Tag { label: "DL" },
                validate: None,
            },
            // Contact
            PiiDetector {
                name: "email",
                description: "Email addresses",
                category: PiiCategory::Contact,
                priority: 200,
                pattern: &patterns::EMAIL,
                rule: MaskRule::Email,
                validate: None,
            },
            PiiDetector {
                name: "phone_intl",
                description: "Phone numbers (international format)",
                category: PiiCategory::Contact,
                priority: 210,
                pattern: &patterns::PHONE_INTL,
                rule: MaskRule::Tag { label: "PHONE" },
                validate: None,
            },
            // Address
            PiiDetector {
                name: "street_address",
                description: "Street addresses (### Street/Ave/Rd/...)",
                category: PiiCategory::Address,
                priority: 300,
                pattern: &patterns::STREET_ADDRESS,
                rule: MaskRule::Tag { label: "ADDRESS" },
                validate: None,
            },
            PiiDetector {
                name: "postal_ca",
                description: "Canadian postal codes (A1A 1A1)",
                category: PiiCategory::Address,
                priority: 310,
                pattern: &patterns::POSTAL_CA,
                rule: MaskRule::Tag { label: "POSTAL" },
                validate: None,
            },
            PiiDetector {
                name: "zip_us",
                description: "US ZIP codes (##### or #####-####)",
                category: PiiCategory::Address,
                priority: 320,
                pattern: &patterns::ZIP_US,
                rule: MaskRule::Tag { label: "ZIP" },
                validate: None,
            },
            // Network
            PiiDetector {
                name: "ip_v4",
                description: "IPv4 addresses",
                category: PiiCategory::Network,
                priority: 400,
                pattern: &patterns::IP_V4,
                rule: MaskRule::Tag { label: "IP" },
                validate: None,
            },
            PiiDetector {
                name: "ip_v6",
                description: "IPv6 addresses",
                category: PiiCategory::Network,
                priority: 401,
                pattern: &patterns::IP_V6,
                rule: MaskRule::Tag { label: "IP" },
                validate: None,
            },
            PiiDetector {
                name: "url",
                description: "URLs (may carry tokens in params)",
                category: PiiCategory::Network,
                priority: 410,
                pattern: &patterns::URL,
                rule: MaskRule::Tag { label: "URL" },
                validate: None,
            },
            PiiDetector {
                name: "mac_address",
                description: "MAC addresses",
                category: PiiCategory::Network,
                priority: 420,
                pattern: &patterns::MAC_ADDRESS,
                rule: MaskRule::Tag { label: "MAC" },
                validate: None,
            },
        ];

        detectors.sort_by_key(|d| d.priority);
        detectors
    };
}

/// Fast-path subset used for yes/no pre-checks before a full mask pass.
const CRITICAL_DETECTORS: &[&str] = &[
    "pan_generic",
    "ssn_us",
    "ssn_us_no_dash",
    "sin_ca",
    "bank_account_us",
    "email",
    "phone_intl",
];

/// All detectors in evaluation (priority) order.
pub fn list_detectors() -> &'static [PiiDetector] {
    &DETECTORS
}

/// Look up a detector by name.
pub fn get_detector(name: &str) -> Option<&'static PiiDetector> {
    DETECTORS.iter().find(|d| d.name == name)
}

/// Detectors of one category, in evaluation order.
pub fn detectors_by_category(category: PiiCategory) -> Vec<&'static PiiDetector> {
    DETECTORS.iter().filter(|d| d.category == category).collect()
}

/// The critical subset, in evaluation order.
pub fn critical_detectors() -> Vec<&'static PiiDetector> {
    DETECTORS
        .iter()
        .filter(|d| CRITICAL_DETECTORS.contains(&d.name))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_sorted_by_priority() {
        let detectors = list_detectors();
        assert!(detectors.windows(2).all(|w| w[0].priority <= w[1].priority));
        assert_eq!(detectors[0].name, "routing_us");
    }

    #[test]
    fn test_get_detector() {
        assert!(get_detector("ssn_us").is_some());
        assert!(get_detector("nonexistent").is_none());
    }

    #[test]
    fn test_critical_subset() {
        let critical = critical_detectors();
        assert_eq!(critical.len(), CRITICAL_DETECTORS.len());
        assert!(critical.iter().any(|d| d.name == "pan_generic"));
    }

    #[test]
    fn test_category_filter() {
        let financial = detectors_by_category(PiiCategory::Financial);
        assert!(financial.iter().all(|d| d.category == PiiCategory::Financial));
        // Routing must come first within financial.
        assert_eq!(financial[0].name, "routing_us");
    }

    #[test]
    fn test_validate_routing_prefixes() {
        assert!(validate_routing("021000021")); // 02
        assert!(validate_routing("321174851")); // 32
        assert!(!validate_routing("151000000")); // 15 not a valid range
        assert!(!validate_routing("12345678")); // 8 digits
    }

    #[test]
    fn test_validate_iban_checksum() {
        assert!(validate_iban("GB82WEST12345698765432"));
        assert!(validate_iban("PL61109010140000071219812874"));
        assert!(!validate_iban("GB82WEST12345698765431"));
        assert!(!validate_iban("XX123"));
    }

    #[test]
    fn test_validate_ssn_area() {
        assert!(validate_ssn_no_dash("123456789"));
        assert!(!validate_ssn_no_dash("000456789"));
        assert!(!validate_ssn_no_dash("666456789"));
        // Non-ASCII digits must be rejected, never sliced.
        assert!(!validate_ssn_no_dash("12٣٤٥٦٧٨٩"));
    }

    #[test]
    fn test_pan_mask_keeps_last_four() {
        let detector = get_detector("pan_generic").unwrap();
        let masked = detector.mask("4532-1234-5678-9012", MaskStrategy::Last4);
        assert_eq!(masked, "***************9012");
    }

    #[test]
    fn test_rejected_candidate_returns_input() {
        let detector = get_detector("pan_generic").unwrap();
        // 9 digits: matches nothing a card should, validator rejects.
        assert_eq!(detector.mask("123456789", MaskStrategy::Last4), "123456789");
    }

    #[test]
    fn test_email_domain_strategy() {
        let detector = get_detector("email").unwrap();
        assert_eq!(
            detector.mask("darrell@example.com", MaskStrategy::Domain),
            "d***@example.com"
        );
        assert_eq!(
            detector.mask("darrell@example.com", MaskStrategy::Full),
            "[REDACTED:EMAIL]"
        );
    }
}
