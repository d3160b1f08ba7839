//! Compiled regex patterns for PII detection.
//!
//! All patterns are compiled once at first use. Digit classes are spelled
//! `[0-9]` rather than `\d` so Unicode digits never match. Several
//! patterns are deliberately over-broad (bank accounts, card numbers,
//! routing numbers); the detector validators in `registry` reject the
//! false positives.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Financial
    pub static ref ROUTING_US: Regex = Regex::new(r"\b[0-9]{9}\b").unwrap();

    pub static ref PAN_GENERIC: Regex = Regex::new(r"\b(?:[0-9][ -]*?){13,19}\b").unwrap();

    pub static ref IBAN: Regex = Regex::new(r"(?i)\b[A-Z]{2}[0-9]{2}[A-Z0-9]{1,30}\b").unwrap();

    pub static ref SWIFT_BIC: Regex = Regex::new(r"\b[A-Z]{6}[A-Z0-9]{2}(?:[A-Z0-9]{3})?\b").unwrap();

    pub static ref BANK_ACCOUNT_US: Regex = Regex::new(r"\b[0-9]{7,17}\b").unwrap();

    pub static ref TRANSIT_CA: Regex = Regex::new(r"\b[0-9]{5}-[0-9]{3}\b").unwrap();

    pub static ref BTC_ADDRESS: Regex = Regex::new(r"\b[13][a-km-zA-HJ-NP-Z1-9]{25,34}\b").unwrap();

    pub static ref ETH_ADDRESS: Regex = Regex::new(r"\b0x[a-fA-F0-9]{40}\b").unwrap();

    // Government identifiers
    pub static ref SSN_US: Regex = Regex::new(r"\b[0-9]{3}-[0-9]{2}-[0-9]{4}\b").unwrap();

    pub static ref SSN_US_NO_DASH: Regex = Regex::new(r"\b[0-8][0-9]{8}\b").unwrap();

    pub static ref ITIN_US: Regex = Regex::new(r"\b9[0-9]{2}-[7-8][0-9]-[0-9]{4}\b").unwrap();

    pub static ref EIN_US: Regex = Regex::new(r"\b[0-9]{2}-[0-9]{7}\b").unwrap();

    pub static ref SIN_CA: Regex = Regex::new(r"\b[0-9]{3}-[0-9]{3}-[0-9]{3}\b").unwrap();

    pub static ref PASSPORT_US: Regex = Regex::new(r"\b[A-Z][0-9]{8}\b").unwrap();

    pub static ref UK_NINO: Regex = Regex::new(r"(?i)\b[A-CEGHJ-PR-TW-Z]{2}[0-9]{6}[A-D]\b").unwrap();

    pub static ref UK_NHS: Regex = Regex::new(r"\b[0-9]{3}\s?[0-9]{3}\s?[0-9]{4}\b").unwrap();

    pub static ref DL_GENERIC: Regex = Regex::new(r"\b[A-Z]{1,2}[0-9]{5,8}\b").unwrap();

    // Contact
    pub static ref EMAIL: Regex = Regex::new(r"(?i)[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}").unwrap();

    pub static ref PHONE_INTL: Regex = Regex::new(r"\+?[0-9][0-9\s().-]{7,}[0-9]").unwrap();

    // Address
    pub static ref STREET_ADDRESS: Regex = Regex::new(
        r"(?i)\b[0-9]+\s+[A-Z][a-z]+\s+(?:Street|St|Avenue|Ave|Road|Rd|Boulevard|Blvd|Lane|Ln|Drive|Dr|Court|Ct|Way|Place|Pl)\b"
    ).unwrap();

    pub static ref POSTAL_CA: Regex = Regex::new(r"(?i)\b[A-Z][0-9][A-Z]\s?[0-9][A-Z][0-9]\b").unwrap();

    pub static ref ZIP_US: Regex = Regex::new(r"\b[0-9]{5}(?:-[0-9]{4})?\b").unwrap();

    // Network
    pub static ref IP_V4: Regex = Regex::new(r"\b(?:[0-9]{1,3}\.){3}[0-9]{1,3}\b").unwrap();

    pub static ref IP_V6: Regex = Regex::new(r"(?i)\b(?:[A-F0-9]{1,4}:){7}[A-F0-9]{1,4}\b").unwrap();

    pub static ref URL: Regex = Regex::new(r#"(?i)https?://[^\s<>"{}|\\^`\[\]]+"#).unwrap();

    pub static ref MAC_ADDRESS: Regex =
        Regex::new(r"(?i)\b(?:[0-9A-F]{2}[:-]){5}[0-9A-F]{2}\b").unwrap();

    // Marker emitted by full-tag masking; used by the idempotency check.
    pub static ref REDACTION_TAG: Regex = Regex::new(r"\[REDACTED:[A-Z]+\]").unwrap();
}
