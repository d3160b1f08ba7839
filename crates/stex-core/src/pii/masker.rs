//! Span-based single-pass masking.
//!
//! Candidates are collected against the original text in detector
//! priority order, overlaps resolve to the earlier detector, and the
//! output is rebuilt in one splice. Replacements never feed back into
//! matching, so a masked substring cannot be re-matched within the same
//! call; `[REDACTED:*]` tags from a previous call are skipped, along
//! with candidates that carry mask residue or sit flush against a tag.

use std::collections::HashMap;

use serde::Serialize;

use super::MaskStrategy;
use super::patterns;
use super::registry::{self, PiiCategory, PiiDetector};

/// One masked occurrence, positioned in the original text.
///
/// `matched` is the pre-redaction substring; callers that persist or log
/// findings should use the span offsets instead.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PiiFinding {
    /// Name of the detector that claimed the span.
    pub detector: &'static str,
    /// The detector's category.
    pub category: PiiCategory,
    /// The original matched text.
    pub matched: String,
    /// Byte offset of the span start in the input.
    pub start: usize,
    /// Byte offset one past the span end.
    pub end: usize,
}

/// Masked text plus what was found, ordered by position in the input.
#[derive(Debug, Clone, Serialize)]
pub struct MaskResult {
    pub masked: String,
    pub found: Vec<PiiFinding>,
}

struct Span {
    start: usize,
    end: usize,
    detector: &'static PiiDetector,
    replacement: String,
}

fn ranges_overlap(a_start: usize, a_end: usize, b_start: usize, b_end: usize) -> bool {
    a_start < b_end && b_start < a_end
}

/// Byte ranges already covered by redaction tags from an earlier pass.
fn redacted_ranges(text: &str) -> Vec<(usize, usize)> {
    patterns::REDACTION_TAG
        .find_iter(text)
        .map(|m| (m.start(), m.end()))
        .collect()
}

/// Residue of a previous `last4` pass: four or more leading mask
/// characters.
fn already_masked(candidate: &str) -> bool {
    candidate.chars().take_while(|&c| c == '*').count() >= 4
}

/// Overlapping a prior redaction tag, or flush against one. Text that
/// touches a tag is treated as a remnant of the earlier pass rather
/// than fresh PII.
fn touches_redaction(start: usize, end: usize, redacted: &[(usize, usize)]) -> bool {
    redacted
        .iter()
        .any(|&(s, e)| ranges_overlap(start, end, s, e) || start == e || end == s)
}

/// Collect non-overlapping confirmed spans for the given detectors.
///
/// Detectors must be supplied in priority order; when two candidates
/// overlap, the first detector to claim the range keeps it.
fn collect_spans(
    text: &str,
    detectors: impl Iterator<Item = &'static PiiDetector>,
    strategy: MaskStrategy,
) -> Vec<Span> {
    let redacted = redacted_ranges(text);
    let mut spans: Vec<Span> = Vec::new();

    for detector in detectors {
        for m in detector.pattern.find_iter(text) {
            if touches_redaction(m.start(), m.end(), &redacted) || already_masked(m.as_str()) {
                continue;
            }
            if !detector.confirms(m.as_str()) {
                continue;
            }
            if spans
                .iter()
                .any(|span| ranges_overlap(m.start(), m.end(), span.start, span.end))
            {
                continue;
            }
            spans.push(Span {
                start: m.start(),
                end: m.end(),
                detector,
                replacement: detector.mask(m.as_str(), strategy),
            });
        }
    }

    spans.sort_by_key(|span| span.start);
    spans
}

fn splice(text: &str, spans: &[Span]) -> MaskResult {
    let mut masked = String::with_capacity(text.len());
    let mut found = Vec::with_capacity(spans.len());
    let mut cursor = 0;

    for span in spans {
        masked.push_str(&text[cursor..span.start]);
        masked.push_str(&span.replacement);
        cursor = span.end;
        found.push(PiiFinding {
            detector: span.detector.name,
            category: span.detector.category,
            matched: text[span.start..span.end].to_string(),
            start: span.start,
            end: span.end,
        });
    }
    masked.push_str(&text[cursor..]);

    MaskResult { masked, found }
}

/// Mask all detectable PII in `text`.
pub fn mask(text: &str, strategy: MaskStrategy) -> MaskResult {
    let spans = collect_spans(text, registry::list_detectors().iter(), strategy);
    splice(text, &spans)
}

/// Mask only the named detectors, leaving everything else untouched.
///
/// Unknown names are ignored. Evaluation order is still registry
/// priority order, not the order of `names`.
pub fn mask_specific(text: &str, names: &[&str], strategy: MaskStrategy) -> MaskResult {
    let spans = collect_spans(
        text,
        registry::list_detectors()
            .iter()
            .filter(|d| names.contains(&d.name)),
        strategy,
    );
    splice(text, &spans)
}

/// Fast yes/no check against the critical detector subset.
///
/// Short-circuits on the first confirmed match; cheaper than a full
/// [`mask`] pass when the answer is all that matters.
pub fn contains_pii(text: &str) -> bool {
    let redacted = redacted_ranges(text);
    registry::critical_detectors().into_iter().any(|detector| {
        detector.pattern.find_iter(text).any(|m| {
            detector.confirms(m.as_str())
                && !touches_redaction(m.start(), m.end(), &redacted)
                && !already_masked(m.as_str())
        })
    })
}

/// Count confirmed occurrences per detector, after overlap resolution.
///
/// Detectors with no hits are absent from the map.
pub fn count_pii(text: &str) -> HashMap<&'static str, usize> {
    let spans = collect_spans(text, registry::list_detectors().iter(), MaskStrategy::Full);
    let mut counts = HashMap::new();
    for span in spans {
        *counts.entry(span.detector.name).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_empty_input() {
        let result = mask("", MaskStrategy::Last4);
        assert_eq!(result.masked, "");
        assert!(result.found.is_empty());
    }

    #[test]
    fn test_clean_text_untouched() {
        let text = "Lunch at the corner cafe, nothing sensitive here.";
        let result = mask(text, MaskStrategy::Last4);
        assert_eq!(result.masked, text);
        assert!(result.found.is_empty());
    }

    #[test]
    fn test_ssn_and_card_last4() {
        let text = "SSN 123-45-6789, card 4532-1234-5678-9012";
        let result = mask(text, MaskStrategy::Last4);
        assert_eq!(result.masked, "SSN *******6789, card ***************9012");
        let names: Vec<&str> = result.found.iter().map(|f| f.detector).collect();
        assert_eq!(names, vec!["ssn_us", "pan_generic"]);
        assert_eq!(result.found[0].matched, "123-45-6789");
        assert_eq!(result.found[1].matched, "4532-1234-5678-9012");
    }

    #[test]
    fn test_routing_beats_dashless_ssn() {
        // 021000021 is a valid ABA prefix; the routing detector runs
        // first and must claim the span.
        let result = mask("Routing: 021000021", MaskStrategy::Last4);
        assert_eq!(result.masked, "Routing: [REDACTED:ROUTING]");
        assert_eq!(result.found[0].detector, "routing_us");
    }

    #[test]
    fn test_invalid_routing_falls_through() {
        // Prefix 52 is not an ABA range; the next financial detector in
        // line (generic account number) claims the digits instead.
        let result = mask("Acct 523456789", MaskStrategy::Last4);
        assert_eq!(result.masked, "Acct *****6789");
        assert_eq!(result.found[0].detector, "bank_account_us");
    }

    #[test]
    fn test_full_strategy_tags() {
        let result = mask("SSN 123-45-6789", MaskStrategy::Full);
        assert_eq!(result.masked, "SSN [REDACTED:SSN]");
    }

    #[test]
    fn test_idempotent_full() {
        let once = mask("Call +1 604 555 1234 or mail joe@example.com", MaskStrategy::Full);
        let twice = mask(&once.masked, MaskStrategy::Full);
        assert_eq!(twice.masked, once.masked);
        assert!(twice.found.is_empty());
    }

    #[test]
    fn test_idempotent_last4() {
        let once = mask("card 4532-1234-5678-9012", MaskStrategy::Last4);
        let twice = mask(&once.masked, MaskStrategy::Last4);
        assert_eq!(twice.masked, once.masked);
        assert!(twice.found.is_empty());
    }

    #[test]
    fn test_mixed_script_digits_pass_through() {
        // Arabic-Indic digits next to ASCII ones: no detector may claim
        // the run, and nothing may panic.
        let text = "ref 12٣٤٥٦٧٨٩ acct";
        let result = mask(text, MaskStrategy::Last4);
        assert_eq!(result.masked, text);
        assert!(result.found.is_empty());
    }

    #[test]
    fn test_digits_flush_against_tag_skipped() {
        // A prior pass may leave digits touching a tag; they are treated
        // as residue of that pass, not fresh PII.
        let text = "[REDACTED:BANK]123456789";
        let result = mask(text, MaskStrategy::Last4);
        assert_eq!(result.masked, text);
        assert!(result.found.is_empty());
    }

    #[test]
    fn test_mask_residue_not_reclaimed() {
        assert!(already_masked("*******6789"));
        assert!(already_masked("****"));
        assert!(!already_masked("**12"));
        assert!(!already_masked("123456789"));
    }

    #[test]
    fn test_email_domain_strategy() {
        let result = mask("reach me at darrell@example.com", MaskStrategy::Domain);
        assert_eq!(result.masked, "reach me at d***@example.com");
        // And the partially-kept form must not re-match.
        let again = mask(&result.masked, MaskStrategy::Domain);
        assert_eq!(again.masked, result.masked);
    }

    #[test]
    fn test_found_ordered_by_offset() {
        let text = "joe@example.com then SSN 123-45-6789";
        let result = mask(text, MaskStrategy::Full);
        let names: Vec<&str> = result.found.iter().map(|f| f.detector).collect();
        // Email has lower registry priority than SSN but appears first
        // in the text, and found follows text order.
        assert_eq!(names, vec!["email", "ssn_us"]);
        assert!(result.found[0].start < result.found[1].start);
    }

    #[test]
    fn test_mask_specific_only_named() {
        let text = "joe@example.com and SSN 123-45-6789";
        let result = mask_specific(text, &["email"], MaskStrategy::Full);
        assert_eq!(result.masked, "[REDACTED:EMAIL] and SSN 123-45-6789");
        assert_eq!(result.found.len(), 1);
    }

    #[test]
    fn test_contains_pii() {
        assert!(contains_pii("card 4532-1234-5678-9012"));
        assert!(contains_pii("mail me: joe@example.com"));
        assert!(!contains_pii("no secrets in this line"));
        // Masked output no longer trips the check.
        let masked = mask("card 4532-1234-5678-9012", MaskStrategy::Full).masked;
        assert!(!contains_pii(&masked));
    }

    #[test]
    fn test_count_pii() {
        let counts = count_pii("joe@example.com and sue@example.org");
        assert_eq!(counts.get("email"), Some(&2));
        assert_eq!(counts.get("ssn_us"), None);
    }

    #[test]
    fn test_iban_checksum_gates_masking() {
        let good = mask("GB82WEST12345698765432", MaskStrategy::Last4);
        assert_eq!(good.found[0].detector, "iban");
        let bad = mask("IBAN GB82WEST12345698765431 on file", MaskStrategy::Last4);
        assert!(bad.found.iter().all(|f| f.detector != "iban"));
    }
}
