//! Amount token parsing.

use std::str::FromStr;

use rust_decimal::Decimal;

/// Parse a statement amount token into a positive decimal.
///
/// Currency symbols, signs, grouping commas, and whitespace are stripped
/// before parsing, so `"-$45.67"` and `"$45.67"` both yield `45.67`.
/// Zero and unparseable tokens are rejected.
pub fn parse_amount(token: &str) -> Option<Decimal> {
    let cleaned: String = token
        .chars()
        .filter(|c| !matches!(c, '$' | '+' | '-' | ',') && !c.is_whitespace())
        .collect();
    let amount = Decimal::from_str(&cleaned).ok()?;
    if amount.is_zero() {
        return None;
    }
    Some(amount)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_amount() {
        assert_eq!(parse_amount("45.67"), Some(Decimal::from_str("45.67").unwrap()));
    }

    #[test]
    fn test_sign_and_symbol_normalized() {
        let expected = Some(Decimal::from_str("45.67").unwrap());
        assert_eq!(parse_amount("-$45.67"), expected);
        assert_eq!(parse_amount("$45.67"), expected);
        assert_eq!(
            parse_amount("+$1,204.55"),
            Some(Decimal::from_str("1204.55").unwrap())
        );
    }

    #[test]
    fn test_zero_rejected() {
        assert_eq!(parse_amount("0.00"), None);
        assert_eq!(parse_amount("$0"), None);
    }

    #[test]
    fn test_garbage_rejected() {
        assert_eq!(parse_amount("N/A"), None);
        assert_eq!(parse_amount(""), None);
    }
}
