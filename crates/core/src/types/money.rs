//! Decimal money helpers.
//!
//! Shopify sends amounts as decimal strings (`"19.99"`). Carts keep those
//! strings verbatim and parse them into [`Decimal`] only for arithmetic, so
//! totals are exact and a saved cart never rewrites a price.

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

/// Errors that can occur when parsing a money amount.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoneyError {
    /// The amount string is empty.
    #[error("amount cannot be empty")]
    Empty,
    /// The amount string is not a decimal number.
    #[error("invalid amount {raw:?}: {reason}")]
    Invalid { raw: String, reason: String },
}

/// Parse a decimal amount string as returned by Shopify.
///
/// Surrounding whitespace is ignored. The scale of the input is preserved.
/// Scientific notation (`"1e2"`) is accepted.
///
/// # Errors
///
/// Returns `MoneyError` if the string is empty or not a decimal number.
pub fn parse_amount(raw: &str) -> Result<Decimal, MoneyError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(MoneyError::Empty);
    }

    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|e| MoneyError::Invalid {
            raw: raw.to_string(),
            reason: e.to_string(),
        })
}

/// Format an amount with exactly two decimal places for display.
///
/// Midpoints round away from zero. This is presentation only; cart totals
/// are never rounded.
#[must_use]
pub fn format_amount(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{rounded:.2}")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_preserves_scale() {
        let amount = parse_amount("5.00").unwrap();
        assert_eq!(amount.to_string(), "5.00");
        assert_eq!(amount, Decimal::new(5, 0));
    }

    #[test]
    fn test_parse_trims_whitespace() {
        assert_eq!(parse_amount(" 19.99 ").unwrap(), Decimal::new(1999, 2));
    }

    #[test]
    fn test_parse_scientific_and_signed() {
        assert_eq!(parse_amount("1e2").unwrap(), Decimal::new(100, 0));
        assert_eq!(parse_amount("+5.00").unwrap(), Decimal::new(5, 0));
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(parse_amount("   "), Err(MoneyError::Empty));
    }

    #[test]
    fn test_parse_garbage() {
        assert!(matches!(
            parse_amount("nineteen"),
            Err(MoneyError::Invalid { .. })
        ));
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(Decimal::new(4498, 2)), "44.98");
        assert_eq!(format_amount(Decimal::new(5, 0)), "5.00");
        assert_eq!(format_amount(Decimal::new(12345, 3)), "12.35");
        assert_eq!(format_amount(Decimal::ZERO), "0.00");
    }
}
