//! Lenient parsing of numeric text typed by the user.

use rust_decimal::Decimal;
use std::str::FromStr;

/// Parses a money amount or rate from free text.
///
/// Blank, unparsable and negative input all yield zero. The calculators never
/// reject input, they compute over whatever magnitude can be recovered.
pub fn parse_amount(text: &str) -> Decimal {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Decimal::ZERO;
    }

    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map(non_negative)
        .unwrap_or(Decimal::ZERO)
}

/// Clamps a value to be a non-negative magnitude.
pub fn non_negative(value: Decimal) -> Decimal {
    if value.is_sign_negative() {
        Decimal::ZERO
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_amount_accepts_plain_decimals() {
        assert_eq!(parse_amount("10000"), dec!(10000));
        assert_eq!(parse_amount(" 12.50 "), dec!(12.50));
        assert_eq!(parse_amount("0.031589696969697"), dec!(0.031589696969697));
    }

    #[test]
    fn test_parse_amount_coerces_invalid_input_to_zero() {
        assert_eq!(parse_amount(""), Decimal::ZERO);
        assert_eq!(parse_amount("   "), Decimal::ZERO);
        assert_eq!(parse_amount("abc"), Decimal::ZERO);
        assert_eq!(parse_amount("12abc"), Decimal::ZERO);
    }

    #[test]
    fn test_parse_amount_coerces_negative_input_to_zero() {
        assert_eq!(parse_amount("-50"), Decimal::ZERO);
        assert_eq!(parse_amount("-0.5"), Decimal::ZERO);
    }

    #[test]
    fn test_parse_amount_accepts_scientific_notation() {
        assert_eq!(parse_amount("1e3"), dec!(1000));
    }
}
