use std::fmt;

use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;

/// Balances and debts are exact decimals, written to the store files as
/// JSON numbers with every digit kept.
pub type Money = Decimal;

/// Convert a raw numeric input into `Money`.
/// Returns `None` for NaN, infinities and values outside the decimal range.
pub fn to_money(amount: f64) -> Option<Money> {
    if !amount.is_finite() {
        return None;
    }
    Decimal::from_f64(amount).map(|m| m.normalize())
}

/// Format money the way the ATM prints it.
/// Example: 100 -> "$100", -12.5 -> "-$12.5"
pub fn format_money(amount: Money) -> String {
    let sign = if amount < Money::ZERO { "-" } else { "" };
    format!("{}${}", sign, amount.abs().normalize())
}

/// Coerce a command-line argument into a number.
/// Example: "50" -> 50.0, " 12.5 " -> 12.5
pub fn parse_amount(input: &str) -> Result<f64, ParseAmountError> {
    let value: f64 = input
        .trim()
        .parse()
        .map_err(|_| ParseAmountError::InvalidFormat)?;

    if !value.is_finite() {
        return Err(ParseAmountError::NotFinite);
    }
    Ok(value)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseAmountError {
    InvalidFormat,
    NotFinite,
}

impl fmt::Display for ParseAmountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseAmountError::InvalidFormat => write!(f, "the amount is not a number"),
            ParseAmountError::NotFinite => write!(f, "the amount must be a finite number"),
        }
    }
}

impl std::error::Error for ParseAmountError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_money() {
        assert_eq!(to_money(1000.0), Some(Money::from(1000)));
        assert_eq!(to_money(-400.0), Some(Money::from(-400)));
        assert_eq!(to_money(12.5), Some(Money::new(125, 1)));
        assert_eq!(to_money(f64::NAN), None);
        assert_eq!(to_money(f64::INFINITY), None);
        assert_eq!(to_money(f64::NEG_INFINITY), None);
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(Money::from(100)), "$100");
        assert_eq!(format_money(Money::from(0)), "$0");
        assert_eq!(format_money(Money::from(-100)), "-$100");
        assert_eq!(format_money(Money::new(1250, 2)), "$12.5");
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("50"), Ok(50.0));
        assert_eq!(parse_amount(" 12.5 "), Ok(12.5));
        assert_eq!(parse_amount("-3"), Ok(-3.0));
    }

    #[test]
    fn test_parse_amount_invalid() {
        assert_eq!(parse_amount("asdf"), Err(ParseAmountError::InvalidFormat));
        assert_eq!(parse_amount(""), Err(ParseAmountError::InvalidFormat));
        assert_eq!(parse_amount("NaN"), Err(ParseAmountError::NotFinite));
        assert_eq!(parse_amount("inf"), Err(ParseAmountError::NotFinite));
    }
}
