//! Formatting helpers for amounts and counts

use rust_decimal::{Decimal, RoundingStrategy};

/// Group the digits of an integer string in threes
///
/// A leading `-` is kept in front of the grouped digits.
pub fn group_digits(digits: &str, separator: &str) -> String {
    let (sign, digits) = match digits.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", digits),
    };

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 * separator.len());
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push_str(separator);
        }
        grouped.push(c);
    }
    format!("{}{}", sign, grouped)
}

/// Format an integer with `separator` between thousands
pub fn format_number<T: ToString>(n: T, separator: &str) -> String {
    group_digits(&n.to_string(), separator)
}

/// Format a monetary amount, e.g. `-$1,234.50`
///
/// Rounds half away from zero to `decimal_places`.
pub fn format_amount(amount: Decimal, symbol: &str, decimal_places: u32, separator: &str) -> String {
    let rounded = amount.round_dp_with_strategy(decimal_places, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    let text = format!("{:.1$}", rounded.abs(), decimal_places as usize);

    let (whole, fraction) = match text.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (text.as_str(), None),
    };

    let mut out = format!("{}{}{}", sign, symbol, group_digits(whole, separator));
    if let Some(fraction) = fraction {
        out.push('.');
        out.push_str(fraction);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0, ","), "0");
        assert_eq!(format_number(999, ","), "999");
        assert_eq!(format_number(1000, ","), "1,000");
        assert_eq!(format_number(1234567usize, "."), "1.234.567");
        assert_eq!(format_number(-1234, ","), "-1,234");
    }

    #[test]
    fn test_group_digits_custom_separator() {
        assert_eq!(group_digits("1234567", " "), "1 234 567");
        assert_eq!(group_digits("123456", ""), "123456");
    }

    #[test]
    fn test_format_amount() {
        let amount = Decimal::from_str("1234.5").unwrap();
        assert_eq!(format_amount(amount, "$", 2, ","), "$1,234.50");
        assert_eq!(format_amount(amount, "€", 0, "."), "€1.235");
    }

    #[test]
    fn test_format_amount_negative_and_rounding() {
        assert_eq!(format_amount(Decimal::from_str("-987654.125").unwrap(), "$", 2, ","), "-$987,654.13");
        assert_eq!(format_amount(Decimal::from_str("-0.001").unwrap(), "$", 2, ","), "$0.00");
    }
}
