// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Rebate Engine - Raw Input Coercion
//
// Text from the input fields never produces an error: anything that is not a
// usable finite number becomes zero.

use rust_decimal::Decimal;
use std::str::FromStr;

/// Leading-prefix parse used for pip fields: `"12.5 lots"` reads as 12.5.
pub fn parse_leading(raw: &str) -> Decimal {
    let trimmed = raw.trim_start();
    match scan_number(trimmed) {
        Some((literal, _)) => to_decimal(&literal),
        None => Decimal::ZERO,
    }
}

/// Whole-string parse used for the redemption field: `"12abc"` reads as 0.
/// Blank input is 0.
pub fn parse_strict(raw: &str) -> Decimal {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Decimal::ZERO;
    }
    match scan_number(trimmed) {
        Some((literal, consumed)) if consumed == trimmed.len() => to_decimal(&literal),
        _ => Decimal::ZERO,
    }
}

fn to_decimal(literal: &str) -> Decimal {
    let parsed = if literal.contains('e') {
        Decimal::from_scientific(literal)
    } else {
        Decimal::from_str(literal)
    };
    parsed.unwrap_or(Decimal::ZERO)
}

/// Scan a decimal literal at the start of `s`.
///
/// Returns the literal normalized for `rust_decimal` (explicit integer part,
/// no dangling point, no `+`, lowercase exponent) and the number of bytes
/// consumed.
fn scan_number(s: &str) -> Option<(String, usize)> {
    let bytes = s.as_bytes();
    let mut i = 0;
    let mut literal = String::new();

    if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
        if bytes[i] == b'-' {
            literal.push('-');
        }
        i += 1;
    }

    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let int_digits = &s[int_start..i];

    let mut frac_digits = "";
    if i < bytes.len() && bytes[i] == b'.' {
        let frac_start = i + 1;
        let mut j = frac_start;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        frac_digits = &s[frac_start..j];
        if !int_digits.is_empty() || !frac_digits.is_empty() {
            i = j;
        }
    }

    if int_digits.is_empty() && frac_digits.is_empty() {
        return None;
    }

    literal.push_str(if int_digits.is_empty() { "0" } else { int_digits });
    if !frac_digits.is_empty() {
        literal.push('.');
        literal.push_str(frac_digits);
    }

    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        let mut j = i + 1;
        let mut exponent = String::new();
        if j < bytes.len() && (bytes[j] == b'+' || bytes[j] == b'-') {
            if bytes[j] == b'-' {
                exponent.push('-');
            }
            j += 1;
        }
        let exp_start = j;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > exp_start {
            exponent.push_str(&s[exp_start..j]);
            literal.push('e');
            literal.push_str(&exponent);
            i = j;
        }
    }

    Some((literal, i))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn leading_parse_takes_numeric_prefix() {
        assert_eq!(parse_leading("12.5"), dec!(12.5));
        assert_eq!(parse_leading("  42 pips"), dec!(42));
        assert_eq!(parse_leading("-7.25x"), dec!(-7.25));
        assert_eq!(parse_leading(".5"), dec!(0.5));
        assert_eq!(parse_leading("3."), dec!(3));
        assert_eq!(parse_leading("+8"), dec!(8));
        assert_eq!(parse_leading("1e3"), dec!(1000));
        assert_eq!(parse_leading("2.5E-1"), dec!(0.25));
        assert_eq!(parse_leading("1e"), dec!(1));
    }

    #[test]
    fn leading_parse_zeroes_garbage() {
        assert_eq!(parse_leading(""), Decimal::ZERO);
        assert_eq!(parse_leading("abc"), Decimal::ZERO);
        assert_eq!(parse_leading("."), Decimal::ZERO);
        assert_eq!(parse_leading("-"), Decimal::ZERO);
        assert_eq!(parse_leading("NaN"), Decimal::ZERO);
        assert_eq!(parse_leading("Infinity"), Decimal::ZERO);
    }

    #[test]
    fn strict_parse_requires_whole_string() {
        assert_eq!(parse_strict("300"), dec!(300));
        assert_eq!(parse_strict("  300  "), dec!(300));
        assert_eq!(parse_strict("300abc"), Decimal::ZERO);
        assert_eq!(parse_strict("1 000"), Decimal::ZERO);
        assert_eq!(parse_strict(""), Decimal::ZERO);
        assert_eq!(parse_strict("   "), Decimal::ZERO);
    }
}
