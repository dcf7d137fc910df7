// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Rebate Engine - Display Formatting

use rust_decimal::{Decimal, RoundingStrategy};

/// Indonesian Rupiah symbol followed by a no-break space, as id-ID renders it.
const RUPIAH_PREFIX: &str = "Rp\u{a0}";

/// en-US number: `,` grouping, `.` decimal point, exactly `digits` fraction digits.
pub fn format_number(value: Decimal, digits: u32) -> String {
    render(value, digits, ',', '.')
}

/// Two fraction digits followed by `%`.
pub fn format_percentage(value: Decimal) -> String {
    format!("{}%", format_number(value, 2))
}

/// id-ID Rupiah with no fraction digits: `Rp 1.000.000`.
pub fn format_currency(value: Decimal) -> String {
    let body = render(value.abs(), 0, '.', ',');
    if value.is_sign_negative() && body.bytes().any(|b| b.is_ascii_digit() && b != b'0') {
        format!("-{RUPIAH_PREFIX}{body}")
    } else {
        format!("{RUPIAH_PREFIX}{body}")
    }
}

fn render(value: Decimal, digits: u32, group_sep: char, decimal_sep: char) -> String {
    let rounded = value.round_dp_with_strategy(digits, RoundingStrategy::MidpointAwayFromZero);
    let plain = format!("{:.*}", digits as usize, rounded.abs());
    let (int_part, frac_part) = match plain.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (plain.as_str(), None),
    };

    let mut out = String::new();
    if rounded.is_sign_negative() && !rounded.is_zero() {
        out.push('-');
    }
    out.push_str(&group_digits(int_part, group_sep));
    if let Some(frac) = frac_part {
        out.push(decimal_sep);
        out.push_str(frac);
    }
    out
}

fn group_digits(digits: &str, sep: char) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(sep);
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn number_grouping_and_digits() {
        assert_eq!(format_number(dec!(0), 1), "0.0");
        assert_eq!(format_number(dec!(1234.56), 1), "1,234.6");
        assert_eq!(format_number(dec!(1234567), 0), "1,234,567");
        assert_eq!(format_number(dec!(999.95), 1), "1,000.0");
        assert_eq!(format_number(dec!(-4500.25), 2), "-4,500.25");
        assert_eq!(format_number(dec!(12), 3), "12.000");
    }

    #[test]
    fn rounding_is_half_away_from_zero() {
        assert_eq!(format_number(dec!(0.25), 1), "0.3");
        assert_eq!(format_number(dec!(-0.25), 1), "-0.3");
    }

    #[test]
    fn tiny_negatives_print_without_sign() {
        assert_eq!(format_number(dec!(-0.01), 1), "0.0");
    }

    #[test]
    fn percentage_has_two_digits() {
        assert_eq!(format_percentage(dec!(116.6666)), "116.67%");
        assert_eq!(format_percentage(dec!(4)), "4.00%");
    }

    #[test]
    fn currency_is_rupiah() {
        assert_eq!(format_currency(dec!(6000000)), "Rp\u{a0}6.000.000");
        assert_eq!(format_currency(dec!(0)), "Rp\u{a0}0");
        assert_eq!(format_currency(dec!(999.5)), "Rp\u{a0}1.000");
        assert_eq!(format_currency(dec!(-25000)), "-Rp\u{a0}25.000");
    }
}
