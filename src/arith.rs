// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Rebate Engine - Saturating Decimal Arithmetic
//
// Inputs carry no magnitude bounds, so every product, quotient and sum in the
// calculator clamps to Decimal::MIN/MAX instead of panicking.

use rust_decimal::Decimal;

/// `a * b`, clamped to the representable range.
pub fn mul(a: Decimal, b: Decimal) -> Decimal {
    a.saturating_mul(b)
}

/// `a - b`, clamped to the representable range.
pub fn sub(a: Decimal, b: Decimal) -> Decimal {
    a.saturating_sub(b)
}

/// `a / b`, clamped toward the sign of the true quotient. Zero when `b` is zero.
pub fn div(a: Decimal, b: Decimal) -> Decimal {
    if b.is_zero() {
        return Decimal::ZERO;
    }
    a.checked_div(b).unwrap_or_else(|| {
        if a.is_sign_negative() != b.is_sign_negative() {
            Decimal::MIN
        } else {
            Decimal::MAX
        }
    })
}

pub fn sum<I: IntoIterator<Item = Decimal>>(values: I) -> Decimal {
    values.into_iter().fold(Decimal::ZERO, Decimal::saturating_add)
}
