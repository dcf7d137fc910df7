//! Adapter layer: converts between the JS f64 world and the calculator's Decimal core.

use num_traits::ToPrimitive;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;

/// Convert f64 to Decimal. NaN, infinities and out-of-range values become zero.
pub fn to_decimal(v: f64) -> Decimal {
    if !v.is_finite() {
        return Decimal::ZERO;
    }
    Decimal::from_f64(v).unwrap_or(Decimal::ZERO)
}

/// Convert Decimal to f64.
pub fn from_decimal(d: Decimal) -> f64 {
    d.to_f64().unwrap_or(0.0)
}

/// Medal counts arrive from JS as f64; fractions are truncated.
pub fn to_medals(v: f64) -> i64 {
    if !v.is_finite() {
        return 0;
    }
    v.trunc().to_i64().unwrap_or(0)
}
