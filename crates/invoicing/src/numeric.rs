//! Lenient numeric coercion for form input.

use core::str::FromStr;

use rust_decimal::Decimal;

/// Coerce raw form input to a decimal.
///
/// Empty or non-numeric input is `0`. Plain decimals (`"2"`, `"499.50"`) and
/// scientific notation (`"1e3"`) are accepted.
pub fn coerce_decimal(raw: &str) -> Decimal {
    let raw = raw.trim();
    if raw.is_empty() {
        return Decimal::ZERO;
    }
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .unwrap_or(Decimal::ZERO)
}

/// Clamp a quantity or rate to the non-negative range.
pub fn non_negative(value: Decimal) -> Decimal {
    value.max(Decimal::ZERO)
}
