use rust_decimal::Decimal;

use crate::error::{ConverterError, Result};

use std::str::FromStr;

/// Minimum number of fractional digits every emitted amount carries.
pub const AMOUNT_SCALE: u32 = 2;

/// Parses a textual amount such as `-1,234.5` or `+12`.
pub fn parse_amount(text: &str) -> Result<Decimal> {
    let trimmed = text.trim();
    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let digits: String = unsigned.chars().filter(|&c| c != ',').collect();

    if digits.is_empty() || digits.starts_with('+') {
        return Err(ConverterError::amount_invalid(text));
    }

    Decimal::from_str(&digits).map_err(|_| ConverterError::amount_invalid(text))
}

/// Renders `amount` with at least [`AMOUNT_SCALE`] fractional digits.
/// Finer amounts keep their own significant digits.
pub fn format_amount(amount: Decimal) -> String {
    let normalized = amount.normalize();
    if normalized.is_zero() {
        return format!("{:.2}", Decimal::ZERO);
    }
    if normalized.scale() > AMOUNT_SCALE {
        return normalized.to_string();
    }
    format!("{:.2}", normalized)
}

/// Re-renders a textual amount in canonical form.
pub fn normalize_amount(text: &str) -> Result<String> {
    parse_amount(text).map(format_amount)
}
