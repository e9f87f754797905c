use rust_decimal::Decimal;
use std::str::FromStr;

use crate::error::FinCalcError;
use crate::FinCalcResult;

/// Strip everything a user typically puts around a number in a form field:
/// surrounding/internal whitespace, thousands separators, underscores and
/// currency symbols.
fn normalise(raw: &str) -> String {
    raw.trim()
        .chars()
        .filter(|c| !matches!(c, ',' | '_' | '₹' | '$') && !c.is_whitespace())
        .collect()
}

/// Lenient parse for form input. Anything unparsable (including an empty
/// field) becomes zero, which engine validation then rejects.
pub fn parse_amount(raw: &str) -> Decimal {
    let cleaned = normalise(raw);
    Decimal::from_str(&cleaned)
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .unwrap_or(Decimal::ZERO)
}

/// Strict parse: same normalisation, but garbage is an error naming `field`.
pub fn parse_amount_strict(field: &str, raw: &str) -> FinCalcResult<Decimal> {
    let cleaned = normalise(raw);
    if cleaned.is_empty() {
        return Err(FinCalcError::invalid(field, "value is empty"));
    }
    Decimal::from_str(&cleaned)
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .map_err(|_| FinCalcError::invalid(field, format!("'{}' is not a number", raw.trim())))
}
