use rust_decimal::Decimal;

use crate::error::FinCalcError;
use crate::FinCalcResult;

/// Reject zero and negative values.
pub fn require_positive(field: &str, value: Decimal) -> FinCalcResult<()> {
    if value <= Decimal::ZERO {
        return Err(FinCalcError::invalid(field, format!("{field} must be > 0")));
    }
    Ok(())
}

/// Reject negative values; zero is allowed.
pub fn require_non_negative(field: &str, value: Decimal) -> FinCalcResult<()> {
    if value < Decimal::ZERO {
        return Err(FinCalcError::invalid(field, format!("{field} cannot be negative")));
    }
    Ok(())
}

/// Reject values above `max`.
pub fn require_at_most(field: &str, value: Decimal, max: Decimal) -> FinCalcResult<()> {
    if value > max {
        return Err(FinCalcError::invalid(field, format!("{field} cannot exceed {max}")));
    }
    Ok(())
}

/// `require_non_negative` for optional fields; `None` passes.
pub fn require_non_negative_opt(field: &str, value: Option<Decimal>) -> FinCalcResult<()> {
    match value {
        Some(v) => require_non_negative(field, v),
        None => Ok(()),
    }
}
