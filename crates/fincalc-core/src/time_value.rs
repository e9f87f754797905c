use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;

use crate::error::FinCalcError;
use crate::types::{Money, Rate};
use crate::FinCalcResult;

/// (1 + rate)^periods.
///
/// Whole periods use exact repeated multiplication (`checked_powu`); a
/// fractional remainder is raised with `powd` and multiplied in. Exceeding
/// the Decimal range is reported as `Overflow` instead of panicking.
pub fn growth_factor(rate: Rate, periods: Decimal) -> FinCalcResult<Decimal> {
    if periods < Decimal::ZERO {
        return Err(FinCalcError::invalid("periods", "Periods cannot be negative"));
    }
    let base = Decimal::ONE + rate;
    if base <= Decimal::ZERO {
        return Err(FinCalcError::invalid(
            "rate",
            "Periodic rate must be greater than -100%",
        ));
    }

    let whole = periods.trunc();
    let frac = periods - whole;
    let whole_n = whole.to_u64().ok_or_else(|| FinCalcError::Overflow {
        context: format!("growth factor exponent {periods}"),
    })?;

    let whole_factor = base.checked_powu(whole_n).ok_or_else(|| FinCalcError::Overflow {
        context: format!("growth factor (1 + {rate})^{periods}"),
    })?;

    if frac.is_zero() {
        return Ok(whole_factor);
    }

    let frac_factor = base.checked_powd(frac).ok_or_else(|| FinCalcError::Overflow {
        context: format!("fractional growth factor (1 + {rate})^{frac}"),
    })?;
    whole_factor
        .checked_mul(frac_factor)
        .ok_or_else(|| FinCalcError::Overflow {
            context: format!("growth factor (1 + {rate})^{periods}"),
        })
}

/// Future-value factor of an ordinary annuity: ((1+i)^n - 1) / i.
/// Degenerates to `n` at a zero rate.
pub fn annuity_fv_factor(rate: Rate, nper: u32) -> FinCalcResult<Decimal> {
    if rate.is_zero() {
        return Ok(Decimal::from(nper));
    }
    let factor = growth_factor(rate, Decimal::from(nper))?;
    Ok((factor - Decimal::ONE) / rate)
}

/// Present-value factor of an ordinary annuity: ((1+i)^n - 1) / (i (1+i)^n).
/// Degenerates to `n` at a zero rate.
pub fn annuity_pv_factor(rate: Rate, nper: u32) -> FinCalcResult<Decimal> {
    if rate.is_zero() {
        return Ok(Decimal::from(nper));
    }
    let factor = growth_factor(rate, Decimal::from(nper))?;
    let denom = rate * factor;
    if denom.is_zero() {
        return Err(FinCalcError::DivisionByZero {
            context: "annuity PV factor".into(),
        });
    }
    Ok((factor - Decimal::ONE) / denom)
}

/// Level payment that amortizes `present_value` over `nper` periods.
///
/// Amounts are positive (no spreadsheet sign convention).
pub fn pmt(rate: Rate, nper: u32, present_value: Money) -> FinCalcResult<Money> {
    if nper == 0 {
        return Err(FinCalcError::invalid("nper", "Number of periods must be > 0"));
    }
    let pv_factor = annuity_pv_factor(rate, nper)?;
    if pv_factor.is_zero() {
        return Err(FinCalcError::DivisionByZero {
            context: "PMT annuity factor".into(),
        });
    }
    Ok(present_value / pv_factor)
}

/// Principal supported by a level payment over `nper` periods.
pub fn pv_of_annuity(rate: Rate, nper: u32, payment: Money) -> FinCalcResult<Money> {
    Ok(payment * annuity_pv_factor(rate, nper)?)
}
