use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

use crate::types::{Money, Percent, Rate};

const MONTHS_PER_YEAR: Decimal = dec!(12);
const HUNDRED: Decimal = dec!(100);

/// Round to paise/cents. Midpoints round away from zero.
pub fn round_currency(amount: Money) -> Money {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Round to whole currency units. Midpoints round away from zero.
pub fn round_to_unit(amount: Money) -> Money {
    amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// 7.1 -> 0.071
pub fn percent_to_rate(percent: Percent) -> Rate {
    percent / HUNDRED
}

/// 0.071 -> 7.1
pub fn rate_to_percent(rate: Rate) -> Percent {
    rate * HUNDRED
}

/// Annual percentage to a monthly fractional rate: 12 -> 0.01
pub fn monthly_rate(annual_percent: Percent) -> Rate {
    percent_to_rate(annual_percent) / MONTHS_PER_YEAR
}

/// Annual percentage to the rate for one of `periods_per_year` periods.
pub fn periodic_rate(annual_percent: Percent, periods_per_year: u32) -> Rate {
    percent_to_rate(annual_percent) / Decimal::from(periods_per_year.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_currency_midpoint() {
        assert_eq!(round_currency(dec!(10.005)), dec!(10.01));
        assert_eq!(round_currency(dec!(-10.005)), dec!(-10.01));
        assert_eq!(round_currency(dec!(10.004)), dec!(10.00));
    }

    #[test]
    fn test_round_to_unit() {
        assert_eq!(round_to_unit(dec!(1161695.38)), dec!(1161695));
        assert_eq!(round_to_unit(dec!(2.5)), dec!(3));
    }

    #[test]
    fn test_rate_conversions() {
        assert_eq!(percent_to_rate(dec!(7.1)), dec!(0.071));
        assert_eq!(rate_to_percent(dec!(0.071)), dec!(7.1));
        assert_eq!(monthly_rate(dec!(12)), dec!(0.01));
        assert_eq!(periodic_rate(dec!(7), 4), dec!(0.0175));
    }
}
