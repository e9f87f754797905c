use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

use crate::types::Money;

const CRORE: Decimal = dec!(10_000_000);
const LAKH: Decimal = dec!(100_000);
const THOUSAND: Decimal = dec!(1_000);

/// Group an unsigned integer string the Indian way: the last three digits,
/// then pairs (12,34,56,789).
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();
    format!("{},{}", groups.join(","), tail)
}

/// Format as rupees with Indian digit grouping, e.g. `₹1,41,477.82`.
pub fn format_inr(amount: Money, dp: u32) -> String {
    let rounded = amount.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let text = format!("{:.*}", dp as usize, rounded.abs());
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (text.as_str(), None),
    };

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push('₹');
    out.push_str(&group_indian(int_part));
    if let Some(f) = frac_part {
        out.push('.');
        out.push_str(f);
    }
    out
}

/// Dashboard-style abbreviation: `₹4.61 Cr`, `₹11.62 L`, `₹25.00 K`.
/// Amounts under a thousand are shown in full without decimals.
pub fn format_compact_inr(amount: Money) -> String {
    let magnitude = amount.abs();
    let sign = if amount.is_sign_negative() && !amount.is_zero() { "-" } else { "" };
    let (scaled, suffix) = if magnitude >= CRORE {
        (magnitude / CRORE, "Cr")
    } else if magnitude >= LAKH {
        (magnitude / LAKH, "L")
    } else if magnitude >= THOUSAND {
        (magnitude / THOUSAND, "K")
    } else {
        return format_inr(amount, 0);
    };
    let scaled = scaled.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{sign}₹{scaled:.2} {suffix}")
}

/// `7.1` -> `"7.10%"` with `dp = 2`.
pub fn format_percent(value: Decimal, dp: u32) -> String {
    let rounded = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.*}%", dp as usize, rounded)
}
