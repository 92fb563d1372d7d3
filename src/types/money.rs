//! Cent-level helpers for decimal amounts

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Balances within one cent of zero are treated as settled
pub const SETTLEMENT_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Largest amount a single expense or custom share may carry
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(3_567_587_328, 232, 0, false, 0);

/// Round half away from zero to two decimal places
pub fn round_to_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Whole number of cents, rounding half away from zero
///
/// Returns `None` if the amount does not fit in an `i64` of cents.
pub fn to_cents(amount: Decimal) -> Option<i64> {
    round_to_cents(amount)
        .checked_mul(Decimal::ONE_HUNDRED)?
        .to_i64()
}

pub fn from_cents(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

/// Round amounts to whole cents while keeping their rounded total
///
/// Each amount moves to its floor or its ceiling cent, so every result is
/// within one cent of its input. The cents left over after flooring go to the
/// largest remainders, ties to later amounts. If the total does not fit in a
/// `Decimal` the floors are returned unchanged.
pub fn apportion_cents(amounts: &[Decimal]) -> Vec<Decimal> {
    let mut cents: Vec<Decimal> = amounts
        .iter()
        .map(|a| a.round_dp_with_strategy(2, RoundingStrategy::ToNegativeInfinity))
        .collect();

    let total = amounts
        .iter()
        .try_fold(Decimal::ZERO, |acc, a| acc.checked_add(*a));
    let floored = cents
        .iter()
        .try_fold(Decimal::ZERO, |acc, c| acc.checked_add(*c));
    let extra = match (total, floored) {
        (Some(total), Some(floored)) => (round_to_cents(total) - floored)
            .checked_mul(Decimal::ONE_HUNDRED)
            .and_then(|n| n.to_usize())
            .unwrap_or(0),
        _ => 0,
    };

    let mut order: Vec<usize> = (0..amounts.len()).collect();
    order.sort_by(|&a, &b| {
        let remainder = |i: usize| amounts[i] - cents[i];
        remainder(b).cmp(&remainder(a)).then(b.cmp(&a))
    });
    for &i in order.iter().take(extra.min(amounts.len())) {
        cents[i] += SETTLEMENT_TOLERANCE;
    }
    cents
}

/// Two-decimal display form; never renders a negative zero
pub fn format_amount(amount: Decimal) -> String {
    let rounded = round_to_cents(amount);
    if rounded.is_zero() {
        return "0.00".to_string();
    }
    format!("{:.2}", rounded)
}

/// Whether the amount is within the settlement tolerance of zero
pub fn is_settled(amount: Decimal) -> bool {
    amount.abs() <= SETTLEMENT_TOLERANCE
}
