//! Decimal rounding helpers.
//!
//! All money is rounded half away from zero. Intermediates that feed further
//! arithmetic are kept at four places; displayed amounts at two.

use rust_decimal::{Decimal, RoundingStrategy};

/// Places kept for intermediate subsidy amounts.
pub const INTERMEDIATE_PLACES: u32 = 4;

/// Places kept for displayed money.
pub const MONEY_PLACES: u32 = 2;

/// Rounds `value` to `decimals` places, halves away from zero.
///
/// # Examples
///
/// ```
/// use childcare_fee_estimator::calculation::round_to;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// assert_eq!(round_to(Decimal::from_str("12.4355").unwrap(), 2), Decimal::from_str("12.44").unwrap());
/// assert_eq!(round_to(Decimal::from_str("-2.5").unwrap(), 0), Decimal::from_str("-3").unwrap());
/// ```
pub fn round_to(value: Decimal, decimals: u32) -> Decimal {
    value.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds to whole cents.
pub fn round_money(value: Decimal) -> Decimal {
    round_to(value, MONEY_PLACES)
}

/// Converts a 0-100 percentage into a fraction.
pub(crate) fn fraction(percent: Decimal) -> Decimal {
    percent / Decimal::ONE_HUNDRED
}
