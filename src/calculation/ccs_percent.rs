//! Income-based subsidy percentage.
//!
//! Two taper tables map a family's adjusted taxable income to a subsidy
//! percentage:
//!
//! - **Standard**: 90% up to $85,279, then one point less per $5,000 above it,
//!   reaching 0% at $535,279.
//! - **Higher** (second and later children under six): 95% up to $143,273,
//!   one point less per $3,000 down to 80%, flat 80% to $267,563, one point
//!   less per $3,000 down to 50%, flat 50% to $367,563, then nothing.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

const STANDARD_MAX_PERCENT: Decimal = Decimal::from_parts(90, 0, 0, false, 0);
const STANDARD_TAPER_START: Decimal = Decimal::from_parts(85_279, 0, 0, false, 0);
const STANDARD_CUTOFF: Decimal = Decimal::from_parts(535_279, 0, 0, false, 0);
const STANDARD_TAPER_STEP: Decimal = Decimal::from_parts(5_000, 0, 0, false, 0);

const HIGHER_MAX_PERCENT: Decimal = Decimal::from_parts(95, 0, 0, false, 0);
const HIGHER_FIRST_TAPER_START: Decimal = Decimal::from_parts(143_273, 0, 0, false, 0);
const HIGHER_FIRST_FLOOR: Decimal = Decimal::from_parts(80, 0, 0, false, 0);
const HIGHER_SECOND_TAPER_START: Decimal = Decimal::from_parts(267_563, 0, 0, false, 0);
const HIGHER_SECOND_FLOOR: Decimal = Decimal::from_parts(50, 0, 0, false, 0);
const HIGHER_TAPER_STEP: Decimal = Decimal::from_parts(3_000, 0, 0, false, 0);

/// Income at and above which the higher rate no longer applies.
pub const HIGHER_RATE_CUTOFF: Decimal = Decimal::from_parts(367_563, 0, 0, false, 0);

/// The subsidy percentage worked out for a family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CcsPercentEstimate {
    /// The percentage that applies to this child.
    pub applicable_percent: Decimal,
    /// The standard taper result.
    pub standard_percent: Decimal,
    /// The higher taper result.
    pub higher_percent: Decimal,
    /// Whether the higher rate was used.
    pub higher_rate_applied: bool,
    /// The hourly rate cap shown alongside the percentage.
    pub hourly_rate_cap: Decimal,
}

/// Whole percentage points lost over `excess` income at one point per `step`.
fn points_lost(excess: Decimal, step: Decimal) -> Decimal {
    (excess / step).floor()
}

/// The standard subsidy percentage for an income.
///
/// # Examples
///
/// ```
/// use childcare_fee_estimator::calculation::standard_ccs_percent;
/// use rust_decimal::Decimal;
///
/// assert_eq!(standard_ccs_percent(Decimal::new(80_000, 0)), Decimal::new(90, 0));
/// assert_eq!(standard_ccs_percent(Decimal::new(100_000, 0)), Decimal::new(88, 0));
/// assert_eq!(standard_ccs_percent(Decimal::new(600_000, 0)), Decimal::ZERO);
/// ```
pub fn standard_ccs_percent(income: Decimal) -> Decimal {
    if income <= STANDARD_TAPER_START {
        return STANDARD_MAX_PERCENT;
    }
    if income >= STANDARD_CUTOFF {
        return Decimal::ZERO;
    }

    let lost = points_lost(income - STANDARD_TAPER_START, STANDARD_TAPER_STEP);
    (STANDARD_MAX_PERCENT - lost).max(Decimal::ZERO)
}

/// The higher subsidy percentage for an income.
pub fn higher_ccs_percent(income: Decimal) -> Decimal {
    if income <= HIGHER_FIRST_TAPER_START {
        HIGHER_MAX_PERCENT
    } else if income < HIGHER_SECOND_TAPER_START {
        let lost = points_lost(income - HIGHER_FIRST_TAPER_START, HIGHER_TAPER_STEP);
        (HIGHER_MAX_PERCENT - lost).max(HIGHER_FIRST_FLOOR)
    } else if income < HIGHER_RATE_CUTOFF {
        let lost = points_lost(income - HIGHER_SECOND_TAPER_START, HIGHER_TAPER_STEP);
        (HIGHER_FIRST_FLOOR - lost).max(HIGHER_SECOND_FLOOR)
    } else {
        Decimal::ZERO
    }
}

/// Works out the subsidy percentage that applies to a child.
///
/// The higher rate applies only when requested, when more than one child is
/// in care, and when income is below [`HIGHER_RATE_CUTOFF`]. Otherwise the
/// standard rate applies.
pub fn estimate_ccs_percent(
    income: Decimal,
    higher_rate_requested: bool,
    children_in_care: u32,
    hourly_rate_cap: Decimal,
) -> CcsPercentEstimate {
    let standard_percent = standard_ccs_percent(income);
    let higher_percent = higher_ccs_percent(income);

    let higher_rate_applied =
        higher_rate_requested && children_in_care > 1 && income < HIGHER_RATE_CUTOFF;

    CcsPercentEstimate {
        applicable_percent: if higher_rate_applied {
            higher_percent
        } else {
            standard_percent
        },
        standard_percent,
        higher_percent,
        higher_rate_applied,
        hourly_rate_cap,
    }
}
