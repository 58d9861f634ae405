//! Week-by-week gap comparison for flat daily bookings.
//!
//! When the same day is booked several times a week, week one draws its
//! subsidised hours from the fortnightly pool first and week two gets what
//! is left. If the pool cannot cover both weeks, week two is charged more.
//! This reports the two weeks' gaps without running the per-session engine.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{CcsRates, Session};

use super::ccs::calculate_ccs_session;
use super::rounding::{INTERMEDIATE_PLACES, round_money, round_to};

/// One week's share of the subsidy and the resulting gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekGap {
    /// Hours booked in the week.
    pub required_hours: Decimal,
    /// Hours the pool covers in the week.
    pub covered_hours: Decimal,
    /// Covered hours as a share of booked hours.
    pub coverage_ratio: Decimal,
    /// Subsidy per day, scaled by the coverage ratio.
    pub daily_ccs_entitlement: Decimal,
    /// Gap per day.
    pub daily_gap_fee: Decimal,
    /// Gap for the week.
    pub weekly_gap_fee: Decimal,
}

/// Gaps for the two weeks of a fortnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyGapComparison {
    /// The first week, which draws on the pool first.
    pub week_one: WeekGap,
    /// The second week.
    pub week_two: WeekGap,
}

/// Compares the gaps of the two weeks of a fortnight.
///
/// `daily_top_up` is a flat per-day amount, such as NSW fee relief or the
/// VIC offset, taken off each day's gap.
///
/// Returns `None` when nothing is booked or the pool covers both weeks
/// equally. An empty pool covers neither week, so it is `None` too.
///
/// # Examples
///
/// ```
/// use childcare_fee_estimator::calculation::compare_weekly_gaps;
/// use childcare_fee_estimator::models::CcsRates;
/// use rust_decimal::Decimal;
///
/// let rates = CcsRates {
///     ccs_percent: Decimal::new(85, 0),
///     withholding_percent: Decimal::new(5, 0),
///     hourly_rate_cap: Decimal::new(1463, 2),
/// };
///
/// // Four 12-hour days a week need 96 hours; only 72 are available
/// let gaps = compare_weekly_gaps(
///     Decimal::new(120, 0),
///     Decimal::new(12, 0),
///     4,
///     &rates,
///     Decimal::new(72, 0),
///     None,
/// )
/// .unwrap();
/// assert_eq!(gaps.week_one.weekly_gap_fee, Decimal::new(9240, 2));
/// assert_eq!(gaps.week_two.weekly_gap_fee, Decimal::new(28620, 2));
/// ```
pub fn compare_weekly_gaps(
    session_fee: Decimal,
    session_hours: Decimal,
    days_per_week: u32,
    rates: &CcsRates,
    fortnightly_ccs_hours: Decimal,
    daily_top_up: Option<Decimal>,
) -> Option<WeeklyGapComparison> {
    let days = Decimal::from(days_per_week);
    let required_hours = session_hours * days;
    if required_hours <= Decimal::ZERO {
        return None;
    }

    let pool = fortnightly_ccs_hours.max(Decimal::ZERO);
    let week_one_covered = required_hours.min(pool);
    let week_two_covered = required_hours.min(pool - week_one_covered);
    if week_two_covered >= week_one_covered {
        return None;
    }

    let full_day = calculate_ccs_session(
        &Session::new(session_fee, Decimal::ZERO, session_hours),
        rates,
        None,
    );
    let daily_top_up = daily_top_up.unwrap_or(Decimal::ZERO).max(Decimal::ZERO);

    let week = |covered_hours: Decimal| -> WeekGap {
        let coverage_ratio = covered_hours / required_hours;
        let daily_ccs_entitlement =
            round_to(full_day.ccs_entitlement * coverage_ratio, INTERMEDIATE_PLACES);
        let daily_gap_fee =
            round_money((session_fee - daily_ccs_entitlement - daily_top_up).max(Decimal::ZERO));

        WeekGap {
            required_hours,
            covered_hours,
            coverage_ratio,
            daily_ccs_entitlement,
            daily_gap_fee,
            weekly_gap_fee: round_money(daily_gap_fee * days),
        }
    };

    Some(WeeklyGapComparison {
        week_one: week(week_one_covered),
        week_two: week(week_two_covered),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn rates() -> CcsRates {
        CcsRates {
            ccs_percent: dec("85"),
            withholding_percent: dec("5"),
            hourly_rate_cap: dec("14.63"),
        }
    }

    #[test]
    fn test_week_two_short_of_hours() {
        let gaps = compare_weekly_gaps(dec("120"), dec("12"), 4, &rates(), dec("72"), None).unwrap();

        assert_eq!(gaps.week_one.coverage_ratio, Decimal::ONE);
        assert_eq!(gaps.week_one.daily_ccs_entitlement, dec("96.90"));
        assert_eq!(gaps.week_one.daily_gap_fee, dec("23.10"));
        assert_eq!(gaps.week_one.weekly_gap_fee, dec("92.40"));

        assert_eq!(gaps.week_two.covered_hours, dec("24"));
        assert_eq!(gaps.week_two.coverage_ratio, dec("0.5"));
        assert_eq!(gaps.week_two.daily_ccs_entitlement, dec("48.45"));
        assert_eq!(gaps.week_two.daily_gap_fee, dec("71.55"));
        assert_eq!(gaps.week_two.weekly_gap_fee, dec("286.20"));
    }

    #[test]
    fn test_pool_covers_both_weeks() {
        assert!(compare_weekly_gaps(dec("120"), dec("12"), 4, &rates(), dec("100"), None).is_none());
    }

    #[test]
    fn test_nothing_booked() {
        assert!(compare_weekly_gaps(dec("120"), dec("12"), 0, &rates(), dec("72"), None).is_none());
        assert!(compare_weekly_gaps(dec("120"), Decimal::ZERO, 4, &rates(), dec("72"), None).is_none());
    }

    #[test]
    fn test_daily_top_up_reduces_both_weeks() {
        let gaps =
            compare_weekly_gaps(dec("120"), dec("12"), 4, &rates(), dec("72"), Some(dec("13.08")))
                .unwrap();

        assert_eq!(gaps.week_one.daily_gap_fee, dec("10.02"));
        assert_eq!(gaps.week_two.daily_gap_fee, dec("58.47"));
    }

    #[test]
    fn test_top_up_never_makes_gap_negative() {
        let gaps =
            compare_weekly_gaps(dec("120"), dec("12"), 4, &rates(), dec("72"), Some(dec("500")))
                .unwrap();

        assert_eq!(gaps.week_one.weekly_gap_fee, Decimal::ZERO);
        assert_eq!(gaps.week_two.weekly_gap_fee, Decimal::ZERO);
    }

    #[test]
    fn test_empty_pool_has_no_difference_between_weeks() {
        assert!(compare_weekly_gaps(dec("120"), dec("12"), 2, &rates(), Decimal::ZERO, None).is_none());
        assert!(compare_weekly_gaps(dec("120"), dec("12"), 2, &rates(), dec("-5"), None).is_none());
    }

    #[test]
    fn test_pool_exhausted_in_week_one() {
        // 20 hours cover most of week one and none of week two
        let gaps = compare_weekly_gaps(dec("120"), dec("12"), 2, &rates(), dec("20"), None).unwrap();
        assert_eq!(gaps.week_one.covered_hours, dec("20"));
        assert_eq!(gaps.week_two.covered_hours, Decimal::ZERO);
        assert_eq!(gaps.week_two.weekly_gap_fee, dec("240"));
    }
}
