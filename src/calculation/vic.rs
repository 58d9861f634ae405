//! VIC kindergarten offset in long day care.
//!
//! The annual offset for the child's cohort is scaled by enrolled kinder
//! hours against a 15-hour week, spread over 40 program weeks, then shared
//! across the days booked that week. The offset never exceeds the gap.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::RateTables;
use crate::error::EngineResult;
use crate::models::{CcsRates, FortnightlySchedule, Session, VicCohort, Week};

use super::ccs::{CcsSessionResult, calculate_ccs_session};
use super::fortnight::{FortnightlyEstimate, calculate_fortnight};
use super::rounding::round_money;
use super::top_up::{SessionFunding, TopUpResult, WeeklyRelief, fund_session, per_booked_day};

/// How a child is enrolled for the VIC kindergarten offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VicEnrolment {
    /// The child's cohort.
    #[serde(default)]
    pub cohort: VicCohort,
    /// Funded kinder hours enrolled each week.
    pub kinder_hours_per_week: Decimal,
}

impl VicEnrolment {
    /// The weekly offset, to the cent.
    ///
    /// Enrolled hours above the baseline week earn no more than the baseline.
    pub fn weekly_offset(&self, tables: &RateTables) -> Decimal {
        let vic = &tables.programs().vic;
        if vic.baseline_weekly_hours <= Decimal::ZERO || vic.program_weeks <= Decimal::ZERO {
            return Decimal::ZERO;
        }

        let enrolled = self
            .kinder_hours_per_week
            .max(Decimal::ZERO)
            .min(vic.baseline_weekly_hours);
        let annual = tables.vic_annual_offset(self.cohort) * enrolled / vic.baseline_weekly_hours;

        round_money(annual / vic.program_weeks)
    }
}

/// A single-day VIC kindergarten estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VicDailyResult {
    /// The session subsidy.
    pub ccs: CcsSessionResult,
    /// Offset available each week.
    pub weekly_offset: Decimal,
    /// Offset available for this day.
    pub daily_offset: Decimal,
    /// The top-up and resulting gap.
    pub top_up: TopUpResult,
}

/// Estimates one day of the VIC offset for a child booked `days_per_week`.
///
/// # Arguments
/// * `session` - The booked session
/// * `rates` - Subsidy percentage, withholding and hourly cap
/// * `enrolment` - VIC cohort and weekly kinder hours
/// * `days_per_week` - Booked days sharing the weekly offset
/// * `tables` - Rate tables supplying the annual amounts
///
/// # Returns
/// The session subsidy, weekly and daily offset, and the gap after it
///
/// # Examples
///
/// ```
/// use childcare_fee_estimator::calculation::{VicEnrolment, calculate_vic_daily};
/// use childcare_fee_estimator::config::RateTables;
/// use childcare_fee_estimator::models::{CcsRates, Session, VicCohort};
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let dec = |s: &str| Decimal::from_str(s).unwrap();
/// let rates = CcsRates {
///     ccs_percent: dec("50"),
///     withholding_percent: dec("5"),
///     hourly_rate_cap: dec("14.63"),
/// };
/// let enrolment = VicEnrolment {
///     cohort: VicCohort::Standard,
///     kinder_hours_per_week: dec("15"),
/// };
///
/// let result = calculate_vic_daily(
///     &Session::new(dec("140"), dec("8"), dec("18")),
///     &rates,
///     &enrolment,
///     3,
///     &RateTables::fy2025_26(),
/// );
/// assert_eq!(result.weekly_offset, dec("52.53"));
/// assert_eq!(result.daily_offset, dec("17.51"));
/// ```
pub fn calculate_vic_daily(
    session: &Session,
    rates: &CcsRates,
    enrolment: &VicEnrolment,
    days_per_week: u32,
    tables: &RateTables,
) -> VicDailyResult {
    let ccs = calculate_ccs_session(session, rates, None);
    let weekly_offset = enrolment.weekly_offset(tables);
    let rule = WeeklyRelief {
        weekly_amount: weekly_offset,
    };

    let top_up = fund_session(
        &rule,
        &SessionFunding {
            session,
            ccs: &ccs,
            program_hours: Decimal::ZERO,
            booked_days: days_per_week,
        },
    );

    VicDailyResult {
        ccs,
        weekly_offset,
        daily_offset: per_booked_day(weekly_offset, days_per_week),
        top_up,
    }
}

/// A fortnight of the VIC offset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VicFortnightlyResult {
    /// Offset available each week.
    pub weekly_offset: Decimal,
    /// Offset per booked day in week one.
    pub week_one_daily_offset: Decimal,
    /// Offset per booked day in week two.
    pub week_two_daily_offset: Decimal,
    /// Per-session estimates and totals.
    pub estimate: FortnightlyEstimate,
}

/// Estimates a fortnight of the VIC offset.
///
/// # Arguments
/// * `schedule` - Ten weekday sessions, week one then week two
/// * `rates` - Subsidy percentage, withholding and hourly cap
/// * `fortnightly_ccs_hours` - Subsidised hours available for the fortnight
/// * `enrolment` - VIC cohort and weekly kinder hours
/// * `tables` - Rate tables supplying the annual amounts
///
/// # Returns
/// The weekly and per-day offset and the per-session estimates, or
/// `NotApplicable::NoBookedDays` for an empty fortnight
pub fn calculate_vic_fortnightly(
    schedule: &FortnightlySchedule,
    rates: &CcsRates,
    fortnightly_ccs_hours: Decimal,
    enrolment: &VicEnrolment,
    tables: &RateTables,
) -> EngineResult<VicFortnightlyResult> {
    let weekly_offset = enrolment.weekly_offset(tables);
    let rule = WeeklyRelief {
        weekly_amount: weekly_offset,
    };
    let estimate = calculate_fortnight(schedule, rates, fortnightly_ccs_hours, &rule)?;

    Ok(VicFortnightlyResult {
        weekly_offset,
        week_one_daily_offset: per_booked_day(weekly_offset, schedule.booked_days(Week::One)),
        week_two_daily_offset: per_booked_day(weekly_offset, schedule.booked_days(Week::Two)),
        estimate,
    })
}
