//! NSW fee relief for preschool-age children in long day care.
//!
//! An annual amount set by age group and service tier is divided by the
//! weeks the service operates, then shared evenly across the days booked
//! that week. Relief never exceeds the gap left after the subsidy.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::RateTables;
use crate::error::EngineResult;
use crate::models::{CcsRates, FortnightlySchedule, NswAgeGroup, NswTier, Session, Week};

use super::ccs::{CcsSessionResult, calculate_ccs_session};
use super::fortnight::{FortnightlyEstimate, calculate_fortnight};
use super::rounding::round_money;
use super::top_up::{SessionFunding, TopUpResult, WeeklyRelief, fund_session, per_booked_day};

/// How a child is enrolled for NSW fee relief.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NswEnrolment {
    /// The child's age group.
    pub age_group: NswAgeGroup,
    /// The service's fee relief tier.
    pub tier: NswTier,
    /// Weeks a year the service operates.
    pub service_weeks: Decimal,
}

impl NswEnrolment {
    /// The weekly fee relief, to the cent. Zero when the service has no
    /// operating weeks.
    ///
    /// # Examples
    ///
    /// ```
    /// use childcare_fee_estimator::calculation::NswEnrolment;
    /// use childcare_fee_estimator::config::RateTables;
    /// use childcare_fee_estimator::models::{NswAgeGroup, NswTier};
    /// use rust_decimal::Decimal;
    ///
    /// let enrolment = NswEnrolment {
    ///     age_group: NswAgeGroup::FourAndAbove,
    ///     tier: NswTier::Maximum,
    ///     service_weeks: Decimal::new(49, 0),
    /// };
    /// assert_eq!(enrolment.weekly_fee_relief(&RateTables::fy2025_26()), Decimal::new(5231, 2));
    /// ```
    pub fn weekly_fee_relief(&self, tables: &RateTables) -> Decimal {
        if self.service_weeks <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        let annual = tables.nsw_annual_fee_relief(self.age_group, self.tier);
        round_money(annual / self.service_weeks)
    }
}

/// A single-day NSW fee relief estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NswDailyResult {
    /// The session subsidy.
    pub ccs: CcsSessionResult,
    /// Fee relief available each week.
    pub weekly_fee_relief: Decimal,
    /// Fee relief available for this day.
    pub daily_fee_relief: Decimal,
    /// The top-up and resulting gap.
    pub top_up: TopUpResult,
}

/// Estimates one day of NSW fee relief for a child booked `days_per_week`.
///
/// # Arguments
/// * `session` - The booked session
/// * `rates` - Subsidy percentage, withholding and hourly cap
/// * `enrolment` - NSW age group, tier and service weeks
/// * `days_per_week` - Booked days sharing the weekly fee relief
/// * `tables` - Rate tables supplying the annual amounts
///
/// # Returns
/// The session subsidy, weekly and daily fee relief, and the gap after it
pub fn calculate_nsw_daily(
    session: &Session,
    rates: &CcsRates,
    enrolment: &NswEnrolment,
    days_per_week: u32,
    tables: &RateTables,
) -> NswDailyResult {
    let ccs = calculate_ccs_session(session, rates, None);
    let weekly_fee_relief = enrolment.weekly_fee_relief(tables);
    let rule = WeeklyRelief {
        weekly_amount: weekly_fee_relief,
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

    NswDailyResult {
        ccs,
        weekly_fee_relief,
        daily_fee_relief: per_booked_day(weekly_fee_relief, days_per_week),
        top_up,
    }
}

/// A fortnight of NSW fee relief.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NswFortnightlyResult {
    /// Fee relief available each week.
    pub weekly_fee_relief: Decimal,
    /// Relief per booked day in week one.
    pub week_one_daily_fee_relief: Decimal,
    /// Relief per booked day in week two.
    pub week_two_daily_fee_relief: Decimal,
    /// Per-session estimates and totals.
    pub estimate: FortnightlyEstimate,
}

/// Estimates a fortnight of NSW fee relief.
///
/// Each week's relief is shared across that week's booked days, so a week
/// with fewer bookings gets more relief per day.
///
/// # Arguments
/// * `schedule` - Ten weekday sessions, week one then week two
/// * `rates` - Subsidy percentage, withholding and hourly cap
/// * `fortnightly_ccs_hours` - Subsidised hours available for the fortnight
/// * `enrolment` - NSW age group, tier and service weeks
/// * `tables` - Rate tables supplying the annual amounts
///
/// # Returns
/// The weekly and per-day fee relief and the per-session estimates, or
/// `NotApplicable::NoBookedDays` for an empty fortnight
pub fn calculate_nsw_fortnightly(
    schedule: &FortnightlySchedule,
    rates: &CcsRates,
    fortnightly_ccs_hours: Decimal,
    enrolment: &NswEnrolment,
    tables: &RateTables,
) -> EngineResult<NswFortnightlyResult> {
    let weekly_fee_relief = enrolment.weekly_fee_relief(tables);
    let rule = WeeklyRelief {
        weekly_amount: weekly_fee_relief,
    };
    let estimate = calculate_fortnight(schedule, rates, fortnightly_ccs_hours, &rule)?;

    Ok(NswFortnightlyResult {
        weekly_fee_relief,
        week_one_daily_fee_relief: per_booked_day(weekly_fee_relief, schedule.booked_days(Week::One)),
        week_two_daily_fee_relief: per_booked_day(weekly_fee_relief, schedule.booked_days(Week::Two)),
        estimate,
    })
}
