//! ACT three-year-old preschool funding.
//!
//! The ACT funds 300 preschool hours a year, spread over the service's program
//! weeks. For each program hour the subsidy also covers, it pays the
//! difference between the hourly fee and the hourly subsidy. Program hours the
//! subsidy no longer reaches are funded at the full hourly fee.
//!
//! The gap is measured against the gross subsidy, before withholding.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::RateTables;
use crate::error::EngineResult;
use crate::models::{CcsRates, FortnightlySchedule, Session};

use super::ccs::{CcsSessionResult, calculate_ccs_session};
use super::fortnight::{FortnightlyEstimate, calculate_fortnight};
use super::top_up::{
    FundingRule, SessionFunding, TopUpResult, fund_session, program_hour_funding,
    split_program_hours,
};

/// The ACT preschool funding rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActPreschool {
    /// Funded program hours available each week.
    pub weekly_program_hours: Decimal,
}

impl ActPreschool {
    /// Spreads the annual program hours evenly over the program weeks.
    ///
    /// No weeks means no weekly hours.
    pub fn new(annual_program_hours: Decimal, program_weeks: Decimal) -> Self {
        let weekly_program_hours = if program_weeks > Decimal::ZERO {
            annual_program_hours / program_weeks
        } else {
            Decimal::ZERO
        };
        Self {
            weekly_program_hours,
        }
    }

    /// Builds the rule from the rate tables for a service's program weeks.
    pub fn from_tables(tables: &RateTables, program_weeks: Decimal) -> Self {
        Self::new(tables.programs().act.annual_program_hours, program_weeks)
    }
}

impl FundingRule for ActPreschool {
    fn subsidy_baseline(&self, ccs: &CcsSessionResult) -> Decimal {
        ccs.ccs_amount
    }

    fn weekly_program_hours(&self) -> Option<Decimal> {
        Some(self.weekly_program_hours)
    }

    fn raw_top_up(&self, funding: &SessionFunding<'_>) -> Decimal {
        let split = split_program_hours(
            funding.program_hours,
            funding.session.program_start_offset(),
            funding.ccs,
        );
        program_hour_funding(
            &split,
            funding.session.fee,
            funding.ccs.session_hours,
            funding.ccs.applicable_ccs_hourly_rate,
            Decimal::ONE,
        )
    }
}

/// A single-day ACT preschool estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActDailyResult {
    /// The session subsidy.
    pub ccs: CcsSessionResult,
    /// Program hours funded in the session.
    pub program_hours: Decimal,
    /// Funding paid per program hour.
    pub funding_per_program_hour: Decimal,
    /// The top-up and resulting gap.
    pub top_up: TopUpResult,
}

/// Estimates one day of ACT preschool.
///
/// Program hours are limited to the session's length. The whole session is
/// subsidised, so every program hour is funded at the per-hour gap.
///
/// # Arguments
/// * `session` - The booked session
/// * `rates` - Subsidy percentage, withholding and hourly cap
/// * `program_hours_per_day` - Preschool hours delivered in the session
///
/// # Returns
/// The session subsidy, funded program hours and the gap after preschool funding
///
/// # Examples
///
/// ```
/// use childcare_fee_estimator::calculation::calculate_act_daily;
/// use childcare_fee_estimator::models::{CcsRates, Session};
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let dec = |s: &str| Decimal::from_str(s).unwrap();
/// let rates = CcsRates {
///     ccs_percent: dec("85"),
///     withholding_percent: dec("5"),
///     hourly_rate_cap: dec("14.63"),
/// };
///
/// let result = calculate_act_daily(&Session::new(dec("150"), dec("8"), dec("18")), &rates, dec("6"));
/// assert_eq!(result.top_up.gap_before_top_up, dec("25.60"));
/// assert_eq!(result.top_up.top_up_amount, dec("15.36"));
/// assert_eq!(result.top_up.estimated_gap_fee, dec("10.24"));
/// ```
pub fn calculate_act_daily(
    session: &Session,
    rates: &CcsRates,
    program_hours_per_day: Decimal,
) -> ActDailyResult {
    let ccs = calculate_ccs_session(session, rates, None);
    let program_hours = program_hours_per_day
        .max(Decimal::ZERO)
        .min(ccs.session_hours);
    let funding_per_program_hour =
        (ccs.hourly_session_fee - ccs.applicable_ccs_hourly_rate).max(Decimal::ZERO);

    let top_up = fund_session(
        &ActPreschool::default(),
        &SessionFunding {
            session,
            ccs: &ccs,
            program_hours,
            booked_days: 1,
        },
    );

    ActDailyResult {
        ccs,
        program_hours,
        funding_per_program_hour,
        top_up,
    }
}

/// A fortnight of ACT preschool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActFortnightlyResult {
    /// Program hours available each week.
    pub weekly_program_hours: Decimal,
    /// Per-session estimates and totals.
    pub estimate: FortnightlyEstimate,
}

/// Estimates a fortnight of ACT preschool.
///
/// Program hours come from each session's program window and are drawn from
/// a separate pool for each week.
///
/// # Arguments
/// * `schedule` - Ten weekday sessions, week one then week two
/// * `rates` - Subsidy percentage, withholding and hourly cap
/// * `fortnightly_ccs_hours` - Subsidised hours available for the fortnight
/// * `program_weeks` - Weeks the preschool program runs in the year
/// * `tables` - Rate tables supplying the annual program hours
///
/// # Returns
/// Weekly program hours and the per-session estimates, or
/// `NotApplicable::NoBookedDays` for an empty fortnight
pub fn calculate_act_fortnightly(
    schedule: &FortnightlySchedule,
    rates: &CcsRates,
    fortnightly_ccs_hours: Decimal,
    program_weeks: Decimal,
    tables: &RateTables,
) -> EngineResult<ActFortnightlyResult> {
    let rule = ActPreschool::from_tables(tables, program_weeks);
    let estimate = calculate_fortnight(schedule, rates, fortnightly_ccs_hours, &rule)?;

    Ok(ActFortnightlyResult {
        weekly_program_hours: rule.weekly_program_hours,
        estimate,
    })
}
