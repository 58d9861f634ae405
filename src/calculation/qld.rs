//! QLD kindy funding in long day care.
//!
//! Queensland funds up to 15 kindy hours a week. The funding covers the gap
//! between the hourly fee and the hourly subsidy for kindy hours the subsidy
//! also covers, and the full hourly fee for kindy hours it does not.
//!
//! The subsidy figure used here is not the family's own entitlement. It is
//! recomputed with a fixed 5% withholding so that results line up with the
//! worked examples the Queensland government publishes. The family's chosen
//! withholding still drives the subsidy result itself.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::RateTables;
use crate::error::EngineResult;
use crate::models::{CcsRates, FortnightlySchedule, Session};

use super::ccs::{CcsSessionResult, calculate_ccs_session};
use super::fortnight::{FortnightlyEstimate, calculate_fortnight};
use super::rounding::{INTERMEDIATE_PLACES, fraction, round_to};
use super::top_up::{
    FundingRule, SessionFunding, TopUpResult, fund_session, program_hour_funding,
    split_program_hours,
};

/// The QLD kindy funding rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QldKindy {
    /// Funded kindy hours available each week.
    pub weekly_kindy_hours: Decimal,
    /// Withholding used to recompute the subsidy figure.
    pub normalised_withholding_percent: Decimal,
}

impl QldKindy {
    /// Builds the rule from the rate tables.
    pub fn from_tables(tables: &RateTables) -> Self {
        let qld = &tables.programs().qld;
        Self {
            weekly_kindy_hours: qld.weekly_kindy_hours,
            normalised_withholding_percent: qld.normalised_withholding_percent,
        }
    }

    /// The gross subsidy less withholding at the normalised rate, kept at
    /// four places.
    pub fn normalised_entitlement(&self, ccs: &CcsSessionResult) -> Decimal {
        let withholding = round_to(
            ccs.ccs_amount * fraction(self.normalised_withholding_percent),
            INTERMEDIATE_PLACES,
        );
        round_to(ccs.ccs_amount - withholding, INTERMEDIATE_PLACES)
    }
}

impl FundingRule for QldKindy {
    fn subsidy_baseline(&self, ccs: &CcsSessionResult) -> Decimal {
        self.normalised_entitlement(ccs)
    }

    fn weekly_program_hours(&self) -> Option<Decimal> {
        Some(self.weekly_kindy_hours)
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
            self.normalised_entitlement(funding.ccs),
            funding.ccs.applicable_ccs_hours,
        )
    }
}

/// A single-day QLD kindy estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QldDailyResult {
    /// The session subsidy at the family's own withholding.
    pub ccs: CcsSessionResult,
    /// The subsidy recomputed at the normalised withholding.
    pub normalised_entitlement: Decimal,
    /// Kindy hours funded in the session.
    pub program_hours: Decimal,
    /// The top-up and resulting gap.
    pub top_up: TopUpResult,
}

/// Estimates one day of QLD kindy.
///
/// Kindy hours are limited to the session's length and to the weekly kindy
/// hours.
///
/// # Arguments
/// * `session` - The booked session
/// * `rates` - Subsidy percentage, withholding and hourly cap
/// * `kindy_hours_per_day` - Kindy hours delivered in the session
/// * `tables` - Rate tables supplying the weekly hours and normalised withholding
///
/// # Returns
/// The session subsidy, the normalised entitlement, funded kindy hours and
/// the gap after kindy funding
pub fn calculate_qld_daily(
    session: &Session,
    rates: &CcsRates,
    kindy_hours_per_day: Decimal,
    tables: &RateTables,
) -> QldDailyResult {
    let rule = QldKindy::from_tables(tables);
    let ccs = calculate_ccs_session(session, rates, None);
    let program_hours = kindy_hours_per_day
        .max(Decimal::ZERO)
        .min(ccs.session_hours)
        .min(rule.weekly_kindy_hours);

    let top_up = fund_session(
        &rule,
        &SessionFunding {
            session,
            ccs: &ccs,
            program_hours,
            booked_days: 1,
        },
    );

    QldDailyResult {
        ccs,
        normalised_entitlement: rule.normalised_entitlement(&ccs),
        program_hours,
        top_up,
    }
}

/// A fortnight of QLD kindy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QldFortnightlyResult {
    /// Kindy hours available each week.
    pub weekly_kindy_hours: Decimal,
    /// Withholding used to recompute the subsidy figure.
    pub normalised_withholding_percent: Decimal,
    /// Per-session estimates and totals.
    pub estimate: FortnightlyEstimate,
}

/// Estimates a fortnight of QLD kindy.
///
/// # Arguments
/// * `schedule` - Ten weekday sessions, week one then week two
/// * `rates` - Subsidy percentage, withholding and hourly cap
/// * `fortnightly_ccs_hours` - Subsidised hours available for the fortnight
/// * `tables` - Rate tables supplying the weekly hours and normalised withholding
///
/// # Returns
/// The kindy parameters used and the per-session estimates, or
/// `NotApplicable::NoBookedDays` for an empty fortnight
pub fn calculate_qld_fortnightly(
    schedule: &FortnightlySchedule,
    rates: &CcsRates,
    fortnightly_ccs_hours: Decimal,
    tables: &RateTables,
) -> EngineResult<QldFortnightlyResult> {
    let rule = QldKindy::from_tables(tables);
    let estimate = calculate_fortnight(schedule, rates, fortnightly_ccs_hours, &rule)?;

    Ok(QldFortnightlyResult {
        weekly_kindy_hours: rule.weekly_kindy_hours,
        normalised_withholding_percent: rule.normalised_withholding_percent,
        estimate,
    })
}
