//! Child Care Subsidy session engine.
//!
//! This module computes the subsidy for a single session of care: the hourly
//! fee, the capped hourly subsidy rate, the gross subsidy, the amount the
//! government withholds, and the net entitlement paid to the provider.
//!
//! ## Calculation
//!
//! 1. Hours = end - start; hourly fee = fee / hours
//! 2. Hourly subsidy = min(hourly fee, rate cap) x CCS% (rounded to cents)
//! 3. Subsidised hours = session hours, limited by any remaining fortnightly pool
//! 4. Gross subsidy = min(hours x hourly subsidy, fee), kept at four places
//! 5. Withholding = gross x withholding%; entitlement = gross - withholding

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineResult, NotApplicable};
use crate::models::{CcsRates, FortnightlySchedule, Session};

use super::fortnight::{FortnightlyEstimate, calculate_fortnight};
use super::rounding::{INTERMEDIATE_PLACES, fraction, round_money, round_to};
use super::top_up::{FundingRule, SessionFunding};

/// The subsidy worked out for one session.
///
/// Money fields that feed later steps (`ccs_amount`, `ccs_withholding`,
/// `ccs_entitlement`) are kept at four decimal places.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CcsSessionResult {
    /// Length of the session in hours.
    pub session_hours: Decimal,
    /// The fee divided by the session hours.
    pub hourly_session_fee: Decimal,
    /// Subsidy paid per subsidised hour.
    pub applicable_ccs_hourly_rate: Decimal,
    /// Hours of the session the subsidy covers.
    pub applicable_ccs_hours: Decimal,
    /// Gross subsidy before withholding.
    pub ccs_amount: Decimal,
    /// Portion of the gross subsidy withheld.
    pub ccs_withholding: Decimal,
    /// Subsidy actually paid.
    pub ccs_entitlement: Decimal,
}

impl CcsSessionResult {
    /// True when the subsidy covers every hour of the session.
    pub fn covers_full_session(&self) -> bool {
        self.applicable_ccs_hours >= self.session_hours
    }
}

/// Calculates the subsidy for one session.
///
/// `ccs_hours_available` limits the subsidised hours to what is left of the
/// fortnightly pool; `None` subsidises the whole session. The function is
/// total: a session with no positive length yields a zero-hour result, and an
/// hourly fee too large to represent saturates (it is far above any cap).
///
/// # Arguments
/// * `session` - The booked session
/// * `rates` - Subsidy percentage, withholding and hourly cap
/// * `ccs_hours_available` - Subsidised hours left in the pool, if limited
///
/// # Returns
/// Session hours, hourly fee and rate, subsidised hours and the gross,
/// withheld and paid subsidy
///
/// # Examples
///
/// ```
/// use childcare_fee_estimator::calculation::calculate_ccs_session;
/// use childcare_fee_estimator::models::{CcsRates, Session};
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let dec = |s: &str| Decimal::from_str(s).unwrap();
///
/// // $154 for 10 hours is above the $14.63 cap
/// let session = Session::new(dec("154"), dec("8"), dec("18"));
/// let rates = CcsRates {
///     ccs_percent: dec("85"),
///     withholding_percent: dec("5"),
///     hourly_rate_cap: dec("14.63"),
/// };
///
/// let result = calculate_ccs_session(&session, &rates, None);
/// assert_eq!(result.applicable_ccs_hourly_rate, dec("12.44"));
/// assert_eq!(result.ccs_amount, dec("124.40"));
/// assert_eq!(result.ccs_withholding, dec("6.22"));
/// assert_eq!(result.ccs_entitlement, dec("118.18"));
/// ```
pub fn calculate_ccs_session(
    session: &Session,
    rates: &CcsRates,
    ccs_hours_available: Option<Decimal>,
) -> CcsSessionResult {
    let session_hours = session.hours();
    let hourly_session_fee = if session_hours > Decimal::ZERO {
        session.fee.checked_div(session_hours).unwrap_or(Decimal::MAX)
    } else {
        Decimal::ZERO
    };

    // Subsidy is worked out on the lower of the actual rate and the cap
    let applicable_ccs_hourly_rate = round_money(
        hourly_session_fee.min(rates.hourly_rate_cap) * fraction(rates.ccs_percent),
    );

    let applicable_ccs_hours = match ccs_hours_available {
        Some(available) => session_hours.min(available.max(Decimal::ZERO)),
        None => session_hours,
    };

    let ccs_amount = round_to(
        (applicable_ccs_hours * applicable_ccs_hourly_rate).min(session.fee),
        INTERMEDIATE_PLACES,
    );
    let ccs_withholding = round_to(
        ccs_amount * fraction(rates.withholding_percent),
        INTERMEDIATE_PLACES,
    );
    let ccs_entitlement = round_to(ccs_amount - ccs_withholding, INTERMEDIATE_PLACES);

    CcsSessionResult {
        session_hours,
        hourly_session_fee,
        applicable_ccs_hourly_rate,
        applicable_ccs_hours,
        ccs_amount,
        ccs_withholding,
        ccs_entitlement,
    }
}

/// A single-day subsidy estimate with the resulting gap fee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CcsDailyEstimate {
    /// The session subsidy.
    pub ccs: CcsSessionResult,
    /// The fee left for the family to pay.
    pub gap_fee: Decimal,
}

/// Estimates the subsidy and gap fee for a single booked day.
///
/// Returns [`NotApplicable::NoSessionHours`] when the session has no positive
/// length and [`NotApplicable::NoFee`] when the fee is not positive.
///
/// # Examples
///
/// ```
/// use childcare_fee_estimator::calculation::estimate_ccs_daily;
/// use childcare_fee_estimator::models::{CcsRates, Session};
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let dec = |s: &str| Decimal::from_str(s).unwrap();
/// let rates = CcsRates {
///     ccs_percent: dec("50"),
///     withholding_percent: dec("5"),
///     hourly_rate_cap: dec("14.63"),
/// };
///
/// let estimate = estimate_ccs_daily(&Session::new(dec("100"), dec("8"), dec("18")), &rates).unwrap();
/// assert_eq!(estimate.ccs.ccs_entitlement, dec("47.50"));
/// assert_eq!(estimate.gap_fee, dec("52.50"));
/// ```
pub fn estimate_ccs_daily(session: &Session, rates: &CcsRates) -> EngineResult<CcsDailyEstimate> {
    if session.end_hour <= session.start_hour {
        return Err(NotApplicable::NoSessionHours.into());
    }
    if session.fee <= Decimal::ZERO {
        return Err(NotApplicable::NoFee.into());
    }

    let ccs = calculate_ccs_session(session, rates, None);
    let gap_fee = round_money(session.fee - ccs.ccs_entitlement);

    Ok(CcsDailyEstimate { ccs, gap_fee })
}

/// Subsidy alone, with no state top-up.
#[derive(Debug, Clone, Copy, Default)]
pub struct CcsOnly;

impl FundingRule for CcsOnly {
    fn subsidy_baseline(&self, ccs: &CcsSessionResult) -> Decimal {
        ccs.ccs_entitlement
    }

    fn raw_top_up(&self, _funding: &SessionFunding<'_>) -> Decimal {
        Decimal::ZERO
    }
}

/// Estimates a fortnight of subsidy with a shared pool of subsidised hours.
///
/// Sessions draw on the pool in schedule order; once it runs out, later
/// sessions receive no subsidy.
///
/// # Arguments
/// * `schedule` - Ten weekday sessions, week one then week two
/// * `rates` - Subsidy percentage, withholding and hourly cap
/// * `fortnightly_ccs_hours` - Subsidised hours available for the fortnight
///
/// # Returns
/// Per-session estimates and fortnight totals, or
/// [`NotApplicable::NoBookedDays`] when nothing in the schedule is booked
pub fn calculate_ccs_fortnightly(
    schedule: &FortnightlySchedule,
    rates: &CcsRates,
    fortnightly_ccs_hours: Decimal,
) -> EngineResult<FortnightlyEstimate> {
    calculate_fortnight(schedule, rates, fortnightly_ccs_hours, &CcsOnly)
}
