//! Fortnightly schedule engine.
//!
//! Runs a [`FundingRule`] over the ten sessions of a fortnight. Two kinds of
//! pool are threaded through the sessions in order:
//!
//! - the fortnightly subsidised-hour pool, shared by all ten sessions
//! - one program-hour pool per week, for programs funded by the hour
//!
//! Both live only for the duration of a single call.

use chrono::Weekday;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineResult, NotApplicable};
use crate::models::{CcsRates, FortnightlySchedule, ScheduledDay, Week};

use super::ccs::{CcsSessionResult, calculate_ccs_session};
use super::hour_pool::HourPool;
use super::rounding::round_money;
use super::top_up::{FundingRule, SessionFunding, TopUpResult, fund_session};

/// The estimate for one slot of the fortnight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionEstimate {
    /// The week of the fortnight.
    pub week: Week,
    /// The weekday label.
    pub weekday: Weekday,
    /// Whether the slot is booked with a positive fee.
    pub booked: bool,
    /// The session fee.
    pub session_fee: Decimal,
    /// The subsidy for the session.
    pub ccs: CcsSessionResult,
    /// Program hours granted from the week's pool.
    pub program_hours: Decimal,
    /// The top-up and resulting gap.
    pub top_up: TopUpResult,
    /// Subsidised hours left in the fortnight after this session.
    pub ccs_hours_remaining: Decimal,
}

impl SessionEstimate {
    fn unbooked(day: &ScheduledDay<'_>, ccs_hours_remaining: Decimal) -> Self {
        Self {
            week: day.week,
            weekday: day.weekday,
            booked: false,
            session_fee: Decimal::ZERO,
            ccs: CcsSessionResult::default(),
            program_hours: Decimal::ZERO,
            top_up: TopUpResult::default(),
            ccs_hours_remaining,
        }
    }

    /// True for a booked session the subsidy pool could not fully cover.
    pub fn is_short_of_ccs_hours(&self) -> bool {
        self.booked && !self.ccs.covers_full_session()
    }
}

/// Totals across the fortnight.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FortnightTotals {
    /// Fees for all booked sessions.
    pub session_fees: Decimal,
    /// Subsidy paid, after withholding.
    pub ccs_entitlement: Decimal,
    /// Program funding paid.
    pub top_up: Decimal,
    /// What the family pays for the fortnight.
    pub gap_fee: Decimal,
    /// What the family pays in week one.
    pub week_one_gap_fee: Decimal,
    /// What the family pays in week two.
    pub week_two_gap_fee: Decimal,
    /// Subsidised hours drawn from the pool.
    pub ccs_hours_used: Decimal,
    /// Program hours drawn from the weekly pools.
    pub program_hours_used: Decimal,
}

/// A fortnight of session estimates with totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FortnightlyEstimate {
    /// One estimate per slot, in schedule order.
    pub sessions: Vec<SessionEstimate>,
    /// Totals across the fortnight.
    pub totals: FortnightTotals,
}

impl FortnightlyEstimate {
    /// The first booked session the subsidy pool could not fully cover.
    pub fn first_session_short_of_ccs_hours(&self) -> Option<&SessionEstimate> {
        self.sessions.iter().find(|s| s.is_short_of_ccs_hours())
    }

    fn totals_for(sessions: &[SessionEstimate], ccs_hours_used: Decimal) -> FortnightTotals {
        let week_gap = |week: Week| -> Decimal {
            sessions
                .iter()
                .filter(|s| s.week == week)
                .map(|s| s.top_up.estimated_gap_fee)
                .sum()
        };
        let week_one_gap_fee = week_gap(Week::One);
        let week_two_gap_fee = week_gap(Week::Two);

        FortnightTotals {
            session_fees: sessions.iter().map(|s| s.session_fee).sum(),
            ccs_entitlement: round_money(sessions.iter().map(|s| s.ccs.ccs_entitlement).sum()),
            top_up: sessions.iter().map(|s| s.top_up.top_up_amount).sum(),
            gap_fee: week_one_gap_fee + week_two_gap_fee,
            week_one_gap_fee,
            week_two_gap_fee,
            ccs_hours_used,
            program_hours_used: sessions.iter().map(|s| s.program_hours).sum(),
        }
    }
}

/// Estimates a fortnight under a funding rule.
///
/// Unbooked sessions contribute nothing and draw on no pool. Returns
/// [`NotApplicable::NoBookedDays`] when nothing is booked.
pub fn calculate_fortnight<R: FundingRule + ?Sized>(
    schedule: &FortnightlySchedule,
    rates: &CcsRates,
    fortnightly_ccs_hours: Decimal,
    rule: &R,
) -> EngineResult<FortnightlyEstimate> {
    if !schedule.has_booked_day() {
        return Err(NotApplicable::NoBookedDays.into());
    }

    let booked_days = [
        schedule.booked_days(Week::One),
        schedule.booked_days(Week::Two),
    ];
    let mut ccs_pool = HourPool::new(fortnightly_ccs_hours);
    let mut program_pools = rule
        .weekly_program_hours()
        .map(|hours| [HourPool::new(hours), HourPool::new(hours)]);

    let mut sessions = Vec::with_capacity(schedule.sessions.len());

    for day in schedule.days() {
        if !day.session.is_booked() {
            sessions.push(SessionEstimate::unbooked(&day, ccs_pool.remaining()));
            continue;
        }

        let ccs = calculate_ccs_session(day.session, rates, Some(ccs_pool.remaining()));
        ccs_pool.draw(ccs.applicable_ccs_hours);

        let program_hours = match program_pools.as_mut() {
            Some(pools) => pools[day.week.index()].draw(day.session.program_hours()),
            None => Decimal::ZERO,
        };

        let top_up = fund_session(
            rule,
            &SessionFunding {
                session: day.session,
                ccs: &ccs,
                program_hours,
                booked_days: booked_days[day.week.index()],
            },
        );

        sessions.push(SessionEstimate {
            week: day.week,
            weekday: day.weekday,
            booked: true,
            session_fee: day.session.fee,
            ccs,
            program_hours,
            top_up,
            ccs_hours_remaining: ccs_pool.remaining(),
        });
    }

    let totals = FortnightlyEstimate::totals_for(&sessions, ccs_pool.used());

    Ok(FortnightlyEstimate { sessions, totals })
}
