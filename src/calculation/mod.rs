//! Calculation logic for the child care fee estimator.
//!
//! This module contains the Child Care Subsidy session engine, the
//! income-based subsidy percentage estimator, the hour pools and fortnightly
//! engine that allocate subsidised and program hours in schedule order, the
//! ACT, NSW, QLD and VIC top-up calculators, and the week-by-week gap
//! comparison used by flat daily programs.

mod act;
mod ccs;
mod ccs_percent;
mod fortnight;
mod hour_pool;
mod nsw;
mod qld;
mod rounding;
mod top_up;
mod vic;
mod weekly_gaps;

pub use act::{ActDailyResult, ActFortnightlyResult, ActPreschool, calculate_act_daily, calculate_act_fortnightly};
pub use ccs::{
    CcsDailyEstimate, CcsOnly, CcsSessionResult, calculate_ccs_fortnightly, calculate_ccs_session,
    estimate_ccs_daily,
};
pub use ccs_percent::{
    CcsPercentEstimate, HIGHER_RATE_CUTOFF, estimate_ccs_percent, higher_ccs_percent,
    standard_ccs_percent,
};
pub use fortnight::{FortnightTotals, FortnightlyEstimate, SessionEstimate, calculate_fortnight};
pub use hour_pool::HourPool;
pub use nsw::{NswDailyResult, NswEnrolment, NswFortnightlyResult, calculate_nsw_daily, calculate_nsw_fortnightly};
pub use qld::{QldDailyResult, QldFortnightlyResult, QldKindy, calculate_qld_daily, calculate_qld_fortnightly};
pub use rounding::{INTERMEDIATE_PLACES, MONEY_PLACES, round_money, round_to};
pub use top_up::{
    FundingRule, ProgramHoursSplit, SessionFunding, TopUpResult, WeeklyRelief, apply_top_up,
    fund_session, per_booked_day, program_hour_funding, split_program_hours,
};
pub use vic::{VicDailyResult, VicEnrolment, VicFortnightlyResult, calculate_vic_daily, calculate_vic_fortnightly};
pub use weekly_gaps::{WeekGap, WeeklyGapComparison, compare_weekly_gaps};
