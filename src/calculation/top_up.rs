//! State top-up funding applied after the subsidy.
//!
//! Every state program follows the same outline: work out the gap left after
//! the subsidy, work out the program's raw funding for the session, pay the
//! lesser of the two, and never let the gap go below zero. Only the raw
//! funding and which subsidy figure forms the gap differ between programs, so
//! each program supplies those through a [`FundingRule`].

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::Session;

use super::ccs::CcsSessionResult;
use super::rounding::round_money;

/// The effect of a top-up on one session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopUpResult {
    /// Fee minus the subsidy figure the program uses.
    pub gap_before_top_up: Decimal,
    /// Funding paid by the program.
    pub top_up_amount: Decimal,
    /// What the family pays.
    pub estimated_gap_fee: Decimal,
}

/// Everything a funding rule needs to know about one session.
#[derive(Debug, Clone, Copy)]
pub struct SessionFunding<'a> {
    /// The session being funded.
    pub session: &'a Session,
    /// The subsidy already worked out for it.
    pub ccs: &'a CcsSessionResult,
    /// Program hours granted to this session (zero for flat-rate programs).
    pub program_hours: Decimal,
    /// Booked days in the session's week.
    pub booked_days: u32,
}

/// A state program's funding shape.
pub trait FundingRule {
    /// The subsidy figure subtracted from the fee to form the gap.
    fn subsidy_baseline(&self, ccs: &CcsSessionResult) -> Decimal;

    /// Program hours available per week, for programs funded by the hour.
    fn weekly_program_hours(&self) -> Option<Decimal> {
        None
    }

    /// Funding for the session before it is limited to the gap.
    fn raw_top_up(&self, funding: &SessionFunding<'_>) -> Decimal;
}

/// Program hours divided by whether the subsidy also covers them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramHoursSplit {
    /// Program hours that are also subsidised.
    pub subsidised: Decimal,
    /// Program hours the subsidy pool no longer reaches.
    pub unsubsidised: Decimal,
}

/// Splits program hours into subsidised and unsubsidised portions.
///
/// Subsidised hours run from the start of the session. When they cover the
/// whole session every program hour is subsidised; otherwise only the part of
/// the program that starts before the subsidised hours run out is.
///
/// # Examples
///
/// ```
/// use childcare_fee_estimator::calculation::{calculate_ccs_session, split_program_hours};
/// use childcare_fee_estimator::models::{CcsRates, Session};
/// use rust_decimal::Decimal;
///
/// let rates = CcsRates {
///     ccs_percent: Decimal::new(85, 0),
///     withholding_percent: Decimal::new(5, 0),
///     hourly_rate_cap: Decimal::new(1463, 2),
/// };
/// // Session 8:00-18:00 with 4 subsidised hours left; program 9:00-15:00
/// let session = Session::new(Decimal::new(150, 0), Decimal::new(8, 0), Decimal::new(18, 0));
/// let ccs = calculate_ccs_session(&session, &rates, Some(Decimal::new(4, 0)));
///
/// let split = split_program_hours(Decimal::new(6, 0), Decimal::ONE, &ccs);
/// assert_eq!(split.subsidised, Decimal::new(3, 0));
/// assert_eq!(split.unsubsidised, Decimal::new(3, 0));
/// ```
pub fn split_program_hours(
    program_hours: Decimal,
    program_start_offset: Decimal,
    ccs: &CcsSessionResult,
) -> ProgramHoursSplit {
    let program_hours = program_hours.max(Decimal::ZERO);

    let subsidised = if ccs.covers_full_session() {
        program_hours
    } else {
        (ccs.applicable_ccs_hours - program_start_offset)
            .max(Decimal::ZERO)
            .min(program_hours)
    };

    ProgramHoursSplit {
        subsidised,
        unsubsidised: program_hours - subsidised,
    }
}

/// Funding for program hours: the per-hour gap on subsidised hours and the
/// full hourly fee on unsubsidised ones.
///
/// The hourly fee is `session_fee / session_hours` and the hourly subsidy is
/// `subsidy / subsidised_hours`. Both stay as fractions and the result is
/// divided once at the end, so funding never rises as the subsidy rises.
/// Zero for an empty session; a zero `subsidised_hours` means no hourly
/// subsidy.
///
/// # Arguments
/// * `split` - Program hours divided by subsidy cover
/// * `session_fee` - Fee for the whole session
/// * `session_hours` - Length of the session
/// * `subsidy` - Subsidy amount spread over `subsidised_hours`
/// * `subsidised_hours` - Hours the subsidy amount relates to
///
/// # Returns
/// Raw program funding for the session, not yet rounded or limited to the gap
pub fn program_hour_funding(
    split: &ProgramHoursSplit,
    session_fee: Decimal,
    session_hours: Decimal,
    subsidy: Decimal,
    subsidised_hours: Decimal,
) -> Decimal {
    if session_hours <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    let (subsidy, subsidised_hours) = if subsidised_hours > Decimal::ZERO {
        (subsidy, subsidised_hours)
    } else {
        (Decimal::ZERO, Decimal::ONE)
    };

    // Both terms over session_hours x subsidised_hours
    let gap_numerator = (session_fee * subsidised_hours - subsidy * session_hours).max(Decimal::ZERO);
    let numerator =
        split.subsidised * gap_numerator + split.unsubsidised * session_fee * subsidised_hours;
    numerator / (session_hours * subsidised_hours)
}

/// Spreads a weekly amount evenly over the booked days, to the cent.
///
/// Zero when no day is booked.
pub fn per_booked_day(weekly_amount: Decimal, booked_days: u32) -> Decimal {
    if booked_days == 0 {
        return Decimal::ZERO;
    }
    round_money(weekly_amount / Decimal::from(booked_days))
}

/// A flat weekly amount shared evenly across the week's booked days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeeklyRelief {
    /// The amount available each week.
    pub weekly_amount: Decimal,
}

impl FundingRule for WeeklyRelief {
    fn subsidy_baseline(&self, ccs: &CcsSessionResult) -> Decimal {
        ccs.ccs_entitlement
    }

    fn raw_top_up(&self, funding: &SessionFunding<'_>) -> Decimal {
        per_booked_day(self.weekly_amount, funding.booked_days)
    }
}

/// Limits raw funding to the gap and works out the remaining fee.
///
/// Both inputs may carry more than two places. The family's gap is rounded
/// once, from the unrounded difference, and the top-up is whatever closes
/// the rounded gap to it. A smaller unrounded gap never rounds to a larger
/// family gap.
///
/// # Examples
///
/// ```
/// use childcare_fee_estimator::calculation::apply_top_up;
/// use rust_decimal::Decimal;
///
/// let result = apply_top_up(Decimal::new(2560, 2), Decimal::new(4000, 2));
/// assert_eq!(result.top_up_amount, Decimal::new(2560, 2));
/// assert_eq!(result.estimated_gap_fee, Decimal::ZERO);
/// ```
pub fn apply_top_up(gap_before_top_up: Decimal, raw_top_up: Decimal) -> TopUpResult {
    let gap = gap_before_top_up.max(Decimal::ZERO);
    let estimated_gap_fee = round_money((gap - raw_top_up.max(Decimal::ZERO)).max(Decimal::ZERO));
    let gap_before_top_up = round_money(gap);

    TopUpResult {
        gap_before_top_up,
        top_up_amount: gap_before_top_up - estimated_gap_fee,
        estimated_gap_fee,
    }
}

/// Applies a funding rule to one session.
pub fn fund_session<R: FundingRule + ?Sized>(rule: &R, funding: &SessionFunding<'_>) -> TopUpResult {
    let gap_before_top_up = funding.session.fee - rule.subsidy_baseline(funding.ccs);
    apply_top_up(gap_before_top_up, rule.raw_top_up(funding))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculation::calculate_ccs_session;
    use crate::models::CcsRates;
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

    struct FlatTen;

    impl FundingRule for FlatTen {
        fn subsidy_baseline(&self, ccs: &CcsSessionResult) -> Decimal {
            ccs.ccs_entitlement
        }

        fn raw_top_up(&self, _funding: &SessionFunding<'_>) -> Decimal {
            dec("10")
        }
    }

    #[test]
    fn test_top_up_below_gap_is_paid_in_full() {
        let result = apply_top_up(dec("25.60"), dec("15.36"));
        assert_eq!(result.top_up_amount, dec("15.36"));
        assert_eq!(result.estimated_gap_fee, dec("10.24"));
    }

    #[test]
    fn test_top_up_limited_to_gap() {
        let result = apply_top_up(dec("8.00"), dec("13.08"));
        assert_eq!(result.top_up_amount, dec("8.00"));
        assert_eq!(result.estimated_gap_fee, Decimal::ZERO);
    }

    #[test]
    fn test_negative_gap_never_pays_family() {
        let result = apply_top_up(dec("-5"), dec("10"));
        assert_eq!(result.top_up_amount, Decimal::ZERO);
        assert_eq!(result.estimated_gap_fee, Decimal::ZERO);
    }

    #[test]
    fn test_negative_raw_top_up_is_floored() {
        let result = apply_top_up(dec("20"), dec("-3"));
        assert_eq!(result.top_up_amount, Decimal::ZERO);
        assert_eq!(result.estimated_gap_fee, dec("20"));
    }

    #[test]
    fn test_split_when_subsidy_covers_session() {
        let session = Session::new(dec("150"), dec("8"), dec("18"));
        let ccs = calculate_ccs_session(&session, &rates(), None);

        let split = split_program_hours(dec("6"), dec("4"), &ccs);
        assert_eq!(split.subsidised, dec("6"));
        assert_eq!(split.unsubsidised, Decimal::ZERO);
    }

    #[test]
    fn test_split_when_subsidy_ends_before_program() {
        let session = Session::new(dec("150"), dec("8"), dec("18"));
        let ccs = calculate_ccs_session(&session, &rates(), Some(dec("1")));

        let split = split_program_hours(dec("6"), dec("2"), &ccs);
        assert_eq!(split.subsidised, Decimal::ZERO);
        assert_eq!(split.unsubsidised, dec("6"));
    }

    #[test]
    fn test_program_hour_funding_mixes_rates() {
        let split = ProgramHoursSplit {
            subsidised: dec("3"),
            unsubsidised: dec("3"),
        };
        // $150 over 10 hours at $12.44 an hour: 3 x (15 - 12.44) + 3 x 15
        assert_eq!(
            program_hour_funding(&split, dec("150"), dec("10"), dec("12.44"), Decimal::ONE),
            dec("52.68")
        );
    }

    #[test]
    fn test_program_hour_funding_never_negative_per_hour() {
        let split = ProgramHoursSplit {
            subsidised: dec("5"),
            unsubsidised: Decimal::ZERO,
        };
        assert_eq!(
            program_hour_funding(&split, dec("100"), dec("10"), dec("12"), Decimal::ONE),
            Decimal::ZERO
        );
    }

    #[test]
    fn test_program_hour_funding_without_subsidised_hours() {
        let split = ProgramHoursSplit {
            subsidised: Decimal::ZERO,
            unsubsidised: dec("2"),
        };
        assert_eq!(
            program_hour_funding(&split, dec("100"), dec("8"), dec("40"), Decimal::ZERO),
            dec("25")
        );
        assert_eq!(
            program_hour_funding(&split, dec("100"), Decimal::ZERO, dec("40"), dec("4")),
            Decimal::ZERO
        );
    }

    #[test]
    fn test_gap_is_rounded_once() {
        // 10.005 - 3.0049 = 7.0001; rounding both sides first would give 7.01
        let result = apply_top_up(dec("10.005"), dec("3.0049"));
        assert_eq!(result.gap_before_top_up, dec("10.01"));
        assert_eq!(result.estimated_gap_fee, dec("7.00"));
        assert_eq!(result.top_up_amount, dec("3.01"));
    }

    #[test]
    fn test_per_booked_day() {
        assert_eq!(per_booked_day(dec("52.31"), 4), dec("13.08"));
        assert_eq!(per_booked_day(dec("52.31"), 0), Decimal::ZERO);
    }

    #[test]
    fn test_weekly_relief_follows_booked_days() {
        let session = Session::new(dec("150"), dec("8"), dec("18"));
        let ccs = calculate_ccs_session(&session, &rates(), None);
        let rule = WeeklyRelief {
            weekly_amount: dec("52.31"),
        };

        let two_days = SessionFunding {
            session: &session,
            ccs: &ccs,
            program_hours: Decimal::ZERO,
            booked_days: 2,
        };
        assert_eq!(rule.raw_top_up(&two_days), dec("26.16"));

        let no_days = SessionFunding {
            booked_days: 0,
            ..two_days
        };
        assert_eq!(rule.raw_top_up(&no_days), Decimal::ZERO);
    }

    #[test]
    fn test_fund_session_uses_rule_baseline() {
        let session = Session::new(dec("100"), dec("8"), dec("18"));
        let ccs = calculate_ccs_session(&session, &rates(), None);
        let funding = SessionFunding {
            session: &session,
            ccs: &ccs,
            program_hours: Decimal::ZERO,
            booked_days: 1,
        };

        // $10/hr x 85% = $8.50; 10 hours = $85; entitlement $80.75
        let result = fund_session(&FlatTen, &funding);
        assert_eq!(result.gap_before_top_up, dec("19.25"));
        assert_eq!(result.top_up_amount, dec("10"));
        assert_eq!(result.estimated_gap_fee, dec("9.25"));
    }
}
