//! Request types for the estimator API.
//!
//! This module defines the JSON request structures for the `/estimate`
//! endpoint. Every request names its `calculator`; the remaining fields
//! depend on which calculator is asked for.
//!
//! Range checks live here rather than in the calculators, which accept any
//! number they are given.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculation::{NswEnrolment, VicEnrolment};
use crate::config::RateTables;
use crate::error::{EngineError, EngineResult};
use crate::models::{ActivityLevel, CareType, CcsRates, FortnightlySchedule, Session};

const HOURS_PER_DAY: Decimal = Decimal::from_parts(24, 0, 0, false, 0);
const DAYS_PER_WEEK: u32 = 7;
const WEEKS_PER_YEAR: Decimal = Decimal::from_parts(52, 0, 0, false, 0);
/// Largest accepted daily fee or top-up.
const MAX_FEE: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);
/// Largest accepted family income.
const MAX_INCOME: Decimal = Decimal::from_parts(10_000_000, 0, 0, false, 0);

/// Request body for the `/estimate` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "calculator", rename_all = "snake_case")]
pub enum EstimateRequest {
    /// Subsidy percentage from family income.
    CcsPercent(CcsPercentRequest),
    /// Subsidy and gap fee for one day.
    CcsDaily(DailyRequest),
    /// Subsidy and gap fees over a fortnight.
    CcsFortnightly(FortnightlyRequest),
    /// Week one and week two gaps for a repeating daily booking.
    WeeklyGaps(WeeklyGapsRequest),
    /// ACT preschool for one day.
    ActDaily(ActDailyRequest),
    /// ACT preschool over a fortnight.
    ActFortnightly(ActFortnightlyRequest),
    /// NSW fee relief for one day.
    NswDaily(NswDailyRequest),
    /// NSW fee relief over a fortnight.
    NswFortnightly(NswFortnightlyRequest),
    /// QLD kindy for one day.
    QldDaily(QldDailyRequest),
    /// QLD kindy over a fortnight.
    QldFortnightly(FortnightlyRequest),
    /// VIC kindergarten offset for one day.
    VicDaily(VicDailyRequest),
    /// VIC kindergarten offset over a fortnight.
    VicFortnightly(VicFortnightlyRequest),
}

impl EstimateRequest {
    /// The calculator name, as it appears in the `calculator` field.
    pub fn calculator(&self) -> &'static str {
        match self {
            EstimateRequest::CcsPercent(_) => "ccs_percent",
            EstimateRequest::CcsDaily(_) => "ccs_daily",
            EstimateRequest::CcsFortnightly(_) => "ccs_fortnightly",
            EstimateRequest::WeeklyGaps(_) => "weekly_gaps",
            EstimateRequest::ActDaily(_) => "act_daily",
            EstimateRequest::ActFortnightly(_) => "act_fortnightly",
            EstimateRequest::NswDaily(_) => "nsw_daily",
            EstimateRequest::NswFortnightly(_) => "nsw_fortnightly",
            EstimateRequest::QldDaily(_) => "qld_daily",
            EstimateRequest::QldFortnightly(_) => "qld_fortnightly",
            EstimateRequest::VicDaily(_) => "vic_daily",
            EstimateRequest::VicFortnightly(_) => "vic_fortnightly",
        }
    }

    /// Rejects values outside their meaningful range.
    pub fn validate(&self) -> EngineResult<()> {
        match self {
            EstimateRequest::CcsPercent(req) => req.validate(),
            EstimateRequest::CcsDaily(req) => req.validate(),
            EstimateRequest::CcsFortnightly(req) | EstimateRequest::QldFortnightly(req) => {
                req.validate()
            }
            EstimateRequest::WeeklyGaps(req) => req.validate(),
            EstimateRequest::ActDaily(req) => {
                req.rates.validate()?;
                validate_session("session", &req.session)?;
                validate_range("program_hours_per_day", req.program_hours_per_day, HOURS_PER_DAY)
            }
            EstimateRequest::ActFortnightly(req) => {
                req.fortnight.validate()?;
                match req.program_weeks {
                    Some(weeks) => validate_range("program_weeks", weeks, WEEKS_PER_YEAR),
                    None => Ok(()),
                }
            }
            EstimateRequest::NswDaily(req) => {
                req.rates.validate()?;
                validate_session("session", &req.session)?;
                validate_nsw_enrolment(&req.enrolment)?;
                validate_days(req.days_per_week)
            }
            EstimateRequest::NswFortnightly(req) => {
                req.fortnight.validate()?;
                validate_nsw_enrolment(&req.enrolment)
            }
            EstimateRequest::QldDaily(req) => {
                req.rates.validate()?;
                validate_session("session", &req.session)?;
                validate_range("kindy_hours_per_day", req.kindy_hours_per_day, HOURS_PER_DAY)
            }
            EstimateRequest::VicDaily(req) => {
                req.rates.validate()?;
                validate_session("session", &req.session)?;
                validate_vic_enrolment(&req.enrolment)?;
                validate_days(req.days_per_week)
            }
            EstimateRequest::VicFortnightly(req) => {
                req.fortnight.validate()?;
                validate_vic_enrolment(&req.enrolment)
            }
        }
    }
}

/// Subsidy rates supplied with a request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CcsRatesRequest {
    /// The family's subsidy percentage.
    pub ccs_percent: Decimal,
    /// Withholding percentage; the rate tables' default when omitted.
    #[serde(default)]
    pub withholding_percent: Option<Decimal>,
    /// Care type used to look up the hourly rate cap.
    #[serde(default)]
    pub care_type: CareType,
    /// Overrides the hourly rate cap for the care type.
    #[serde(default)]
    pub hourly_rate_cap: Option<Decimal>,
}

impl CcsRatesRequest {
    fn validate(&self) -> EngineResult<()> {
        validate_percent("rates.ccs_percent", self.ccs_percent)?;
        if let Some(withholding) = self.withholding_percent {
            validate_percent("rates.withholding_percent", withholding)?;
        }
        if let Some(cap) = self.hourly_rate_cap {
            validate_range("rates.hourly_rate_cap", cap, MAX_FEE)?;
        }
        Ok(())
    }

    /// Resolves the rates against the rate tables.
    pub fn resolve(&self, tables: &RateTables) -> CcsRates {
        CcsRates {
            ccs_percent: self.ccs_percent,
            withholding_percent: self
                .withholding_percent
                .unwrap_or(tables.ccs().default_withholding_percent),
            hourly_rate_cap: self
                .hourly_rate_cap
                .unwrap_or_else(|| tables.hourly_rate_cap(self.care_type)),
        }
    }
}

/// Income details for the `ccs_percent` calculator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CcsPercentRequest {
    /// Adjusted taxable family income.
    pub income: Decimal,
    /// Whether the higher rate for a second or later child is asked for.
    #[serde(default)]
    pub higher_rate_requested: bool,
    /// Children aged five or under in care.
    #[serde(default = "default_children_in_care")]
    pub children_in_care: u32,
    /// Care type used to report the hourly rate cap.
    #[serde(default)]
    pub care_type: CareType,
}

fn default_children_in_care() -> u32 {
    1
}

impl CcsPercentRequest {
    fn validate(&self) -> EngineResult<()> {
        validate_range("income", self.income, MAX_INCOME)
    }
}

/// A single session with subsidy rates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyRequest {
    /// Subsidy rates.
    pub rates: CcsRatesRequest,
    /// The session.
    pub session: Session,
}

impl DailyRequest {
    fn validate(&self) -> EngineResult<()> {
        self.rates.validate()?;
        validate_session("session", &self.session)
    }
}

/// A fortnightly schedule with subsidy rates and hour pool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FortnightlyRequest {
    /// Subsidy rates.
    pub rates: CcsRatesRequest,
    /// Ten sessions, Monday of week one first.
    pub schedule: FortnightlySchedule,
    /// Activity-test tier that sets the subsidised hours.
    #[serde(default)]
    pub activity_level: ActivityLevel,
    /// Overrides the subsidised hours for the activity level.
    #[serde(default)]
    pub fortnightly_ccs_hours: Option<Decimal>,
}

impl FortnightlyRequest {
    fn validate(&self) -> EngineResult<()> {
        self.rates.validate()?;
        for (index, session) in self.schedule.sessions.iter().enumerate() {
            validate_session(&format!("schedule.sessions[{}]", index), session)?;
        }
        if let Some(hours) = self.fortnightly_ccs_hours {
            validate_non_negative("fortnightly_ccs_hours", hours)?;
        }
        Ok(())
    }

    /// Resolves the subsidised hours against the rate tables.
    pub fn ccs_hours(&self, tables: &RateTables) -> Decimal {
        self.fortnightly_ccs_hours
            .unwrap_or_else(|| tables.fortnightly_ccs_hours(self.activity_level))
    }
}

/// A repeating daily booking for the `weekly_gaps` calculator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklyGapsRequest {
    /// Subsidy rates.
    pub rates: CcsRatesRequest,
    /// The daily fee.
    pub session_fee: Decimal,
    /// The daily session length in hours.
    pub session_hours: Decimal,
    /// Days booked each week.
    pub days_per_week: u32,
    /// Activity-test tier that sets the subsidised hours.
    #[serde(default)]
    pub activity_level: ActivityLevel,
    /// Overrides the subsidised hours for the activity level.
    #[serde(default)]
    pub fortnightly_ccs_hours: Option<Decimal>,
    /// Flat per-day top-up taken off each day's gap.
    #[serde(default)]
    pub daily_top_up: Option<Decimal>,
}

impl WeeklyGapsRequest {
    fn validate(&self) -> EngineResult<()> {
        self.rates.validate()?;
        validate_range("session_fee", self.session_fee, MAX_FEE)?;
        validate_range("session_hours", self.session_hours, HOURS_PER_DAY)?;
        validate_days(self.days_per_week)?;
        if let Some(hours) = self.fortnightly_ccs_hours {
            validate_non_negative("fortnightly_ccs_hours", hours)?;
        }
        if let Some(top_up) = self.daily_top_up {
            validate_range("daily_top_up", top_up, MAX_FEE)?;
        }
        Ok(())
    }

    /// Resolves the subsidised hours against the rate tables.
    pub fn ccs_hours(&self, tables: &RateTables) -> Decimal {
        self.fortnightly_ccs_hours
            .unwrap_or_else(|| tables.fortnightly_ccs_hours(self.activity_level))
    }
}

/// One day of ACT preschool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActDailyRequest {
    /// Subsidy rates.
    pub rates: CcsRatesRequest,
    /// The session.
    pub session: Session,
    /// Preschool hours in the session.
    pub program_hours_per_day: Decimal,
}

/// A fortnight of ACT preschool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActFortnightlyRequest {
    /// Rates, schedule and hour pool.
    #[serde(flatten)]
    pub fortnight: FortnightlyRequest,
    /// Weeks the preschool program runs; the tables' default when omitted.
    #[serde(default)]
    pub program_weeks: Option<Decimal>,
}

/// One day of NSW fee relief.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NswDailyRequest {
    /// Subsidy rates.
    pub rates: CcsRatesRequest,
    /// The session.
    pub session: Session,
    /// Age group, tier and service weeks.
    pub enrolment: NswEnrolment,
    /// Days booked each week.
    pub days_per_week: u32,
}

/// A fortnight of NSW fee relief.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NswFortnightlyRequest {
    /// Rates, schedule and hour pool.
    #[serde(flatten)]
    pub fortnight: FortnightlyRequest,
    /// Age group, tier and service weeks.
    pub enrolment: NswEnrolment,
}

/// One day of QLD kindy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QldDailyRequest {
    /// Subsidy rates.
    pub rates: CcsRatesRequest,
    /// The session.
    pub session: Session,
    /// Kindy hours in the session.
    pub kindy_hours_per_day: Decimal,
}

/// One day of the VIC kindergarten offset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VicDailyRequest {
    /// Subsidy rates.
    pub rates: CcsRatesRequest,
    /// The session.
    pub session: Session,
    /// Cohort and weekly kinder hours.
    pub enrolment: VicEnrolment,
    /// Days booked each week.
    pub days_per_week: u32,
}

/// A fortnight of the VIC kindergarten offset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VicFortnightlyRequest {
    /// Rates, schedule and hour pool.
    #[serde(flatten)]
    pub fortnight: FortnightlyRequest,
    /// Cohort and weekly kinder hours.
    pub enrolment: VicEnrolment,
}

fn invalid(field: &str, message: impl Into<String>) -> EngineError {
    EngineError::InvalidInput {
        field: field.to_string(),
        message: message.into(),
    }
}

fn validate_range(field: &str, value: Decimal, max: Decimal) -> EngineResult<()> {
    if value < Decimal::ZERO || value > max {
        return Err(invalid(field, format!("must be between 0 and {}", max)));
    }
    Ok(())
}

fn validate_percent(field: &str, value: Decimal) -> EngineResult<()> {
    validate_range(field, value, Decimal::ONE_HUNDRED)
}

fn validate_non_negative(field: &str, value: Decimal) -> EngineResult<()> {
    if value < Decimal::ZERO {
        return Err(invalid(field, "must not be negative"));
    }
    Ok(())
}

fn validate_days(days_per_week: u32) -> EngineResult<()> {
    if days_per_week > DAYS_PER_WEEK {
        return Err(invalid(
            "days_per_week",
            format!("must be between 0 and {}", DAYS_PER_WEEK),
        ));
    }
    Ok(())
}

fn validate_session(field: &str, session: &Session) -> EngineResult<()> {
    validate_range(&format!("{}.fee", field), session.fee, MAX_FEE)?;
    validate_range(&format!("{}.start_hour", field), session.start_hour, HOURS_PER_DAY)?;
    validate_range(&format!("{}.end_hour", field), session.end_hour, HOURS_PER_DAY)?;
    if let Some(window) = session.program_window {
        validate_range(
            &format!("{}.program_window.start_hour", field),
            window.start_hour,
            HOURS_PER_DAY,
        )?;
        validate_range(
            &format!("{}.program_window.end_hour", field),
            window.end_hour,
            HOURS_PER_DAY,
        )?;
    }
    Ok(())
}

fn validate_nsw_enrolment(enrolment: &NswEnrolment) -> EngineResult<()> {
    validate_range("enrolment.service_weeks", enrolment.service_weeks, WEEKS_PER_YEAR)
}

fn validate_vic_enrolment(enrolment: &VicEnrolment) -> EngineResult<()> {
    validate_range(
        "enrolment.kinder_hours_per_week",
        enrolment.kinder_hours_per_week,
        HOURS_PER_DAY * Decimal::from(DAYS_PER_WEEK),
    )
}
