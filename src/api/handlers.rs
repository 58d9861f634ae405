//! HTTP request handlers for the estimator API.
//!
//! This module contains the handler functions for all API endpoints and the
//! dispatch from a request to its calculator.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::{get, post},
};
use chrono::Utc;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{
    ActPreschool, FortnightlyEstimate, NswEnrolment, QldKindy, VicEnrolment,
    calculate_act_daily, calculate_act_fortnightly, calculate_ccs_fortnightly,
    compare_weekly_gaps, calculate_nsw_daily, calculate_nsw_fortnightly, calculate_qld_daily,
    calculate_qld_fortnightly, calculate_vic_daily, calculate_vic_fortnightly,
    estimate_ccs_daily, estimate_ccs_percent,
};
use crate::config::RateTables;
use crate::error::EngineResult;
use crate::models::{AuditStep, AuditTrace, AuditWarning, CcsRates, FortnightlySchedule, Week};

use super::request::{CcsRatesRequest, EstimateRequest, FortnightlyRequest};
use super::response::{ApiError, ApiErrorResponse, EstimateOutcome, EstimateResponse};
use super::state::AppState;

const CCS_REFERENCE: &str = "Family Assistance Law: Child Care Subsidy";
const ACT_REFERENCE: &str = "ACT Three-Year-Old Preschool";
const NSW_REFERENCE: &str = "NSW Preschool Fee Relief in Long Day Care";
const QLD_REFERENCE: &str = "QLD Kindy Funding in Long Day Care";
const VIC_REFERENCE: &str = "VIC Free Kinder Offset in Long Day Care";

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/estimate", post(estimate_handler))
        .route("/rates", get(rates_handler))
        .with_state(state)
}

/// Handler for GET /rates.
///
/// Returns the rate tables the service was started with.
async fn rates_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.config().tables().clone())
}

/// Handler for POST /estimate.
///
/// Accepts a tagged estimate request and returns the estimate envelope.
async fn estimate_handler(
    State(state): State<AppState>,
    payload: Result<Json<EstimateRequest>, JsonRejection>,
) -> impl IntoResponse {
    // Generate correlation ID for request tracking
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing estimate request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            let error = match rejection {
                JsonRejection::JsonDataError(err) => {
                    let body_text = err.body_text();
                    warn!(
                        correlation_id = %correlation_id,
                        error = %body_text,
                        "JSON data error"
                    );
                    ApiError::invalid_input(body_text)
                }
                JsonRejection::JsonSyntaxError(err) => {
                    warn!(
                        correlation_id = %correlation_id,
                        error = %err,
                        "JSON syntax error"
                    );
                    ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
                }
                JsonRejection::MissingJsonContentType(_) => {
                    ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
                }
                _ => ApiError::malformed_json("Failed to parse request body"),
            };
            return (
                StatusCode::BAD_REQUEST,
                [(header::CONTENT_TYPE, "application/json")],
                Json(error),
            )
                .into_response();
        }
    };

    let calculator = request.calculator();

    if let Err(err) = request.validate() {
        warn!(
            correlation_id = %correlation_id,
            calculator,
            error = %err,
            "Request rejected"
        );
        let api_error: ApiErrorResponse = err.into();
        return (
            api_error.status,
            [(header::CONTENT_TYPE, "application/json")],
            Json(api_error.error),
        )
            .into_response();
    }

    let start_time = Instant::now();
    match perform_estimate(&request, state.config().tables()) {
        Ok(response) => {
            let duration = start_time.elapsed();
            info!(
                correlation_id = %correlation_id,
                estimate_id = %response.estimate_id,
                calculator,
                warnings = response.audit_trace.warnings.len(),
                duration_us = duration.as_micros(),
                "Estimate completed successfully"
            );
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "application/json")],
                Json(response),
            )
                .into_response()
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                calculator,
                error = %err,
                "Estimate failed"
            );
            let api_error: ApiErrorResponse = err.into();
            (
                api_error.status,
                [(header::CONTENT_TYPE, "application/json")],
                Json(api_error.error),
            )
                .into_response()
        }
    }
}

/// Collects audit steps and warnings while an estimate runs.
#[derive(Default)]
struct AuditLog {
    steps: Vec<AuditStep>,
    warnings: Vec<AuditWarning>,
}

impl AuditLog {
    fn step(
        &mut self,
        rule_id: &str,
        rule_name: &str,
        reference: &str,
        input: serde_json::Value,
        output: serde_json::Value,
        reasoning: String,
    ) {
        self.steps.push(AuditStep {
            step_number: self.steps.len() as u32 + 1,
            rule_id: rule_id.to_string(),
            rule_name: rule_name.to_string(),
            reference: reference.to_string(),
            input,
            output,
            reasoning,
        });
    }

    fn warn(&mut self, code: &str, message: String, severity: &str) {
        self.warnings.push(AuditWarning {
            code: code.to_string(),
            message,
            severity: severity.to_string(),
        });
    }

    /// Records how the request's rates resolved against the tables.
    fn rates(&mut self, requested: &CcsRatesRequest, rates: &CcsRates) {
        self.step(
            "ccs_rates",
            "Resolve Subsidy Rates",
            CCS_REFERENCE,
            json!({
                "ccs_percent": requested.ccs_percent,
                "withholding_percent": requested.withholding_percent,
                "care_type": requested.care_type,
                "hourly_rate_cap": requested.hourly_rate_cap,
            }),
            to_json(rates),
            format!(
                "{}% subsidy, {}% withheld, hourly rate cap ${}",
                rates.ccs_percent, rates.withholding_percent, rates.hourly_rate_cap
            ),
        );
    }

    /// Records the fortnight's subsidised hours.
    fn ccs_hours(&mut self, request: &FortnightlyRequest, hours: Decimal) {
        self.step(
            "ccs_hours_pool",
            "Fortnightly Subsidised Hours",
            CCS_REFERENCE,
            json!({
                "activity_level": request.activity_level,
                "fortnightly_ccs_hours": request.fortnightly_ccs_hours,
            }),
            json!({ "fortnightly_ccs_hours": hours }),
            format!("{} subsidised hours available this fortnight", hours),
        );
    }

    /// Records the fortnight estimate and flags any pool that ran out.
    fn fortnight(
        &mut self,
        rule_id: &str,
        rule_name: &str,
        reference: &str,
        schedule: &FortnightlySchedule,
        estimate: &FortnightlyEstimate,
    ) {
        let totals = &estimate.totals;
        self.step(
            rule_id,
            rule_name,
            reference,
            json!({
                "booked_days_week_one": schedule.booked_days(Week::One),
                "booked_days_week_two": schedule.booked_days(Week::Two),
                "booked_hours": schedule.booked_hours(),
            }),
            to_json(totals),
            format!(
                "Fees ${} less subsidy ${} and top-up ${} leaves ${} for the fortnight",
                totals.session_fees, totals.ccs_entitlement, totals.top_up, totals.gap_fee
            ),
        );

        if let Some(short) = estimate.first_session_short_of_ccs_hours() {
            self.warn(
                "CCS_HOURS_EXHAUSTED",
                format!(
                    "Subsidised hours ran out on {} of week {}; later sessions receive no subsidy",
                    short.weekday,
                    short.week.index() + 1
                ),
                "medium",
            );
        }
    }

    /// Flags booked sessions that wanted more program hours than the week
    /// had left.
    fn program_hours(&mut self, schedule: &FortnightlySchedule, estimate: &FortnightlyEstimate) {
        let short = schedule
            .sessions
            .iter()
            .zip(&estimate.sessions)
            .find(|(session, result)| result.booked && result.program_hours < session.program_hours());

        if let Some((_, result)) = short {
            self.warn(
                "TOP_UP_HOURS_EXHAUSTED",
                format!(
                    "Weekly program hours ran out on {} of week {}",
                    result.weekday,
                    result.week.index() + 1
                ),
                "low",
            );
        }
    }

    fn finish(self, duration_us: u64) -> AuditTrace {
        AuditTrace {
            steps: self.steps,
            warnings: self.warnings,
            duration_us,
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> serde_json::Value {
    serde_json::to_value(value).unwrap_or_default()
}

/// Runs the requested calculator and wraps the result in an envelope.
fn perform_estimate(request: &EstimateRequest, tables: &RateTables) -> EngineResult<EstimateResponse> {
    let start_time = Instant::now();
    let mut log = AuditLog::default();

    let result = match request {
        EstimateRequest::CcsPercent(req) => {
            let cap = tables.hourly_rate_cap(req.care_type);
            let estimate =
                estimate_ccs_percent(req.income, req.higher_rate_requested, req.children_in_care, cap);
            log.step(
                "ccs_percent",
                "Income-Tested Subsidy Percentage",
                CCS_REFERENCE,
                to_json(req),
                to_json(&estimate),
                format!(
                    "Income ${} gives {}% ({} rate)",
                    req.income,
                    estimate.applicable_percent,
                    if estimate.higher_rate_applied { "higher" } else { "standard" }
                ),
            );
            EstimateOutcome::CcsPercent(estimate)
        }

        EstimateRequest::CcsDaily(req) => {
            let rates = req.rates.resolve(tables);
            log.rates(&req.rates, &rates);
            let estimate = estimate_ccs_daily(&req.session, &rates)?;
            log.step(
                "ccs_session",
                "Subsidy For One Session",
                CCS_REFERENCE,
                to_json(&req.session),
                to_json(&estimate),
                format!(
                    "{} hours at ${}/hr subsidy, ${} paid after withholding, gap ${}",
                    estimate.ccs.applicable_ccs_hours,
                    estimate.ccs.applicable_ccs_hourly_rate,
                    estimate.ccs.ccs_entitlement,
                    estimate.gap_fee
                ),
            );
            EstimateOutcome::CcsDaily(estimate)
        }

        EstimateRequest::CcsFortnightly(req) => {
            let rates = req.rates.resolve(tables);
            let hours = req.ccs_hours(tables);
            log.rates(&req.rates, &rates);
            log.ccs_hours(req, hours);
            let estimate = calculate_ccs_fortnightly(&req.schedule, &rates, hours)?;
            log.fortnight(
                "ccs_fortnight",
                "Subsidy Over A Fortnight",
                CCS_REFERENCE,
                &req.schedule,
                &estimate,
            );
            EstimateOutcome::CcsFortnightly(estimate)
        }

        EstimateRequest::WeeklyGaps(req) => {
            let rates = req.rates.resolve(tables);
            let hours = req.ccs_hours(tables);
            log.rates(&req.rates, &rates);
            let comparison = compare_weekly_gaps(
                req.session_fee,
                req.session_hours,
                req.days_per_week,
                &rates,
                hours,
                req.daily_top_up,
            );
            log.step(
                "weekly_gaps",
                "Week One And Week Two Gaps",
                CCS_REFERENCE,
                json!({
                    "session_fee": req.session_fee,
                    "session_hours": req.session_hours,
                    "days_per_week": req.days_per_week,
                    "fortnightly_ccs_hours": hours,
                    "daily_top_up": req.daily_top_up,
                }),
                to_json(&comparison),
                match &comparison {
                    Some(gaps) => format!(
                        "Week two covers {} of {} hours; weekly gap ${} then ${}",
                        gaps.week_two.covered_hours,
                        gaps.week_two.required_hours,
                        gaps.week_one.weekly_gap_fee,
                        gaps.week_two.weekly_gap_fee
                    ),
                    None => "Both weeks get the same subsidised hours".to_string(),
                },
            );
            let week_two_dearer = comparison
                .is_some_and(|gaps| gaps.week_two.weekly_gap_fee > gaps.week_one.weekly_gap_fee);
            if week_two_dearer {
                log.warn(
                    "CCS_HOURS_EXHAUSTED",
                    "Subsidised hours do not cover both weeks; week two costs more".to_string(),
                    "medium",
                );
            }
            EstimateOutcome::WeeklyGaps { comparison }
        }

        EstimateRequest::ActDaily(req) => {
            let rates = req.rates.resolve(tables);
            log.rates(&req.rates, &rates);
            let result = calculate_act_daily(&req.session, &rates, req.program_hours_per_day);
            log.step(
                "act_preschool_daily",
                "ACT Preschool For One Day",
                ACT_REFERENCE,
                json!({
                    "session": req.session,
                    "program_hours_per_day": req.program_hours_per_day,
                }),
                to_json(&result),
                format!(
                    "{} program hours at ${}/hr against a ${} gap before withholding",
                    result.program_hours,
                    result.funding_per_program_hour,
                    result.top_up.gap_before_top_up
                ),
            );
            EstimateOutcome::ActDaily(result)
        }

        EstimateRequest::ActFortnightly(req) => {
            let fortnight = &req.fortnight;
            let rates = fortnight.rates.resolve(tables);
            let hours = fortnight.ccs_hours(tables);
            let program_weeks = req
                .program_weeks
                .unwrap_or(tables.programs().act.default_program_weeks);
            log.rates(&fortnight.rates, &rates);
            log.ccs_hours(fortnight, hours);
            log.step(
                "act_weekly_hours",
                "ACT Weekly Program Hours",
                ACT_REFERENCE,
                json!({
                    "annual_program_hours": tables.programs().act.annual_program_hours,
                    "program_weeks": program_weeks,
                }),
                json!({
                    "weekly_program_hours":
                        ActPreschool::from_tables(tables, program_weeks).weekly_program_hours,
                }),
                format!("Annual program hours spread over {} weeks", program_weeks),
            );
            let result = calculate_act_fortnightly(
                &fortnight.schedule,
                &rates,
                hours,
                program_weeks,
                tables,
            )?;
            log.fortnight(
                "act_preschool_fortnight",
                "ACT Preschool Over A Fortnight",
                ACT_REFERENCE,
                &fortnight.schedule,
                &result.estimate,
            );
            log.program_hours(&fortnight.schedule, &result.estimate);
            EstimateOutcome::ActFortnightly(result)
        }

        EstimateRequest::NswDaily(req) => {
            let rates = req.rates.resolve(tables);
            log.rates(&req.rates, &rates);
            let result =
                calculate_nsw_daily(&req.session, &rates, &req.enrolment, req.days_per_week, tables);
            log.step(
                "nsw_fee_relief_daily",
                "NSW Fee Relief For One Day",
                NSW_REFERENCE,
                json!({
                    "session": req.session,
                    "enrolment": req.enrolment,
                    "days_per_week": req.days_per_week,
                }),
                to_json(&result),
                nsw_reasoning(&req.enrolment, result.weekly_fee_relief, req.days_per_week),
            );
            EstimateOutcome::NswDaily(result)
        }

        EstimateRequest::NswFortnightly(req) => {
            let fortnight = &req.fortnight;
            let rates = fortnight.rates.resolve(tables);
            let hours = fortnight.ccs_hours(tables);
            log.rates(&fortnight.rates, &rates);
            log.ccs_hours(fortnight, hours);
            let result =
                calculate_nsw_fortnightly(&fortnight.schedule, &rates, hours, &req.enrolment, tables)?;
            log.fortnight(
                "nsw_fee_relief_fortnight",
                "NSW Fee Relief Over A Fortnight",
                NSW_REFERENCE,
                &fortnight.schedule,
                &result.estimate,
            );
            EstimateOutcome::NswFortnightly(result)
        }

        EstimateRequest::QldDaily(req) => {
            let rates = req.rates.resolve(tables);
            log.rates(&req.rates, &rates);
            warn_if_withholding_normalised(&mut log, &rates, tables);
            let result = calculate_qld_daily(&req.session, &rates, req.kindy_hours_per_day, tables);
            log.step(
                "qld_kindy_daily",
                "QLD Kindy For One Day",
                QLD_REFERENCE,
                json!({
                    "session": req.session,
                    "kindy_hours_per_day": req.kindy_hours_per_day,
                }),
                to_json(&result),
                format!(
                    "{} kindy hours against a ${} gap using a normalised subsidy of ${}",
                    result.program_hours,
                    result.top_up.gap_before_top_up,
                    result.normalised_entitlement
                ),
            );
            EstimateOutcome::QldDaily(result)
        }

        EstimateRequest::QldFortnightly(req) => {
            let rates = req.rates.resolve(tables);
            let hours = req.ccs_hours(tables);
            log.rates(&req.rates, &rates);
            log.ccs_hours(req, hours);
            warn_if_withholding_normalised(&mut log, &rates, tables);
            let result = calculate_qld_fortnightly(&req.schedule, &rates, hours, tables)?;
            log.fortnight(
                "qld_kindy_fortnight",
                "QLD Kindy Over A Fortnight",
                QLD_REFERENCE,
                &req.schedule,
                &result.estimate,
            );
            log.program_hours(&req.schedule, &result.estimate);
            EstimateOutcome::QldFortnightly(result)
        }

        EstimateRequest::VicDaily(req) => {
            let rates = req.rates.resolve(tables);
            log.rates(&req.rates, &rates);
            let result =
                calculate_vic_daily(&req.session, &rates, &req.enrolment, req.days_per_week, tables);
            log.step(
                "vic_offset_daily",
                "VIC Kinder Offset For One Day",
                VIC_REFERENCE,
                json!({
                    "session": req.session,
                    "enrolment": req.enrolment,
                    "days_per_week": req.days_per_week,
                }),
                to_json(&result),
                vic_reasoning(&req.enrolment, result.weekly_offset, req.days_per_week),
            );
            EstimateOutcome::VicDaily(result)
        }

        EstimateRequest::VicFortnightly(req) => {
            let fortnight = &req.fortnight;
            let rates = fortnight.rates.resolve(tables);
            let hours = fortnight.ccs_hours(tables);
            log.rates(&fortnight.rates, &rates);
            log.ccs_hours(fortnight, hours);
            let result =
                calculate_vic_fortnightly(&fortnight.schedule, &rates, hours, &req.enrolment, tables)?;
            log.fortnight(
                "vic_offset_fortnight",
                "VIC Kinder Offset Over A Fortnight",
                VIC_REFERENCE,
                &fortnight.schedule,
                &result.estimate,
            );
            EstimateOutcome::VicFortnightly(result)
        }
    };

    let duration_us = start_time.elapsed().as_micros() as u64;

    Ok(EstimateResponse {
        estimate_id: Uuid::new_v4(),
        timestamp: Utc::now(),
        engine_version: env!("CARGO_PKG_VERSION").to_string(),
        financial_year: tables.metadata().financial_year.clone(),
        result,
        audit_trace: log.finish(duration_us),
    })
}

fn warn_if_withholding_normalised(log: &mut AuditLog, rates: &CcsRates, tables: &RateTables) {
    let normalised = QldKindy::from_tables(tables).normalised_withholding_percent;
    if rates.withholding_percent != normalised {
        log.warn(
            "QLD_WITHHOLDING_NORMALISED",
            format!(
                "Kindy funding assumes {}% withholding; your {}% still applies to the subsidy itself",
                normalised, rates.withholding_percent
            ),
            "low",
        );
    }
}

fn nsw_reasoning(
    enrolment: &NswEnrolment,
    weekly_fee_relief: Decimal,
    days_per_week: u32,
) -> String {
    format!(
        "Annual relief over {} service weeks is ${} a week, shared across {} days",
        enrolment.service_weeks, weekly_fee_relief, days_per_week
    )
}

fn vic_reasoning(
    enrolment: &VicEnrolment,
    weekly_offset: Decimal,
    days_per_week: u32,
) -> String {
    format!(
        "{} kinder hours a week earns ${} a week, shared across {} days",
        enrolment.kinder_hours_per_week, weekly_offset, days_per_week
    )
}
