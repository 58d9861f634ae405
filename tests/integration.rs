//! Integration tests for the fee estimator API.
//!
//! This test suite drives every calculator through the router:
//! - CCS percentage, daily and fortnightly estimates
//! - Subsidised hours running out within a fortnight
//! - Week one and week two gap comparison
//! - ACT, NSW, QLD and VIC top-ups, daily and fortnightly
//! - Error cases

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use rust_decimal::Decimal;
use serde_json::{Value, json};
use std::str::FromStr;
use tower::ServiceExt;

use childcare_fee_estimator::api::{AppState, create_router};
use childcare_fee_estimator::config::ConfigLoader;

// =============================================================================
// Test Helpers
// =============================================================================

fn create_test_state() -> AppState {
    let config = ConfigLoader::load("./config/fy2025-26").expect("Failed to load config");
    AppState::new(config)
}

fn create_router_for_test() -> Router {
    create_router(create_test_state())
}

fn decimal(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

async fn post_estimate(router: Router, body: Value) -> (StatusCode, Value) {
    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/estimate")
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

fn session(fee: &str, start: &str, end: &str) -> Value {
    json!({ "fee": fee, "start_hour": start, "end_hour": end })
}

fn preschool_session(fee: &str, start: &str, end: &str, program: (&str, &str)) -> Value {
    json!({
        "fee": fee,
        "start_hour": start,
        "end_hour": end,
        "program_window": { "start_hour": program.0, "end_hour": program.1 }
    })
}

fn unbooked() -> Value {
    session("0", "0", "0")
}

/// Builds a ten-session schedule from the booked sessions, Monday of week
/// one first, padding the rest with unbooked days.
fn schedule(booked: Vec<Value>) -> Value {
    let mut sessions = booked;
    sessions.resize(10, unbooked());
    json!({ "sessions": sessions })
}

fn rates(ccs_percent: &str) -> Value {
    json!({ "ccs_percent": ccs_percent })
}

/// Compares a JSON decimal string to the expected value, ignoring scale.
fn assert_decimal(value: &Value, expected: &str) {
    let actual = value
        .as_str()
        .unwrap_or_else(|| panic!("Expected decimal string, got {}", value));
    assert_eq!(
        decimal(actual),
        decimal(expected),
        "Expected {}, got {}",
        expected,
        actual
    );
}

fn warning_codes(response: &Value) -> Vec<String> {
    response["audit_trace"]["warnings"]
        .as_array()
        .unwrap()
        .iter()
        .map(|w| w["code"].as_str().unwrap().to_string())
        .collect()
}

// =============================================================================
// Envelope
// =============================================================================

#[tokio::test]
async fn test_envelope_fields() {
    let (status, body) = post_estimate(
        create_router_for_test(),
        json!({
            "calculator": "ccs_daily",
            "rates": rates("50"),
            "session": session("100", "8", "18")
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["estimate_id"].is_string());
    assert!(body["timestamp"].is_string());
    assert_eq!(body["engine_version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(body["financial_year"], "2025-26");
    assert_eq!(body["result"]["calculator"], "ccs_daily");
    assert!(body["audit_trace"]["duration_us"].is_number());
}

#[tokio::test]
async fn test_rates_endpoint() {
    let response = create_router_for_test()
        .oneshot(Request::builder().uri("/rates").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let tables: Value = serde_json::from_slice(&body_bytes).unwrap();
    assert_eq!(tables["metadata"]["financial_year"], "2025-26");
    assert_decimal(&tables["ccs"]["hourly_rate_caps"]["centre_based_day_care"], "14.63");
}

// =============================================================================
// Child Care Subsidy
// =============================================================================

/// Scenario 1: $10/hr fee below the cap at 50%
#[tokio::test]
async fn test_ccs_daily_fee_below_cap() {
    let (status, body) = post_estimate(
        create_router_for_test(),
        json!({
            "calculator": "ccs_daily",
            "rates": rates("50"),
            "session": session("100", "8", "18")
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let result = &body["result"];
    assert_decimal(&result["ccs"]["applicable_ccs_hourly_rate"], "5.00");
    assert_decimal(&result["ccs"]["ccs_amount"], "50");
    assert_decimal(&result["ccs"]["ccs_withholding"], "2.50");
    assert_decimal(&result["ccs"]["ccs_entitlement"], "47.50");
    assert_decimal(&result["gap_fee"], "52.50");
}

/// Scenario 2: $15.40/hr fee above the $14.63 cap at 85%
#[tokio::test]
async fn test_ccs_daily_fee_above_cap() {
    let (status, body) = post_estimate(
        create_router_for_test(),
        json!({
            "calculator": "ccs_daily",
            "rates": rates("85"),
            "session": session("154", "8", "18")
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let result = &body["result"];
    assert_decimal(&result["ccs"]["applicable_ccs_hourly_rate"], "12.44");
    assert_decimal(&result["ccs"]["ccs_amount"], "124.40");
    assert_decimal(&result["ccs"]["ccs_withholding"], "6.22");
    assert_decimal(&result["ccs"]["ccs_entitlement"], "118.18");
    assert_decimal(&result["gap_fee"], "35.82");
}

#[tokio::test]
async fn test_ccs_daily_care_type_selects_cap() {
    // Family day care is capped at $13.56
    let (status, body) = post_estimate(
        create_router_for_test(),
        json!({
            "calculator": "ccs_daily",
            "rates": { "ccs_percent": "100", "care_type": "family_day_care" },
            "session": session("150", "8", "18")
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_decimal(&body["result"]["ccs"]["applicable_ccs_hourly_rate"], "13.56");
}

#[tokio::test]
async fn test_ccs_percent_standard_rate() {
    let (status, body) = post_estimate(
        create_router_for_test(),
        json!({ "calculator": "ccs_percent", "income": "100000" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_decimal(&body["result"]["applicable_percent"], "88");
    assert_eq!(body["result"]["higher_rate_applied"], false);
    assert_decimal(&body["result"]["hourly_rate_cap"], "14.63");
}

#[tokio::test]
async fn test_ccs_percent_higher_rate_for_second_child() {
    let (status, body) = post_estimate(
        create_router_for_test(),
        json!({
            "calculator": "ccs_percent",
            "income": "150000",
            "higher_rate_requested": true,
            "children_in_care": 2
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_decimal(&body["result"]["applicable_percent"], "93");
    assert_decimal(&body["result"]["standard_percent"], "78");
    assert_eq!(body["result"]["higher_rate_applied"], true);
}

/// Scenario 5: six 12-hour days fill the 72-hour pool exactly
#[tokio::test]
async fn test_ccs_fortnightly_pool_exhaustion() {
    let day = session("120", "7", "19");
    let (status, body) = post_estimate(
        create_router_for_test(),
        json!({
            "calculator": "ccs_fortnightly",
            "rates": rates("85"),
            "schedule": schedule(vec![day.clone(); 8])
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let sessions = body["result"]["sessions"].as_array().unwrap();
    for estimate in &sessions[..6] {
        assert_decimal(&estimate["ccs"]["ccs_entitlement"], "96.90");
        assert_decimal(&estimate["top_up"]["estimated_gap_fee"], "23.10");
    }
    for estimate in &sessions[6..8] {
        assert_decimal(&estimate["ccs"]["ccs_entitlement"], "0");
        assert_decimal(&estimate["top_up"]["estimated_gap_fee"], "120");
    }

    let totals = &body["result"]["totals"];
    assert_decimal(&totals["ccs_hours_used"], "72");
    assert_decimal(&totals["gap_fee"], "378.60");
    assert!(warning_codes(&body).contains(&"CCS_HOURS_EXHAUSTED".to_string()));
}

#[tokio::test]
async fn test_ccs_fortnightly_higher_activity_covers_all() {
    let day = session("120", "7", "19");
    let (status, body) = post_estimate(
        create_router_for_test(),
        json!({
            "calculator": "ccs_fortnightly",
            "rates": rates("85"),
            "activity_level": "higher_activity",
            "schedule": schedule(vec![day.clone(); 8])
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    // 96 of 100 hours used, every day subsidised
    assert_decimal(&body["result"]["totals"]["ccs_hours_used"], "96");
    assert!(warning_codes(&body).is_empty());
}

#[tokio::test]
async fn test_weekly_gaps_week_two_costs_more() {
    let (status, body) = post_estimate(
        create_router_for_test(),
        json!({
            "calculator": "weekly_gaps",
            "rates": rates("85"),
            "session_fee": "120",
            "session_hours": "12",
            "days_per_week": 4
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let comparison = &body["result"]["comparison"];
    assert_decimal(&comparison["week_one"]["weekly_gap_fee"], "92.40");
    assert_decimal(&comparison["week_two"]["weekly_gap_fee"], "286.20");
    assert!(warning_codes(&body).contains(&"CCS_HOURS_EXHAUSTED".to_string()));
}

#[tokio::test]
async fn test_weekly_gaps_pool_covers_both_weeks() {
    let (status, body) = post_estimate(
        create_router_for_test(),
        json!({
            "calculator": "weekly_gaps",
            "rates": rates("85"),
            "session_fee": "120",
            "session_hours": "10",
            "days_per_week": 3
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["result"]["comparison"].is_null());
    assert!(warning_codes(&body).is_empty());
}

#[tokio::test]
async fn test_weekly_gaps_empty_pool_has_no_comparison() {
    let (status, body) = post_estimate(
        create_router_for_test(),
        json!({
            "calculator": "weekly_gaps",
            "rates": rates("85"),
            "session_fee": "120",
            "session_hours": "12",
            "days_per_week": 2,
            "fortnightly_ccs_hours": "0"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["result"]["comparison"].is_null());
    assert!(warning_codes(&body).is_empty());
}

#[tokio::test]
async fn test_weekly_gaps_fully_topped_up_weeks_are_not_flagged() {
    let (status, body) = post_estimate(
        create_router_for_test(),
        json!({
            "calculator": "weekly_gaps",
            "rates": rates("85"),
            "session_fee": "120",
            "session_hours": "12",
            "days_per_week": 4,
            "daily_top_up": "500"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let comparison = &body["result"]["comparison"];
    assert_decimal(&comparison["week_one"]["weekly_gap_fee"], "0");
    assert_decimal(&comparison["week_two"]["weekly_gap_fee"], "0");
    assert!(warning_codes(&body).is_empty());
}

// =============================================================================
// ACT
// =============================================================================

/// Scenario 3: $150 for 10 hours at 85% with a 6-hour program
#[tokio::test]
async fn test_act_daily_worked_example() {
    let (status, body) = post_estimate(
        create_router_for_test(),
        json!({
            "calculator": "act_daily",
            "rates": rates("85"),
            "session": session("150", "8", "18"),
            "program_hours_per_day": "6"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let result = &body["result"];
    assert_decimal(&result["ccs"]["ccs_amount"], "124.40");
    assert_decimal(&result["top_up"]["gap_before_top_up"], "25.60");
    assert_decimal(&result["top_up"]["top_up_amount"], "15.36");
    assert_decimal(&result["top_up"]["estimated_gap_fee"], "10.24");
}

#[tokio::test]
async fn test_act_fortnightly_weekly_program_hours_run_out() {
    let day = preschool_session("150", "8", "18", ("9", "15"));
    let week = vec![day.clone(), day.clone(), day.clone(), unbooked(), unbooked()];
    let mut booked = week.clone();
    booked.extend(week);

    let (status, body) = post_estimate(
        create_router_for_test(),
        json!({
            "calculator": "act_fortnightly",
            "rates": rates("85"),
            "schedule": schedule(booked)
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let result = &body["result"];
    assert_decimal(&result["weekly_program_hours"], "7.5");

    let sessions = result["estimate"]["sessions"].as_array().unwrap();
    assert_decimal(&sessions[0]["top_up"]["estimated_gap_fee"], "10.24");
    assert_decimal(&sessions[1]["top_up"]["estimated_gap_fee"], "21.76");
    assert_decimal(&sessions[2]["top_up"]["estimated_gap_fee"], "25.60");
    assert_decimal(&sessions[5]["top_up"]["estimated_gap_fee"], "10.24");

    assert!(warning_codes(&body).contains(&"TOP_UP_HOURS_EXHAUSTED".to_string()));
}

#[tokio::test]
async fn test_act_fortnightly_program_weeks_override() {
    let day = preschool_session("150", "8", "18", ("9", "15"));

    let (status, body) = post_estimate(
        create_router_for_test(),
        json!({
            "calculator": "act_fortnightly",
            "rates": rates("85"),
            "schedule": schedule(vec![day]),
            "program_weeks": "50"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_decimal(&body["result"]["weekly_program_hours"], "6");
    assert!(warning_codes(&body).is_empty());
}

// =============================================================================
// NSW
// =============================================================================

/// Scenario 6: Case Study 1, four days a week at 36%
#[tokio::test]
async fn test_nsw_daily_case_study_one() {
    let (status, body) = post_estimate(
        create_router_for_test(),
        json!({
            "calculator": "nsw_daily",
            "rates": rates("36"),
            "session": session("150", "8", "18"),
            "enrolment": {
                "age_group": "four_and_above",
                "tier": "maximum",
                "service_weeks": "49"
            },
            "days_per_week": 4
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let result = &body["result"];
    assert_decimal(&result["weekly_fee_relief"], "52.31");
    assert_decimal(&result["daily_fee_relief"], "13.08");
    assert_decimal(&result["top_up"]["estimated_gap_fee"], "86.86");
}

#[tokio::test]
async fn test_nsw_fortnightly_relief_shared_across_week() {
    let day = session("150", "8", "18");
    let mut booked = vec![day.clone(); 4];
    booked.push(unbooked());
    booked.extend(vec![day.clone(); 2]);

    let (status, body) = post_estimate(
        create_router_for_test(),
        json!({
            "calculator": "nsw_fortnightly",
            "rates": rates("36"),
            "schedule": schedule(booked),
            "enrolment": {
                "age_group": "four_and_above",
                "tier": "maximum",
                "service_weeks": "49"
            }
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let result = &body["result"];
    assert_decimal(&result["week_one_daily_fee_relief"], "13.08");
    assert_decimal(&result["week_two_daily_fee_relief"], "26.16");
}

// =============================================================================
// QLD
// =============================================================================

/// Scenario 4: $125 for 10 hours at 60% with 7.5 kindy hours
#[tokio::test]
async fn test_qld_daily_published_example() {
    let (status, body) = post_estimate(
        create_router_for_test(),
        json!({
            "calculator": "qld_daily",
            "rates": rates("60"),
            "session": session("125", "8", "18"),
            "kindy_hours_per_day": "7.5"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let result = &body["result"];
    assert_decimal(&result["normalised_entitlement"], "71.25");
    assert_decimal(&result["top_up"]["gap_before_top_up"], "53.75");
    assert_decimal(&result["top_up"]["top_up_amount"], "40.31");
    assert_decimal(&result["top_up"]["estimated_gap_fee"], "13.44");
    assert!(warning_codes(&body).is_empty());
}

#[tokio::test]
async fn test_qld_fortnightly_two_kindy_days() {
    let day = preschool_session("125", "8", "18", ("8", "15.5"));

    let (status, body) = post_estimate(
        create_router_for_test(),
        json!({
            "calculator": "qld_fortnightly",
            "rates": rates("60"),
            "schedule": schedule(vec![day.clone(), day.clone(), day])
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let result = &body["result"];
    assert_decimal(&result["weekly_kindy_hours"], "15");
    let sessions = result["estimate"]["sessions"].as_array().unwrap();
    assert_decimal(&sessions[0]["top_up"]["estimated_gap_fee"], "13.44");
    assert_decimal(&sessions[1]["top_up"]["estimated_gap_fee"], "13.44");
    // The weekly 15 hours are used up by the first two days
    assert_decimal(&sessions[2]["program_hours"], "0");
    assert_decimal(&sessions[2]["top_up"]["estimated_gap_fee"], "53.75");
    assert!(warning_codes(&body).contains(&"TOP_UP_HOURS_EXHAUSTED".to_string()));
}

// =============================================================================
// VIC
// =============================================================================

#[tokio::test]
async fn test_vic_daily_standard_offset() {
    let (status, body) = post_estimate(
        create_router_for_test(),
        json!({
            "calculator": "vic_daily",
            "rates": rates("50"),
            "session": session("140", "8", "18"),
            "enrolment": { "kinder_hours_per_week": "15" },
            "days_per_week": 3
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let result = &body["result"];
    assert_decimal(&result["weekly_offset"], "52.53");
    assert_decimal(&result["daily_offset"], "17.51");
    assert_decimal(&result["top_up"]["estimated_gap_fee"], "55.99");
}

#[tokio::test]
async fn test_vic_fortnightly_priority_cohort() {
    let day = session("140", "8", "18");

    let (status, body) = post_estimate(
        create_router_for_test(),
        json!({
            "calculator": "vic_fortnightly",
            "rates": rates("50"),
            "schedule": schedule(vec![day.clone(); 3]),
            "enrolment": { "cohort": "priority", "kinder_hours_per_week": "15" }
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let result = &body["result"];
    assert_decimal(&result["weekly_offset"], "67.33");
    assert_decimal(&result["week_one_daily_offset"], "22.44");
    assert_decimal(&result["week_two_daily_offset"], "0");
}

// =============================================================================
// Error Cases
// =============================================================================

#[tokio::test]
async fn test_unknown_calculator_returns_400() {
    let (status, body) = post_estimate(
        create_router_for_test(),
        json!({ "calculator": "tas_daily" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn test_missing_content_type_returns_400() {
    let response = create_router_for_test()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/estimate")
                .body(Body::from("{}"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_negative_fee_returns_400() {
    let (status, body) = post_estimate(
        create_router_for_test(),
        json!({
            "calculator": "ccs_daily",
            "rates": rates("50"),
            "session": session("-10", "8", "18")
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_INPUT");
    assert_eq!(body["details"], "session.fee");
}

#[tokio::test]
async fn test_unrepresentable_fee_returns_400() {
    // A fee this size over a quarter hour has no representable hourly rate
    let (status, body) = post_estimate(
        create_router_for_test(),
        json!({
            "calculator": "ccs_daily",
            "rates": rates("85"),
            "session": session("30000000000000000000000000000", "8", "8.25")
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_INPUT");
    assert_eq!(body["details"], "session.fee");
}

#[tokio::test]
async fn test_fee_and_income_upper_bounds_return_400() {
    let router = create_router_for_test();

    let (status, body) = post_estimate(
        router.clone(),
        json!({
            "calculator": "weekly_gaps",
            "rates": rates("85"),
            "session_fee": "1000000.01",
            "session_hours": "10",
            "days_per_week": 3
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"], "session_fee");

    let (status, body) = post_estimate(
        router,
        json!({
            "calculator": "ccs_percent",
            "income": "50000000000000000000000000000"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"], "income");
}

#[tokio::test]
async fn test_reversed_session_is_not_applicable() {
    let (status, body) = post_estimate(
        create_router_for_test(),
        json!({
            "calculator": "ccs_daily",
            "rates": rates("50"),
            "session": session("100", "18", "8")
        }),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "NOT_APPLICABLE");
    assert_eq!(body["details"], "no_session_hours");
}

#[tokio::test]
async fn test_empty_fortnight_is_not_applicable() {
    let (status, body) = post_estimate(
        create_router_for_test(),
        json!({
            "calculator": "ccs_fortnightly",
            "rates": rates("50"),
            "schedule": schedule(vec![])
        }),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["details"], "no_booked_days");
}
