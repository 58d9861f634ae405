//! Response types for the estimator API.
//!
//! This module defines the estimate envelope returned by `/estimate`, the
//! error response structures, and the mapping from engine errors to HTTP
//! status codes.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculation::{
    ActDailyResult, ActFortnightlyResult, CcsDailyEstimate, CcsPercentEstimate,
    FortnightlyEstimate, NswDailyResult, NswFortnightlyResult, QldDailyResult,
    QldFortnightlyResult, VicDailyResult, VicFortnightlyResult, WeeklyGapComparison,
};
use crate::error::EngineError;
use crate::models::AuditTrace;

/// The result of one calculator, tagged with the calculator's name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "calculator", rename_all = "snake_case")]
pub enum EstimateOutcome {
    /// Subsidy percentage from family income.
    CcsPercent(CcsPercentEstimate),
    /// Subsidy and gap fee for one day.
    CcsDaily(CcsDailyEstimate),
    /// Subsidy and gap fees over a fortnight.
    CcsFortnightly(FortnightlyEstimate),
    /// Week one and week two gaps; `comparison` is absent when the pool
    /// covers both weeks.
    WeeklyGaps {
        /// The two weeks' gaps.
        comparison: Option<WeeklyGapComparison>,
    },
    /// ACT preschool for one day.
    ActDaily(ActDailyResult),
    /// ACT preschool over a fortnight.
    ActFortnightly(ActFortnightlyResult),
    /// NSW fee relief for one day.
    NswDaily(NswDailyResult),
    /// NSW fee relief over a fortnight.
    NswFortnightly(NswFortnightlyResult),
    /// QLD kindy for one day.
    QldDaily(QldDailyResult),
    /// QLD kindy over a fortnight.
    QldFortnightly(QldFortnightlyResult),
    /// VIC kindergarten offset for one day.
    VicDaily(VicDailyResult),
    /// VIC kindergarten offset over a fortnight.
    VicFortnightly(VicFortnightlyResult),
}

/// The envelope around every successful estimate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstimateResponse {
    /// Unique identifier for this estimate.
    pub estimate_id: Uuid,
    /// When the estimate was produced.
    pub timestamp: DateTime<Utc>,
    /// Version of the estimator that produced it.
    pub engine_version: String,
    /// Financial year of the rate tables used.
    pub financial_year: String,
    /// The calculator result.
    pub result: EstimateOutcome,
    /// Steps taken and warnings raised.
    pub audit_trace: AuditTrace,
}

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }

    /// Creates an invalid input error response.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new("INVALID_INPUT", message)
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        match error {
            EngineError::ConfigNotFound { path } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration error",
                    format!("Configuration file not found: {}", path),
                ),
            },
            EngineError::ConfigParseError { path, message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration parse error",
                    format!("Failed to parse {}: {}", path, message),
                ),
            },
            EngineError::NotApplicable { reason } => ApiErrorResponse {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                error: ApiError::with_details(
                    "NOT_APPLICABLE",
                    format!("No estimate: {}", reason),
                    serde_json::to_value(reason)
                        .ok()
                        .and_then(|value| value.as_str().map(str::to_string))
                        .unwrap_or_else(|| reason.to_string()),
                ),
            },
            EngineError::InvalidInput { field, message } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::with_details(
                    "INVALID_INPUT",
                    format!("Invalid input '{}': {}", field, message),
                    field,
                ),
            },
        }
    }
}
