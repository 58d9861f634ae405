//! HTTP API for the fee estimator.
//!
//! `POST /estimate` runs one calculator and `GET /rates` returns the rate
//! tables in use.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{
    ActDailyRequest, ActFortnightlyRequest, CcsPercentRequest, CcsRatesRequest, DailyRequest,
    EstimateRequest, FortnightlyRequest, NswDailyRequest, NswFortnightlyRequest, QldDailyRequest,
    VicDailyRequest, VicFortnightlyRequest, WeeklyGapsRequest,
};
pub use response::{ApiError, ApiErrorResponse, EstimateOutcome, EstimateResponse};
pub use state::AppState;
