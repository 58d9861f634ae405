//! Rate tables and configuration loading.
//!
//! The calculators read hourly rate caps, activity-test hours and state
//! program amounts from a [`RateTables`] value. The tables for the current
//! financial year are compiled in; the HTTP service can load another year
//! from a directory of YAML files.
//!
//! # Example
//!
//! ```no_run
//! use childcare_fee_estimator::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/fy2025-26").unwrap();
//! println!("Financial year: {}", config.tables().metadata().financial_year);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    ActProgram, ActivityHours, CcsConfig, HourlyRateCaps, NswProgram, NswTierAmounts,
    ProgramConfig, QldProgram, RateMetadata, RateTables, VicProgram,
};
