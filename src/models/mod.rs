//! Core data models for the child care fee estimator.
//!
//! This module contains the domain inputs (sessions, schedules, care and
//! eligibility classifications) and the audit trace attached to estimates.

mod audit;
mod care;
mod schedule;
mod session;

pub use audit::{AuditStep, AuditTrace, AuditWarning};
pub use care::{ActivityLevel, CareType, NswAgeGroup, NswTier, VicCohort};
pub use schedule::{
    FortnightlySchedule, SESSIONS_PER_FORTNIGHT, SESSIONS_PER_WEEK, ScheduledDay, Week,
};
pub use session::{CcsRates, ProgramWindow, Session};
