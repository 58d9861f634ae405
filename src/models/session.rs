//! Session model and related types.
//!
//! This module defines the [`Session`] struct describing one day of care,
//! the optional [`ProgramWindow`] during which state-funded kindergarten or
//! preschool hours run, and the [`CcsRates`] applied to a session.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The part of a session during which a state-funded program runs.
///
/// Times are hours of the day, fractional (8.5 = 8:30am).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramWindow {
    /// The hour the program starts.
    pub start_hour: Decimal,
    /// The hour the program ends.
    pub end_hour: Decimal,
}

/// Represents one day of care.
///
/// A session whose end is at or before its start, or whose fee is not
/// positive, is treated as not booked and contributes nothing to any estimate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// The fee charged for the session.
    pub fee: Decimal,
    /// The hour the session starts (fractional, e.g. 8.5 = 8:30am).
    pub start_hour: Decimal,
    /// The hour the session ends.
    pub end_hour: Decimal,
    /// When state-funded program hours occur within the session, if any.
    #[serde(default)]
    pub program_window: Option<ProgramWindow>,
}

impl Session {
    /// Creates a session without a program window.
    ///
    /// # Examples
    ///
    /// ```
    /// use childcare_fee_estimator::models::Session;
    /// use rust_decimal::Decimal;
    ///
    /// let session = Session::new(Decimal::new(150, 0), Decimal::new(8, 0), Decimal::new(18, 0));
    /// assert_eq!(session.hours(), Decimal::new(10, 0));
    /// assert!(session.is_booked());
    /// ```
    pub fn new(fee: Decimal, start_hour: Decimal, end_hour: Decimal) -> Self {
        Self {
            fee,
            start_hour,
            end_hour,
            program_window: None,
        }
    }

    /// Returns the session with a program window attached.
    pub fn with_program_window(mut self, start_hour: Decimal, end_hour: Decimal) -> Self {
        self.program_window = Some(ProgramWindow {
            start_hour,
            end_hour,
        });
        self
    }

    /// Returns the length of the session in hours, or zero when the session
    /// ends at or before it starts.
    pub fn hours(&self) -> Decimal {
        (self.end_hour - self.start_hour).max(Decimal::ZERO)
    }

    /// Returns true if the session has positive hours and a positive fee.
    pub fn is_booked(&self) -> bool {
        self.end_hour > self.start_hour && self.fee > Decimal::ZERO
    }

    /// Returns the hours of the program window that fall inside the session.
    ///
    /// # Examples
    ///
    /// ```
    /// use childcare_fee_estimator::models::Session;
    /// use rust_decimal::Decimal;
    ///
    /// // Program runs 7:00-13:00 but the child only arrives at 8:00
    /// let session = Session::new(Decimal::new(150, 0), Decimal::new(8, 0), Decimal::new(18, 0))
    ///     .with_program_window(Decimal::new(7, 0), Decimal::new(13, 0));
    /// assert_eq!(session.program_hours(), Decimal::new(5, 0));
    /// ```
    pub fn program_hours(&self) -> Decimal {
        match self.program_window {
            Some(window) => {
                let start = window.start_hour.max(self.start_hour);
                let end = window.end_hour.min(self.end_hour);
                (end - start).max(Decimal::ZERO)
            }
            None => Decimal::ZERO,
        }
    }

    /// Returns how many hours after the session start the program begins.
    ///
    /// Zero when there is no window or the window opens before the session.
    pub fn program_start_offset(&self) -> Decimal {
        self.program_window
            .map(|window| (window.start_hour - self.start_hour).max(Decimal::ZERO))
            .unwrap_or(Decimal::ZERO)
    }
}

/// The Child Care Subsidy parameters applied to a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CcsRates {
    /// The family's subsidy percentage (0-100).
    pub ccs_percent: Decimal,
    /// The percentage of subsidy withheld by the government (0-100).
    pub withholding_percent: Decimal,
    /// The legislated hourly rate cap for the care type.
    pub hourly_rate_cap: Decimal,
}
