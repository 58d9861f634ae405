//! Fortnightly schedule model.
//!
//! A fortnight is exactly ten weekday sessions: Monday to Friday of week one,
//! then Monday to Friday of week two. Order matters because subsidy and
//! program hour pools are consumed in schedule order.

use chrono::Weekday;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Session;

/// Number of sessions in one week of a schedule.
pub const SESSIONS_PER_WEEK: usize = 5;

/// Number of sessions in a fortnightly schedule.
pub const SESSIONS_PER_FORTNIGHT: usize = 10;

const WEEKDAYS: [Weekday; SESSIONS_PER_WEEK] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
];

/// Identifies which week of the fortnight a session belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Week {
    /// The first five sessions.
    One,
    /// The last five sessions.
    Two,
}

impl Week {
    /// Returns the zero-based index of the week.
    pub fn index(self) -> usize {
        match self {
            Week::One => 0,
            Week::Two => 1,
        }
    }
}

/// A session together with its position in the fortnight.
#[derive(Debug, Clone, Copy)]
pub struct ScheduledDay<'a> {
    /// Position in the schedule (0-9).
    pub index: usize,
    /// The week the session falls in.
    pub week: Week,
    /// The weekday label.
    pub weekday: Weekday,
    /// The session itself.
    pub session: &'a Session,
}

/// An ordered fortnight of ten sessions.
///
/// # Example
///
/// ```
/// use childcare_fee_estimator::models::{FortnightlySchedule, Session, Week};
/// use rust_decimal::Decimal;
///
/// let day = Session::new(Decimal::new(120, 0), Decimal::new(7, 0), Decimal::new(19, 0));
/// let schedule = FortnightlySchedule::from_week([day, day, day, Session::default(), Session::default()]);
///
/// assert_eq!(schedule.booked_days(Week::One), 3);
/// assert_eq!(schedule.booked_days(Week::Two), 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FortnightlySchedule {
    /// The ten sessions, Monday of week one first.
    pub sessions: [Session; SESSIONS_PER_FORTNIGHT],
}

impl FortnightlySchedule {
    /// Creates a schedule from ten sessions in fortnight order.
    pub fn new(sessions: [Session; SESSIONS_PER_FORTNIGHT]) -> Self {
        Self { sessions }
    }

    /// Creates a schedule that repeats the same week twice.
    pub fn from_week(week: [Session; SESSIONS_PER_WEEK]) -> Self {
        let mut sessions = [Session::default(); SESSIONS_PER_FORTNIGHT];
        sessions[..SESSIONS_PER_WEEK].copy_from_slice(&week);
        sessions[SESSIONS_PER_WEEK..].copy_from_slice(&week);
        Self { sessions }
    }

    /// Returns the week a schedule position belongs to.
    pub fn week_of(index: usize) -> Week {
        if index < SESSIONS_PER_WEEK {
            Week::One
        } else {
            Week::Two
        }
    }

    /// Returns the weekday label for a schedule position.
    pub fn weekday_of(index: usize) -> Weekday {
        WEEKDAYS[index % SESSIONS_PER_WEEK]
    }

    /// Iterates over the sessions in schedule order with their labels.
    pub fn days(&self) -> impl Iterator<Item = ScheduledDay<'_>> {
        self.sessions
            .iter()
            .enumerate()
            .map(|(index, session)| ScheduledDay {
                index,
                week: Self::week_of(index),
                weekday: Self::weekday_of(index),
                session,
            })
    }

    /// Returns the number of booked sessions in a week.
    pub fn booked_days(&self, week: Week) -> u32 {
        self.days()
            .filter(|day| day.week == week && day.session.is_booked())
            .count() as u32
    }

    /// Returns true if any session in the fortnight is booked.
    pub fn has_booked_day(&self) -> bool {
        self.sessions.iter().any(Session::is_booked)
    }

    /// Returns the total hours of all booked sessions.
    pub fn booked_hours(&self) -> Decimal {
        self.sessions
            .iter()
            .filter(|s| s.is_booked())
            .map(Session::hours)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn day() -> Session {
        Session::new(dec("120"), dec("7"), dec("19"))
    }

    #[test]
    fn test_week_partition() {
        assert_eq!(FortnightlySchedule::week_of(0), Week::One);
        assert_eq!(FortnightlySchedule::week_of(4), Week::One);
        assert_eq!(FortnightlySchedule::week_of(5), Week::Two);
        assert_eq!(FortnightlySchedule::week_of(9), Week::Two);
    }

    #[test]
    fn test_weekday_labels_repeat_each_week() {
        assert_eq!(FortnightlySchedule::weekday_of(0), Weekday::Mon);
        assert_eq!(FortnightlySchedule::weekday_of(4), Weekday::Fri);
        assert_eq!(FortnightlySchedule::weekday_of(5), Weekday::Mon);
        assert_eq!(FortnightlySchedule::weekday_of(7), Weekday::Wed);
    }

    #[test]
    fn test_from_week_repeats_sessions() {
        let schedule = FortnightlySchedule::from_week([
            day(),
            Session::default(),
            day(),
            Session::default(),
            Session::default(),
        ]);

        assert!(schedule.sessions[0].is_booked());
        assert!(schedule.sessions[5].is_booked());
        assert!(!schedule.sessions[6].is_booked());
        assert!(schedule.sessions[7].is_booked());
    }

    #[test]
    fn test_booked_days_counted_per_week() {
        let mut sessions = [Session::default(); SESSIONS_PER_FORTNIGHT];
        sessions[0] = day();
        sessions[1] = day();
        sessions[8] = day();
        let schedule = FortnightlySchedule::new(sessions);

        assert_eq!(schedule.booked_days(Week::One), 2);
        assert_eq!(schedule.booked_days(Week::Two), 1);
        assert_eq!(schedule.booked_hours(), dec("36"));
    }

    #[test]
    fn test_empty_schedule_has_no_booked_day() {
        assert!(!FortnightlySchedule::default().has_booked_day());
    }

    #[test]
    fn test_days_iterates_in_order() {
        let schedule = FortnightlySchedule::default();
        let indices: Vec<usize> = schedule.days().map(|d| d.index).collect();
        assert_eq!(indices, (0..SESSIONS_PER_FORTNIGHT).collect::<Vec<_>>());
    }

    #[test]
    fn test_deserialize_requires_ten_sessions() {
        let nine = serde_json::json!({ "sessions": vec![Session::default(); 9] });
        assert!(serde_json::from_value::<FortnightlySchedule>(nine).is_err());

        let ten = serde_json::json!({ "sessions": vec![Session::default(); 10] });
        assert!(serde_json::from_value::<FortnightlySchedule>(ten).is_ok());
    }
}
