//! Care and eligibility classifications.
//!
//! These enums select rows from the rate tables: the hourly rate cap for a
//! care type, the fortnightly subsidised hours for an activity level, and the
//! state program amounts for an age group, tier or cohort.

use serde::{Deserialize, Serialize};

/// The type of approved child care service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CareType {
    /// Long day care and other centre-based care.
    #[default]
    CentreBasedDayCare,
    /// Family day care.
    FamilyDayCare,
    /// Before/after school and vacation care.
    OutsideSchoolHoursCare,
    /// Care provided in the child's home.
    InHomeCare,
}

/// The activity-test tier that sets the fortnightly subsidised hours.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    /// The guaranteed minimum available to every eligible family.
    #[default]
    ThreeDayGuarantee,
    /// Families whose recognised activity exceeds 48 hours a fortnight.
    HigherActivity,
}

/// Age group used by the NSW fee relief program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NswAgeGroup {
    /// Children aged three.
    ThreeYearOld,
    /// Children aged four and above, in the year before school.
    FourAndAbove,
}

/// Fee relief tier assigned to a NSW service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NswTier {
    /// Full fee relief.
    Maximum,
    /// Reduced fee relief.
    Intermediate,
    /// Lowest fee relief.
    Base,
}

/// Cohort used by the VIC kindergarten offset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VicCohort {
    /// Children not in a priority cohort.
    #[default]
    Standard,
    /// Priority cohorts receive a higher offset.
    Priority,
}
