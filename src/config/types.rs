//! Rate table types.
//!
//! This module contains the strongly-typed rate tables for a single financial
//! year. They deserialize from the YAML files in a configuration directory and
//! can also be built in code via [`RateTables::fy2025_26`].

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{ActivityLevel, CareType, NswAgeGroup, NswTier, VicCohort};

/// Metadata identifying the financial year the tables apply to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateMetadata {
    /// The financial year label (e.g., "2025-26").
    pub financial_year: String,
    /// The date the rates take effect.
    pub effective_date: NaiveDate,
    /// Where the published rates can be checked.
    pub source_url: String,
}

/// Hourly rate caps by care type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourlyRateCaps {
    /// Centre-based day care cap.
    pub centre_based_day_care: Decimal,
    /// Family day care cap.
    pub family_day_care: Decimal,
    /// Outside school hours care cap.
    pub outside_school_hours_care: Decimal,
    /// In-home care cap (per family).
    pub in_home_care: Decimal,
}

/// Subsidised hours per fortnight for each activity-test tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityHours {
    /// Hours guaranteed to every eligible family.
    pub three_day_guarantee: Decimal,
    /// Hours for families above the higher activity threshold.
    pub higher_activity: Decimal,
}

/// Child Care Subsidy tables from ccs.yaml.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CcsConfig {
    /// Hourly rate caps.
    pub hourly_rate_caps: HourlyRateCaps,
    /// Activity-test hour tiers.
    pub activity_hours: ActivityHours,
    /// Withholding applied when the family has not chosen another rate.
    pub default_withholding_percent: Decimal,
}

/// ACT three-year-old preschool program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActProgram {
    /// Funded program hours per year.
    pub annual_program_hours: Decimal,
    /// Program weeks used when the service does not specify its own.
    pub default_program_weeks: Decimal,
}

/// NSW annual fee relief amounts for one age group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NswTierAmounts {
    /// Maximum tier amount.
    pub maximum: Decimal,
    /// Intermediate tier amount.
    pub intermediate: Decimal,
    /// Base tier amount.
    pub base: Decimal,
}

impl NswTierAmounts {
    /// Returns the amount for a tier.
    pub fn for_tier(&self, tier: NswTier) -> Decimal {
        match tier {
            NswTier::Maximum => self.maximum,
            NswTier::Intermediate => self.intermediate,
            NswTier::Base => self.base,
        }
    }
}

/// NSW long day care fee relief.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NswProgram {
    /// Amounts for three-year-olds.
    pub three_year_old: NswTierAmounts,
    /// Amounts for children four and above.
    pub four_and_above: NswTierAmounts,
}

/// QLD kindy funding in long day care.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QldProgram {
    /// Funded kindy hours per week.
    pub weekly_kindy_hours: Decimal,
    /// Withholding rate the QLD worked examples assume.
    pub normalised_withholding_percent: Decimal,
}

/// VIC kindergarten offset in long day care.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VicProgram {
    /// Annual offset for the standard cohort.
    pub standard_annual_offset: Decimal,
    /// Annual offset for priority cohorts.
    pub priority_annual_offset: Decimal,
    /// Program weeks per year.
    pub program_weeks: Decimal,
    /// Weekly kinder hours the annual offset is based on.
    pub baseline_weekly_hours: Decimal,
}

/// State program tables from programs.yaml.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramConfig {
    /// ACT preschool.
    pub act: ActProgram,
    /// NSW fee relief.
    pub nsw: NswProgram,
    /// QLD kindy.
    pub qld: QldProgram,
    /// VIC kinder offset.
    pub vic: VicProgram,
}

/// The complete rate tables for one financial year.
///
/// # Example
///
/// ```
/// use childcare_fee_estimator::config::RateTables;
/// use childcare_fee_estimator::models::{ActivityLevel, CareType};
/// use rust_decimal::Decimal;
///
/// let tables = RateTables::fy2025_26();
/// assert_eq!(tables.hourly_rate_cap(CareType::CentreBasedDayCare), Decimal::new(1463, 2));
/// assert_eq!(tables.fortnightly_ccs_hours(ActivityLevel::ThreeDayGuarantee), Decimal::new(72, 0));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateTables {
    metadata: RateMetadata,
    ccs: CcsConfig,
    programs: ProgramConfig,
}

impl RateTables {
    /// Creates rate tables from their component parts.
    pub fn new(metadata: RateMetadata, ccs: CcsConfig, programs: ProgramConfig) -> Self {
        Self {
            metadata,
            ccs,
            programs,
        }
    }

    /// The bundled tables for the 2025-26 financial year.
    pub fn fy2025_26() -> Self {
        let metadata = RateMetadata {
            financial_year: "2025-26".to_string(),
            effective_date: NaiveDate::from_ymd_opt(2025, 7, 1).unwrap_or_default(),
            source_url: "https://www.education.gov.au/early-childhood/ccs".to_string(),
        };

        let ccs = CcsConfig {
            hourly_rate_caps: HourlyRateCaps {
                centre_based_day_care: Decimal::new(1463, 2),
                family_day_care: Decimal::new(1356, 2),
                outside_school_hours_care: Decimal::new(1281, 2),
                in_home_care: Decimal::new(3980, 2),
            },
            activity_hours: ActivityHours {
                three_day_guarantee: Decimal::new(72, 0),
                higher_activity: Decimal::new(100, 0),
            },
            default_withholding_percent: Decimal::new(5, 0),
        };

        let programs = ProgramConfig {
            act: ActProgram {
                annual_program_hours: Decimal::new(300, 0),
                default_program_weeks: Decimal::new(40, 0),
            },
            nsw: NswProgram {
                three_year_old: NswTierAmounts {
                    maximum: Decimal::new(1422, 0),
                    intermediate: Decimal::new(1138, 0),
                    base: Decimal::new(853, 0),
                },
                four_and_above: NswTierAmounts {
                    maximum: Decimal::new(2563, 0),
                    intermediate: Decimal::new(2050, 0),
                    base: Decimal::new(1538, 0),
                },
            },
            qld: QldProgram {
                weekly_kindy_hours: Decimal::new(15, 0),
                normalised_withholding_percent: Decimal::new(5, 0),
            },
            vic: VicProgram {
                standard_annual_offset: Decimal::new(2101, 0),
                priority_annual_offset: Decimal::new(2693, 0),
                program_weeks: Decimal::new(40, 0),
                baseline_weekly_hours: Decimal::new(15, 0),
            },
        };

        Self::new(metadata, ccs, programs)
    }

    /// Returns the table metadata.
    pub fn metadata(&self) -> &RateMetadata {
        &self.metadata
    }

    /// Returns the Child Care Subsidy tables.
    pub fn ccs(&self) -> &CcsConfig {
        &self.ccs
    }

    /// Returns the state program tables.
    pub fn programs(&self) -> &ProgramConfig {
        &self.programs
    }

    /// Returns the hourly rate cap for a care type.
    pub fn hourly_rate_cap(&self, care_type: CareType) -> Decimal {
        let caps = &self.ccs.hourly_rate_caps;
        match care_type {
            CareType::CentreBasedDayCare => caps.centre_based_day_care,
            CareType::FamilyDayCare => caps.family_day_care,
            CareType::OutsideSchoolHoursCare => caps.outside_school_hours_care,
            CareType::InHomeCare => caps.in_home_care,
        }
    }

    /// Returns the fortnightly subsidised hours for an activity level.
    pub fn fortnightly_ccs_hours(&self, level: ActivityLevel) -> Decimal {
        match level {
            ActivityLevel::ThreeDayGuarantee => self.ccs.activity_hours.three_day_guarantee,
            ActivityLevel::HigherActivity => self.ccs.activity_hours.higher_activity,
        }
    }

    /// Returns the NSW annual fee relief for an age group and tier.
    pub fn nsw_annual_fee_relief(&self, age_group: NswAgeGroup, tier: NswTier) -> Decimal {
        let amounts = match age_group {
            NswAgeGroup::ThreeYearOld => &self.programs.nsw.three_year_old,
            NswAgeGroup::FourAndAbove => &self.programs.nsw.four_and_above,
        };
        amounts.for_tier(tier)
    }

    /// Returns the VIC annual offset for a cohort.
    pub fn vic_annual_offset(&self, cohort: VicCohort) -> Decimal {
        match cohort {
            VicCohort::Standard => self.programs.vic.standard_annual_offset,
            VicCohort::Priority => self.programs.vic.priority_annual_offset,
        }
    }
}

impl Default for RateTables {
    fn default() -> Self {
        Self::fy2025_26()
    }
}
