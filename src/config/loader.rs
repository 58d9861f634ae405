//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading rate tables
//! from YAML files.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{EngineError, EngineResult};

use super::types::{CcsConfig, ProgramConfig, RateMetadata, RateTables};

/// Loads and provides access to a financial year's rate tables.
///
/// # Directory Structure
///
/// ```text
/// config/fy2025-26/
/// ├── metadata.yaml   # Financial year and source
/// ├── ccs.yaml        # Hourly rate caps, activity hours, withholding
/// └── programs.yaml   # ACT, NSW, QLD and VIC program amounts
/// ```
///
/// # Example
///
/// ```no_run
/// use childcare_fee_estimator::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/fy2025-26")?;
/// println!("Rates for {}", loader.tables().metadata().financial_year);
/// # Ok::<(), childcare_fee_estimator::error::EngineError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    tables: RateTables,
}

impl ConfigLoader {
    /// Loads rate tables from the specified directory.
    ///
    /// Returns an error if any of the three files is missing or is not valid
    /// YAML for its table.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let metadata = Self::load_yaml::<RateMetadata>(&path.join("metadata.yaml"))?;
        let ccs = Self::load_yaml::<CcsConfig>(&path.join("ccs.yaml"))?;
        let programs = Self::load_yaml::<ProgramConfig>(&path.join("programs.yaml"))?;

        Ok(Self {
            tables: RateTables::new(metadata, ccs, programs),
        })
    }

    /// Wraps the bundled tables for the current financial year.
    pub fn bundled() -> Self {
        Self {
            tables: RateTables::fy2025_26(),
        }
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        debug!(path = %path_str, "Loaded rate table file");

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the loaded rate tables.
    pub fn tables(&self) -> &RateTables {
        &self.tables
    }
}
