//! Application state for the estimator API.
//!
//! Handlers share one set of rate tables for the life of the process.

use std::sync::Arc;

use crate::config::ConfigLoader;

/// Shared application state.
///
/// Holds the rate tables loaded at startup.
#[derive(Clone)]
pub struct AppState {
    /// The loaded rate tables.
    config: Arc<ConfigLoader>,
}

impl AppState {
    /// Creates a new application state with the given configuration loader.
    pub fn new(config: ConfigLoader) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Returns a reference to the configuration loader.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_tables() {
        let state = AppState::new(ConfigLoader::bundled());
        let clone = state.clone();
        assert!(std::ptr::eq(state.config(), clone.config()));
        assert_eq!(clone.config().tables().metadata().financial_year, "2025-26");
    }
}
