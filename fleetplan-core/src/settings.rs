//! Solve pipeline configuration.

use std::time::Duration;

use crate::engine::SearchParams;

/// Tunable knobs for the formulate-solve-decode pipeline.
///
/// Each option has a sensible default. Loading values from the environment
/// or configuration files is the hosting shell's concern; the core only
/// consumes the resolved values.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use fleetplan_core::SolverSettings;
///
/// let settings = SolverSettings::default();
/// assert!(settings.use_service_time);
/// assert_eq!(settings.time_limit, Duration::from_secs(30));
/// assert!(!settings.log_search);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolverSettings {
    /// Fold per-node service times into arc costs.
    ///
    /// When disabled, service times are treated as zero everywhere and arc
    /// costs are pure travel costs.
    pub use_service_time: bool,
    /// Hard wall-clock budget for the engine's search.
    pub time_limit: Duration,
    /// Enable verbose engine diagnostics. No functional effect.
    pub log_search: bool,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            use_service_time: true,
            time_limit: Duration::from_secs(30),
            log_search: false,
        }
    }
}

impl SolverSettings {
    /// Derive the engine-facing search parameters.
    #[must_use]
    pub fn search_params(&self) -> SearchParams {
        SearchParams {
            time_limit: self.time_limit,
            log_search: self.log_search,
            ..SearchParams::default()
        }
    }
}
