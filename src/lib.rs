//! Facade crate for the Fleetplan routing engine.
//!
//! This crate re-exports the formulation core and exposes the optional
//! `vrp-core` backed engine behind a feature flag. Most users want
//! [`RoutePlanner`] paired with `VrpEngine`:
//!
//! ```
//! # #[cfg(feature = "engine-vrp")]
//! # {
//! use fleetplan_engine::{RoutePlanner, VrpEngine};
//!
//! let planner = RoutePlanner::new(VrpEngine::new());
//! # let _ = planner;
//! # }
//! ```

#![forbid(unsafe_code)]

pub use fleetplan_core::{
    ArcCostFn, Assignment, CapacityDimension, DemandFn, DistanceMatrix, EngineError,
    FirstSolutionStrategy, FormulationError, Job, LocalSearchMetaheuristic, MatrixError,
    ModelBuilder, ModelError, ModelSpec, NormalizedProblem, Route, RoutePlanner, RoutingEngine,
    RoutingIndex, SearchParams, Solution, SolveError, SolverSettings, Vehicle,
    collapse_commodities, formulate,
};

#[cfg(feature = "test-support")]
pub use fleetplan_core::test_support;

#[cfg(feature = "engine-vrp")]
pub use fleetplan_engine_vrp::{VrpEngine, VrpEngineConfig};
