//! Problem formulation and solution decoding for capacitated vehicle routing.
//!
//! The crate turns a raw fleet/job description into a normalized,
//! solver-ready problem, hands it to a pluggable routing engine behind a
//! narrow contract, and decodes the engine's raw per-vehicle assignment back
//! into business-meaningful routes. The combinatorial search itself lives
//! behind the [`RoutingEngine`] trait; this crate never depends on a
//! particular engine's internals.

#![forbid(unsafe_code)]

mod engine;
mod error;
mod fleet;
mod matrix;
mod problem;
mod route;
mod settings;
mod solve;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use engine::{
    ArcCostFn, Assignment, CapacityDimension, DemandFn, EngineError, FirstSolutionStrategy,
    LocalSearchMetaheuristic, ModelBuilder, ModelError, ModelSpec, RoutingEngine, RoutingIndex,
    SearchParams,
};
pub use error::{FormulationError, SolveError};
pub use fleet::{Job, Vehicle};
pub use matrix::{DistanceMatrix, MatrixError};
pub use problem::{NormalizedProblem, collapse_commodities, formulate};
pub use route::{Route, Solution};
pub use settings::SolverSettings;
pub use solve::RoutePlanner;
