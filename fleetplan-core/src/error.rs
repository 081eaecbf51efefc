//! Error types surfaced by the formulation and solve pipeline.
//!
//! Formulation failures stay distinguishable from engine failures so
//! callers can tell bad input apart from an exhausted or broken search,
//! even though a shell may choose to surface both identically.

use thiserror::Error;

use crate::matrix::MatrixError;

/// The raw input could not be turned into a normalized problem.
///
/// No partial problem is ever produced; the first inconsistency aborts
/// formulation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormulationError {
    /// The distance matrix was not square.
    #[error(transparent)]
    Matrix(#[from] MatrixError),
    /// A vehicle starts outside the distance matrix.
    #[error("vehicle {vehicle} start index {index} is outside the {nodes}-node matrix")]
    StartOutOfRange {
        /// Offending vehicle id.
        vehicle: u64,
        /// The out-of-range start index.
        index: usize,
        /// Number of original nodes.
        nodes: usize,
    },
    /// A job is located outside the distance matrix.
    #[error("job {job} location index {index} is outside the {nodes}-node matrix")]
    LocationOutOfRange {
        /// Offending job id.
        job: u64,
        /// The out-of-range location index.
        index: usize,
        /// Number of original nodes.
        nodes: usize,
    },
    /// No vehicles were supplied.
    #[error("fleet is empty")]
    EmptyFleet,
}

/// Errors returned by [`RoutePlanner::solve`](crate::RoutePlanner::solve).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SolveError {
    /// The input never became a valid problem.
    #[error(transparent)]
    Formulation(#[from] FormulationError),
    /// The engine exhausted its budget without a feasible assignment.
    ///
    /// Timeout and genuine infeasibility are indistinguishable here; the
    /// engine reports neither which applies.
    #[error("no solution found")]
    NoSolutionFound,
    /// The engine failed outright while building or searching its model.
    #[error("engine failure: {message}")]
    Engine {
        /// Engine-reported diagnostic.
        message: String,
    },
}
