//! The problem formulator.
//!
//! [`formulate`] converts raw fleet/job input into a [`NormalizedProblem`]:
//! the distance matrix augmented with a dummy terminal node, per-vehicle
//! start/end/capacity vectors, per-node aggregate demand and service time,
//! and a node-to-jobs lookup. The normalized problem is built fresh per
//! solve and owns everything the adapter and decoder need.

use std::collections::BTreeMap;

use crate::error::FormulationError;
use crate::fleet::{Job, Vehicle};
use crate::matrix::DistanceMatrix;
use crate::settings::SolverSettings;

/// Sum a multi-commodity quantity vector into a single scalar.
///
/// This is a deliberate, lossy reduction: the engine tracks one capacity
/// dimension, so per-commodity distinctions are discarded. A fleet that is
/// infeasible per commodity but feasible in aggregate will not be caught.
///
/// # Examples
/// ```
/// use fleetplan_core::collapse_commodities;
///
/// assert_eq!(collapse_commodities(&[2, 3, 5]), 10);
/// assert_eq!(collapse_commodities(&[]), 0);
/// ```
#[must_use]
pub fn collapse_commodities(quantities: &[u64]) -> u64 {
    quantities.iter().sum()
}

/// A solver-ready routing problem.
///
/// Node indices run over the augmented matrix: the original nodes first,
/// then the dummy terminal at [`terminal_index`](Self::terminal_index).
/// Every vehicle ends at the terminal, which costs nothing to reach from
/// anywhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedProblem {
    num_vehicles: usize,
    matrix: DistanceMatrix,
    service_times: Vec<u64>,
    vehicle_starts: Vec<usize>,
    vehicle_ends: Vec<usize>,
    vehicle_capacities: Vec<u64>,
    node_demands: Vec<u64>,
    node_jobs: BTreeMap<usize, Vec<u64>>,
}

impl NormalizedProblem {
    /// Node count including the dummy terminal.
    #[must_use]
    pub fn num_nodes(&self) -> usize {
        self.matrix.size()
    }

    /// Number of vehicles in the fleet.
    #[must_use]
    pub const fn num_vehicles(&self) -> usize {
        self.num_vehicles
    }

    /// Index of the dummy terminal node.
    #[must_use]
    pub fn terminal_index(&self) -> usize {
        self.matrix.size() - 1
    }

    /// Cost of traversing the arc `from -> to`.
    ///
    /// Travel cost plus the service time accumulated at the departure node.
    /// This is the single cost function registered with the engine and
    /// replayed by the decoder, so both always agree.
    #[must_use]
    pub fn transit_cost(&self, from: usize, to: usize) -> u64 {
        self.matrix.cost(from, to) + self.service_time(from)
    }

    /// Aggregate service time at `node`.
    #[must_use]
    pub fn service_time(&self, node: usize) -> u64 {
        self.service_times.get(node).copied().unwrap_or(0)
    }

    /// Aggregate delivery demand at `node`.
    #[must_use]
    pub fn demand(&self, node: usize) -> u64 {
        self.node_demands.get(node).copied().unwrap_or(0)
    }

    /// Per-vehicle start node indices.
    #[must_use]
    pub fn starts(&self) -> &[usize] {
        &self.vehicle_starts
    }

    /// Per-vehicle end node indices; all equal to the terminal.
    #[must_use]
    pub fn ends(&self) -> &[usize] {
        &self.vehicle_ends
    }

    /// Per-vehicle scalar capacities (commodities collapsed).
    #[must_use]
    pub fn capacities(&self) -> &[u64] {
        &self.vehicle_capacities
    }

    /// Jobs hosted at `node`, in input order; `None` for jobless nodes.
    #[must_use]
    pub fn jobs_at(&self, node: usize) -> Option<&[u64]> {
        self.node_jobs.get(&node).map(Vec::as_slice)
    }

    /// The augmented distance matrix.
    #[must_use]
    pub const fn matrix(&self) -> &DistanceMatrix {
        &self.matrix
    }
}

/// Turn raw fleet/job input into a [`NormalizedProblem`].
///
/// Appends the dummy terminal node, aggregates demands and service times of
/// co-located jobs, collapses multi-commodity capacities, and records which
/// jobs live at which node. No partial result is returned on failure.
///
/// # Errors
/// - [`FormulationError::Matrix`] if the matrix is not square.
/// - [`FormulationError::EmptyFleet`] if no vehicles were supplied.
/// - [`FormulationError::StartOutOfRange`] /
///   [`FormulationError::LocationOutOfRange`] if an index escapes the
///   original matrix.
pub fn formulate(
    vehicles: &[Vehicle],
    jobs: &[Job],
    matrix: Vec<Vec<u64>>,
    settings: &SolverSettings,
) -> Result<NormalizedProblem, FormulationError> {
    let base = DistanceMatrix::new(matrix)?;
    let original_nodes = base.size();

    if vehicles.is_empty() {
        return Err(FormulationError::EmptyFleet);
    }
    for vehicle in vehicles {
        if vehicle.start_index >= original_nodes {
            return Err(FormulationError::StartOutOfRange {
                vehicle: vehicle.id,
                index: vehicle.start_index,
                nodes: original_nodes,
            });
        }
    }
    for job in jobs {
        if job.location_index >= original_nodes {
            return Err(FormulationError::LocationOutOfRange {
                job: job.id,
                index: job.location_index,
                nodes: original_nodes,
            });
        }
    }

    let augmented = base.with_terminal();
    let num_nodes = augmented.size();
    let terminal = num_nodes - 1;

    let mut service_times = vec![0_u64; num_nodes];
    if settings.use_service_time {
        for job in jobs {
            if let Some(slot) = service_times.get_mut(job.location_index) {
                *slot += job.service;
            }
        }
    }

    let mut node_demands = vec![0_u64; num_nodes];
    let mut node_jobs: BTreeMap<usize, Vec<u64>> = BTreeMap::new();
    for job in jobs {
        if let Some(slot) = node_demands.get_mut(job.location_index) {
            *slot += collapse_commodities(&job.delivery);
        }
        node_jobs.entry(job.location_index).or_default().push(job.id);
    }

    Ok(NormalizedProblem {
        num_vehicles: vehicles.len(),
        matrix: augmented,
        service_times,
        vehicle_starts: vehicles.iter().map(|v| v.start_index).collect(),
        vehicle_ends: vec![terminal; vehicles.len()],
        vehicle_capacities: vehicles
            .iter()
            .map(|v| collapse_commodities(&v.capacity))
            .collect(),
        node_demands,
        node_jobs,
    })
}
