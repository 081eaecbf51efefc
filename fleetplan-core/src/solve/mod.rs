//! The formulate-solve-decode pipeline.
//!
//! [`RoutePlanner`] owns a [`RoutingEngine`] and some [`SolverSettings`] and
//! runs the whole single-pass pipeline: formulate the problem, register the
//! model with the engine, search, then decode the raw assignment into a
//! [`Solution`]. Each invocation builds its own problem and model; nothing
//! is shared between concurrent solves.

use std::sync::Arc;

use crate::engine::{Assignment, EngineError, ModelSpec, RoutingEngine, RoutingIndex};
use crate::error::SolveError;
use crate::fleet::{Job, Vehicle};
use crate::problem::{NormalizedProblem, formulate};
use crate::route::{Route, Solution};
use crate::settings::SolverSettings;

/// Plans delivery routes for a fleet using a pluggable routing engine.
///
/// # Examples
/// ```
/// use fleetplan_core::{
///     Assignment, EngineError, ModelSpec, RoutePlanner, RoutingEngine, SearchParams, Vehicle,
/// };
///
/// /// Engine that sends every vehicle straight to its end variable.
/// struct IdleEngine;
///
/// impl RoutingEngine for IdleEngine {
///     fn search(
///         &self,
///         model: &ModelSpec,
///         _params: &SearchParams,
///     ) -> Result<Assignment, EngineError> {
///         let idle = vec![Vec::new(); model.index().num_vehicles()];
///         Ok(Assignment::from_node_sequences(model.index(), &idle))
///     }
/// }
///
/// let planner = RoutePlanner::new(IdleEngine);
/// let vehicles = vec![Vehicle::new(1, 0, vec![5])];
/// let solution = planner
///     .solve(&vehicles, &[], vec![vec![0, 2], vec![2, 0]])
///     .expect("idle solve succeeds");
/// assert_eq!(solution.routes().len(), 1);
/// assert_eq!(solution.total_delivery_duration(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct RoutePlanner<E> {
    engine: E,
    settings: SolverSettings,
}

impl<E> RoutePlanner<E>
where
    E: RoutingEngine,
{
    /// Construct a planner with default settings.
    pub fn new(engine: E) -> Self {
        Self::with_settings(engine, SolverSettings::default())
    }

    /// Construct a planner with explicit settings.
    pub const fn with_settings(engine: E, settings: SolverSettings) -> Self {
        Self { engine, settings }
    }

    /// The planner's settings.
    #[must_use]
    pub const fn settings(&self) -> &SolverSettings {
        &self.settings
    }

    /// Formulate, solve and decode one routing request.
    ///
    /// The engine call is the only step that may block, bounded by the
    /// configured time limit. A failed formulation or an unsolved search is
    /// reported once and never retried.
    ///
    /// # Errors
    /// - [`SolveError::Formulation`] when the input is no valid problem.
    /// - [`SolveError::NoSolutionFound`] when the engine finds no feasible
    ///   assignment within budget.
    /// - [`SolveError::Engine`] when the engine fails outright.
    pub fn solve(
        &self,
        vehicles: &[Vehicle],
        jobs: &[Job],
        matrix: Vec<Vec<u64>>,
    ) -> Result<Solution, SolveError> {
        let problem = formulate(vehicles, jobs, matrix, &self.settings).map_err(|err| {
            log::error!("failed to formulate routing problem: {err}");
            SolveError::from(err)
        })?;
        let problem = Arc::new(problem);

        let model = register_model(&problem)?;
        let params = self.settings.search_params();
        let assignment = match self.engine.search(&model, &params) {
            Ok(assignment) => assignment,
            Err(EngineError::NoSolution) => {
                log::error!("no feasible assignment within the search budget");
                return Err(SolveError::NoSolutionFound);
            }
            Err(EngineError::Failure(message)) => {
                log::error!("routing engine failed: {message}");
                return Err(SolveError::Engine { message });
            }
        };

        Ok(decode(&problem, &model, &assignment, vehicles))
    }
}

/// Register the normalized problem with the engine contract.
///
/// The arc cost closure is the problem's own `transit_cost`; the capacity
/// dimension uses zero slack and the collapsed per-vehicle capacities, with
/// cumulative load starting at zero at each vehicle's start.
fn register_model(problem: &Arc<NormalizedProblem>) -> Result<ModelSpec, SolveError> {
    let index = RoutingIndex::new(
        problem.num_nodes(),
        problem.starts().to_vec(),
        problem.ends().to_vec(),
    );
    let cost_source = Arc::clone(problem);
    let demand_source = Arc::clone(problem);
    ModelSpec::builder(index)
        .arc_cost(Arc::new(move |from, to| cost_source.transit_cost(from, to)))
        .capacity_dimension(
            Arc::new(move |node| demand_source.demand(node)),
            0,
            problem.capacities().to_vec(),
        )
        .build()
        .map_err(|err| SolveError::Engine {
            message: err.to_string(),
        })
}

/// Decode a raw assignment into per-vehicle routes and aggregate them.
fn decode(
    problem: &NormalizedProblem,
    model: &ModelSpec,
    assignment: &Assignment,
    vehicles: &[Vehicle],
) -> Solution {
    let mut solution = Solution::new();
    for (slot, vehicle) in vehicles.iter().enumerate() {
        solution.add_route(vehicle.id, decode_route(problem, model, assignment, slot));
    }
    solution
}

/// Walk one vehicle's `next`-chain from its start to its end variable.
///
/// Every leg's cost comes from the model's arc cost function, so decoded
/// durations always agree with what the engine minimized. Arriving at a
/// jobless node (the dummy terminal included) consumes the leg's cost
/// without recording a job. When several jobs share the arrived-at node,
/// the first carries the leg cost and the rest append with zero.
fn decode_route(
    problem: &NormalizedProblem,
    model: &ModelSpec,
    assignment: &Assignment,
    slot: usize,
) -> Route {
    let index = model.index();
    let mut route = Route::new();
    let mut var = index.start_var(slot);
    // a well-formed assignment visits each variable at most once
    for _ in 0..index.num_vars() {
        if index.is_end(var) {
            return route;
        }
        let from = var;
        var = assignment.next(from);
        let leg_cost = model.arc_cost(from, var);
        if let Some(job_ids) = problem.jobs_at(index.node_of(var)) {
            let mut cost = leg_cost;
            for &job_id in job_ids {
                route.append_job(job_id, cost);
                cost = 0;
            }
        }
    }
    if !index.is_end(var) {
        log::warn!("assignment for vehicle slot {slot} never reached its end variable");
        debug_assert!(false, "assignment for vehicle slot {slot} never reached its end variable");
    }
    route
}
