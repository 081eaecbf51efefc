//! `vrp-core` modelling helpers for [`VrpEngine`](crate::VrpEngine).
//!
//! This module converts a registered [`ModelSpec`] into a `vrp-core` problem,
//! runs the solver, and translates the winning tours back into a raw
//! [`Assignment`]. Every routable node becomes one mandatory delivery job, so
//! a search that cannot visit every node reports no solution, and the dummy
//! terminal at each vehicle's end stays out of the decoded visit order.

use std::collections::BTreeSet;
use std::sync::Arc;

use vrp_core::models::common::{Location, Profile};
use vrp_core::models::problem::{TravelTime, VehicleIdDimension};
use vrp_core::models::solution::Route as VrpRoute;
use vrp_core::prelude::*;

use fleetplan_core::{Assignment, EngineError, ModelSpec, RoutingIndex, SearchParams};

use crate::engine::VrpEngineConfig;

/// Run one `vrp-core` search over a registered model.
pub(crate) fn search(
    model: &ModelSpec,
    params: &SearchParams,
    config: &VrpEngineConfig,
) -> Result<Assignment, EngineError> {
    if routable_nodes(model.index()).is_empty() {
        // nothing to visit; every vehicle chains straight to its end
        let idle = vec![Vec::new(); model.index().num_vehicles()];
        return Ok(Assignment::from_node_sequences(model.index(), &idle));
    }

    let transport: Arc<dyn TransportCost + Send + Sync> =
        Arc::new(ModelTransportCost::new(model.clone()));
    let goal = define_goal(model, transport.clone()).map_err(engine_failure)?;
    let problem = Arc::new(define_problem(model, transport, goal).map_err(engine_failure)?);

    let max_time = usize::try_from(params.time_limit.as_secs()).unwrap_or(usize::MAX);
    let vrp_config = VrpConfigBuilder::new(problem.clone())
        .prebuild()
        .map_err(engine_failure)?
        .with_max_time(Some(max_time))
        .with_max_generations(config.max_generations)
        .build()
        .map_err(engine_failure)?;

    if params.log_search {
        log::info!(
            "vrp search over {} routing variables with a {max_time}s budget",
            model.index().num_vars()
        );
    }

    let solution = Solver::new(problem, vrp_config).solve().map_err(engine_failure)?;

    if !solution.unassigned.is_empty() {
        log::debug!("search left {} jobs unassigned", solution.unassigned.len());
        return Err(EngineError::NoSolution);
    }
    translate(model, &solution)
}

fn engine_failure(err: GenericError) -> EngineError {
    EngineError::Failure(err.to_string())
}

/// Nodes eligible for a visit: everything that is no vehicle's start or end.
fn routable_nodes(index: &RoutingIndex) -> BTreeSet<usize> {
    let reserved: BTreeSet<usize> = (0..index.num_vehicles())
        .flat_map(|vehicle| {
            [
                index.node_of(index.start_var(vehicle)),
                index.node_of(index.end_var(vehicle)),
            ]
        })
        .collect();
    (0..index.num_nodes())
        .filter(|node| !reserved.contains(node))
        .collect()
}

/// Clamp a scalar load into `vrp-core`'s signed dimension value.
fn scalar_size(value: u64) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

/// Model every routable node as a mandatory delivery job and every fleet
/// slot as one vehicle running from its start node to the dummy terminal.
fn define_problem(
    model: &ModelSpec,
    transport: Arc<dyn TransportCost + Send + Sync>,
    goal: GoalContext,
) -> GenericResult<Problem> {
    let index = model.index();

    let jobs = routable_nodes(index)
        .into_iter()
        .map(|node| {
            let mut single = SingleBuilder::default().id(format!("node{node}").as_str());
            if model.capacity().is_some() {
                single = single.demand(Demand::delivery(scalar_size(model.node_demand(node))));
            }
            single.location(node)?.build_as_job()
        })
        .collect::<Result<Vec<_>, _>>()?;

    let vehicles = (0..index.num_vehicles())
        .map(|slot| {
            let mut vehicle = VehicleBuilder::default()
                .id(format!("v{slot}").as_str())
                .add_detail(
                    VehicleDetailBuilder::default()
                        .set_start_location(index.node_of(index.start_var(slot)))
                        .set_end_location(index.node_of(index.end_var(slot)))
                        .build()?,
                );
            if model.capacity().is_some() {
                vehicle =
                    vehicle.capacity(SingleDimLoad::new(scalar_size(model.vehicle_capacity(slot))));
            }
            vehicle.build()
        })
        .collect::<Result<Vec<_>, _>>()?;

    ProblemBuilder::default()
        .add_jobs(jobs.into_iter())
        .add_vehicles(vehicles.into_iter())
        .with_goal(goal)
        .with_transport_cost(transport)
        .build()
}

/// Minimise unassigned jobs first, then total transit cost, under the
/// capacity constraint when the model registered one.
fn define_goal(
    model: &ModelSpec,
    transport: Arc<dyn TransportCost + Send + Sync>,
) -> GenericResult<GoalContext> {
    let minimize_unassigned = MinimizeUnassignedBuilder::new("min-unassigned").build()?;
    let transport_feature = TransportFeatureBuilder::new("min-transit")
        .set_transport_cost(transport)
        .set_time_constrained(false)
        .build_minimize_distance()?;

    let mut features = vec![minimize_unassigned, transport_feature];
    if model.capacity().is_some() {
        features.push(CapacityFeatureBuilder::<SingleDimLoad>::new("capacity").build()?);
    }
    GoalContextBuilder::with_features(&features)?.build()
}

/// Matrix-backed transport cost reading straight from the registered model.
struct ModelTransportCost {
    model: ModelSpec,
}

impl ModelTransportCost {
    const fn new(model: ModelSpec) -> Self {
        Self { model }
    }

    #[expect(
        clippy::cast_precision_loss,
        reason = "transit costs stay far below the point where f64 loses integers"
    )]
    fn transit(&self, from: Location, to: Location) -> f64 {
        self.model.node_cost(from, to) as f64
    }
}

impl TransportCost for ModelTransportCost {
    // The trait signature carries `route` and `departure` parameters for
    // route- and time-dependent implementations. This lookup depends on
    // neither.
    fn distance(
        &self,
        _route: &VrpRoute,
        from: Location,
        to: Location,
        _departure: TravelTime,
    ) -> Cost {
        self.transit(from, to)
    }

    fn duration(
        &self,
        _route: &VrpRoute,
        from: Location,
        to: Location,
        _departure: TravelTime,
    ) -> f64 {
        self.transit(from, to)
    }

    fn distance_approx(&self, profile: &Profile, from: usize, to: usize) -> f64 {
        self.duration_approx(profile, from, to)
    }

    fn duration_approx(&self, _profile: &Profile, from: usize, to: usize) -> f64 {
        self.transit(from, to)
    }
}

/// Convert the solver's tours back into a raw per-vehicle assignment.
///
/// Vehicles absent from the solution stay idle: their start variable chains
/// straight to their end variable.
fn translate(
    model: &ModelSpec,
    solution: &vrp_core::models::Solution,
) -> Result<Assignment, EngineError> {
    let index = model.index();
    let mut sequences = vec![Vec::new(); index.num_vehicles()];

    for route in &solution.routes {
        let vehicle_id = route
            .actor
            .vehicle
            .dimens
            .get_vehicle_id()
            .ok_or_else(|| EngineError::Failure("solution route without a vehicle id".into()))?;
        let slot: usize = vehicle_id
            .strip_prefix('v')
            .and_then(|raw| raw.parse().ok())
            .ok_or_else(|| {
                EngineError::Failure(format!("unexpected vehicle id `{vehicle_id}` in solution"))
            })?;
        let sequence = sequences.get_mut(slot).ok_or_else(|| {
            EngineError::Failure(format!("vehicle id `{vehicle_id}` outside the fleet"))
        })?;
        let end_node = index.node_of(index.end_var(slot));
        *sequence = route
            .tour
            .all_activities()
            .skip(1)
            .map(|activity| activity.place.location)
            .filter(|&location| location != end_node)
            .collect();
    }

    Ok(Assignment::from_node_sequences(index, &sequences))
}
