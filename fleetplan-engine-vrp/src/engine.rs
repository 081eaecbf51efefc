//! [`VrpEngine`] implementation backed by `vrp-core`.

use fleetplan_core::{Assignment, EngineError, ModelSpec, RoutingEngine, SearchParams};

use crate::model;

/// Configuration for [`VrpEngine`].
#[derive(Debug, Clone)]
pub struct VrpEngineConfig {
    /// Upper bound on `vrp-core` generations; `None` leaves only the time
    /// budget from the search parameters.
    pub max_generations: Option<usize>,
}

impl Default for VrpEngineConfig {
    fn default() -> Self {
        Self {
            max_generations: Some(1_000),
        }
    }
}

/// Routing engine using `vrp-core` metaheuristics to search for cheap tours.
///
/// Each [`search`](RoutingEngine::search) call builds its own problem from
/// the registered model and shares nothing with concurrent calls. The
/// first-solution and improvement strategies from the search parameters are
/// advisory; `vrp-core` manages its own construction and refinement.
#[derive(Debug, Clone, Default)]
pub struct VrpEngine {
    config: VrpEngineConfig,
}

impl VrpEngine {
    /// Construct an engine using default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct an engine with explicit configuration.
    #[must_use]
    pub const fn with_config(config: VrpEngineConfig) -> Self {
        Self { config }
    }
}

impl RoutingEngine for VrpEngine {
    fn search(&self, spec: &ModelSpec, params: &SearchParams) -> Result<Assignment, EngineError> {
        model::search(spec, params, &self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleetplan_core::RoutingIndex;
    use rstest::{fixture, rstest};
    use std::sync::Arc;
    use std::time::Duration;

    /// One node per demand entry plus a dummy terminal; every vehicle runs
    /// from node 0 to the terminal.
    fn build_spec(capacities: Vec<u64>, demands: Vec<u64>) -> ModelSpec {
        let num_nodes = demands.len() + 1;
        let terminal = num_nodes - 1;
        let starts = vec![0; capacities.len()];
        let ends = vec![terminal; capacities.len()];
        let index = RoutingIndex::new(num_nodes, starts, ends);
        let demand_table = demands;
        ModelSpec::builder(index)
            .arc_cost(Arc::new(move |from, to| {
                if from == to || from == terminal || to == terminal {
                    0
                } else {
                    (from.abs_diff(to) * 10) as u64
                }
            }))
            .capacity_dimension(
                Arc::new(move |node| demand_table.get(node).copied().unwrap_or(0)),
                0,
                capacities,
            )
            .build()
            .expect("arc cost registered")
    }

    #[fixture]
    fn params() -> SearchParams {
        SearchParams {
            time_limit: Duration::from_secs(2),
            ..SearchParams::default()
        }
    }

    fn engine() -> VrpEngine {
        VrpEngine::with_config(VrpEngineConfig {
            max_generations: Some(20),
        })
    }

    fn visited_nodes(spec: &ModelSpec, assignment: &Assignment, vehicle: usize) -> Vec<usize> {
        let index = spec.index();
        let mut nodes = Vec::new();
        let mut var = index.start_var(vehicle);
        while !index.is_end(var) {
            var = assignment.next(var);
            if !index.is_end(var) {
                nodes.push(index.node_of(var));
            }
        }
        nodes
    }

    #[rstest]
    fn visits_every_node_within_capacity(params: SearchParams) {
        let spec = build_spec(vec![10], vec![0, 1, 1, 1]);

        let assignment = engine().search(&spec, &params).expect("feasible instance");

        let mut nodes = visited_nodes(&spec, &assignment, 0);
        nodes.sort_unstable();
        assert_eq!(nodes, vec![1, 2, 3]);
    }

    #[rstest]
    fn splits_load_across_the_fleet(params: SearchParams) {
        let spec = build_spec(vec![2, 2], vec![0, 1, 1, 1, 1]);

        let assignment = engine().search(&spec, &params).expect("feasible instance");

        let mut nodes: Vec<usize> = (0..2)
            .flat_map(|vehicle| visited_nodes(&spec, &assignment, vehicle))
            .collect();
        nodes.sort_unstable();
        assert_eq!(nodes, vec![1, 2, 3, 4]);
        for vehicle in 0..2 {
            let load: u64 = visited_nodes(&spec, &assignment, vehicle)
                .into_iter()
                .map(|node| spec.node_demand(node))
                .sum();
            assert!(load <= 2, "vehicle {vehicle} overloaded to {load}");
        }
    }

    #[rstest]
    fn reports_no_solution_when_demand_exceeds_capacity(params: SearchParams) {
        let spec = build_spec(vec![2], vec![0, 3, 3]);

        let err = engine().search(&spec, &params).expect_err("infeasible instance");

        assert_eq!(err, EngineError::NoSolution);
    }

    #[rstest]
    fn jobless_fleet_stays_idle(params: SearchParams) {
        // only the start node and the terminal exist, so nothing is routable
        let spec = build_spec(vec![5], vec![0]);

        let assignment = engine().search(&spec, &params).expect("trivially feasible");

        assert!(visited_nodes(&spec, &assignment, 0).is_empty());
    }
}
