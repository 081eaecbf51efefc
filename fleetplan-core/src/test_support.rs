//! Test-only engines for exercising the pipeline without a real solver.
//!
//! Available to unit tests and, behind the `test-support` feature, to
//! downstream crates. [`ScriptedEngine`] replays a fixed assignment,
//! [`NoSolutionEngine`] always reports an exhausted search, and
//! [`GreedyEngine`] is a deterministic cheapest-arc construction heuristic
//! honouring the capacity dimension.

use std::collections::BTreeSet;

use crate::engine::{
    Assignment, EngineError, ModelSpec, RoutingEngine, RoutingIndex, SearchParams,
};

/// Engine that replays a scripted set of per-vehicle node visits.
///
/// The script holds, per vehicle, the node indices visited strictly between
/// start and end. It must match the model's vehicle count.
#[derive(Debug, Clone)]
pub struct ScriptedEngine {
    sequences: Vec<Vec<usize>>,
}

impl ScriptedEngine {
    /// Script an engine with one visit sequence per vehicle.
    #[must_use]
    pub const fn new(sequences: Vec<Vec<usize>>) -> Self {
        Self { sequences }
    }

    /// Script an engine that leaves every vehicle idle.
    #[must_use]
    pub fn idle(num_vehicles: usize) -> Self {
        Self::new(vec![Vec::new(); num_vehicles])
    }
}

impl RoutingEngine for ScriptedEngine {
    fn search(&self, model: &ModelSpec, _params: &SearchParams) -> Result<Assignment, EngineError> {
        if self.sequences.len() != model.index().num_vehicles() {
            return Err(EngineError::Failure(format!(
                "script covers {} vehicles but the model has {}",
                self.sequences.len(),
                model.index().num_vehicles()
            )));
        }
        Ok(Assignment::from_node_sequences(model.index(), &self.sequences))
    }
}

/// Engine that always reports an exhausted search.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSolutionEngine;

impl RoutingEngine for NoSolutionEngine {
    fn search(&self, _model: &ModelSpec, _params: &SearchParams) -> Result<Assignment, EngineError> {
        Err(EngineError::NoSolution)
    }
}

/// Deterministic cheapest-arc construction heuristic.
///
/// Extends each vehicle's route along the cheapest arc whose demand still
/// fits, visiting every node that is neither a vehicle start nor a vehicle
/// end. Performs no local search; useful where tests need an engine that
/// reacts honestly to capacity, without pulling in a real solver.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyEngine;

impl GreedyEngine {
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
}

impl RoutingEngine for GreedyEngine {
    fn search(&self, model: &ModelSpec, _params: &SearchParams) -> Result<Assignment, EngineError> {
        let index = model.index();
        let mut pending = Self::routable_nodes(index);
        let mut sequences = Vec::with_capacity(index.num_vehicles());

        for vehicle in 0..index.num_vehicles() {
            let capacity = model.vehicle_capacity(vehicle);
            let mut load = 0_u64;
            let mut current = index.node_of(index.start_var(vehicle));
            let mut sequence = Vec::new();

            loop {
                let candidate = pending
                    .iter()
                    .copied()
                    .filter(|&node| load + model.node_demand(node) <= capacity)
                    .min_by_key(|&node| (model.node_cost(current, node), node));
                let Some(node) = candidate else { break };
                pending.remove(&node);
                load += model.node_demand(node);
                sequence.push(node);
                current = node;
            }
            sequences.push(sequence);
        }

        if pending.is_empty() {
            Ok(Assignment::from_node_sequences(index, &sequences))
        } else {
            Err(EngineError::NoSolution)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn model(num_nodes: usize, starts: Vec<usize>, capacities: Vec<u64>) -> ModelSpec {
        let terminal = num_nodes - 1;
        let ends = vec![terminal; starts.len()];
        let index = RoutingIndex::new(num_nodes, starts, ends);
        ModelSpec::builder(index)
            .arc_cost(Arc::new(|from, to| if from == to { 0 } else { 1 }))
            .capacity_dimension(Arc::new(|_| 1), 0, capacities)
            .build()
            .expect("arc cost registered")
    }

    #[test]
    fn greedy_visits_every_routable_node() {
        // 5 nodes: vehicle starts at 0, terminal is 4, nodes 1..=3 routable
        let spec = model(5, vec![0], vec![10]);
        let assignment = GreedyEngine
            .search(&spec, &SearchParams::default())
            .expect("feasible");
        let index = spec.index();
        let mut visited = Vec::new();
        let mut var = index.start_var(0);
        while !index.is_end(var) {
            var = assignment.next(var);
            if !index.is_end(var) {
                visited.push(index.node_of(var));
            }
        }
        visited.sort_unstable();
        assert_eq!(visited, vec![1, 2, 3]);
    }

    #[test]
    fn greedy_reports_no_solution_when_capacity_exhausted() {
        // three unit-demand nodes, total fleet capacity 2
        let spec = model(5, vec![0], vec![2]);
        let err = GreedyEngine
            .search(&spec, &SearchParams::default())
            .expect_err("infeasible");
        assert_eq!(err, EngineError::NoSolution);
    }

    #[test]
    fn scripted_engine_rejects_wrong_vehicle_count() {
        let spec = model(3, vec![0], vec![1]);
        let err = ScriptedEngine::new(vec![Vec::new(), Vec::new()])
            .search(&spec, &SearchParams::default())
            .expect_err("script too long");
        assert!(matches!(err, EngineError::Failure(_)));
    }
}
