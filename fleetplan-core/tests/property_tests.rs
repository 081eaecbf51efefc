//! Property-based tests for the formulation layer.
//!
//! These assert invariants that must hold for all valid inputs,
//! complementing the example-based unit tests next to the code.
//!
//! # Invariants tested
//!
//! - **Route accumulation:** a route's duration is the sum of appended leg
//!   costs and its job list preserves append order.
//! - **Aggregation:** a solution's total is the sum of its routes'
//!   durations, empty routes included, and the route count matches the
//!   merged vehicles.
//! - **Augmentation:** the augmented matrix gains exactly one all-zero
//!   row/column and every vehicle ends at the dummy terminal.
//! - **Demand accumulation:** co-located jobs' demands add up.

use proptest::prelude::*;

use fleetplan_core::{DistanceMatrix, Job, Route, Solution, SolverSettings, Vehicle, formulate};

fn square_matrix_strategy(max_nodes: usize) -> impl Strategy<Value = Vec<Vec<u64>>> {
    (1..=max_nodes).prop_flat_map(|n| {
        proptest::collection::vec(proptest::collection::vec(0_u64..1_000, n), n)
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Property: appended legs sum into the route duration, in order.
    #[test]
    fn route_accumulates_appended_legs(legs in proptest::collection::vec((any::<u64>(), 0_u64..1_000_000), 0..32)) {
        let mut route = Route::new();
        for &(job_id, duration) in &legs {
            route.append_job(job_id, duration);
        }

        let expected_jobs: Vec<u64> = legs.iter().map(|&(job_id, _)| job_id).collect();
        let expected_duration: u64 = legs.iter().map(|&(_, duration)| duration).sum();
        prop_assert_eq!(route.jobs(), expected_jobs.as_slice());
        prop_assert_eq!(route.delivery_duration(), expected_duration);
    }

    /// Property: the solution total equals the sum of its routes' durations
    /// and every merged vehicle keeps its route, empty ones included.
    #[test]
    fn solution_total_is_sum_of_route_durations(durations in proptest::collection::vec(proptest::collection::vec(0_u64..1_000_000, 0..6), 0..8)) {
        let mut solution = Solution::new();
        let mut expected_total = 0_u64;
        for (vehicle, route_legs) in durations.iter().enumerate() {
            let mut route = Route::new();
            for (job, &duration) in route_legs.iter().enumerate() {
                route.append_job(job as u64, duration);
                expected_total += duration;
            }
            solution.add_route(vehicle as u64, route);
        }

        prop_assert_eq!(solution.total_delivery_duration(), expected_total);
        prop_assert_eq!(solution.routes().len(), durations.len());
    }

    /// Property: augmentation appends exactly one node whose row and column
    /// are all zero, and every vehicle's end is that node.
    #[test]
    fn augmented_matrix_gains_one_zero_bordered_node(rows in square_matrix_strategy(7)) {
        let original_nodes = rows.len();
        let original = DistanceMatrix::new(rows.clone()).expect("generated matrix is square");
        let vehicles = vec![Vehicle::new(1, 0, vec![1])];

        let problem = formulate(&vehicles, &[], rows, &SolverSettings::default())
            .expect("formulation succeeds");

        prop_assert_eq!(problem.num_nodes(), original_nodes + 1);
        prop_assert_eq!(problem.terminal_index(), original_nodes);
        prop_assert!(problem.ends().iter().all(|&end| end == original_nodes));
        for node in 0..=original_nodes {
            prop_assert_eq!(problem.matrix().cost(node, original_nodes), 0);
            prop_assert_eq!(problem.matrix().cost(original_nodes, node), 0);
        }
        // original costs are untouched
        for from in 0..original_nodes {
            for to in 0..original_nodes {
                prop_assert_eq!(problem.matrix().cost(from, to), original.cost(from, to));
            }
        }
    }

    /// Property: demands of jobs sharing a location accumulate at the node.
    #[test]
    fn co_located_demands_accumulate(demands in proptest::collection::vec(proptest::collection::vec(0_u64..100, 0..4), 1..6)) {
        let vehicles = vec![Vehicle::new(1, 0, vec![1])];
        let jobs: Vec<Job> = demands
            .iter()
            .enumerate()
            .map(|(id, delivery)| Job::new(id as u64, 1, delivery.clone(), 0))
            .collect();
        let matrix = vec![vec![0, 1], vec![1, 0]];

        let problem = formulate(&vehicles, &jobs, matrix, &SolverSettings::default())
            .expect("formulation succeeds");

        let expected: u64 = demands.iter().flatten().sum();
        prop_assert_eq!(problem.demand(1), expected);
        let hosted = problem.jobs_at(1).map_or(0, <[u64]>::len);
        prop_assert_eq!(hosted, jobs.len());
    }
}
