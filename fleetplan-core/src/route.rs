//! Decoded routes and the aggregated fleet solution.

use std::collections::BTreeMap;

/// An ordered list of jobs served by one vehicle.
///
/// Grows by appending one job at a time; the accumulated duration is the
/// sum of the per-leg costs handed to [`append_job`](Self::append_job).
///
/// # Examples
/// ```
/// use fleetplan_core::Route;
///
/// let mut route = Route::new();
/// route.append_job(1, 1000);
/// route.append_job(4, 1000);
/// route.append_job(2, 1000);
/// assert_eq!(route.jobs(), &[1, 4, 2]);
/// assert_eq!(route.delivery_duration(), 3000);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Route {
    #[cfg_attr(feature = "serde", serde(default))]
    delivery_duration: u64,
    #[cfg_attr(feature = "serde", serde(default))]
    jobs: Vec<u64>,
}

impl Route {
    /// An empty route with zero duration.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            delivery_duration: 0,
            jobs: Vec::new(),
        }
    }

    /// Append a served job and the travel cost of the leg that reached it.
    pub fn append_job(&mut self, job_id: u64, duration: u64) {
        self.jobs.push(job_id);
        self.delivery_duration += duration;
    }

    /// Served job ids in visit order.
    #[must_use]
    pub fn jobs(&self) -> &[u64] {
        &self.jobs
    }

    /// Accumulated travel duration of the route.
    #[must_use]
    pub const fn delivery_duration(&self) -> u64 {
        self.delivery_duration
    }

    /// Whether the vehicle serves no jobs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}

/// Per-vehicle routes with the fleet-wide total duration.
///
/// Built incrementally as each vehicle's route is decoded; the total is
/// always the sum of the member routes' durations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Solution {
    #[cfg_attr(feature = "serde", serde(default))]
    total_delivery_duration: u64,
    #[cfg_attr(feature = "serde", serde(default))]
    routes: BTreeMap<u64, Route>,
}

impl Solution {
    /// An empty solution.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            total_delivery_duration: 0,
            routes: BTreeMap::new(),
        }
    }

    /// Merge one vehicle's route, accumulating the fleet total.
    ///
    /// Re-adding a vehicle replaces its route and re-derives the total.
    pub fn add_route(&mut self, vehicle_id: u64, route: Route) {
        if let Some(previous) = self.routes.insert(vehicle_id, route) {
            self.total_delivery_duration -= previous.delivery_duration();
        }
        self.total_delivery_duration += self
            .routes
            .get(&vehicle_id)
            .map_or(0, Route::delivery_duration);
    }

    /// Fleet-wide total delivery duration.
    #[must_use]
    pub const fn total_delivery_duration(&self) -> u64 {
        self.total_delivery_duration
    }

    /// All routes keyed by vehicle id.
    #[must_use]
    pub const fn routes(&self) -> &BTreeMap<u64, Route> {
        &self.routes
    }

    /// The route assigned to `vehicle_id`, if any.
    #[must_use]
    pub fn route(&self, vehicle_id: u64) -> Option<&Route> {
        self.routes.get(&vehicle_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn route_preserves_append_order_and_sums_durations() {
        let mut route = Route::new();
        route.append_job(1, 1000);
        route.append_job(4, 1000);
        route.append_job(2, 1000);
        assert_eq!(route.jobs(), &[1, 4, 2]);
        assert_eq!(route.delivery_duration(), 3000);

        let empty = Route::new();
        assert!(empty.is_empty());
        assert_eq!(empty.delivery_duration(), 0);
    }

    #[rstest]
    fn solution_totals_route_durations() {
        let mut solution = Solution::new();

        let mut first = Route::new();
        first.append_job(1, 1000);
        first.append_job(4, 1000);
        first.append_job(2, 1000);
        solution.add_route(1, first);

        let mut second = Route::new();
        second.append_job(3, 100);
        second.append_job(5, 100);
        second.append_job(6, 100);
        solution.add_route(2, second);

        solution.add_route(3, Route::new());

        assert_eq!(solution.total_delivery_duration(), 3300);
        assert_eq!(solution.routes().len(), 3);
    }

    #[rstest]
    fn replacing_a_route_rederives_the_total() {
        let mut solution = Solution::new();
        let mut route = Route::new();
        route.append_job(1, 500);
        solution.add_route(1, route);

        let mut replacement = Route::new();
        replacement.append_job(2, 200);
        solution.add_route(1, replacement);

        assert_eq!(solution.total_delivery_duration(), 200);
        assert_eq!(solution.routes().len(), 1);
    }

    #[cfg(feature = "serde")]
    #[rstest]
    fn solution_round_trips_through_json() {
        let fixture = r#"
        {
            "total_delivery_duration": 3891,
            "routes": {
                "1": {"jobs": [1, 4, 2], "delivery_duration": 3047},
                "2": {"jobs": [3, 5, 6], "delivery_duration": 844},
                "3": {"jobs": [], "delivery_duration": 0}
            }
        }"#;
        let solution: Solution = serde_json::from_str(fixture).expect("fixture parses");
        assert_eq!(solution.total_delivery_duration(), 3891);
        assert_eq!(solution.routes().len(), 3);

        // the stored total must obey the summation law
        let summed: u64 = solution
            .routes()
            .values()
            .map(Route::delivery_duration)
            .sum();
        assert_eq!(summed, solution.total_delivery_duration());

        let json = serde_json::to_value(&solution).expect("serializes");
        assert_eq!(json["total_delivery_duration"], 3891);
        assert_eq!(json["routes"]["1"]["jobs"], serde_json::json!([1, 4, 2]));
    }
}
