//! Contract between the formulation core and the external routing engine.
//!
//! The engine is a black box: it receives an index space, a deterministic
//! arc-cost function, an optional capacity dimension, and a time budget, and
//! returns a raw per-vehicle assignment or a failure. Nothing here depends
//! on a concrete engine, so the whole pipeline can be exercised against the
//! fakes in [`test_support`](crate::test_support).

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

/// Deterministic, side-effect-free arc cost lookup over node indices.
///
/// The engine may call this arbitrarily many times during search.
pub type ArcCostFn = Arc<dyn Fn(usize, usize) -> u64 + Send + Sync>;

/// Capacity consumed by visiting a node.
pub type DemandFn = Arc<dyn Fn(usize) -> u64 + Send + Sync>;

/// Translation between the problem's node space and the engine's
/// routing-variable space.
///
/// Every node owns one variable, and each vehicle additionally owns a
/// private start and end variable. Vehicles sharing a start node therefore
/// never collide in variable space. Variables are laid out as
/// `[nodes | starts | ends]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingIndex {
    num_nodes: usize,
    starts: Vec<usize>,
    ends: Vec<usize>,
}

impl RoutingIndex {
    /// Build an index space for `num_nodes` nodes and the given per-vehicle
    /// start/end nodes.
    #[must_use]
    pub fn new(num_nodes: usize, starts: Vec<usize>, ends: Vec<usize>) -> Self {
        debug_assert_eq!(starts.len(), ends.len(), "one start and one end per vehicle");
        debug_assert!(
            starts.iter().chain(ends.iter()).all(|&node| node < num_nodes),
            "start/end nodes must lie inside the node space"
        );
        Self {
            num_nodes,
            starts,
            ends,
        }
    }

    /// Number of nodes, including the dummy terminal.
    #[must_use]
    pub const fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    /// Number of vehicles.
    #[must_use]
    pub fn num_vehicles(&self) -> usize {
        self.starts.len()
    }

    /// Total number of routing variables.
    #[must_use]
    pub fn num_vars(&self) -> usize {
        self.num_nodes + self.starts.len() + self.ends.len()
    }

    /// The start variable of `vehicle`.
    #[must_use]
    pub fn start_var(&self, vehicle: usize) -> usize {
        debug_assert!(vehicle < self.num_vehicles(), "vehicle slot out of range");
        self.num_nodes + vehicle
    }

    /// The end variable of `vehicle`.
    #[must_use]
    pub fn end_var(&self, vehicle: usize) -> usize {
        debug_assert!(vehicle < self.num_vehicles(), "vehicle slot out of range");
        self.num_nodes + self.starts.len() + vehicle
    }

    /// Whether `var` is any vehicle's end variable.
    #[must_use]
    pub fn is_end(&self, var: usize) -> bool {
        var >= self.num_nodes + self.starts.len() && var < self.num_vars()
    }

    /// Resolve a routing variable to its node index.
    ///
    /// Unknown variables log and resolve to node `0`; well-formed engines
    /// never produce one.
    #[must_use]
    pub fn node_of(&self, var: usize) -> usize {
        if var < self.num_nodes {
            return var;
        }
        let slot = var - self.num_nodes;
        let resolved = slot
            .checked_sub(self.starts.len())
            .map_or_else(|| self.starts.get(slot), |end_slot| self.ends.get(end_slot));
        resolved.copied().map_or_else(
            || {
                log::warn!("routing variable {var} outside the variable space");
                debug_assert!(false, "routing variable {var} outside the variable space");
                0
            },
            |node| node,
        )
    }
}

/// A raw engine assignment: one `next` pointer per routing variable.
///
/// Each vehicle's route is the chain from its start variable to its end
/// variable. Variables the engine left unused point at themselves and are
/// never reached by a well-formed walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    next: Vec<usize>,
}

impl Assignment {
    /// Build an assignment from per-vehicle node visit sequences.
    ///
    /// `sequences` holds, per vehicle, the ordered node indices visited
    /// strictly between the vehicle's start and end. An empty sequence
    /// chains the start variable directly to the end variable.
    #[must_use]
    pub fn from_node_sequences(index: &RoutingIndex, sequences: &[Vec<usize>]) -> Self {
        debug_assert_eq!(
            sequences.len(),
            index.num_vehicles(),
            "one visit sequence per vehicle"
        );
        let mut next: Vec<usize> = (0..index.num_vars()).collect();
        for (vehicle, sequence) in sequences.iter().enumerate() {
            let mut var = index.start_var(vehicle);
            for &node in sequence {
                debug_assert!(node < index.num_nodes(), "visited node out of range");
                if let Some(slot) = next.get_mut(var) {
                    *slot = node;
                }
                var = node;
            }
            if let Some(slot) = next.get_mut(var) {
                *slot = index.end_var(vehicle);
            }
        }
        Self { next }
    }

    /// The variable following `var` in its vehicle's route.
    #[must_use]
    pub fn next(&self, var: usize) -> usize {
        self.next.get(var).copied().map_or_else(
            || {
                log::warn!("assignment lookup for unknown variable {var}");
                debug_assert!(false, "assignment lookup for unknown variable {var}");
                var
            },
            |next_var| next_var,
        )
    }
}

/// The capacity dimension registered with the engine.
///
/// Cumulative load starts at zero at each vehicle's start, grows by the
/// demand of every visited node, and may never exceed the vehicle's
/// capacity plus `slack`.
#[derive(Clone)]
pub struct CapacityDimension {
    /// Demand lookup per node.
    pub demand: DemandFn,
    /// Allowed slack above capacity; zero for hard limits.
    pub slack: u64,
    /// Per-vehicle scalar capacities.
    pub capacities: Vec<u64>,
}

impl fmt::Debug for CapacityDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CapacityDimension")
            .field("slack", &self.slack)
            .field("capacities", &self.capacities)
            .finish_non_exhaustive()
    }
}

/// A fully registered routing model, ready for an engine search.
///
/// Obtained from [`ModelBuilder`]. Callbacks operate on node indices; the
/// variable-level accessors resolve through the [`RoutingIndex`] first.
#[derive(Clone)]
pub struct ModelSpec {
    index: RoutingIndex,
    arc_cost: ArcCostFn,
    capacity: Option<CapacityDimension>,
}

impl ModelSpec {
    /// Start registering a model over `index`.
    #[must_use]
    pub const fn builder(index: RoutingIndex) -> ModelBuilder {
        ModelBuilder {
            index,
            arc_cost: None,
            capacity: None,
        }
    }

    /// The model's variable space.
    #[must_use]
    pub const fn index(&self) -> &RoutingIndex {
        &self.index
    }

    /// Cost of the arc between two routing variables.
    #[must_use]
    pub fn arc_cost(&self, from_var: usize, to_var: usize) -> u64 {
        self.node_cost(self.index.node_of(from_var), self.index.node_of(to_var))
    }

    /// Cost of the arc between two nodes.
    #[must_use]
    pub fn node_cost(&self, from_node: usize, to_node: usize) -> u64 {
        (self.arc_cost)(from_node, to_node)
    }

    /// Demand of a node; zero when no capacity dimension is registered.
    #[must_use]
    pub fn node_demand(&self, node: usize) -> u64 {
        self.capacity
            .as_ref()
            .map_or(0, |dimension| (dimension.demand)(node))
    }

    /// The registered capacity dimension, if any.
    #[must_use]
    pub const fn capacity(&self) -> Option<&CapacityDimension> {
        self.capacity.as_ref()
    }

    /// Capacity of `vehicle`; unbounded when no dimension is registered.
    #[must_use]
    pub fn vehicle_capacity(&self, vehicle: usize) -> u64 {
        self.capacity.as_ref().map_or(u64::MAX, |dimension| {
            dimension.capacities.get(vehicle).copied().unwrap_or(0)
        })
    }
}

impl fmt::Debug for ModelSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelSpec")
            .field("index", &self.index)
            .field("capacity", &self.capacity)
            .finish_non_exhaustive()
    }
}

/// Register-style construction of a [`ModelSpec`].
#[derive(Clone)]
pub struct ModelBuilder {
    index: RoutingIndex,
    arc_cost: Option<ArcCostFn>,
    capacity: Option<CapacityDimension>,
}

impl ModelBuilder {
    /// Register the arc cost function.
    #[must_use]
    pub fn arc_cost(mut self, cost: ArcCostFn) -> Self {
        self.arc_cost = Some(cost);
        self
    }

    /// Register the capacity dimension.
    #[must_use]
    pub fn capacity_dimension(mut self, demand: DemandFn, slack: u64, capacities: Vec<u64>) -> Self {
        self.capacity = Some(CapacityDimension {
            demand,
            slack,
            capacities,
        });
        self
    }

    /// Finish registration.
    ///
    /// # Errors
    /// Returns [`ModelError::MissingArcCost`] when no arc cost function was
    /// registered.
    pub fn build(self) -> Result<ModelSpec, ModelError> {
        let Self {
            index,
            arc_cost,
            capacity,
        } = self;
        let arc_cost = arc_cost.ok_or(ModelError::MissingArcCost)?;
        Ok(ModelSpec {
            index,
            arc_cost,
            capacity,
        })
    }
}

impl fmt::Debug for ModelBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelBuilder")
            .field("index", &self.index)
            .finish_non_exhaustive()
    }
}

/// Errors returned by [`ModelBuilder::build`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    /// The model has no arc cost function.
    #[error("no arc cost function registered")]
    MissingArcCost,
}

/// Heuristic used to construct the initial feasible assignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[non_exhaustive]
pub enum FirstSolutionStrategy {
    /// Repeatedly extend routes along the cheapest available arc.
    #[default]
    CheapestArc,
}

/// Improvement strategy applied after the first solution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[non_exhaustive]
pub enum LocalSearchMetaheuristic {
    /// Let the engine pick its own improvement strategy.
    #[default]
    Automatic,
}

/// Parameters governing the engine's search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    /// First-solution construction heuristic.
    pub first_solution: FirstSolutionStrategy,
    /// Local-search improvement strategy.
    pub metaheuristic: LocalSearchMetaheuristic,
    /// Hard wall-clock budget; the best incumbent is returned when it runs
    /// out.
    pub time_limit: Duration,
    /// Verbose engine diagnostics only; no functional effect.
    pub log_search: bool,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            first_solution: FirstSolutionStrategy::default(),
            metaheuristic: LocalSearchMetaheuristic::default(),
            time_limit: Duration::from_secs(30),
            log_search: false,
        }
    }
}

/// Errors returned by [`RoutingEngine::search`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    /// The budget ran out before any feasible assignment was found, or none
    /// exists.
    #[error("no feasible assignment within the search budget")]
    NoSolution,
    /// The engine failed while building or searching its model.
    #[error("engine failure: {0}")]
    Failure(String),
}

/// A black-box constraint-solving engine.
///
/// Implementations must be reentrant across independent models: each call
/// receives its own [`ModelSpec`] and shares nothing with concurrent
/// searches.
pub trait RoutingEngine: Send + Sync {
    /// Search for an assignment within the given parameters.
    ///
    /// # Errors
    /// [`EngineError::NoSolution`] when no feasible assignment was found in
    /// budget; [`EngineError::Failure`] for internal engine errors.
    fn search(&self, model: &ModelSpec, params: &SearchParams) -> Result<Assignment, EngineError>;
}
