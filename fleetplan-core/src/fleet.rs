//! Fleet and job descriptions accepted by the formulator.
//!
//! These are the raw inputs of the pipeline. Index bounds are validated by
//! [`formulate`](crate::formulate) rather than by the constructors, because
//! the node count they are checked against only exists once a distance
//! matrix is present.

/// A vehicle available for deliveries.
///
/// `capacity` carries one entry per commodity dimension; the formulator
/// collapses it into a single scalar before the engine sees it (see
/// [`collapse_commodities`](crate::collapse_commodities)).
///
/// # Examples
/// ```
/// use fleetplan_core::Vehicle;
///
/// let vehicle = Vehicle::new(1, 0, vec![4]);
/// assert_eq!(vehicle.start_index, 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vehicle {
    /// Unique identifier, echoed back in the solution.
    pub id: u64,
    /// Node index the vehicle departs from. Must lie inside the original
    /// (un-augmented) distance matrix.
    pub start_index: usize,
    /// Per-commodity load limits.
    pub capacity: Vec<u64>,
}

impl Vehicle {
    /// Construct a vehicle.
    #[must_use]
    pub const fn new(id: u64, start_index: usize, capacity: Vec<u64>) -> Self {
        Self {
            id,
            start_index,
            capacity,
        }
    }
}

/// A delivery job bound to one node of the distance matrix.
///
/// Several jobs may share a `location_index`; their demands and service
/// times accumulate at that node.
///
/// # Examples
/// ```
/// use fleetplan_core::Job;
///
/// let job = Job::new(7, 3, vec![2], 120);
/// assert_eq!(job.location_index, 3);
/// assert_eq!(job.service, 120);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Job {
    /// Unique identifier, echoed back in the solution.
    pub id: u64,
    /// Node index where the delivery happens. Must lie inside the original
    /// distance matrix.
    pub location_index: usize,
    /// Per-commodity delivered quantities.
    pub delivery: Vec<u64>,
    /// Time consumed at the location once the vehicle arrives.
    #[cfg_attr(feature = "serde", serde(default))]
    pub service: u64,
}

impl Job {
    /// Construct a job.
    #[must_use]
    pub const fn new(id: u64, location_index: usize, delivery: Vec<u64>, service: u64) -> Self {
        Self {
            id,
            location_index,
            delivery,
            service,
        }
    }
}
