//! Native routing engine backed by `vrp-core`.
//!
//! This crate provides [`VrpEngine`], the default implementation of the
//! [`RoutingEngine`](fleetplan_core::RoutingEngine) contract. It translates a
//! registered routing model into a `vrp-core` problem with one delivery job
//! per routable node, runs the metaheuristic search within the configured
//! budget, and converts the winning tours back into the raw per-vehicle
//! assignment the pipeline decodes.
//!
//! The engine is deterministic at the API boundary: every search builds its
//! own problem and shares nothing with concurrent calls. Modelling errors are
//! reported as [`EngineError::Failure`](fleetplan_core::EngineError); a search
//! that leaves jobs unassigned is reported as
//! [`EngineError::NoSolution`](fleetplan_core::EngineError).

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod engine;
mod model;

pub use engine::{VrpEngine, VrpEngineConfig};
