//! Graph Store, Reachability Reducer and Risk Propagator.
//!
//! The crawl populates a [`store::Graph`]; [`reduce::reduce`] produces the reachable
//! subgraph used for reporting; [`propagate::propagate`] then raises edge weights.

pub mod dot;
pub mod error;
pub mod propagate;
pub mod reduce;
pub mod store;

pub use error::GraphError;
pub use store::{AddVertexOutcome, EdgeData, Graph, WeightedNode};
