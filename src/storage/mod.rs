//! Graph storage layer
//!
//! Fixed-out-degree CSR graph plus the dense weight-matrix view the greedy
//! engines scan.

pub mod graph;
pub mod matrix;

pub use graph::{FixedDegreeGraph, GraphError, NodeId};
pub use matrix::WeightMatrix;
