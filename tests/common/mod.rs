//! Shared helpers for integration tests

#![allow(dead_code)]

use degree_sssp::{FixedDegreeGraph, NodeId};
use std::sync::Once;

static INIT: Once = Once::new();

/// Route `log` output through env_logger once per test binary
pub fn init() {
    INIT.call_once(|| {
        let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
            .is_test(true)
            .try_init();
    });
}

/// Four-vertex graph whose two-hop path beats the direct edge
///
/// ```text
///   0 --0.2--> 1 --0.3--> 2 --0.1--> 3
///   0 ---------0.9------> 2
/// ```
pub fn scenario_graph() -> FixedDegreeGraph {
    let edges = vec![
        (NodeId(0), NodeId(1), 0.2),
        (NodeId(1), NodeId(2), 0.3),
        (NodeId(0), NodeId(2), 0.9),
        (NodeId(2), NodeId(3), 0.1),
    ];
    FixedDegreeGraph::from_edge_list(4, &edges).unwrap()
}

/// Expected distances from vertex 0 in [`scenario_graph`]
pub const SCENARIO_DISTANCES: [f32; 4] = [0.0, 0.2, 0.5, 0.6];

/// Compare distance vectors, treating both-infinite as equal
pub fn assert_distances_close(actual: &[f32], expected: &[f32], tolerance: f32) {
    assert_eq!(actual.len(), expected.len(), "distance vectors differ in length");
    for (v, (a, e)) in actual.iter().zip(expected).enumerate() {
        assert!(
            (a - e).abs() <= tolerance || (a.is_infinite() && e.is_infinite()),
            "vertex {v}: got {a}, expected {e}"
        );
    }
}
