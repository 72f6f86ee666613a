//! Property-based tests for degree-sssp
//!
//! Verifies generator invariants and cross-engine agreement for arbitrary
//! graph sizes, degrees, seeds and sources

use degree_sssp::{
    bulk_synchronous_sssp, dijkstra_sequential, dijkstra_shared_memory, FixedDegreeGraph, NodeId,
    OffloadConfig, ParallelConfig,
};
use proptest::prelude::*;

/// (num_vertices, neighbors_per_vertex, seed) with 1 <= k < N
fn prop_graph_params(max_vertices: usize) -> impl Strategy<Value = (usize, usize, u64)> {
    (2..=max_vertices).prop_flat_map(|n| (Just(n), 1..n, any::<u64>()))
}

// Property: generated graphs have exactly k distinct, non-self neighbors per vertex
proptest! {
    #[test]
    fn prop_generate_fixed_degree((n, k, seed) in prop_graph_params(80)) {
        let graph = FixedDegreeGraph::generate(n, k, seed).unwrap();
        let (offsets, targets, weights) = graph.csr_components();

        // Invariant 1: CSR shape
        prop_assert_eq!(offsets.len(), n + 1);
        prop_assert_eq!(targets.len(), n * k);
        prop_assert_eq!(weights.len(), n * k);

        for v in 0..n {
            let (row, row_weights) = graph.neighbors(NodeId(v as u32)).unwrap();

            // Invariant 2: exact out-degree
            prop_assert_eq!(row.len(), k);

            // Invariant 3: no self-loops, no duplicates
            prop_assert!(!row.contains(&(v as u32)));
            let mut sorted = row.to_vec();
            sorted.sort_unstable();
            sorted.dedup();
            prop_assert_eq!(sorted.len(), k);

            // Invariant 4: weights in [0, 1) and mirrored by the dense matrix
            for (&dst, &w) in row.iter().zip(row_weights) {
                prop_assert!((0.0..1.0).contains(&w));
                let cell = graph.weight(NodeId(v as u32), NodeId(dst)).unwrap();
                prop_assert!(cell <= w);
            }
        }
    }
}

// Property: same seed, same graph
proptest! {
    #[test]
    fn prop_generate_deterministic((n, k, seed) in prop_graph_params(60)) {
        let a = FixedDegreeGraph::generate(n, k, seed).unwrap();
        let b = FixedDegreeGraph::generate(n, k, seed).unwrap();
        prop_assert_eq!(a.csr_components(), b.csr_components());
    }
}

// Property: all CPU engines agree, source distance is zero, distances never negative
proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_engines_agree(
        (n, k, seed) in prop_graph_params(60),
        source_pick in any::<prop::sample::Index>(),
        threads in 1usize..5,
    ) {
        let graph = FixedDegreeGraph::generate(n, k, seed).unwrap();
        let source = NodeId(source_pick.index(n) as u32);

        let sequential = dijkstra_sequential(&graph, source).unwrap();
        let config = ParallelConfig::default().with_num_threads(threads).with_min_chunk_len(4);
        let parallel = dijkstra_shared_memory(&graph, source, &config).unwrap();
        let bulk = bulk_synchronous_sssp(&graph, source, &OffloadConfig::default()).unwrap();

        prop_assert_eq!(sequential.distances()[source.0 as usize], 0.0);
        prop_assert_eq!(parallel.distances(), sequential.distances());
        prop_assert!(bulk.converged_after <= n);

        for (v, (&a, &b)) in sequential.distances().iter().zip(&bulk.distances).enumerate() {
            prop_assert!(a >= 0.0);
            prop_assert!(
                (a - b).abs() < 1e-4 || (a.is_infinite() && b.is_infinite()),
                "vertex {}: sequential {} vs bulk {}", v, a, b
            );
        }
    }
}

// Property: reconstructed paths are real edges whose weights sum to the distance
proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_paths_follow_edges((n, k, seed) in prop_graph_params(50)) {
        let graph = FixedDegreeGraph::generate(n, k, seed).unwrap();
        let paths = dijkstra_sequential(&graph, NodeId(0)).unwrap();

        for v in 0..n {
            let target = NodeId(v as u32);
            let Some(path) = paths.path_to(target) else {
                prop_assert!(!paths.is_reachable(target));
                continue;
            };
            prop_assert_eq!(path.first().copied(), Some(NodeId(0)));
            prop_assert_eq!(path.last().copied(), Some(target));

            let mut total = 0.0_f32;
            for hop in path.windows(2) {
                let w = graph.weight(hop[0], hop[1]);
                prop_assert!(w.is_some(), "{:?} -> {:?} is not an edge", hop[0], hop[1]);
                total += w.unwrap_or_default();
            }
            let expected = paths.distances()[v];
            prop_assert!((total - expected).abs() < 1e-4, "vertex {}: {} vs {}", v, total, expected);
        }
    }
}
