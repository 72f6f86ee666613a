//! Backend Story Integration Tests
//!
//! Every engine must produce the same distance vector for the same graph and
//! source: sequential, shared-memory, host bulk-synchronous and (with the
//! `gpu` feature) the offloaded bulk-synchronous engine.
//!
//! The greedy engines agree bit-for-bit. Bulk-synchronous engines sum the
//! same weights along the same shortest path, so they agree to rounding.

mod common;

use common::{assert_distances_close, init, scenario_graph, SCENARIO_DISTANCES};
use degree_sssp::{
    bulk_synchronous_sssp, dijkstra_sequential, dijkstra_shared_memory, FixedDegreeGraph, NodeId,
    OffloadConfig, ParallelConfig,
};

// ============================================================================
// HELPER: Build test graphs
// ============================================================================

/// Graphs covering sparse, dense and near-complete degrees
fn build_test_graphs() -> Vec<(String, FixedDegreeGraph)> {
    [(64, 1, 3), (200, 4, 11), (500, 16, 29), (40, 39, 5)]
        .into_iter()
        .map(|(n, k, seed)| {
            (
                format!("N={n} k={k} seed={seed}"),
                FixedDegreeGraph::generate(n, k, seed).unwrap(),
            )
        })
        .collect()
}

// ============================================================================
// CPU BACKEND TESTS
// ============================================================================

/// Reference scenario through every CPU engine
#[test]
fn test_scenario_on_cpu_backends() {
    init();
    let graph = scenario_graph();
    let sequential = dijkstra_sequential(&graph, NodeId(0)).unwrap();
    let parallel = dijkstra_shared_memory(&graph, NodeId(0), &ParallelConfig::default()).unwrap();
    let bulk = bulk_synchronous_sssp(&graph, NodeId(0), &OffloadConfig::default()).unwrap();

    assert_distances_close(sequential.distances(), &SCENARIO_DISTANCES, 1e-6);
    assert_distances_close(parallel.distances(), &SCENARIO_DISTANCES, 1e-6);
    assert_distances_close(&bulk.distances, &SCENARIO_DISTANCES, 1e-6);
}

/// Shared-memory engine is bit-identical to sequential, traces included
#[test]
fn test_shared_memory_matches_sequential() {
    init();
    let config = ParallelConfig::default()
        .with_num_threads(4)
        .with_min_chunk_len(16);

    for (name, graph) in build_test_graphs() {
        for source in [0, graph.num_vertices() as u32 - 1] {
            let sequential = dijkstra_sequential(&graph, NodeId(source)).unwrap();
            let parallel = dijkstra_shared_memory(&graph, NodeId(source), &config).unwrap();
            assert_eq!(
                parallel.distances(),
                sequential.distances(),
                "{name}, source {source}"
            );
            assert_eq!(parallel, sequential, "{name}, source {source}");
        }
    }
}

/// Host bulk-synchronous engine agrees with sequential within tolerance
#[test]
fn test_bulk_synchronous_matches_sequential() {
    init();
    for (name, graph) in build_test_graphs() {
        let sequential = dijkstra_sequential(&graph, NodeId(0)).unwrap();
        for burst in [1, 10] {
            let config = OffloadConfig::default().with_superstep_burst(burst);
            let bulk = bulk_synchronous_sssp(&graph, NodeId(0), &config).unwrap();
            assert!(
                bulk.converged_after <= graph.num_vertices(),
                "{name}: converged after {} supersteps",
                bulk.converged_after
            );
            assert_distances_close(&bulk.distances, sequential.distances(), 1e-4);
        }
    }
}

/// Thread count never changes the answer
#[test]
fn test_shared_memory_thread_counts() {
    init();
    let graph = FixedDegreeGraph::generate(400, 6, 2024).unwrap();
    let baseline = dijkstra_sequential(&graph, NodeId(17)).unwrap();

    for threads in [1, 2, 3, 8] {
        let config = ParallelConfig::default()
            .with_num_threads(threads)
            .with_min_chunk_len(1);
        let parallel = dijkstra_shared_memory(&graph, NodeId(17), &config).unwrap();
        assert_eq!(parallel.distances(), baseline.distances(), "{threads} threads");
    }
}

/// Greedy engines finalize in exactly N - 1 iterations
#[test]
fn test_greedy_iteration_count() {
    init();
    let graph = FixedDegreeGraph::generate(90, 3, 1).unwrap();
    let sequential = dijkstra_sequential(&graph, NodeId(0)).unwrap();
    let parallel = dijkstra_shared_memory(&graph, NodeId(0), &ParallelConfig::default()).unwrap();
    assert_eq!(sequential.iterations(), 89);
    assert_eq!(parallel.iterations(), 89);
}

// ============================================================================
// GPU BACKEND TESTS (Optional - requires gpu feature)
// ============================================================================

#[cfg(feature = "gpu")]
mod gpu_tests {
    use super::*;
    use degree_sssp::{gpu_sssp, DeviceDiscovery, GpuDevice, GpuGraphBuffers, SsspKernels};
    use serial_test::serial;

    /// Every discovered device (GPU and CPU adapters) agrees with sequential
    #[tokio::test]
    #[serial]
    async fn test_all_discovered_devices_match_sequential() {
        init();
        let discovery = DeviceDiscovery::discover(wgpu::Backends::all()).await;
        if discovery.devices().is_empty() {
            eprintln!("⚠️  Skipping test_all_discovered_devices_match_sequential: no devices ({discovery:?})");
            return;
        }

        for device in discovery.devices() {
            let kernels = SsspKernels::compile(device).await.unwrap();
            for (name, graph) in build_test_graphs() {
                let expected = dijkstra_sequential(&graph, NodeId(0)).unwrap();
                let buffers = GpuGraphBuffers::upload(device, &graph).unwrap();
                let result =
                    gpu_sssp(device, &kernels, &buffers, NodeId(0), &OffloadConfig::default())
                        .await
                        .unwrap();
                eprintln!(
                    "{} / {name}: {} supersteps",
                    device.info().name,
                    result.supersteps
                );
                assert_distances_close(&result.distances, expected.distances(), 1e-4);
            }
        }
    }

    /// Kernels compiled once serve several graphs and sources
    #[tokio::test]
    #[serial]
    async fn test_kernels_are_reusable() {
        init();
        if !GpuDevice::is_gpu_available().await {
            eprintln!("⚠️  Skipping test_kernels_are_reusable: GPU not available");
            return;
        }

        let device = GpuDevice::new().await.unwrap();
        let kernels = SsspKernels::compile(&device).await.unwrap();

        let scenario = GpuGraphBuffers::upload(&device, &scenario_graph()).unwrap();
        let result = gpu_sssp(&device, &kernels, &scenario, NodeId(0), &OffloadConfig::default())
            .await
            .unwrap();
        assert_distances_close(&result.distances, &SCENARIO_DISTANCES, 1e-6);

        let graph = FixedDegreeGraph::generate(300, 5, 8).unwrap();
        let buffers = GpuGraphBuffers::upload(&device, &graph).unwrap();
        for source in [0, 150, 299] {
            let expected = dijkstra_sequential(&graph, NodeId(source)).unwrap();
            let result =
                gpu_sssp(&device, &kernels, &buffers, NodeId(source), &OffloadConfig::default())
                    .await
                    .unwrap();
            assert_distances_close(&result.distances, expected.distances(), 1e-4);
        }
    }
}
