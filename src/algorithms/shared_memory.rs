//! Shared-memory parallel Dijkstra
//!
//! Same `N - 1` iteration skeleton as the sequential engine, with both halves
//! of an iteration spread over a rayon worker team:
//!
//! 1. frontier selection through [`min_unfinalized_parallel`], whose mutex is
//!    the one place the winning "current" vertex is committed;
//! 2. relaxation of the current row, split over the destination range. Each
//!    worker owns a disjoint slice of `distances` and `path_traces`, so the
//!    writes need no synchronisation.
//!
//! Every parallel region joins before the next one starts, which is the
//! barrier that publishes the new `finalized` flag to all workers.

use super::frontier::min_unfinalized_parallel;
use super::paths::ShortestPaths;
use crate::config::ParallelConfig;
use crate::storage::FixedDegreeGraph;
use crate::NodeId;
use anyhow::Result;
use log::debug;
use rayon::prelude::*;

/// Compute single-source shortest distances on a shared-memory worker team
///
/// A fresh pool is built from `config` for the duration of the call.
///
/// # Errors
///
/// Returns an error if `source` is out of range or the worker pool cannot be
/// created.
///
/// # Example
///
/// ```
/// use degree_sssp::{dijkstra_sequential, dijkstra_shared_memory, FixedDegreeGraph, NodeId, ParallelConfig};
///
/// let graph = FixedDegreeGraph::generate(200, 4, 1).unwrap();
/// let config = ParallelConfig::default().with_num_threads(4);
///
/// let parallel = dijkstra_shared_memory(&graph, NodeId(0), &config).unwrap();
/// let sequential = dijkstra_sequential(&graph, NodeId(0)).unwrap();
/// assert_eq!(parallel.distances(), sequential.distances());
/// ```
pub fn dijkstra_shared_memory(
    graph: &FixedDegreeGraph,
    source: NodeId,
    config: &ParallelConfig,
) -> Result<ShortestPaths> {
    graph.check_vertex(source)?;
    let pool = config.build_pool()?;

    debug!(
        "shared-memory dijkstra: {} vertices from source {} on {} workers",
        graph.num_vertices(),
        source.0,
        pool.current_num_threads()
    );

    let paths = pool.install(|| run(graph, source, config.min_chunk_len));

    debug!(
        "shared-memory dijkstra: done after {} iterations",
        paths.iterations()
    );
    Ok(paths)
}

fn run(graph: &FixedDegreeGraph, source: NodeId, min_chunk_len: usize) -> ShortestPaths {
    let n = graph.num_vertices();
    let src = source.index();
    let matrix = graph.weight_matrix();

    let mut finalized = vec![false; n];
    let mut distances = vec![f32::INFINITY; n];
    let mut path_traces: Vec<Vec<u32>> = vec![Vec::new(); n];
    distances[src] = 0.0;

    let iterations = n - 1;
    for _ in 0..iterations {
        let current = min_unfinalized_parallel(&distances, &finalized, src, min_chunk_len);
        finalized[current] = true;

        let base = distances[current];
        if !base.is_finite() {
            continue;
        }
        #[allow(clippy::cast_possible_truncation)] // n fits u32 by construction
        let current_id = current as u32;

        distances
            .par_iter_mut()
            .zip(path_traces.par_iter_mut())
            .zip(finalized.par_iter())
            .zip(matrix.row(current).par_iter())
            .with_min_len(min_chunk_len)
            .for_each(|(((dist, trace), &done), cell)| {
                let Some(weight) = *cell else { return };
                if done {
                    return;
                }
                let candidate = base + weight;
                if candidate < *dist {
                    *dist = candidate;
                    trace.push(current_id);
                }
            });
    }

    ShortestPaths::new(source, distances, path_traces, iterations)
}
