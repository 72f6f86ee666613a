//! Sequential greedy Dijkstra over the dense weight matrix
//!
//! The baseline every other engine is checked against. It runs exactly
//! `N - 1` iterations: pick the closest unfinalized vertex, finalize it, then
//! relax its whole matrix row.

use super::frontier::min_unfinalized;
use super::paths::ShortestPaths;
use crate::storage::FixedDegreeGraph;
use crate::NodeId;
use anyhow::Result;
use log::debug;

/// Compute single-source shortest distances sequentially
///
/// # Errors
///
/// Returns [`GraphError::VertexOutOfBounds`](crate::GraphError::VertexOutOfBounds)
/// if `source` is not a vertex of `graph`.
///
/// # Example
///
/// ```
/// use degree_sssp::{dijkstra_sequential, FixedDegreeGraph, NodeId};
///
/// let edges = [
///     (NodeId(0), NodeId(1), 0.2),
///     (NodeId(1), NodeId(2), 0.3),
///     (NodeId(0), NodeId(2), 0.9),
/// ];
/// let graph = FixedDegreeGraph::from_edge_list(3, &edges).unwrap();
///
/// let paths = dijkstra_sequential(&graph, NodeId(0)).unwrap();
/// assert_eq!(paths.distance(NodeId(2)), Some(0.2 + 0.3)); // not 0.9
/// ```
pub fn dijkstra_sequential(graph: &FixedDegreeGraph, source: NodeId) -> Result<ShortestPaths> {
    dijkstra_sequential_observed(graph, source, |_, _| {})
}

/// [`dijkstra_sequential`] that hands the distance vector to `observer` after
/// every iteration (iteration index, distances)
///
/// # Errors
///
/// Same as [`dijkstra_sequential`].
pub fn dijkstra_sequential_observed<F>(
    graph: &FixedDegreeGraph,
    source: NodeId,
    mut observer: F,
) -> Result<ShortestPaths>
where
    F: FnMut(usize, &[f32]),
{
    graph.check_vertex(source)?;

    let n = graph.num_vertices();
    let src = source.index();
    let matrix = graph.weight_matrix();

    let mut finalized = vec![false; n];
    let mut distances = vec![f32::INFINITY; n];
    let mut path_traces: Vec<Vec<u32>> = vec![Vec::new(); n];
    distances[src] = 0.0;

    debug!("sequential dijkstra: {n} vertices from source {}", source.0);

    let iterations = n - 1;
    for iteration in 0..iterations {
        let current = min_unfinalized(&distances, &finalized, src);
        finalized[current] = true;

        let base = distances[current];
        if base.is_finite() {
            #[allow(clippy::cast_possible_truncation)] // n fits u32 by construction
            let current_id = current as u32;
            for (v, cell) in matrix.row(current).iter().enumerate() {
                let Some(weight) = *cell else { continue };
                if finalized[v] {
                    continue;
                }
                let candidate = base + weight;
                if candidate < distances[v] {
                    distances[v] = candidate;
                    path_traces[v].push(current_id);
                }
            }
        }

        observer(iteration, &distances);
    }

    debug!("sequential dijkstra: done after {iterations} iterations");
    Ok(ShortestPaths::new(source, distances, path_traces, iterations))
}
