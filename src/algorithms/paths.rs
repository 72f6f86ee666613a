//! Result type shared by the greedy (Dijkstra) engines

use crate::NodeId;

/// Distances from one source plus best-effort path traces
///
/// `path_trace(v)` lists, in order, every vertex that improved `v`'s
/// distance. Its last entry is the predecessor on a shortest path, which is
/// what [`ShortestPaths::path_to`] follows.
#[derive(Debug, Clone, PartialEq)]
pub struct ShortestPaths {
    source: NodeId,
    distances: Vec<f32>,
    path_traces: Vec<Vec<u32>>,
    iterations: usize,
}

impl ShortestPaths {
    pub(crate) fn new(
        source: NodeId,
        distances: Vec<f32>,
        path_traces: Vec<Vec<u32>>,
        iterations: usize,
    ) -> Self {
        Self {
            source,
            distances,
            path_traces,
            iterations,
        }
    }

    /// Source vertex
    #[must_use]
    pub const fn source(&self) -> NodeId {
        self.source
    }

    /// Distance per vertex (`f32::INFINITY` when unreachable)
    #[must_use]
    pub fn distances(&self) -> &[f32] {
        &self.distances
    }

    /// Take the distance vector
    #[must_use]
    pub fn into_distances(self) -> Vec<f32> {
        self.distances
    }

    /// Greedy iterations performed (always `N - 1`)
    #[must_use]
    pub const fn iterations(&self) -> usize {
        self.iterations
    }

    /// Distance to `node`, `None` when unreachable or out of range
    #[must_use]
    pub fn distance(&self, node: NodeId) -> Option<f32> {
        self.distances
            .get(node.index())
            .copied()
            .filter(|d| d.is_finite())
    }

    /// Check if `node` is reachable from the source
    #[must_use]
    pub fn is_reachable(&self, node: NodeId) -> bool {
        self.distance(node).is_some()
    }

    /// Every vertex that improved `node`'s distance, oldest first
    #[must_use]
    pub fn path_trace(&self, node: NodeId) -> &[u32] {
        self.path_traces
            .get(node.index())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Predecessor of `node` on its shortest path
    #[must_use]
    pub fn predecessor(&self, node: NodeId) -> Option<NodeId> {
        self.path_trace(node).last().map(|&p| NodeId(p))
    }

    /// Walk predecessors back to the source
    ///
    /// Returns `None` for unreachable vertices. Traces are best-effort, so
    /// the walk gives up after `N` hops instead of looping.
    #[must_use]
    pub fn path_to(&self, node: NodeId) -> Option<Vec<NodeId>> {
        self.distance(node)?;

        let mut path = vec![node];
        let mut current = node;
        while current != self.source {
            if path.len() > self.distances.len() {
                return None;
            }
            current = self.predecessor(current)?;
            path.push(current);
        }
        path.reverse();
        Some(path)
    }
}
