//! Fixed-out-degree random graph in CSR layout
//!
//! Every vertex owns a contiguous run of `edge_array` starting at
//! `vertex_offsets[v]`. Generated graphs have uniform degree `k`, so the
//! offsets are simply `v * k`; hand-built graphs (see
//! [`FixedDegreeGraph::from_edge_list`]) may have any degree.
//!
//! ```text
//! Graph (k = 2): 0 → {1, 2}, 1 → {2, 0}, 2 → {0, 1}
//!
//!   vertex_offsets: [0, 2, 4, 6]
//!   edge_array:     [1, 2, 2, 0, 0, 1]
//!   weight_array:   [.., .., .., .., .., ..]   // each in [0, 1)
//! ```
//!
//! A dense [`WeightMatrix`] over the same edges is built alongside, because
//! the greedy engines scan whole matrix rows per iteration.

use super::matrix::WeightMatrix;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

/// Weights are drawn as `r / WEIGHT_RESOLUTION` with `r` in `[0, WEIGHT_RESOLUTION)`.
const WEIGHT_RESOLUTION: u32 = 1000;

/// Vertex identifier (zero-indexed)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Index into per-vertex arrays
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Graph construction and access errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GraphError {
    /// A graph needs at least one vertex
    #[error("Graph must have at least one vertex")]
    EmptyGraph,

    /// Vertex count does not fit the 32-bit vertex ids used on the device
    #[error("Graph with {0} vertices exceeds the u32 vertex id range")]
    TooManyVertices(usize),

    /// Unique-neighbor sampling needs `0 < neighbors_per_vertex < num_vertices`
    #[error(
        "Cannot draw {neighbors_per_vertex} distinct neighbors per vertex from {num_vertices} vertices"
    )]
    InvalidDegree {
        /// Requested vertex count
        num_vertices: usize,
        /// Requested out-degree
        neighbors_per_vertex: usize,
    },

    /// Vertex id outside `[0, num_vertices)`
    #[error("Vertex {vertex} out of bounds (graph has {num_vertices} vertices)")]
    VertexOutOfBounds {
        /// Offending vertex
        vertex: u32,
        /// Vertex count of the graph
        num_vertices: usize,
    },

    /// Neighbor slot outside the vertex's out-degree
    #[error("Neighbor slot {slot} out of bounds for vertex {vertex} (out-degree {degree})")]
    SlotOutOfBounds {
        /// Vertex queried
        vertex: u32,
        /// Offending slot
        slot: usize,
        /// Out-degree of the vertex
        degree: usize,
    },

    /// Edge list references a vertex outside the declared range
    #[error("Edge {src} → {dst} references a vertex outside [0, {num_vertices})")]
    EdgeOutOfBounds {
        /// Edge source
        src: u32,
        /// Edge target
        dst: u32,
        /// Declared vertex count
        num_vertices: usize,
    },

    /// Self-loops are excluded from the graph model
    #[error("Self-loop on vertex {0} is not allowed")]
    SelfLoop(u32),

    /// Weights must be finite and non-negative
    #[error("Edge {src} → {dst} has invalid weight {weight} (must be finite and >= 0)")]
    InvalidWeight {
        /// Edge source
        src: u32,
        /// Edge target
        dst: u32,
        /// Offending weight
        weight: f32,
    },
}

/// Immutable directed graph with a CSR adjacency and a dense weight matrix
///
/// # Example
///
/// ```
/// use degree_sssp::{FixedDegreeGraph, NodeId};
///
/// let graph = FixedDegreeGraph::generate(16, 3, 42).unwrap();
/// assert_eq!(graph.num_vertices(), 16);
/// assert_eq!(graph.num_edges(), 48);
///
/// let (targets, weights) = graph.neighbors(NodeId(0)).unwrap();
/// assert_eq!(targets.len(), 3);
/// assert!(weights.iter().all(|w| (0.0..1.0).contains(w)));
/// ```
#[derive(Debug, Clone)]
pub struct FixedDegreeGraph {
    /// `vertex_offsets[v]..vertex_offsets[v + 1]` is the edge run of `v`
    /// Length: `num_vertices` + 1
    vertex_offsets: Vec<u32>,

    /// Edge targets
    /// Length: `num_edges`
    edge_array: Vec<u32>,

    /// Edge weights, parallel to `edge_array`
    /// Length: `num_edges`
    weight_array: Vec<f32>,

    /// Dense N×N view; `None` = no edge
    weight_matrix: WeightMatrix,

    /// `Some(k)` when every vertex has out-degree `k`
    neighbors_per_vertex: Option<usize>,
}

impl FixedDegreeGraph {
    /// Generate a random graph where every vertex has exactly
    /// `neighbors_per_vertex` distinct out-neighbors, none of them itself.
    ///
    /// Neighbors are drawn by rejection sampling from a `StdRng` seeded with
    /// `seed`, so equal arguments always produce the same graph. Weights are
    /// quantised to multiples of 0.001 in `[0, 1)`.
    ///
    /// # Errors
    ///
    /// - [`GraphError::EmptyGraph`] when `num_vertices == 0`
    /// - [`GraphError::InvalidDegree`] when `neighbors_per_vertex == 0` or
    ///   `neighbors_per_vertex >= num_vertices` (sampling could never finish)
    /// - [`GraphError::TooManyVertices`] when ids would overflow `u32`
    pub fn generate(
        num_vertices: usize,
        neighbors_per_vertex: usize,
        seed: u64,
    ) -> Result<Self, GraphError> {
        if num_vertices == 0 {
            return Err(GraphError::EmptyGraph);
        }
        if neighbors_per_vertex == 0 || neighbors_per_vertex >= num_vertices {
            return Err(GraphError::InvalidDegree {
                num_vertices,
                neighbors_per_vertex,
            });
        }
        let n = u32::try_from(num_vertices).map_err(|_| GraphError::TooManyVertices(num_vertices))?;
        let num_edges = num_vertices
            .checked_mul(neighbors_per_vertex)
            .filter(|&e| u32::try_from(e).is_ok())
            .ok_or(GraphError::TooManyVertices(num_vertices))?;

        let mut rng = StdRng::seed_from_u64(seed);
        let mut edge_array = Vec::with_capacity(num_edges);
        let mut weight_array = Vec::with_capacity(num_edges);
        let mut chosen: Vec<u32> = Vec::with_capacity(neighbors_per_vertex);

        for vertex in 0..n {
            chosen.clear();
            while chosen.len() < neighbors_per_vertex {
                let candidate = rng.gen_range(0..n);
                if candidate == vertex || chosen.contains(&candidate) {
                    continue;
                }
                chosen.push(candidate);
                edge_array.push(candidate);
                #[allow(clippy::cast_precision_loss)]
                weight_array.push(
                    rng.gen_range(0..WEIGHT_RESOLUTION) as f32 / WEIGHT_RESOLUTION as f32,
                );
            }
        }

        #[allow(clippy::cast_possible_truncation)] // num_edges checked against u32 above
        let vertex_offsets = (0..=num_vertices)
            .map(|v| (v * neighbors_per_vertex) as u32)
            .collect();

        Ok(Self::assemble(
            num_vertices,
            vertex_offsets,
            edge_array,
            weight_array,
            Some(neighbors_per_vertex),
        ))
    }

    /// Build a graph from an explicit `(source, target, weight)` edge list.
    ///
    /// Degrees may differ per vertex. When the same edge appears twice the
    /// dense matrix keeps the lighter weight, which is what every engine
    /// would converge to anyway.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::EdgeOutOfBounds`], [`GraphError::SelfLoop`] or
    /// [`GraphError::InvalidWeight`] for malformed edges, and
    /// [`GraphError::EmptyGraph`] when `num_vertices == 0`.
    ///
    /// # Example
    ///
    /// ```
    /// use degree_sssp::{FixedDegreeGraph, NodeId};
    ///
    /// let edges = [(NodeId(0), NodeId(1), 0.5), (NodeId(1), NodeId(2), 0.25)];
    /// let graph = FixedDegreeGraph::from_edge_list(3, &edges).unwrap();
    /// assert_eq!(graph.weight(NodeId(0), NodeId(1)), Some(0.5));
    /// assert_eq!(graph.weight(NodeId(0), NodeId(2)), None);
    /// ```
    pub fn from_edge_list(
        num_vertices: usize,
        edges: &[(NodeId, NodeId, f32)],
    ) -> Result<Self, GraphError> {
        if num_vertices == 0 {
            return Err(GraphError::EmptyGraph);
        }
        u32::try_from(num_vertices).map_err(|_| GraphError::TooManyVertices(num_vertices))?;

        for &(src, dst, weight) in edges {
            if src.index() >= num_vertices || dst.index() >= num_vertices {
                return Err(GraphError::EdgeOutOfBounds {
                    src: src.0,
                    dst: dst.0,
                    num_vertices,
                });
            }
            if src == dst {
                return Err(GraphError::SelfLoop(src.0));
            }
            if !weight.is_finite() || weight < 0.0 {
                return Err(GraphError::InvalidWeight {
                    src: src.0,
                    dst: dst.0,
                    weight,
                });
            }
        }

        // Counting sort by source keeps each vertex's edges in input order
        let mut degrees = vec![0_u32; num_vertices];
        for (src, _, _) in edges {
            degrees[src.index()] += 1;
        }

        let mut vertex_offsets = Vec::with_capacity(num_vertices + 1);
        let mut offset = 0_u32;
        vertex_offsets.push(offset);
        for degree in &degrees {
            offset += degree;
            vertex_offsets.push(offset);
        }

        let mut cursor: Vec<usize> = vertex_offsets[..num_vertices]
            .iter()
            .map(|&o| o as usize)
            .collect();
        let mut edge_array = vec![0_u32; edges.len()];
        let mut weight_array = vec![0.0_f32; edges.len()];
        for &(src, dst, weight) in edges {
            let slot = cursor[src.index()];
            edge_array[slot] = dst.0;
            weight_array[slot] = weight;
            cursor[src.index()] += 1;
        }

        let first = degrees.first().copied().unwrap_or(0);
        let neighbors_per_vertex = degrees
            .iter()
            .all(|&d| d == first)
            .then_some(first as usize);

        Ok(Self::assemble(
            num_vertices,
            vertex_offsets,
            edge_array,
            weight_array,
            neighbors_per_vertex,
        ))
    }

    fn assemble(
        num_vertices: usize,
        vertex_offsets: Vec<u32>,
        edge_array: Vec<u32>,
        weight_array: Vec<f32>,
        neighbors_per_vertex: Option<usize>,
    ) -> Self {
        let mut weight_matrix = WeightMatrix::with_zero_diagonal(num_vertices);
        for src in 0..num_vertices {
            let start = vertex_offsets[src] as usize;
            let end = vertex_offsets[src + 1] as usize;
            for (&dst, &weight) in edge_array[start..end].iter().zip(&weight_array[start..end]) {
                weight_matrix.insert_min(src, dst as usize, weight);
            }
        }

        Self {
            vertex_offsets,
            edge_array,
            weight_array,
            weight_matrix,
            neighbors_per_vertex,
        }
    }

    /// Number of vertices
    #[must_use]
    pub fn num_vertices(&self) -> usize {
        self.vertex_offsets.len() - 1
    }

    /// Number of directed edges
    #[must_use]
    pub fn num_edges(&self) -> usize {
        self.edge_array.len()
    }

    /// Uniform out-degree, if every vertex has the same one
    #[must_use]
    pub const fn neighbors_per_vertex(&self) -> Option<usize> {
        self.neighbors_per_vertex
    }

    /// Check that `vertex` is in range
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::VertexOutOfBounds`] otherwise
    pub fn check_vertex(&self, vertex: NodeId) -> Result<(), GraphError> {
        if vertex.index() < self.num_vertices() {
            Ok(())
        } else {
            Err(GraphError::VertexOutOfBounds {
                vertex: vertex.0,
                num_vertices: self.num_vertices(),
            })
        }
    }

    /// Out-degree of `vertex`
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::VertexOutOfBounds`] for an unknown vertex
    pub fn out_degree(&self, vertex: NodeId) -> Result<usize, GraphError> {
        self.check_vertex(vertex)?;
        let idx = vertex.index();
        Ok((self.vertex_offsets[idx + 1] - self.vertex_offsets[idx]) as usize)
    }

    /// Outgoing `(targets, weights)` of `vertex`
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::VertexOutOfBounds`] for an unknown vertex
    pub fn neighbors(&self, vertex: NodeId) -> Result<(&[u32], &[f32]), GraphError> {
        self.check_vertex(vertex)?;
        Ok(self.adjacency(vertex.index()))
    }

    /// Unchecked adjacency for engine inner loops (`vertex < num_vertices`)
    pub(crate) fn adjacency(&self, vertex: usize) -> (&[u32], &[f32]) {
        let start = self.vertex_offsets[vertex] as usize;
        let end = self.vertex_offsets[vertex + 1] as usize;
        (&self.edge_array[start..end], &self.weight_array[start..end])
    }

    /// Target of the `slot`-th outgoing edge of `vertex`
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::VertexOutOfBounds`] or [`GraphError::SlotOutOfBounds`]
    pub fn edge_at(&self, vertex: NodeId, slot: usize) -> Result<NodeId, GraphError> {
        let (targets, _) = self.neighbors(vertex)?;
        targets
            .get(slot)
            .map(|&t| NodeId(t))
            .ok_or(GraphError::SlotOutOfBounds {
                vertex: vertex.0,
                slot,
                degree: targets.len(),
            })
    }

    /// Weight of the `slot`-th outgoing edge of `vertex`
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::VertexOutOfBounds`] or [`GraphError::SlotOutOfBounds`]
    pub fn weight_at(&self, vertex: NodeId, slot: usize) -> Result<f32, GraphError> {
        let (_, weights) = self.neighbors(vertex)?;
        weights.get(slot).copied().ok_or(GraphError::SlotOutOfBounds {
            vertex: vertex.0,
            slot,
            degree: weights.len(),
        })
    }

    /// Dense-matrix lookup: `Some(w)` for an edge (or `Some(0.0)` on the
    /// diagonal), `None` when `src` has no edge to `dst` or either is out of range
    #[must_use]
    pub fn weight(&self, src: NodeId, dst: NodeId) -> Option<f32> {
        self.weight_matrix.get(src.index(), dst.index())
    }

    /// Dense weight matrix
    #[must_use]
    pub const fn weight_matrix(&self) -> &WeightMatrix {
        &self.weight_matrix
    }

    /// Raw CSR arrays `(vertex_offsets, edge_array, weight_array)` for device upload
    #[must_use]
    pub fn csr_components(&self) -> (&[u32], &[u32], &[f32]) {
        (&self.vertex_offsets, &self.edge_array, &self.weight_array)
    }
}
