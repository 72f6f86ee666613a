//! Bulk-synchronous SSSP (Bellman-Ford style), host rendition
//!
//! Dijkstra's greedy pick is inherently serial. This engine instead relaxes
//! every active vertex at once and repeats until nothing changes. One
//! superstep is two pure functions over double-buffered state:
//!
//! - [`relax`]: `updating[j] = min(updating[j], distance[i] + w)` for every
//!   active `i` and edge `i → j`. Writers targeting the same `j` race, so the
//!   minimum is taken with an atomic `fetch_min` on the `f32` bit pattern;
//!   non-negative IEEE-754 floats order the same way as their bits.
//! - [`commit`]: vertices whose `updating` value beat `distance` take it and
//!   become active; everyone else resets `updating` to `distance` and goes
//!   idle.
//!
//! The host runs supersteps in bursts of
//! [`OffloadConfig::superstep_burst`] and only then checks for termination,
//! mirroring the GPU engine's readback cadence.

use crate::config::OffloadConfig;
use crate::storage::FixedDegreeGraph;
use crate::NodeId;
use anyhow::Result;
use log::{debug, trace};
use rayon::prelude::*;
use std::sync::atomic::{AtomicU32, Ordering};

/// Double-buffered per-vertex state between supersteps
///
/// Only [`SuperstepState::initial`] and [`commit`] produce states, so the
/// three vectors always share one length.
#[derive(Debug, Clone, PartialEq)]
pub struct SuperstepState {
    /// Vertices whose outgoing edges still need propagating
    pub(crate) active: Vec<bool>,

    /// Authoritative distances
    pub(crate) distance: Vec<f32>,

    /// Scratch buffer relaxations are merged into
    pub(crate) updating: Vec<f32>,
}

impl SuperstepState {
    /// Starting state: only `source` is reached and active
    #[must_use]
    pub fn initial(num_vertices: usize, source: NodeId) -> Self {
        let mut state = Self {
            active: vec![false; num_vertices],
            distance: vec![f32::INFINITY; num_vertices],
            updating: vec![f32::INFINITY; num_vertices],
        };
        if let Some(active) = state.active.get_mut(source.index()) {
            *active = true;
            state.distance[source.index()] = 0.0;
            state.updating[source.index()] = 0.0;
        }
        state
    }

    /// Number of vertices the state was built for
    #[must_use]
    pub fn num_vertices(&self) -> usize {
        self.distance.len()
    }

    /// Per-vertex active flags
    #[must_use]
    pub fn active(&self) -> &[bool] {
        &self.active
    }

    /// Authoritative distances
    #[must_use]
    pub fn distance(&self) -> &[f32] {
        &self.distance
    }

    /// Scratch buffer as of the last commit
    #[must_use]
    pub fn updating(&self) -> &[f32] {
        &self.updating
    }

    /// Number of active vertices
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.active.par_iter().filter(|&&a| a).count()
    }

    /// Termination predicate: no vertex is active
    #[must_use]
    pub fn is_settled(&self) -> bool {
        !self.active.par_iter().any(|&a| a)
    }
}

/// Relax phase: merge `distance[i] + w` of every active vertex into a copy of
/// `updating`, returning the new scratch buffer
///
/// # Panics
///
/// Panics if `state` was built for a different vertex count than `graph`.
#[must_use]
pub fn relax(graph: &FixedDegreeGraph, state: &SuperstepState) -> Vec<f32> {
    assert_eq!(
        state.num_vertices(),
        graph.num_vertices(),
        "superstep state does not match the graph"
    );
    let updating: Vec<AtomicU32> = state
        .updating
        .iter()
        .map(|d| AtomicU32::new(d.to_bits()))
        .collect();

    state
        .active
        .par_iter()
        .enumerate()
        .filter(|(_, &active)| active)
        .for_each(|(i, _)| {
            let base = state.distance[i];
            let (targets, weights) = graph.adjacency(i);
            for (&j, &w) in targets.iter().zip(weights) {
                updating[j as usize].fetch_min((base + w).to_bits(), Ordering::Relaxed);
            }
        });

    updating
        .into_iter()
        .map(|cell| f32::from_bits(cell.into_inner()))
        .collect()
}

/// Commit phase: fold the relaxed scratch buffer into the next state
///
/// # Panics
///
/// Panics if `updating` is not one value per vertex of `state`.
#[must_use]
pub fn commit(state: &SuperstepState, updating: &[f32]) -> SuperstepState {
    assert_eq!(
        updating.len(),
        state.num_vertices(),
        "relaxed buffer does not match the superstep state"
    );
    let merged: Vec<(f32, bool)> = state
        .distance
        .par_iter()
        .zip(updating.par_iter())
        .map(|(&distance, &candidate)| {
            if candidate < distance {
                (candidate, true)
            } else {
                (distance, false)
            }
        })
        .collect();

    let distance: Vec<f32> = merged.iter().map(|&(d, _)| d).collect();
    SuperstepState {
        active: merged.iter().map(|&(_, a)| a).collect(),
        updating: distance.clone(),
        distance,
    }
}

/// Bulk-synchronous SSSP result
#[derive(Debug, Clone, PartialEq)]
pub struct BulkSyncResult {
    /// Distance per vertex (`f32::INFINITY` when unreachable)
    pub distances: Vec<f32>,

    /// Supersteps executed, including the redundant tail of the last burst
    pub supersteps: usize,

    /// Superstep after which the active set first became empty
    pub converged_after: usize,

    /// Host readbacks (one per burst)
    pub bursts: usize,
}

impl BulkSyncResult {
    /// Distance to `node`, `None` when unreachable or out of range
    #[must_use]
    pub fn distance(&self, node: NodeId) -> Option<f32> {
        self.distances
            .get(node.index())
            .copied()
            .filter(|d| d.is_finite())
    }
}

/// Run the bulk-synchronous engine on the current rayon pool
///
/// Supersteps continue in bursts until a readback finds no active vertex.
/// With non-negative weights the active set empties within `N` supersteps.
/// There is no cap beyond that: the loop only ends through convergence.
///
/// # Errors
///
/// Returns [`GraphError::VertexOutOfBounds`](crate::GraphError::VertexOutOfBounds)
/// for an unknown `source`.
///
/// # Example
///
/// ```
/// use degree_sssp::{bulk_synchronous_sssp, FixedDegreeGraph, NodeId, OffloadConfig};
///
/// let edges = [(NodeId(0), NodeId(1), 0.25), (NodeId(1), NodeId(2), 0.5)];
/// let graph = FixedDegreeGraph::from_edge_list(3, &edges).unwrap();
///
/// let result = bulk_synchronous_sssp(&graph, NodeId(0), &OffloadConfig::default()).unwrap();
/// assert_eq!(result.distances, vec![0.0, 0.25, 0.75]);
/// assert!(result.converged_after <= 3);
/// ```
pub fn bulk_synchronous_sssp(
    graph: &FixedDegreeGraph,
    source: NodeId,
    config: &OffloadConfig,
) -> Result<BulkSyncResult> {
    graph.check_vertex(source)?;

    let n = graph.num_vertices();
    let burst = config.superstep_burst.max(1);
    debug!("bulk-synchronous sssp: {n} vertices from source {}, burst {burst}", source.0);

    let mut state = SuperstepState::initial(n, source);
    let mut supersteps = 0;
    let mut converged_after = None;
    let mut bursts = 0;

    while !state.is_settled() {
        for _ in 0..burst {
            let updating = relax(graph, &state);
            state = commit(&state, &updating);
            supersteps += 1;
            if converged_after.is_none() && state.is_settled() {
                converged_after = Some(supersteps);
            }
        }
        bursts += 1;
        trace!(
            "bulk-synchronous sssp: burst {bursts}, {} active after {supersteps} supersteps",
            state.active_count()
        );
    }

    debug!("bulk-synchronous sssp: converged after {supersteps} supersteps");
    Ok(BulkSyncResult {
        distances: state.distance,
        supersteps,
        converged_after: converged_after.unwrap_or(supersteps),
        bursts,
    })
}
