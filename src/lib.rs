//! degree-sssp: single-source shortest paths on fixed-out-degree graphs
//!
//! # Overview
//!
//! Several interchangeable engines compute the same distance vector over one
//! randomly generated graph, so they can be benchmarked against each other:
//!
//! - **Sequential**: greedy Dijkstra over a dense weight matrix
//! - **Shared-memory**: the same loop on a rayon worker team
//! - **Bulk-synchronous**: Bellman-Ford style supersteps with atomic-min
//!   relaxation, on the host or offloaded to the GPU (`gpu` feature)
//!
//! # Quick Start
//!
//! ```
//! use degree_sssp::{
//!     bulk_synchronous_sssp, dijkstra_sequential, dijkstra_shared_memory, FixedDegreeGraph,
//!     NodeId, OffloadConfig, ParallelConfig,
//! };
//!
//! // 100 vertices, 4 distinct out-neighbors each, reproducible from the seed
//! let graph = FixedDegreeGraph::generate(100, 4, 42)?;
//!
//! let sequential = dijkstra_sequential(&graph, NodeId(0))?;
//! let parallel = dijkstra_shared_memory(&graph, NodeId(0), &ParallelConfig::default())?;
//! let bulk = bulk_synchronous_sssp(&graph, NodeId(0), &OffloadConfig::default())?;
//!
//! assert_eq!(sequential.distances(), parallel.distances());
//! for (a, b) in sequential.distances().iter().zip(&bulk.distances) {
//!     assert!((a - b).abs() < 1e-4 || (a.is_infinite() && b.is_infinite()));
//! }
//! # Ok::<(), degree_sssp::Error>(())
//! ```
//!
//! # Architecture
//!
//! - **Storage**: CSR adjacency plus a dense `Option<f32>` weight matrix
//! - **Algorithms**: sequential, shared-memory and bulk-synchronous engines
//! - **GPU**: wgpu device discovery, one-time kernel compilation, WGSL
//!   relax/commit kernels driven in bursts from the host

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod algorithms;
pub mod config;
pub mod storage;

// GPU offload (optional)
#[cfg(feature = "gpu")]
pub mod gpu;

// Re-export core types
pub use algorithms::{
    bulk_synchronous_sssp, dijkstra_sequential, dijkstra_sequential_observed,
    dijkstra_shared_memory, BulkSyncResult, ShortestPaths,
};
pub use config::{OffloadConfig, ParallelConfig};
pub use storage::{FixedDegreeGraph, GraphError, NodeId, WeightMatrix};

#[cfg(feature = "gpu")]
pub use gpu::{
    gpu_sssp, DeviceDiscovery, GpuDevice, GpuDeviceError, GpuGraphBuffers, GpuSsspResult,
    SsspKernels,
};

// Error type
pub use anyhow::{Error, Result};
