//! SSSP engines
//!
//! - `sequential`: greedy Dijkstra over the dense matrix (baseline)
//! - `shared_memory`: the same loop on a rayon worker team
//! - `bulk_sync`: Bellman-Ford style supersteps, the host twin of the GPU engine
//! - `frontier`: closest-unfinalized-vertex selection used by the greedy engines

pub mod bulk_sync;
pub mod frontier;
pub mod paths;
pub mod sequential;
pub mod shared_memory;

pub use bulk_sync::{bulk_synchronous_sssp, commit, relax, BulkSyncResult, SuperstepState};
pub use frontier::{min_unfinalized, min_unfinalized_parallel};
pub use paths::ShortestPaths;
pub use sequential::{dijkstra_sequential, dijkstra_sequential_observed};
pub use shared_memory::dijkstra_shared_memory;
