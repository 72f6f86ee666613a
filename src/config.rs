//! Engine configuration
//!
//! Plain structs with `Default` values and `with_*` builders; there is no
//! file or environment layer.

use anyhow::{Context, Result};

/// Default number of supersteps launched between active-mask readbacks
pub const DEFAULT_SUPERSTEP_BURST: usize = 10;

/// Default minimum number of vertices a worker handles per split
pub const DEFAULT_MIN_CHUNK_LEN: usize = 1024;

/// Shared-memory engine settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParallelConfig {
    /// Worker team size; `None` uses rayon's default (one per logical core)
    pub num_threads: Option<usize>,

    /// Smallest vertex range a single worker is given, so that small graphs
    /// are not shredded into per-vertex tasks
    pub min_chunk_len: usize,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            num_threads: None,
            min_chunk_len: DEFAULT_MIN_CHUNK_LEN,
        }
    }
}

impl ParallelConfig {
    /// Fix the worker team size
    #[must_use]
    pub const fn with_num_threads(mut self, num_threads: usize) -> Self {
        self.num_threads = Some(num_threads);
        self
    }

    /// Set the minimum per-worker vertex range (clamped to at least 1)
    #[must_use]
    pub fn with_min_chunk_len(mut self, min_chunk_len: usize) -> Self {
        self.min_chunk_len = min_chunk_len.max(1);
        self
    }

    /// Build the worker pool described by this config
    ///
    /// # Errors
    ///
    /// Returns an error if the operating system refuses to spawn the workers
    pub fn build_pool(&self) -> Result<rayon::ThreadPool> {
        let mut builder =
            rayon::ThreadPoolBuilder::new().thread_name(|i| format!("sssp-worker-{i}"));
        if let Some(n) = self.num_threads {
            builder = builder.num_threads(n);
        }
        builder.build().context("Failed to build shared-memory worker pool")
    }
}

/// Bulk-synchronous (offload) engine settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OffloadConfig {
    /// Supersteps launched back to back before the host reads the active
    /// mask and tests for termination. Larger bursts mean fewer host/device
    /// round trips at the cost of a few redundant supersteps.
    pub superstep_burst: usize,
}

impl Default for OffloadConfig {
    fn default() -> Self {
        Self {
            superstep_burst: DEFAULT_SUPERSTEP_BURST,
        }
    }
}

impl OffloadConfig {
    /// Set the burst length (clamped to at least 1)
    #[must_use]
    pub fn with_superstep_burst(mut self, superstep_burst: usize) -> Self {
        self.superstep_burst = superstep_burst.max(1);
        self
    }
}
