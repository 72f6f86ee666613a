//! GPU offload of the bulk-synchronous SSSP engine
//!
//! # Architecture
//!
//! - `device`: adapter discovery, device initialization and limit checks
//! - `buffer`: graph upload and staging readback
//! - `kernels`: one-time compilation of the WGSL relax/commit kernels
//! - `sssp`: host-driven superstep loop
//!
//! # Feature Flag
//!
//! This module is only available with the `gpu` feature flag:
//! ```bash
//! cargo build --features gpu
//! ```

mod buffer;
mod device;
mod kernels;
mod sssp;

pub use buffer::{round_work_size_up, GpuGraphBuffers};
pub use device::{DeviceDiscovery, GpuDevice, GpuDeviceError};
pub use kernels::{SsspKernels, SSSP_SHADER, WORKGROUP_SIZE};
pub use sssp::{gpu_sssp, GpuSsspResult};
